//! Tick timer for the game loop
//!
//! The driver holds at most one single-shot [`Sleep`]. After each firing it
//! disarms itself, and [`TickDriver::sync`] arms a fresh one from the
//! engine's current [`TickSchedule`]. A pause, reset, game over or speed
//! change therefore cancels the old timer before anything else can fire, and
//! dropping the driver drops the pending timer with it.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut driver = TickDriver::new();
//! loop {
//!     tokio::select! {
//!         _ = driver.fired() => { engine.step(); }
//!         // ... input branches ...
//!     }
//!     driver.sync(&engine);
//! }
//! ```

use std::future;
use std::pin::Pin;
use tokio::time::{Instant, Sleep, sleep};
use tracing::trace;

use crate::game::{GameEngine, TickSchedule};

struct ArmedTick {
    schedule: TickSchedule,
    sleep: Pin<Box<Sleep>>,
}

#[derive(Default)]
pub struct TickDriver {
    armed: Option<ArmedTick>,
}

impl TickDriver {
    pub fn new() -> Self {
        Self { armed: None }
    }

    /// Bring the timer in line with the engine.
    ///
    /// Keeps the pending timer when the schedule is unchanged; otherwise
    /// cancels it and arms a new one if the engine is running. Returns true
    /// when the timer was replaced or torn down.
    pub fn sync(&mut self, engine: &GameEngine) -> bool {
        let wanted = engine.tick_schedule();
        let current = self.armed.as_ref().map(|armed| armed.schedule);

        if wanted == current {
            return false;
        }

        self.cancel();
        if let Some(schedule) = wanted {
            self.arm(schedule);
        }
        true
    }

    pub fn cancel(&mut self) {
        if let Some(armed) = self.armed.take() {
            trace!(session = armed.schedule.session, "tick timer cancelled");
        }
    }

    fn arm(&mut self, schedule: TickSchedule) {
        trace!(
            session = schedule.session,
            interval_ms = schedule.interval.as_millis() as u64,
            "tick timer armed"
        );
        self.armed = Some(ArmedTick {
            schedule,
            sleep: Box::pin(sleep(schedule.interval)),
        });
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// When the armed timer will fire, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.armed.as_ref().map(|armed| armed.sleep.deadline())
    }

    /// Wait for the armed timer. Never completes while disarmed.
    ///
    /// Cancel safe: dropping the future keeps the timer and its deadline.
    pub async fn fired(&mut self) {
        let Some(armed) = self.armed.as_mut() else {
            return future::pending().await;
        };

        armed.sleep.as_mut().await;
        self.armed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{
        Direction, GameConfig, GameState, GameStatus, Position, Snake, StepOutcome,
    };
    use std::time::Duration;
    use tokio::time::timeout;

    fn started_engine() -> GameEngine {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 4).unwrap();
        engine.start();
        engine
    }

    #[test]
    fn test_not_armed_before_start() {
        let engine = GameEngine::with_seed(GameConfig::default(), 4).unwrap();
        let mut driver = TickDriver::new();

        assert!(!driver.sync(&engine));
        assert!(!driver.is_armed());
        assert!(driver.deadline().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_speed_interval() {
        let engine = started_engine();
        let mut driver = TickDriver::new();
        assert!(driver.sync(&engine));

        let start = Instant::now();
        driver.fired().await;

        assert!(start.elapsed() >= Duration::from_millis(150));
        assert!(!driver.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sync_is_idempotent() {
        let engine = started_engine();
        let mut driver = TickDriver::new();
        driver.sync(&engine);
        let deadline = driver.deadline();

        tokio::time::advance(Duration::from_millis(100)).await;
        assert!(!driver.sync(&engine));
        assert_eq!(driver.deadline(), deadline);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_cancels_and_resume_rearms() {
        let mut engine = started_engine();
        let mut driver = TickDriver::new();
        driver.sync(&engine);

        engine.pause();
        assert!(driver.sync(&engine));
        assert!(!driver.is_armed());
        assert!(
            timeout(Duration::from_secs(5), driver.fired())
                .await
                .is_err()
        );

        engine.resume();
        assert!(driver.sync(&engine));
        let resumed_at = Instant::now();
        driver.fired().await;
        assert!(resumed_at.elapsed() >= Duration::from_millis(150));
    }

    #[tokio::test(start_paused = true)]
    async fn test_speed_change_applies_on_next_tick() {
        let snake = Snake::new(Position::new(10, 10), Direction::Right, 1);
        let mut state = GameState::new(snake, Position::new(10, 11), Direction::Right, 150);
        state.status = GameStatus::Running;
        let mut engine = GameEngine::with_state(GameConfig::default(), state, 1);
        let mut driver = TickDriver::new();

        driver.sync(&engine);
        driver.fired().await;
        assert_eq!(engine.step(), StepOutcome::Grew);
        assert_eq!(engine.speed_ms(), 145);

        assert!(driver.sync(&engine));
        let start = Instant::now();
        driver.fired().await;
        assert!(start.elapsed() >= Duration::from_millis(145));
        assert!(start.elapsed() < Duration::from_millis(150));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_rearms_even_with_same_speed() {
        let mut engine = started_engine();
        let mut driver = TickDriver::new();
        driver.sync(&engine);
        tokio::time::advance(Duration::from_millis(100)).await;
        let old_deadline = driver.deadline().unwrap();

        engine.reset();
        assert!(driver.sync(&engine));
        assert!(driver.deadline().unwrap() > old_deadline);
    }

    #[tokio::test(start_paused = true)]
    async fn test_game_over_tears_down_timer() {
        let mut engine = started_engine();
        let mut driver = TickDriver::new();

        while !engine.is_game_over() {
            driver.sync(&engine);
            driver.fired().await;
            engine.step();
        }

        driver.sync(&engine);
        assert!(!driver.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_wait_keeps_deadline() {
        let engine = started_engine();
        let mut driver = TickDriver::new();
        driver.sync(&engine);
        let deadline = driver.deadline();

        assert!(
            timeout(Duration::from_millis(50), driver.fired())
                .await
                .is_err()
        );
        assert_eq!(driver.deadline(), deadline);

        driver.fired().await;
        assert!(Instant::now() >= deadline.unwrap());
    }
}
