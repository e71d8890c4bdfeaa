use std::time::{Duration, Instant};

use crate::game::StepOutcome;

/// In-memory statistics for the current process. Nothing is persisted.
pub struct GameMetrics {
    /// Start of the current unpaused stretch, `None` while the clock is stopped
    running_since: Option<Instant>,
    /// Play time banked before the current stretch
    banked: Duration,
    pub elapsed_time: Duration,
    pub food_eaten: u32,
    pub best_score: u32,
    pub games_played: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            running_since: None,
            banked: Duration::ZERO,
            elapsed_time: Duration::ZERO,
            food_eaten: 0,
            best_score: 0,
            games_played: 0,
        }
    }

    /// Refresh `elapsed_time`; the clock only advances while `running`
    pub fn update(&mut self, running: bool) {
        let now = Instant::now();
        match (running, self.running_since) {
            (true, None) => self.running_since = Some(now),
            (false, Some(since)) => {
                self.banked += now.duration_since(since);
                self.running_since = None;
            }
            _ => {}
        }

        self.elapsed_time = self.banked
            + self
                .running_since
                .map(|since| now.duration_since(since))
                .unwrap_or_default();
    }

    pub fn on_game_start(&mut self) {
        self.running_since = None;
        self.banked = Duration::ZERO;
        self.elapsed_time = Duration::ZERO;
        self.food_eaten = 0;
    }

    pub fn on_step(&mut self, outcome: StepOutcome, score: u32) {
        match outcome {
            StepOutcome::Grew => self.food_eaten += 1,
            StepOutcome::GameOver(_) => self.on_game_over(score),
            StepOutcome::Moved | StepOutcome::Skipped => {}
        }
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.games_played += 1;
        if final_score > self.best_score {
            self.best_score = final_score;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameOverReason;

    #[test]
    fn test_time_formatting() {
        let mut metrics = GameMetrics::new();
        metrics.elapsed_time = Duration::from_secs(125);
        assert_eq!(metrics.format_time(), "02:05");

        metrics.elapsed_time = Duration::from_secs(0);
        assert_eq!(metrics.format_time(), "00:00");

        metrics.elapsed_time = Duration::from_secs(3661);
        assert_eq!(metrics.format_time(), "61:01");
    }

    #[test]
    fn test_best_score_tracking() {
        let mut metrics = GameMetrics::new();

        metrics.on_step(StepOutcome::GameOver(GameOverReason::Wall), 10);
        assert_eq!(metrics.best_score, 10);
        assert_eq!(metrics.games_played, 1);

        metrics.on_game_over(5);
        assert_eq!(metrics.best_score, 10); // Should not decrease
        assert_eq!(metrics.games_played, 2);

        metrics.on_game_over(15);
        assert_eq!(metrics.best_score, 15); // Should update
        assert_eq!(metrics.games_played, 3);
    }

    #[test]
    fn test_food_counted_per_game() {
        let mut metrics = GameMetrics::new();
        metrics.on_step(StepOutcome::Grew, 1);
        metrics.on_step(StepOutcome::Moved, 1);
        metrics.on_step(StepOutcome::Grew, 2);
        assert_eq!(metrics.food_eaten, 2);

        metrics.on_game_start();
        assert_eq!(metrics.food_eaten, 0);
    }

    #[test]
    fn test_clock_stops_while_paused() {
        let mut metrics = GameMetrics::new();
        metrics.update(true);
        std::thread::sleep(Duration::from_millis(30));
        metrics.update(false);
        let paused_at = metrics.elapsed_time;
        assert!(paused_at >= Duration::from_millis(30));

        std::thread::sleep(Duration::from_millis(30));
        metrics.update(false);
        assert_eq!(metrics.elapsed_time, paused_at);

        metrics.update(true);
        std::thread::sleep(Duration::from_millis(10));
        metrics.update(true);
        assert!(metrics.elapsed_time >= paused_at + Duration::from_millis(10));
    }

    #[test]
    fn test_game_start_resets_time() {
        let mut metrics = GameMetrics::new();
        metrics.update(true);
        std::thread::sleep(Duration::from_millis(50));
        metrics.update(true);

        assert!(metrics.elapsed_time.as_millis() >= 50);

        metrics.on_game_start();
        metrics.update(true);
        assert!(metrics.elapsed_time.as_millis() < 50);
    }
}
