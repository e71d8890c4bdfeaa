use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

use super::{
    action::{Command, Direction},
    config::{ConfigError, GameConfig},
    food::place_food,
    grid::Grid,
    state::{GameOverReason, GameState, GameStatus, Position, Snake},
};

/// What a single call to [`GameEngine::step`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The game was not running; nothing changed
    Skipped,
    /// The snake moved one cell
    Moved,
    /// The snake ate food and grew by one segment
    Grew,
    /// The step ended the game
    GameOver(GameOverReason),
}

/// Timer parameters the tick driver should be armed with. Only exists
/// while the game is running.
///
/// Any change in one of these fields means the running timer is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSchedule {
    pub session: u64,
    pub interval: Duration,
}

/// Everything a view needs to paint one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub grid: Grid,
    pub head: Position,
    pub score: u32,
    pub speed_ms: u64,
    pub status: GameStatus,
    pub direction: Direction,
    pub snake_len: usize,
    pub ticks: u64,
    pub game_over_reason: Option<GameOverReason>,
}

impl Snapshot {
    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    pub fn is_paused(&self) -> bool {
        self.status == GameStatus::Paused
    }
}

/// The game engine: owns the state and applies every transition to it
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
    state: GameState,
}

impl GameEngine {
    /// Create a new, not yet started game with entropy-seeded food placement
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::from_rng(config, StdRng::from_entropy())
    }

    /// Create a new, not yet started game with reproducible food placement
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::from_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Wrap an explicit state, e.g. a hand-built scenario
    pub fn with_state(config: GameConfig, state: GameState, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            state,
        }
    }

    fn from_rng(config: GameConfig, mut rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = Self::initial_state(&config, &mut rng).ok_or(ConfigError::NoFreeCell {
            rows: config.rows,
            cols: config.cols,
            length: config.initial_snake_length,
        })?;
        Ok(Self { config, rng, state })
    }

    /// `None` when the initial snake leaves no free cell for food
    fn initial_state(config: &GameConfig, rng: &mut StdRng) -> Option<GameState> {
        let center = Position::new((config.rows / 2) as i32, (config.cols / 2) as i32);
        let snake = Snake::new(center, Direction::Right, config.initial_snake_length);
        let food = place_food(rng, config.rows, config.cols, &snake)?;

        Some(GameState::new(
            snake,
            food,
            Direction::Right,
            config.initial_speed_ms,
        ))
    }

    /// NotStarted -> Running
    pub fn start(&mut self) {
        if self.state.status == GameStatus::NotStarted {
            self.state.status = GameStatus::Running;
            info!(session = self.state.session, "game started");
        }
    }

    /// Running -> Paused
    pub fn pause(&mut self) {
        if self.state.status == GameStatus::Running {
            self.state.status = GameStatus::Paused;
            debug!(score = self.state.score, "game paused");
        }
    }

    /// Paused -> Running
    pub fn resume(&mut self) {
        if self.state.status == GameStatus::Paused {
            self.state.status = GameStatus::Running;
            debug!("game resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.state.status {
            GameStatus::Running => self.pause(),
            GameStatus::Paused => self.resume(),
            GameStatus::NotStarted | GameStatus::GameOver => {}
        }
    }

    /// Reinitialise everything and start playing again, from any state
    pub fn reset(&mut self) {
        let session = self.state.session + 1;
        let Some(state) = Self::initial_state(&self.config, &mut self.rng) else {
            // Only reachable through with_state on a board with no free cell
            warn!(session, "no free cell for food, reset ignored");
            return;
        };
        self.state = state;
        self.state.session = session;
        self.state.status = GameStatus::Running;
        info!(session, "game reset");
    }

    /// Queue a heading for the next tick. Dropped unless running, or if it
    /// reverses the active direction. Returns whether it was kept.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        if self.state.status != GameStatus::Running {
            return false;
        }

        self.state.direction.request(direction)
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Start => self.start(),
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::TogglePause => self.toggle_pause(),
            Command::Reset => self.reset(),
            Command::Turn(direction) => {
                self.request_direction(direction);
            }
        }
    }

    /// Advance the simulation by one tick
    pub fn step(&mut self) -> StepOutcome {
        if self.state.status != GameStatus::Running {
            return StepOutcome::Skipped;
        }

        let direction = self.state.direction.commit();
        let new_head = self.state.snake.head().moved_in_direction(direction);
        self.state.ticks += 1;

        if !new_head.is_within(self.config.rows, self.config.cols) {
            return self.end_game(GameOverReason::Wall);
        }

        if self.state.snake.collides_ignoring_tail(new_head) {
            return self.end_game(GameOverReason::SelfCollision);
        }

        let ate_food = new_head == self.state.food;
        self.state.snake.advance(new_head, ate_food);
        trace!(row = new_head.row, col = new_head.col, dir = direction.as_str(), "step");

        if !ate_food {
            return StepOutcome::Moved;
        }

        self.state.score += 1;
        let speed_ms = self
            .state
            .speed_ms
            .saturating_sub(self.config.speed_increment_ms)
            .max(self.config.min_speed_ms);
        if speed_ms != self.state.speed_ms {
            debug!(from = self.state.speed_ms, to = speed_ms, "speed changed");
        }
        self.state.speed_ms = speed_ms;

        match place_food(
            &mut self.rng,
            self.config.rows,
            self.config.cols,
            &self.state.snake,
        ) {
            Some(food) => {
                debug!(score = self.state.score, row = food.row, col = food.col, "food eaten");
                self.state.food = food;
                StepOutcome::Grew
            }
            None => self.end_game(GameOverReason::BoardFull),
        }
    }

    fn end_game(&mut self, reason: GameOverReason) -> StepOutcome {
        self.state.status = GameStatus::GameOver;
        self.state.game_over_reason = Some(reason);
        info!(
            ?reason,
            score = self.state.score,
            length = self.state.snake.len(),
            ticks = self.state.ticks,
            "game over"
        );
        StepOutcome::GameOver(reason)
    }

    /// The timer the driver should run, or `None` when no tick may fire
    pub fn tick_schedule(&self) -> Option<TickSchedule> {
        (self.state.status == GameStatus::Running).then(|| TickSchedule {
            session: self.state.session,
            interval: self.tick_interval(),
        })
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.state.speed_ms)
    }

    pub fn grid(&self) -> Grid {
        Grid::render(
            self.config.rows,
            self.config.cols,
            &self.state.snake,
            self.state.food,
        )
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid(),
            head: self.state.snake.head(),
            score: self.state.score,
            speed_ms: self.state.speed_ms,
            status: self.state.status,
            direction: self.state.direction.active(),
            snake_len: self.state.snake.len(),
            ticks: self.state.ticks,
            game_over_reason: self.state.game_over_reason,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn speed_ms(&self) -> u64 {
        self.state.speed_ms
    }

    /// The direction applied on the most recent tick
    pub fn direction(&self) -> Direction {
        self.state.direction.active()
    }

    pub fn snake(&self) -> &Snake {
        &self.state.snake
    }

    pub fn food(&self) -> Position {
        self.state.food
    }

    pub fn is_running(&self) -> bool {
        self.state.status == GameStatus::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state.status == GameStatus::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.state.status == GameStatus::GameOver
    }
}
