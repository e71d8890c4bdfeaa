use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors produced while loading or validating a [`GameConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("grid must have at least one row and one column (got {rows}x{cols})")]
    EmptyGrid { rows: usize, cols: usize },

    #[error(
        "speeds must satisfy 0 < min_speed_ms <= initial_speed_ms (got min {min_speed_ms}, initial {initial_speed_ms})"
    )]
    InvalidSpeed {
        initial_speed_ms: u64,
        min_speed_ms: u64,
    },

    #[error("grid of {rows}x{cols} exceeds the largest supported dimension {max}")]
    GridTooLarge { rows: usize, cols: usize, max: usize },

    #[error("initial snake length {length} does not fit a grid {cols} columns wide")]
    InitialLengthTooLong { length: usize, cols: usize },

    #[error("a {rows}x{cols} grid has no free cell for food next to a snake of length {length}")]
    NoFreeCell {
        rows: usize,
        cols: usize,
        length: usize,
    },
}

/// Positions are `i32`, so neither dimension may exceed this
pub const MAX_GRID_DIMENSION: usize = i32::MAX as usize;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of grid rows
    pub rows: usize,
    /// Number of grid columns
    pub cols: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,

    /// Tick interval at the start of a session, in milliseconds
    pub initial_speed_ms: u64,
    /// How much the tick interval shrinks each time food is eaten
    pub speed_increment_ms: u64,
    /// Lower bound for the tick interval
    pub min_speed_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            cols: 20,
            initial_snake_length: 1,
            initial_speed_ms: 150,
            speed_increment_ms: 5,
            min_speed_ms: 50,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::EmptyGrid {
                rows: self.rows,
                cols: self.cols,
            });
        }

        if self.rows > MAX_GRID_DIMENSION || self.cols > MAX_GRID_DIMENSION {
            return Err(ConfigError::GridTooLarge {
                rows: self.rows,
                cols: self.cols,
                max: MAX_GRID_DIMENSION,
            });
        }

        if self.min_speed_ms == 0 || self.min_speed_ms > self.initial_speed_ms {
            return Err(ConfigError::InvalidSpeed {
                initial_speed_ms: self.initial_speed_ms,
                min_speed_ms: self.min_speed_ms,
            });
        }

        // The body trails left of the centre column
        if self.initial_snake_length == 0 || self.initial_snake_length > self.cols / 2 + 1 {
            return Err(ConfigError::InitialLengthTooLong {
                length: self.initial_snake_length,
                cols: self.cols,
            });
        }

        if self.rows.saturating_mul(self.cols) <= self.initial_snake_length {
            return Err(ConfigError::NoFreeCell {
                rows: self.rows,
                cols: self.cols,
                length: self.initial_snake_length,
            });
        }

        Ok(())
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }
}
