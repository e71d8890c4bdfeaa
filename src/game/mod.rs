//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The engine is driven one tick at a time; timing lives in [`crate::driver`].

pub mod action;
pub mod config;
pub mod direction;
pub mod engine;
pub mod food;
pub mod grid;
pub mod state;

// Re-export commonly used types
pub use action::{Command, Direction};
pub use config::{ConfigError, GameConfig, MAX_GRID_DIMENSION};
pub use direction::DirectionBuffer;
pub use engine::{GameEngine, Snapshot, StepOutcome, TickSchedule};
pub use food::place_food;
pub use grid::{Cell, Grid};
pub use state::{GameOverReason, GameState, GameStatus, Position, Snake};
