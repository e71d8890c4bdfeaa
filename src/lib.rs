//! Grid Snake - a tick-driven Snake game engine with a terminal front end
//!
//! This library provides:
//! - Core game logic and state machine (game module)
//! - A cancellable, re-armable tick timer (driver module)
//! - TUI rendering and keyboard mapping (render and input modules)
//! - The interactive terminal mode (modes module)

pub mod driver;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
