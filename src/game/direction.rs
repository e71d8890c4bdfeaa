//! Two-phase direction input.
//!
//! Input only ever touches the *requested* direction. The engine commits it
//! to *active* once per tick, before moving, so at most one turn lands per
//! tick and a burst of keys can never fold the snake back onto its neck.

use super::action::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionBuffer {
    active: Direction,
    requested: Direction,
}

impl DirectionBuffer {
    pub fn new(heading: Direction) -> Self {
        Self {
            active: heading,
            requested: heading,
        }
    }

    /// Store `direction` for the next tick unless it reverses the active heading.
    /// Returns whether the request was kept.
    pub fn request(&mut self, direction: Direction) -> bool {
        if self.active.is_opposite(direction) {
            return false;
        }

        self.requested = direction;
        true
    }

    /// Apply the pending request. Returns the direction to move in this tick.
    pub fn commit(&mut self) -> Direction {
        self.active = self.requested;
        self.active
    }

    pub fn active(&self) -> Direction {
        self.active
    }

    pub fn requested(&self) -> Direction {
        self.requested
    }
}
