use rand::Rng;
use rand::seq::IteratorRandom;

use super::state::{Position, Snake};

/// Random samples tried before falling back to scanning for free cells
pub const MAX_PLACEMENT_ATTEMPTS: usize = 256;

/// Pick a cell not covered by `snake`, uniformly at random.
///
/// Returns `None` only when the snake covers every cell of the grid.
pub fn place_food<R: Rng + ?Sized>(
    rng: &mut R,
    rows: usize,
    cols: usize,
    snake: &Snake,
) -> Option<Position> {
    if rows == 0 || cols == 0 {
        return None;
    }

    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let pos = Position::new(
            rng.gen_range(0..rows) as i32,
            rng.gen_range(0..cols) as i32,
        );

        if !snake.contains(pos) {
            return Some(pos);
        }
    }

    // Crowded board: choose among the cells that are actually free
    (0..rows as i32)
        .flat_map(|row| (0..cols as i32).map(move |col| Position::new(row, col)))
        .filter(|pos| !snake.contains(*pos))
        .choose(rng)
}
