use std::collections::VecDeque;

use super::{action::Direction, direction::DirectionBuffer};

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Move position by delta
    pub fn moved_by(&self, d_row: i32, d_col: i32) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (d_row, d_col) = direction.delta();
        self.moved_by(d_row, d_col)
    }

    /// Check if the position lies inside a `rows` x `cols` grid
    pub fn is_within(&self, rows: usize, cols: usize) -> bool {
        self.row >= 0 && self.col >= 0 && (self.row as usize) < rows && (self.col as usize) < cols
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    /// Body segments, with head at index 0
    body: VecDeque<Position>,
}

impl Snake {
    /// Create a new snake whose body trails behind `head`, opposite to `heading`
    pub fn new(head: Position, heading: Direction, length: usize) -> Self {
        let (d_row, d_col) = heading.opposite().delta();
        let body = (0..length.max(1) as i32)
            .map(|i| head.moved_by(d_row * i, d_col * i))
            .collect();

        Self { body }
    }

    /// Build a snake from explicit segments, head first. Returns `None` for an empty slice.
    pub fn from_segments(segments: &[Position]) -> Option<Self> {
        if segments.is_empty() {
            return None;
        }

        Some(Self {
            body: segments.iter().copied().collect(),
        })
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn segments(&self) -> impl Iterator<Item = &Position> + '_ {
        self.body.iter()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Check if `pos` hits any segment except the tail, which vacates on a non-growing move
    pub fn collides_ignoring_tail(&self, pos: Position) -> bool {
        self.body
            .iter()
            .take(self.body.len() - 1)
            .any(|segment| *segment == pos)
    }

    /// Push a new head; drop the tail unless the snake grows this step
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.push_front(new_head);

        if !grow {
            self.body.pop_back();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; a snake keeps at least its head
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Phase of the game state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    NotStarted,
    Running,
    Paused,
    GameOver,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// No free cell was left for food
    BoardFull,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub direction: DirectionBuffer,
    pub status: GameStatus,
    pub score: u32,
    /// Milliseconds per tick
    pub speed_ms: u64,
    /// Bumped on every reset so a fresh session always re-arms the timer
    pub session: u64,
    /// Steps executed in this session
    pub ticks: u64,
    pub game_over_reason: Option<GameOverReason>,
}

impl GameState {
    /// Create a new, not yet started game state
    pub fn new(snake: Snake, food: Position, heading: Direction, speed_ms: u64) -> Self {
        Self {
            snake,
            food,
            direction: DirectionBuffer::new(heading),
            status: GameStatus::NotStarted,
            score: 0,
            speed_ms,
            session: 0,
            ticks: 0,
            game_over_reason: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_in_direction(Direction::Up), Position::new(4, 5));
        assert_eq!(pos.moved_in_direction(Direction::Down), Position::new(6, 5));
        assert_eq!(pos.moved_in_direction(Direction::Left), Position::new(5, 4));
        assert_eq!(pos.moved_in_direction(Direction::Right), Position::new(5, 6));
    }

    #[test]
    fn test_bounds_checking() {
        assert!(Position::new(0, 0).is_within(20, 20));
        assert!(Position::new(19, 19).is_within(20, 20));
        assert!(!Position::new(-1, 0).is_within(20, 20));
        assert!(!Position::new(0, -1).is_within(20, 20));
        assert!(!Position::new(20, 0).is_within(20, 20));
        assert!(!Position::new(0, 20).is_within(20, 20));
        assert!(Position::new(4, 9).is_within(5, 10));
        assert!(!Position::new(5, 9).is_within(5, 10));
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        let body: Vec<_> = snake.segments().copied().collect();
        assert_eq!(
            body,
            vec![Position::new(5, 5), Position::new(5, 4), Position::new(5, 3)]
        );
        assert_eq!(snake.head(), Position::new(5, 5));
        assert_eq!(snake.tail(), Position::new(5, 3));
    }

    #[test]
    fn test_single_segment_snake() {
        let snake = Snake::new(Position::new(10, 10), Direction::Right, 1);
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), snake.tail());
        assert!(!snake.is_empty());
    }

    #[test]
    fn test_from_segments() {
        assert!(Snake::from_segments(&[]).is_none());

        let snake =
            Snake::from_segments(&[Position::new(1, 1), Position::new(1, 0)]).unwrap();
        assert_eq!(snake.head(), Position::new(1, 1));
        assert_eq!(snake.tail(), Position::new(1, 0));
    }

    #[test]
    fn test_snake_advance() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right, 3);

        snake.advance(Position::new(5, 6), false);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(5, 6));
        assert_eq!(snake.tail(), Position::new(5, 4));

        snake.advance(Position::new(5, 7), true);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Position::new(5, 7));
        assert_eq!(snake.tail(), Position::new(5, 4));
    }

    #[test]
    fn test_collision_ignores_tail() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        assert!(snake.collides_ignoring_tail(Position::new(5, 5))); // head
        assert!(snake.collides_ignoring_tail(Position::new(5, 4))); // body
        assert!(!snake.collides_ignoring_tail(Position::new(5, 3))); // tail
        assert!(!snake.collides_ignoring_tail(Position::new(0, 0))); // empty
        assert!(snake.contains(Position::new(5, 3)));
    }

    #[test]
    fn test_new_state_is_not_started() {
        let state = GameState::new(
            Snake::new(Position::new(10, 10), Direction::Right, 1),
            Position::new(3, 3),
            Direction::Right,
            150,
        );
        assert_eq!(state.status, GameStatus::NotStarted);
        assert_eq!(state.score, 0);
        assert_eq!(state.direction.active(), Direction::Right);
        assert!(state.game_over_reason.is_none());
    }
}
