use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Command, Direction, GameStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    GameCommand(Command),
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::GameCommand(Command::Turn(Direction::Up)),
            KeyCode::Down => KeyAction::GameCommand(Command::Turn(Direction::Down)),
            KeyCode::Left => KeyAction::GameCommand(Command::Turn(Direction::Left)),
            KeyCode::Right => KeyAction::GameCommand(Command::Turn(Direction::Right)),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => {
                KeyAction::GameCommand(Command::Turn(Direction::Up))
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                KeyAction::GameCommand(Command::Turn(Direction::Down))
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                KeyAction::GameCommand(Command::Turn(Direction::Left))
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                KeyAction::GameCommand(Command::Turn(Direction::Right))
            }

            // Controls
            KeyCode::Char(' ') => KeyAction::GameCommand(Command::TogglePause),
            KeyCode::Enter => KeyAction::GameCommand(Command::Start),
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::GameCommand(Command::Reset),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }

    /// Drop keys the current phase does not accept.
    ///
    /// Paused: only the pause key. Game over: only reset. Quit always passes.
    pub fn filter_for_status(&self, action: KeyAction, status: GameStatus) -> KeyAction {
        match (status, action) {
            (_, KeyAction::Quit) => action,
            (GameStatus::Paused, KeyAction::GameCommand(Command::TogglePause)) => action,
            (GameStatus::Paused, _) => KeyAction::None,
            (GameStatus::GameOver, KeyAction::GameCommand(Command::Reset)) => action,
            (GameStatus::GameOver, _) => KeyAction::None,
            _ => action,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
