use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, Write, stderr};
use std::time::Duration;
use tokio::time::interval;
use tracing::info;

use crate::driver::TickDriver;
use crate::game::{Command, GameConfig, GameEngine};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Options for an interactive session
#[derive(Debug, Clone, Default)]
pub struct HumanOptions {
    /// Seed for food placement; random when absent
    pub seed: Option<u64>,
    /// Begin playing immediately instead of waiting for Enter
    pub autostart: bool,
}

pub struct HumanMode {
    engine: GameEngine,
    driver: TickDriver,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig, options: HumanOptions) -> Result<Self> {
        let mut engine = match options.seed {
            Some(seed) => GameEngine::with_seed(config, seed),
            None => GameEngine::new(config),
        }
        .context("Failed to create game engine")?;
        if options.autostart {
            engine.start();
        }

        Ok(Self {
            engine,
            driver: TickDriver::new(),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut terminal = match setup_terminal() {
            Ok(terminal) => terminal,
            Err(err) => {
                // Raw mode is already on and must not survive a failed setup
                let _ = restore_terminal(&mut stderr());
                return Err(err);
            }
        };

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // No tick may outlive the session
        self.driver.cancel();

        let cleanup = restore_terminal(terminal.backend_mut());

        info!(
            games = self.metrics.games_played,
            best = self.metrics.best_score,
            "session ended"
        );
        result.and(cleanup)
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        self.driver.sync(&self.engine);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick; the driver only fires while running
                _ = self.driver.fired() => {
                    self.update_game();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update(self.engine.is_running());
                    let snapshot = self.engine.snapshot();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            // Cancel or re-arm the tick timer after any state change
            self.driver.sync(&self.engine);

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };

        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        let action = self.input_handler.handle_key_event(key);
        let action = self
            .input_handler
            .filter_for_status(action, self.engine.status());
        self.apply_action(action);
    }

    fn apply_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::GameCommand(Command::Reset) => self.reset_game(),
            KeyAction::GameCommand(command) => self.engine.apply(command),
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    fn update_game(&mut self) {
        let outcome = self.engine.step();
        self.metrics.on_step(outcome, self.engine.score());
    }

    fn reset_game(&mut self) {
        self.engine.reset();
        self.metrics.on_game_start();
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stderr>>> {
    let mut stderr = stderr();
    execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stderr);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
    terminal.hide_cursor().context("Failed to hide cursor")?;
    terminal.clear().context("Failed to clear terminal")?;
    Ok(terminal)
}

/// Undo every setup step, even when an earlier one fails. Reports the first error.
fn restore_terminal<W: Write>(out: &mut W) -> Result<()> {
    let raw_mode = disable_raw_mode().context("Failed to disable raw mode");
    let screen = execute!(out, LeaveAlternateScreen, Show)
        .context("Failed to leave alternate screen");
    raw_mode.and(screen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameStatus};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn seeded(autostart: bool) -> HumanMode {
        HumanMode::new(
            GameConfig::default(),
            HumanOptions {
                seed: Some(8),
                autostart,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_game_initialization() {
        let mode = seeded(true);
        assert!(mode.engine.is_running());
        assert_eq!(mode.engine.score(), 0);
    }

    #[tokio::test]
    async fn test_autostart_arms_timer() {
        let mut mode = seeded(true);
        mode.driver.sync(&mode.engine);
        assert!(mode.driver.is_armed());

        let mut waiting = seeded(false);
        waiting.driver.sync(&waiting.engine);
        assert_eq!(waiting.engine.status(), GameStatus::NotStarted);
        assert!(!waiting.driver.is_armed());
    }

    #[test]
    fn test_enter_starts_game() {
        let mut mode = seeded(false);
        mode.handle_event(press(KeyCode::Enter));
        assert!(mode.engine.is_running());
    }

    #[test]
    fn test_pause_key_toggles() {
        let mut mode = seeded(true);
        mode.handle_event(press(KeyCode::Char(' ')));
        assert!(mode.engine.is_paused());

        // Arrow keys are ignored while paused
        mode.handle_event(press(KeyCode::Down));
        assert_eq!(mode.engine.state().direction.requested(), Direction::Right);

        mode.handle_event(press(KeyCode::Char(' ')));
        assert!(mode.engine.is_running());
    }

    #[test]
    fn test_turn_is_buffered_until_tick() {
        let mut mode = seeded(true);
        mode.handle_event(press(KeyCode::Char('s')));
        assert_eq!(mode.engine.direction(), Direction::Right);

        mode.update_game();
        assert_eq!(mode.engine.direction(), Direction::Down);
    }

    #[test]
    fn test_key_release_ignored() {
        let mut mode = seeded(true);
        let mut release = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        mode.handle_event(Event::Key(release));
        assert!(mode.engine.is_running());
    }

    #[test]
    fn test_game_reset() {
        let mut mode = seeded(true);
        while !mode.engine.is_game_over() {
            mode.update_game();
        }
        assert_eq!(mode.metrics.games_played, 1);

        // Only reset is honoured once the game is over
        mode.handle_event(press(KeyCode::Char(' ')));
        assert!(mode.engine.is_game_over());

        mode.handle_event(press(KeyCode::Char('r')));
        assert!(mode.engine.is_running());
        assert_eq!(mode.engine.score(), 0);
    }

    #[test]
    fn test_rejects_config_without_free_cell() {
        let result = HumanMode::new(GameConfig::new(1, 1), HumanOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_restore_terminal_leaves_screen_and_shows_cursor() {
        let mut out = Vec::new();
        restore_terminal(&mut out).unwrap();

        let written = String::from_utf8(out).unwrap();
        assert!(written.contains("\x1b[?1049l"));
        assert!(written.contains("\x1b[?25h"));
    }

    #[test]
    fn test_quit_key() {
        let mut mode = seeded(true);
        mode.handle_event(press(KeyCode::Char('q')));
        assert!(mode.should_quit);
    }
}
