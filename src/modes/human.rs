use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stderr, Stderr};
use std::time::Duration;
use tokio::time::interval;

use crate::game::{GameEngine, GameStatus};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{Renderer, SaveStatus};
use crate::scores::{ScoreStore, ScoreSubmission};
use crate::timer::TickTimer;

pub struct HumanMode {
    engine: GameEngine,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    player_name: Option<String>,
    store: Box<dyn ScoreStore>,
    save_status: Option<SaveStatus>,
}

impl HumanMode {
    /// `player_name` enables saving the final score of every game to `store`
    pub fn new(
        engine: GameEngine,
        player_name: Option<String>,
        store: Box<dyn ScoreStore>,
    ) -> Self {
        Self {
            engine,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            player_name,
            store,
            save_status: None,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_game_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Armed only while playing, period follows the engine's speed
        let mut tick_timer = TickTimer::new();

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => log::warn!("Terminal event error: {}", err),
                        None => self.should_quit = true,
                    }
                }

                _ = tick_timer.tick() => {
                    self.update_game();
                }

                _ = render_timer.tick() => {
                    self.metrics.update();
                    let snapshot = self.engine.snapshot();
                    let save_status = self.save_status.as_ref();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &self.metrics, save_status);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }

            tick_timer.sync(self.engine.status(), self.engine.speed_ms());
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Turn(direction) => {
                    self.engine.request_direction(direction);
                }
                KeyAction::StartOrRestart => match self.engine.status() {
                    GameStatus::Ready => self.start_game(),
                    GameStatus::GameOver => self.reset_game(),
                    GameStatus::Playing => {}
                },
                KeyAction::Restart => self.reset_game(),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }
    }

    fn start_game(&mut self) {
        if self.engine.start() {
            self.metrics.on_game_start();
        }
    }

    fn update_game(&mut self) {
        let result = self.engine.tick();

        if result.terminated {
            self.metrics.on_game_over(self.engine.score());
            self.submit_score();
        }
    }

    /// Save the final score once; the outcome is only displayed and logged
    fn submit_score(&mut self) {
        let Some(player_name) = self.player_name.as_ref() else {
            return;
        };

        let submission = ScoreSubmission::new(player_name.clone(), self.engine.score());
        let result = self.store.save(&submission);
        if let Err(err) = &result {
            log::warn!("Failed to save score: {}", err);
        }
        self.save_status = Some(SaveStatus::from(result));
    }

    fn reset_game(&mut self) {
        self.engine.restart();
        self.metrics.on_restart();
        self.save_status = None;
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameConfig, Position};
    use crate::scores::{MemoryStore, ScoreError, ScoreRecord};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    struct FailingStore;

    impl ScoreStore for FailingStore {
        fn save(&mut self, _submission: &ScoreSubmission) -> Result<ScoreRecord, ScoreError> {
            Err(ScoreError::Storage("unavailable".to_string()))
        }

        fn top(&self, _limit: usize) -> Result<Vec<ScoreRecord>, ScoreError> {
            Ok(Vec::new())
        }
    }

    fn mode(player: Option<&str>, store: Box<dyn ScoreStore>) -> HumanMode {
        let engine = GameEngine::with_seed(GameConfig::small(), 1);
        HumanMode::new(engine, player.map(str::to_string), store)
    }

    fn key(mode: &mut HumanMode, code: KeyCode) {
        mode.handle_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    /// Grow the snake to five segments by feeding it, then turn it into itself
    fn grow_then_bite(mode: &mut HumanMode) {
        key(mode, KeyCode::Char(' '));
        assert_eq!(mode.engine.status(), GameStatus::Playing);

        for _ in 0..2 {
            let head = mode.engine.state().snake.head();
            mode.engine.place_food(Position::new(head.x, head.y - 1));
            mode.update_game();
        }
        assert_eq!(mode.engine.state().snake.len(), 5);

        // Keep the next food away from the turn
        mode.engine.place_food(Position::new(0, 9));

        key(mode, KeyCode::Left);
        mode.update_game();
        key(mode, KeyCode::Down);
        mode.update_game();
        key(mode, KeyCode::Right);
        mode.update_game();
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode(None, Box::new(MemoryStore::new()));
        assert_eq!(mode.engine.status(), GameStatus::Ready);
        assert_eq!(mode.engine.score(), 0);
    }

    #[test]
    fn test_space_starts_and_restarts() {
        let mut mode = mode(None, Box::new(MemoryStore::new()));

        key(&mut mode, KeyCode::Char(' '));
        assert_eq!(mode.engine.status(), GameStatus::Playing);

        // Space does nothing mid-game
        key(&mut mode, KeyCode::Char(' '));
        assert_eq!(mode.engine.status(), GameStatus::Playing);

        key(&mut mode, KeyCode::Char('r'));
        assert_eq!(mode.engine.status(), GameStatus::Ready);
    }

    #[test]
    fn test_turn_ignored_before_start() {
        let mut mode = mode(None, Box::new(MemoryStore::new()));
        key(&mut mode, KeyCode::Left);
        assert_eq!(mode.engine.state().pending_direction, Direction::Up);
    }

    #[test]
    fn test_collision_ends_game_and_saves_once() {
        let mut mode = mode(Some("ada"), Box::new(MemoryStore::new()));
        grow_then_bite(&mut mode);

        assert_eq!(mode.engine.status(), GameStatus::GameOver);
        assert_eq!(mode.metrics.games_played, 1);
        assert_eq!(mode.metrics.high_score, 2);
        match &mode.save_status {
            Some(SaveStatus::Saved(record)) => {
                assert_eq!(record.player_name, "ada");
                assert_eq!(record.score, 2);
            }
            other => panic!("expected saved score, got {:?}", other),
        }

        // Further ticks after game over neither count nor save again
        mode.update_game();
        assert_eq!(mode.metrics.games_played, 1);

        key(&mut mode, KeyCode::Char(' '));
        assert_eq!(mode.engine.status(), GameStatus::Ready);
        assert!(mode.save_status.is_none());
    }

    #[test]
    fn test_failed_save_leaves_game_over_intact() {
        let mut mode = mode(Some("ada"), Box::new(FailingStore));
        grow_then_bite(&mut mode);

        assert_eq!(mode.engine.status(), GameStatus::GameOver);
        assert!(matches!(mode.save_status, Some(SaveStatus::Failed(_))));
    }

    #[test]
    fn test_no_player_skips_save() {
        let mut mode = mode(None, Box::new(MemoryStore::new()));
        grow_then_bite(&mut mode);

        assert_eq!(mode.engine.status(), GameStatus::GameOver);
        assert!(mode.save_status.is_none());
    }
}
