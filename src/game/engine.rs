use super::{
    config::GameConfig,
    direction::Direction,
    state::{GameState, GameStatus, Position, Snake, Snapshot},
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// What happened during a call to [`GameEngine::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickResult {
    /// Whether the game actually advanced (false when not playing)
    pub advanced: bool,
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Whether the tick ended the game
    pub terminated: bool,
}

/// The game engine that owns one game instance and enforces its rules
///
/// Calls made in a status where they do not apply are silently ignored.
/// The engine never runs a timer; callers drive [`tick`](Self::tick) at the
/// interval reported by [`speed_ms`](Self::speed_ms).
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
    seed: u64,
    state: GameState,
}

impl GameEngine {
    /// Create a new game with a random seed
    pub fn new(config: GameConfig) -> Self {
        let seed = rand::thread_rng().gen();
        Self::with_seed(config, seed)
    }

    /// Create a new game whose food placement is reproducible from `seed`
    ///
    /// `config` must pass [`GameConfig::validate`]; a snake that fills the
    /// whole grid leaves no cell for food and this never returns.
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let state = Self::initial_state(&config, &mut rng);

        Self {
            config,
            rng,
            seed,
            state,
        }
    }

    fn initial_state(config: &GameConfig, rng: &mut StdRng) -> GameState {
        let center = (config.grid_size / 2) as i32;

        let snake = Snake::new(
            Position::new(center, center),
            Direction::Up,
            config.initial_snake_length,
            config.grid_size,
        );

        let food = spawn_food(rng, &snake, config.grid_size);

        GameState::new(snake, Some(food), config.grid_size, config.initial_speed_ms)
    }

    /// Move from `Ready` to `Playing`
    ///
    /// Returns true if the status changed.
    pub fn start(&mut self) -> bool {
        if self.state.status != GameStatus::Ready {
            return false;
        }

        self.state.status = GameStatus::Playing;
        log::info!("Game started (seed {})", self.seed);
        true
    }

    /// Buffer a direction change for the next tick
    ///
    /// Dropped unless playing, and dropped if it reverses the committed
    /// direction. A later request overwrites an earlier unconsumed one.
    /// Returns true if the request was buffered.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        if self.state.status != GameStatus::Playing {
            return false;
        }

        if self.state.snake.direction.is_opposite(direction) {
            log::trace!("Ignoring reversal to {:?}", direction);
            return false;
        }

        self.state.pending_direction = direction;
        true
    }

    /// Advance the game by one cell
    pub fn tick(&mut self) -> TickResult {
        if self.state.status != GameStatus::Playing {
            return TickResult::default();
        }

        let grid_size = self.state.grid_size;

        self.state.snake.direction = self.state.pending_direction;
        let new_head = self
            .state
            .snake
            .head()
            .moved_in_direction(self.state.snake.direction, grid_size);

        let ate_food = self.state.food == Some(new_head);

        // The moved body is only committed if the head lands on a free cell
        let mut moved = self.state.snake.clone();
        moved.advance(new_head, ate_food);

        if ate_food {
            self.state.food = Some(spawn_food(&mut self.rng, &moved, grid_size));
            self.state.score += 1;

            let speed = self
                .state
                .speed_ms
                .saturating_sub(self.config.speed_increment_ms)
                .max(self.config.min_speed_ms);
            // Never speed back up when the floor is above the current interval
            self.state.speed_ms = speed.min(self.state.speed_ms);

            log::debug!(
                "Food eaten at ({}, {}); score {}, speed {}ms",
                new_head.x,
                new_head.y,
                self.state.score,
                self.state.speed_ms
            );
        }

        if moved.head_overlaps_body() {
            log::debug!("Head ran into body at ({}, {})", new_head.x, new_head.y);
            self.end();
            return TickResult {
                advanced: true,
                ate_food,
                terminated: true,
            };
        }

        log::trace!("Head moved to ({}, {})", new_head.x, new_head.y);
        self.state.snake = moved;

        TickResult {
            advanced: true,
            ate_food,
            terminated: false,
        }
    }

    /// Move from `Playing` to `GameOver`
    fn end(&mut self) {
        if self.state.status != GameStatus::Playing {
            return;
        }

        self.state.status = GameStatus::GameOver;
        log::info!(
            "Game over: score {}, length {}",
            self.state.score,
            self.state.snake.len()
        );
    }

    /// Discard the current game and start over in `Ready` with the same config
    ///
    /// The random stream carries on, so consecutive games see different food.
    pub fn restart(&mut self) {
        self.state = Self::initial_state(&self.config, &mut self.rng);
        log::info!("Game restarted");
    }

    /// Read-only view for the presentation layer
    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    /// Current tick interval in milliseconds
    pub fn speed_ms(&self) -> u64 {
        self.state.speed_ms
    }

    #[cfg(test)]
    pub(crate) fn place_food(&mut self, pos: Position) {
        self.state.food = Some(pos);
    }
}

/// Pick a uniformly random free cell by rejection sampling
///
/// Does not terminate if the snake covers the whole grid.
fn spawn_food(rng: &mut StdRng, snake: &Snake, grid_size: usize) -> Position {
    loop {
        let x = rng.gen_range(0..grid_size) as i32;
        let y = rng.gen_range(0..grid_size) as i32;
        let pos = Position::new(x, y);

        if !snake.occupies(pos) {
            return pos;
        }
    }
}
