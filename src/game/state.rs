use super::direction::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta, wrapping around a square grid of `grid_size`
    pub fn wrapped_by(&self, dx: i32, dy: i32, grid_size: usize) -> Self {
        let size = grid_size as i32;
        Self {
            x: (self.x + dx).rem_euclid(size),
            y: (self.y + dy).rem_euclid(size),
        }
    }

    /// Move one cell in a direction, wrapping at the grid edges
    pub fn moved_in_direction(&self, direction: Direction, grid_size: usize) -> Self {
        let (dx, dy) = direction.delta();
        self.wrapped_by(dx, dy, grid_size)
    }

    /// Check if the position lies within a square grid of `grid_size`
    pub fn is_within(&self, grid_size: usize) -> bool {
        let size = grid_size as i32;
        (0..size).contains(&self.x) && (0..size).contains(&self.y)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Committed direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a snake whose body trails behind the head, opposite to `direction`
    pub fn new(head: Position, direction: Direction, length: usize, grid_size: usize) -> Self {
        let mut body = Vec::with_capacity(length);
        body.push(head);

        let back = direction.opposite();
        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_in_direction(back, grid_size));
        }

        Self { body, direction }
    }

    /// Build a snake from explicit segments, head first
    pub fn from_segments(body: Vec<Position>, direction: Direction) -> Self {
        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if the head shares a cell with any other segment
    pub fn head_overlaps_body(&self) -> bool {
        self.body_segments().contains(&self.head())
    }

    /// Check if position is occupied by any segment
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Push a new head, dropping the tail unless the snake grows
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.insert(0, new_head);

        if !grow {
            self.body.pop();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }
}

/// Lifecycle status of a game instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Initialised and waiting for `start`
    Ready,
    /// Live, advancing on every tick
    Playing,
    /// Ended by a collision; only `restart` leaves this state
    GameOver,
}

/// Complete mutable state of one game instance
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Option<Position>,
    /// Direction to commit at the next tick
    pub pending_direction: Direction,
    pub grid_size: usize,
    pub score: u32,
    pub speed_ms: u64,
    pub status: GameStatus,
}

impl GameState {
    /// Create a fresh state in `Ready` status
    pub fn new(snake: Snake, food: Option<Position>, grid_size: usize, speed_ms: u64) -> Self {
        let pending_direction = snake.direction;
        Self {
            snake,
            food,
            pending_direction,
            grid_size,
            score: 0,
            speed_ms,
            status: GameStatus::Ready,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.is_within(self.grid_size)
    }

    /// Read-only view handed to the presentation layer
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            segments: self.snake.body.clone(),
            food: self.food,
            status: self.status,
            score: self.score,
            speed_ms: self.speed_ms,
            grid_size: self.grid_size,
        }
    }
}

/// Immutable copy of everything the presentation layer draws
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Segments, head first
    pub segments: Vec<Position>,
    pub food: Option<Position>,
    pub status: GameStatus,
    pub score: u32,
    pub speed_ms: u64,
    pub grid_size: usize,
}

impl Snapshot {
    pub fn head(&self) -> Option<Position> {
        self.segments.first().copied()
    }
}
