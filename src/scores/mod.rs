//! Score persistence
//!
//! Stores are only ever called by the game loop after it sees a game end.
//! A failed save is reported back to the caller and never touches game state.

pub mod record;
pub mod store;

pub use record::{ScoreError, ScoreRecord, ScoreSubmission, MAX_PLAYER_NAME_LEN};
pub use store::{JsonLinesStore, MemoryStore, ScoreStore};
