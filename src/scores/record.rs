use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Longest player name the store accepts, in characters
pub const MAX_PLAYER_NAME_LEN: usize = 32;

/// A finished game's score, as handed over by the game loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreSubmission {
    pub player_name: String,
    pub score: u32,
}

impl ScoreSubmission {
    pub fn new(player_name: impl Into<String>, score: u32) -> Self {
        Self {
            player_name: player_name.into(),
            score,
        }
    }

    /// Check the submission before anything is written
    pub fn validate(&self) -> Result<(), ScoreError> {
        let name = self.player_name.trim();

        if name.is_empty() {
            return Err(ScoreError::Validation(
                "player name must not be empty".to_string(),
            ));
        }

        if name.chars().count() > MAX_PLAYER_NAME_LEN {
            return Err(ScoreError::Validation(format!(
                "player name must be at most {} characters",
                MAX_PLAYER_NAME_LEN
            )));
        }

        Ok(())
    }
}

/// A stored score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub player_name: String,
    pub score: u32,
    /// Unix timestamp in seconds
    pub recorded_at: u64,
}

impl ScoreRecord {
    /// Stamp a validated submission with the current time
    pub fn from_submission(submission: &ScoreSubmission) -> Self {
        let recorded_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        Self {
            player_name: submission.player_name.trim().to_string(),
            score: submission.score,
            recorded_at,
        }
    }
}

/// Why a score could not be saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    /// The submission itself is unacceptable
    Validation(String),
    /// The submission was fine but the backing store failed
    Storage(String),
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreError::Validation(reason) => write!(f, "invalid score: {}", reason),
            ScoreError::Storage(reason) => write!(f, "could not store score: {}", reason),
        }
    }
}

impl std::error::Error for ScoreError {}
