use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest accepted grid side; keeps every coordinate within `i32`
pub const MAX_GRID_SIZE: usize = u16::MAX as usize;

/// Configuration for a game instance
///
/// Every field has a default, so a partial JSON file only needs to name the
/// values it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square, wraparound grid
    pub grid_size: usize,
    /// Number of segments the snake starts with
    pub initial_snake_length: usize,
    /// Tick interval at the start of a game, in milliseconds
    pub initial_speed_ms: u64,
    /// How much the tick interval shrinks per food eaten, in milliseconds
    pub speed_increment_ms: u64,
    /// Lower bound on the tick interval, in milliseconds
    pub min_speed_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            initial_snake_length: 3,
            initial_speed_ms: 150,
            speed_increment_ms: 5,
            min_speed_ms: 50,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom grid size
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10)
    }

    /// Load a configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file {:?}", path))
    }

    /// Validate configuration parameters
    ///
    /// Returns `Err` with a message naming the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_size == 0 {
            return Err("grid_size must be at least 1".to_string());
        }

        if self.grid_size > MAX_GRID_SIZE {
            return Err(format!(
                "grid_size ({}) cannot exceed {}",
                self.grid_size, MAX_GRID_SIZE
            ));
        }

        if self.initial_snake_length == 0 {
            return Err("initial_snake_length must be at least 1".to_string());
        }

        // The starting body wraps past the bottom edge, so it only overlaps
        // itself once it is longer than a full column.
        if self.initial_snake_length > self.grid_size {
            return Err(format!(
                "initial_snake_length ({}) cannot exceed grid_size ({})",
                self.initial_snake_length, self.grid_size
            ));
        }

        // The first food needs a free cell
        if self.initial_snake_length >= self.grid_size * self.grid_size {
            return Err(format!(
                "initial_snake_length ({}) must leave a free cell on a {}x{} grid",
                self.initial_snake_length, self.grid_size, self.grid_size
            ));
        }

        if self.initial_speed_ms == 0 {
            return Err("initial_speed_ms must be positive".to_string());
        }

        if self.min_speed_ms == 0 {
            return Err("min_speed_ms must be positive".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_size, 20);
        assert_eq!(config.initial_snake_length, 3);
        assert_eq!(config.initial_speed_ms, 150);
        assert_eq!(config.speed_increment_ms, 5);
        assert_eq!(config.min_speed_ms, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15);
        assert_eq!(config.grid_size, 15);
        assert_eq!(config.initial_snake_length, 3);
    }

    #[test]
    fn test_validation_zero_grid() {
        let config = GameConfig {
            grid_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_snake_longer_than_grid() {
        let mut config = GameConfig::new(5);
        config.initial_snake_length = 6;
        assert!(config.validate().is_err());

        config.initial_snake_length = 5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_snake_filling_grid() {
        let mut config = GameConfig::new(1);
        config.initial_snake_length = 1;
        assert!(config.validate().is_err());

        config.grid_size = 2;
        config.initial_snake_length = 2;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_grid_size_cap() {
        let mut config = GameConfig::new(MAX_GRID_SIZE);
        assert!(config.validate().is_ok());

        config.grid_size = MAX_GRID_SIZE + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_speeds() {
        let mut config = GameConfig::default();
        config.initial_speed_ms = 0;
        assert!(config.validate().is_err());

        config.initial_speed_ms = 150;
        config.min_speed_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_increment_is_valid() {
        let config = GameConfig {
            speed_increment_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "grid_size": 12, "initial_speed_ms": 200 }}"#).unwrap();

        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.grid_size, 12);
        assert_eq!(config.initial_speed_ms, 200);
        assert_eq!(config.initial_snake_length, 3);
        assert_eq!(config.min_speed_ms, 50);
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(GameConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(GameConfig::load(&dir.path().join("absent.json")).is_err());
    }
}
