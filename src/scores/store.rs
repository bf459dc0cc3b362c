use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use super::record::{ScoreError, ScoreRecord, ScoreSubmission};

/// Somewhere finished scores can be kept
pub trait ScoreStore {
    /// Validate and persist a submission, returning what was stored
    fn save(&mut self, submission: &ScoreSubmission) -> Result<ScoreRecord, ScoreError>;

    /// Best `limit` scores, highest first; ties go to the earlier record
    fn top(&self, limit: usize) -> Result<Vec<ScoreRecord>, ScoreError>;
}

fn rank(mut records: Vec<ScoreRecord>, limit: usize) -> Vec<ScoreRecord> {
    records.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.recorded_at.cmp(&b.recorded_at))
    });
    records.truncate(limit);
    records
}

/// Appends one JSON object per line to a file
pub struct JsonLinesStore {
    path: PathBuf,
}

impl JsonLinesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn storage_error(&self, action: &str, err: impl std::fmt::Display) -> ScoreError {
        ScoreError::Storage(format!("failed to {} {:?}: {}", action, self.path, err))
    }
}

impl ScoreStore for JsonLinesStore {
    fn save(&mut self, submission: &ScoreSubmission) -> Result<ScoreRecord, ScoreError> {
        submission.validate()?;
        let record = ScoreRecord::from_submission(submission);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| self.storage_error("create directory for", e))?;
            }
        }

        let line = serde_json::to_string(&record)
            .map_err(|e| self.storage_error("serialize record for", e))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.storage_error("open", e))?;
        writeln!(file, "{}", line).map_err(|e| self.storage_error("write to", e))?;

        log::info!(
            "Saved score {} for {} to {:?}",
            record.score,
            record.player_name,
            self.path
        );
        Ok(record)
    }

    fn top(&self, limit: usize) -> Result<Vec<ScoreRecord>, ScoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = fs::File::open(&self.path).map_err(|e| self.storage_error("open", e))?;

        let mut records = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| self.storage_error("read", e))?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<ScoreRecord>(&line) {
                Ok(record) => records.push(record),
                Err(e) => log::warn!("Skipping malformed score on line {}: {}", index + 1, e),
            }
        }

        Ok(rank(records, limit))
    }
}

/// Keeps scores in memory for the lifetime of the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<ScoreRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ScoreStore for MemoryStore {
    fn save(&mut self, submission: &ScoreSubmission) -> Result<ScoreRecord, ScoreError> {
        submission.validate()?;
        let record = ScoreRecord::from_submission(submission);
        self.records.push(record.clone());
        Ok(record)
    }

    fn top(&self, limit: usize) -> Result<Vec<ScoreRecord>, ScoreError> {
        Ok(rank(self.records.clone(), limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_json_lines_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonLinesStore::new(dir.path().join("nested/scores.jsonl"));

        store.save(&ScoreSubmission::new("ada", 5)).unwrap();
        store.save(&ScoreSubmission::new("bob", 9)).unwrap();
        store.save(&ScoreSubmission::new("cy", 7)).unwrap();

        let top = store.top(2).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].player_name, "bob");
        assert_eq!(top[1].player_name, "cy");
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonLinesStore::new(dir.path().join("scores.jsonl"));
        assert!(store.top(10).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_submission_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.jsonl");
        let mut store = JsonLinesStore::new(&path);

        let err = store.save(&ScoreSubmission::new("  ", 5)).unwrap_err();
        assert!(matches!(err, ScoreError::Validation(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_unwritable_path_is_storage_error() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be
        let mut store = JsonLinesStore::new(dir.path());

        let err = store.save(&ScoreSubmission::new("ada", 1)).unwrap_err();
        assert!(matches!(err, ScoreError::Storage(_)));
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.jsonl");
        fs::write(
            &path,
            "{\"player_name\":\"ada\",\"score\":3,\"recorded_at\":10}\nnot json\n\n",
        )
        .unwrap();

        let store = JsonLinesStore::new(&path);
        let top = store.top(10).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].score, 3);
    }

    #[test]
    fn test_ties_favor_earlier_record() {
        let records = vec![
            ScoreRecord {
                player_name: "late".to_string(),
                score: 4,
                recorded_at: 20,
            },
            ScoreRecord {
                player_name: "early".to_string(),
                score: 4,
                recorded_at: 10,
            },
        ];

        let ranked = rank(records, 10);
        assert_eq!(ranked[0].player_name, "early");
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());

        store.save(&ScoreSubmission::new("ada", 2)).unwrap();
        assert!(store.save(&ScoreSubmission::new("", 2)).is_err());

        assert_eq!(store.len(), 1);
        assert_eq!(store.top(5).unwrap()[0].player_name, "ada");
    }
}
