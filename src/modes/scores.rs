//! Leaderboard printing for `--mode scores`

use anyhow::{Context, Result};
use std::io::Write;

use crate::scores::{ScoreRecord, ScoreStore};

/// Number of entries shown by default
pub const DEFAULT_LIMIT: usize = 10;

/// Format the best scores as a plain-text table
pub fn format_leaderboard(records: &[ScoreRecord]) -> String {
    if records.is_empty() {
        return "No scores recorded yet.\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!("{:>4}  {:<32}  {:>6}\n", "#", "Player", "Score"));
    out.push_str(&format!("{}\n", "=".repeat(46)));
    for (rank, record) in records.iter().enumerate() {
        out.push_str(&format!(
            "{:>4}  {:<32}  {:>6}\n",
            rank + 1,
            record.player_name,
            record.score
        ));
    }
    out
}

/// Print the top `limit` scores from `store` to `out`
pub fn print_leaderboard(store: &dyn ScoreStore, limit: usize, out: &mut impl Write) -> Result<()> {
    let records = store.top(limit).context("Failed to load scores")?;
    out.write_all(format_leaderboard(&records).as_bytes())
        .context("Failed to write leaderboard")?;
    Ok(())
}
