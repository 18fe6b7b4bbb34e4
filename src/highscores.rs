//! Session score table
//!
//! Kept in memory for the life of the process only, top 5 runs.

use serde::{Deserialize, Serialize};

/// Maximum number of runs to keep
pub const MAX_SESSION_SCORES: usize = 5;

/// A single finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Final score
    pub score: u64,
    /// Seconds survived
    pub time_alive: f32,
    /// Difficulty label the run was played on
    pub difficulty: String,
}

/// Best runs of this session, sorted by score (descending)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionScores {
    pub entries: Vec<ScoreEntry>,
}

impl SessionScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would make the table
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_SESSION_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Record a run. Returns the rank achieved (1-indexed) or None if it
    /// didn't make the table. Ties rank below earlier runs.
    pub fn record(&mut self, score: u64, time_alive: f32, difficulty: &str) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = ScoreEntry {
            score,
            time_alive,
            difficulty: difficulty.to_string(),
        };

        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };
        self.entries.truncate(MAX_SESSION_SCORES);

        log::info!("Run recorded: {} points, rank {}", score, rank);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best score this session (if any)
    pub fn best(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_top_five_sorted() {
        let mut scores = SessionScores::new();
        for s in [30, 10, 50, 20, 40, 60] {
            scores.record(s, 1.0, "Normal Space");
        }
        let kept: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(kept, vec![60, 50, 40, 30, 20]);
        assert_eq!(scores.best(), Some(60));
    }

    #[test]
    fn test_rank_reporting() {
        let mut scores = SessionScores::new();
        assert_eq!(scores.record(100, 10.0, "Light Drift"), Some(1));
        assert_eq!(scores.record(100, 10.0, "Light Drift"), Some(2));
        assert_eq!(scores.record(200, 20.0, "Light Drift"), Some(1));
        for _ in 0..3 {
            scores.record(500, 50.0, "Dense Field");
        }
        // Table is full of better runs
        assert_eq!(scores.record(50, 5.0, "Dense Field"), None);
        assert_eq!(scores.entries.len(), MAX_SESSION_SCORES);
    }
}
