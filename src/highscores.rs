//! High score tracking
//!
//! The simulation reports each finished run to a [`ScoreSink`]. The in-memory
//! [`ScoreBoard`] keeps the last score and the top 10 runs.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Receives the final score of every run
pub trait ScoreSink {
    /// Record a finished run
    fn record(&mut self, score: u64);
    /// Best score recorded so far (0 if none)
    fn high_score(&self) -> u64;
    /// Score of the most recent run (0 if none)
    fn last_score(&self) -> u64;
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player's score
    pub score: u64,
    /// Run number (1-based) the score was achieved in
    pub run: u32,
}

/// In-memory high score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScoreBoard {
    pub entries: Vec<HighScoreEntry>,
    last_score: u64,
    runs: u32,
}

impl ScoreBoard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, score: u64, run: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry { score, run };

        // Sorted descending by score
        let rank = match self.entries.iter().position(|e| score > e.score) {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Number of runs recorded
    pub fn runs(&self) -> u32 {
        self.runs
    }

    pub fn high_score_display(&self) -> String {
        format!("HIGH: {}", self.high_score())
    }

    pub fn last_score_display(&self) -> String {
        format!("LAST: {}", self.last_score)
    }
}

impl ScoreSink for ScoreBoard {
    fn record(&mut self, score: u64) {
        self.runs += 1;
        self.last_score = score;
        if let Some(rank) = self.add_score(score, self.runs) {
            log::info!("Run {} scored {} (rank {})", self.runs, score, rank);
        } else {
            log::info!("Run {} scored {}", self.runs, score);
        }
    }

    fn high_score(&self) -> u64 {
        self.top_score().unwrap_or(0)
    }

    fn last_score(&self) -> u64 {
        self.last_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_tracks_last_and_high() {
        let mut board = ScoreBoard::new();
        assert_eq!(board.high_score(), 0);
        assert_eq!(board.last_score(), 0);

        board.record(40);
        board.record(15);
        assert_eq!(board.high_score(), 40);
        assert_eq!(board.last_score(), 15);
        assert_eq!(board.runs(), 2);
        assert_eq!(board.high_score_display(), "HIGH: 40");
        assert_eq!(board.last_score_display(), "LAST: 15");
    }

    #[test]
    fn test_zero_score_is_last_but_not_ranked() {
        let mut board = ScoreBoard::new();
        board.record(0);
        assert!(board.is_empty());
        assert_eq!(board.last_score(), 0);
        assert_eq!(board.runs(), 1);
    }

    #[test]
    fn test_leaderboard_keeps_top_ten_sorted() {
        let mut board = ScoreBoard::new();
        for score in 1..=12u64 {
            board.add_score(score * 10, score as u32);
        }
        assert_eq!(board.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(board.top_score(), Some(120));
        assert_eq!(board.entries.last().map(|e| e.score), Some(30));
        assert!(!board.qualifies(25));
        assert_eq!(board.add_score(55, 13), Some(8));
    }
}
