//! High score leaderboard system
//!
//! Tracks the top 10 scores with three-letter initials. `HighScores` is the pure
//! list logic; `ScoreBoard` persists it through a [`KeyValueStore`] and swallows
//! storage failures so a broken store reads as an empty board.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, load_json, save_json};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Initials length
pub const NAME_LEN: usize = 3;

/// Initials used when the player leaves the field blank
pub const DEFAULT_NAME: &str = "AAA";

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Uppercase initials, at most three characters
    pub name: String,
    pub score: u64,
    /// Day achieved, `YYYY-MM-DD`
    pub date: String,
}

/// Trim, uppercase and cut initials to three characters
pub fn normalize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return DEFAULT_NAME.to_string();
    }
    trimmed.to_uppercase().chars().take(NAME_LEN).collect()
}

/// High score leaderboard (sorted descending by score)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: Vec<ScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Rank a score would get without saving (1-indexed, capped one past the table)
    pub fn rank_for(&self, score: u64) -> usize {
        let above = self.entries.iter().filter(|e| score <= e.score).count();
        (above + 1).min(MAX_HIGH_SCORES + 1)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, name: &str, score: u64, date: &str) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = ScoreEntry {
            name: normalize_name(name),
            score,
            date: date.to_string(),
        };

        // Ties rank after existing equal scores
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

        // Trim to max size
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Restore the sort/size invariant on data read from storage
    fn normalized(mut self) -> Self {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
        self
    }
}

/// Leaderboard backed by a key-value store
pub struct ScoreBoard<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ScoreBoard<S> {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "expr_shooter_scores";

    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Current leaderboard; unreadable storage counts as empty
    pub fn load(&self) -> HighScores {
        match load_json::<HighScores>(&self.store, Self::STORAGE_KEY) {
            Ok(Some(scores)) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                scores.normalized()
            }
            Ok(None) => HighScores::new(),
            Err(e) => {
                log::warn!("Could not load scores: {}", e);
                HighScores::new()
            }
        }
    }

    fn save(&mut self, scores: &HighScores) {
        match save_json(&mut self.store, Self::STORAGE_KEY, scores) {
            Ok(()) => log::info!("High scores saved ({} entries)", scores.entries.len()),
            Err(e) => log::warn!("Could not save scores: {}", e),
        }
    }

    /// Entries, best first (at most 10)
    pub fn scores(&self) -> Vec<ScoreEntry> {
        self.load().entries
    }

    pub fn is_high_score(&self, score: u64) -> bool {
        self.load().qualifies(score)
    }

    pub fn rank_for(&self, score: u64) -> usize {
        self.load().rank_for(score)
    }

    /// Record a score; returns its 1-indexed rank, or None if it did not place
    pub fn add_score(&mut self, name: &str, score: u64, date: &str) -> Option<usize> {
        let mut scores = self.load();
        let rank = scores.add_score(name, score, date);
        if rank.is_some() {
            self.save(&scores);
        }
        rank
    }

    /// Remove all stored scores
    pub fn clear(&mut self) {
        if let Err(e) = self.store.remove(Self::STORAGE_KEY) {
            log::warn!("Could not clear scores: {}", e);
        }
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, UnavailableStore};

    fn full_board() -> HighScores {
        let mut scores = HighScores::new();
        for i in 1..=MAX_HIGH_SCORES as u64 {
            scores.add_score("abc", i * 100, "2026-01-01");
        }
        scores
    }

    #[test]
    fn test_empty_board_accepts_anything() {
        let scores = HighScores::new();
        assert!(scores.qualifies(0));
        assert_eq!(scores.rank_for(0), 1);
    }

    #[test]
    fn test_sorted_descending_and_truncated() {
        let mut scores = full_board();
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(1000));

        assert_eq!(scores.add_score("zed", 550, "2026-01-02"), Some(6));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(200));
        assert!(scores.entries.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_full_board_rejects_low_and_equal() {
        let mut scores = full_board();
        assert!(!scores.qualifies(100));
        assert!(!scores.qualifies(50));
        assert!(scores.qualifies(101));
        assert_eq!(scores.add_score("low", 100, "2026-01-02"), None);
        assert_eq!(scores.rank_for(100), MAX_HIGH_SCORES + 1);
    }

    #[test]
    fn test_ties_rank_after_existing() {
        let mut scores = HighScores::new();
        scores.add_score("one", 500, "2026-01-01");
        assert_eq!(scores.add_score("two", 500, "2026-01-01"), Some(2));
        assert_eq!(scores.entries[0].name, "ONE");
    }

    #[test]
    fn test_name_normalization() {
        assert_eq!(normalize_name("  bob smith "), "BOB");
        assert_eq!(normalize_name(""), "AAA");
        assert_eq!(normalize_name("  "), "AAA");
        assert_eq!(normalize_name("jo"), "JO");
    }

    #[test]
    fn test_board_persists_between_instances() {
        let mut board = ScoreBoard::new(MemoryStore::default());
        assert_eq!(board.add_score("ann", 300, "2026-10-16"), Some(1));
        assert_eq!(board.add_score("ben", 900, "2026-10-16"), Some(1));

        let board = ScoreBoard::new(board.into_store());
        let scores = board.scores();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].name, "BEN");
        assert_eq!(scores[1].date, "2026-10-16");
    }

    #[test]
    fn test_corrupt_storage_reads_empty() {
        let mut store = MemoryStore::default();
        store
            .set(ScoreBoard::<MemoryStore>::STORAGE_KEY, "[{\"oops\":")
            .unwrap();
        let mut board = ScoreBoard::new(store);
        assert!(board.scores().is_empty());
        assert!(board.is_high_score(0));
        assert_eq!(board.add_score("new", 10, "2026-10-16"), Some(1));
    }

    #[test]
    fn test_missing_storage_is_not_fatal() {
        let mut board = ScoreBoard::new(UnavailableStore);
        assert!(board.scores().is_empty());
        assert_eq!(board.add_score("abc", 10, "2026-10-16"), Some(1));
        board.clear();
        assert!(board.scores().is_empty());
    }

    #[test]
    fn test_clear() {
        let mut board = ScoreBoard::new(MemoryStore::default());
        board.add_score("abc", 10, "2026-10-16");
        board.clear();
        assert!(board.scores().is_empty());
    }
}
