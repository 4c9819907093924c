//! Best score tracking
//!
//! Lives for the lifetime of the page (or process). Nothing is written to
//! storage.

use serde::{Deserialize, Serialize};

/// Best score seen across sessions
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScore {
    best: u64,
    /// Finished runs submitted so far
    pub runs: u32,
}

impl HighScore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit a finished run's score
    ///
    /// Returns `true` when it beats the previous best. Ties do not count.
    pub fn submit(&mut self, score: u64) -> bool {
        self.runs += 1;
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Check if a score would become the new best
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }
}
