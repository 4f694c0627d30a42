//! Repeat-segment matching
//!
//! Finds the longest pair of time-aligned, highly similar feature runs:
//! - Cosine similarity over unit-norm feature vectors
//! - Diagonal run scanning over a cross-half match mask
//! - Threshold escalation from strict to lenient
//! - Global all-lags fallback when the cross-half search fails

pub mod diagonal;
pub mod escalation;
pub mod global;
pub mod similarity;

use serde::{Deserialize, Serialize};

/// A run of consecutive matching cells along one diagonal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSpan {
    /// First frame of the early occurrence
    pub early_start_frame: usize,
    /// First frame of the late occurrence
    pub late_start_frame: usize,
    /// Run length in frames
    pub length: usize,
}

/// Longest run found by a scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BestMatch {
    /// Run length in frames (0 when nothing matched)
    pub length: usize,
    /// Row of the first cell of the run
    pub early_start: usize,
    /// Column of the first cell of the run
    pub late_start: usize,
}

impl BestMatch {
    /// Replace `self` only when `length` is strictly longer.
    ///
    /// Returns true if the candidate was taken.
    pub(crate) fn offer(&mut self, length: usize, early_start: usize, late_start: usize) -> bool {
        if length > self.length {
            *self = BestMatch {
                length,
                early_start,
                late_start,
            };
            true
        } else {
            false
        }
    }
}

/// Which search produced the accepted match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategy {
    /// Early half against late half, escalating thresholds
    Cross,
    /// All lags over the whole track at a single threshold
    Global,
}

impl SearchStrategy {
    /// Tag used in diagnostics ("cross" or "global")
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchStrategy::Cross => "cross",
            SearchStrategy::Global => "global",
        }
    }
}

/// Accepted repeat, in absolute frame indices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepeatMatch {
    /// Run length in frames
    pub length: usize,
    /// First frame of the early occurrence
    pub early_start_frame: usize,
    /// First frame of the late occurrence
    pub late_start_frame: usize,
    /// Similarity threshold the match was accepted at
    pub similarity: f64,
    /// Search that produced the match
    pub strategy: SearchStrategy,
}
