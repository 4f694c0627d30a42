//! Cross-half search with threshold escalation
//!
//! The track is split at `h = T / 2`. Early-half frames are compared with
//! late-half frames at a descending ladder of similarity thresholds; the
//! first threshold whose longest diagonal run reaches the minimum segment
//! length is accepted.
//!
//! A strict threshold misses near-duplicate material, a lenient one
//! produces spurious long runs. Starting strict and relaxing only until a
//! long enough run appears avoids per-track tuning.

use super::diagonal::{scan_diagonals, MatchMask};
use super::similarity::FeatureTable;
use super::{MatchSpan, RepeatMatch, SearchStrategy};

/// Fixed tail of the ladder, independent of the configured similarity
pub const LADDER_FLOOR: [f64; 4] = [0.75, 0.70, 0.65, 0.60];

/// Lowest threshold the cross-half search ever evaluates
pub const MIN_LADDER_THRESHOLD: f64 = 0.60;

/// Threshold ladder for a configured target similarity `s`
///
/// Candidates are `s, s - 0.05, s - 0.10` followed by [`LADDER_FLOOR`].
/// Values below [`MIN_LADDER_THRESHOLD`] are raised to it, and a candidate
/// that is not strictly below the previous one is skipped, so the ladder is
/// strictly descending and ends at or above 0.60.
///
/// # Example
///
/// ```
/// use loop_finder::matching::escalation::threshold_ladder;
///
/// let ladder = threshold_ladder(0.95);
/// assert_eq!(ladder.len(), 7);
/// assert_eq!(ladder[0], 0.95);
/// assert_eq!(*ladder.last().unwrap(), 0.60);
/// ```
pub fn threshold_ladder(s: f64) -> Vec<f64> {
    let candidates = [s, s - 0.05, s - 0.10]
        .into_iter()
        .chain(LADDER_FLOOR)
        .map(|t| t.max(MIN_LADDER_THRESHOLD));

    let mut ladder: Vec<f64> = Vec::with_capacity(7);
    for t in candidates {
        match ladder.last() {
            // Allow for rounding in s - 0.05 / s - 0.10
            Some(&prev) if t >= prev - 1e-9 => continue,
            _ => ladder.push(t),
        }
    }
    ladder
}

/// Outcome of the cross-half search
#[derive(Debug, Clone, Default)]
pub struct CrossHalfSearch {
    /// Accepted match, or `None` when every threshold fell short
    pub found: Option<RepeatMatch>,
    /// Spans from the most recent trial that produced any, longest first
    pub spans: Vec<MatchSpan>,
    /// Thresholds evaluated, in order
    pub thresholds_tried: Vec<f64>,
}

/// Run the escalating cross-half search
///
/// # Arguments
///
/// * `table` - Normalized features
/// * `min_similarity` - Configured target similarity (first rung)
/// * `min_segment_frames` - Shortest acceptable run
///
/// # Returns
///
/// [`CrossHalfSearch`] with absolute frame indices; `found` is `None` when
/// the caller should fall back to the global search.
pub fn cross_half_search(
    table: &FeatureTable,
    min_similarity: f64,
    min_segment_frames: usize,
) -> CrossHalfSearch {
    let frames = table.frames();
    let split = frames / 2;
    let mut result = CrossHalfSearch::default();

    for threshold in threshold_ladder(min_similarity) {
        result.thresholds_tried.push(threshold);

        let mask = MatchMask::cross_half(table, split, threshold);
        let scan = scan_diagonals(&mask);

        log::debug!(
            "Cross-half trial at {:.2}: {} matching cells, {} spans, longest run {} (need {})",
            threshold,
            mask.count(),
            scan.spans.len(),
            scan.best.length,
            min_segment_frames
        );

        if !scan.spans.is_empty() {
            result.spans = scan
                .spans
                .iter()
                .map(|span| MatchSpan {
                    late_start_frame: split + span.late_start_frame,
                    ..*span
                })
                .collect();
        }

        if scan.best.length >= min_segment_frames {
            result.found = Some(RepeatMatch {
                length: scan.best.length,
                early_start_frame: scan.best.early_start,
                late_start_frame: split + scan.best.late_start,
                similarity: threshold,
                strategy: SearchStrategy::Cross,
            });
            break;
        }
    }

    result
}
