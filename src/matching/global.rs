//! Global all-lags fallback search
//!
//! Used only when the cross-half search fails: some material repeats
//! entirely within one half of the track. Every pair `(i, j)` with `j > i`
//! is considered at a single fixed threshold, and pairs closer than the
//! minimum segment length are excluded so overlapping frames cannot match
//! themselves.
//!
//! Scanning lag `k = j - i` is the same as scanning one diagonal of the full
//! `T × T` similarity table. Lags are evaluated in parallel and reduced in
//! increasing lag order, which keeps the first-longest tie-break of a
//! sequential scan. Cost is O(T²).

use super::similarity::FeatureTable;
use super::{BestMatch, RepeatMatch, SearchStrategy};
use rayon::prelude::*;

/// How far below the configured similarity the fallback threshold sits
pub const FALLBACK_SIMILARITY_OFFSET: f64 = 0.10;

/// Similarity of frames `i < j`, or negative infinity when they are closer
/// than `min_lag` frames
pub fn pair_score(table: &FeatureTable, i: usize, j: usize, min_lag: usize) -> f64 {
    if j.abs_diff(i) < min_lag {
        f64::NEG_INFINITY
    } else {
        table.similarity(i, j)
    }
}

/// Longest run of passing pairs at a fixed lag, as `(length, start)`
fn longest_run_at_lag(
    table: &FeatureTable,
    lag: usize,
    min_lag: usize,
    threshold: f64,
) -> (usize, usize) {
    let mut best_len = 0usize;
    let mut best_start = 0usize;
    let mut run = 0usize;

    for s in 0..table.frames() - lag {
        if pair_score(table, s, s + lag, min_lag) >= threshold {
            run += 1;
            if run > best_len {
                best_len = run;
                best_start = s + 1 - run;
            }
        } else {
            run = 0;
        }
    }

    (best_len, best_start)
}

/// Search all lags of the full feature sequence at a single threshold
///
/// # Arguments
///
/// * `table` - Normalized features
/// * `threshold` - Similarity a pair must reach
/// * `min_segment_frames` - Minimum lag, and minimum accepted run length
///
/// # Returns
///
/// The longest run, or `None` when it is shorter than `min_segment_frames`
pub fn global_search(
    table: &FeatureTable,
    threshold: f64,
    min_segment_frames: usize,
) -> Option<RepeatMatch> {
    let frames = table.frames();
    log::debug!(
        "Global search over {} frames at {:.2}, lags >= {}",
        frames,
        threshold,
        min_segment_frames
    );

    if frames < 2 {
        return None;
    }

    let per_lag: Vec<(usize, usize)> = (1..frames)
        .into_par_iter()
        .map(|lag| longest_run_at_lag(table, lag, min_segment_frames, threshold))
        .collect();

    let mut best = BestMatch::default();
    for (lag, &(length, start)) in (1..frames).zip(per_lag.iter()) {
        best.offer(length, start, start + lag);
    }

    log::debug!(
        "Global search longest run {} at ({}, {})",
        best.length,
        best.early_start,
        best.late_start
    );

    if best.length == 0 || best.length < min_segment_frames {
        return None;
    }

    Some(RepeatMatch {
        length: best.length,
        early_start_frame: best.early_start,
        late_start_frame: best.late_start,
        similarity: threshold,
        strategy: SearchStrategy::Global,
    })
}
