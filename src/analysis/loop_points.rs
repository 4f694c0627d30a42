//! Conversion of a frame-domain match into loop timestamps

use crate::matching::RepeatMatch;
use serde::{Deserialize, Serialize};

/// Loop points in seconds
///
/// Playback runs to `rewind_from_seconds`, then jumps back to
/// `rewind_to_seconds`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoopPoints {
    /// Where playback jumps back from
    pub rewind_from_seconds: f64,
    /// Where playback jumps back to
    pub rewind_to_seconds: f64,
    /// Length of the matched segment
    pub segment_duration_seconds: f64,
    /// Start of the early occurrence
    pub start_early_seconds: f64,
    /// Start of the late occurrence
    pub start_late_seconds: f64,
    /// Feature frames per second used for the conversion
    pub frames_per_second: f64,
}

/// Convert a match into loop points
///
/// `rewind_from` is the end of the late occurrence, clamped to
/// `duration_seconds - tail_guard_seconds`. No snapping is applied.
///
/// # Example
///
/// ```
/// use loop_finder::analysis::loop_points::compute_loop_points;
///
/// let points = compute_loop_points(10, 50, 20, 10.0, 20.0, 1.0);
/// assert_eq!(points.rewind_to_seconds, 1.0);
/// assert_eq!(points.rewind_from_seconds, 7.0);
/// ```
pub fn compute_loop_points(
    early_start_frame: usize,
    late_start_frame: usize,
    length_frames: usize,
    frames_per_second: f64,
    duration_seconds: f64,
    tail_guard_seconds: f64,
) -> LoopPoints {
    let start_early_seconds = early_start_frame as f64 / frames_per_second;
    let start_late_seconds = late_start_frame as f64 / frames_per_second;
    let segment_duration_seconds = length_frames as f64 / frames_per_second;

    let rewind_from_seconds = (start_late_seconds + segment_duration_seconds)
        .min(duration_seconds - tail_guard_seconds);

    LoopPoints {
        rewind_from_seconds,
        rewind_to_seconds: start_early_seconds,
        segment_duration_seconds,
        start_early_seconds,
        start_late_seconds,
        frames_per_second,
    }
}

impl LoopPoints {
    /// Loop points for an accepted match
    pub fn from_match(
        found: &RepeatMatch,
        frames_per_second: f64,
        duration_seconds: f64,
        tail_guard_seconds: f64,
    ) -> Self {
        compute_loop_points(
            found.early_start_frame,
            found.late_start_frame,
            found.length,
            frames_per_second,
            duration_seconds,
            tail_guard_seconds,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::SearchStrategy;

    #[test]
    fn test_reference_case() {
        let points = compute_loop_points(10, 50, 20, 10.0, 20.0, 1.0);
        assert!((points.rewind_to_seconds - 1.0).abs() < 1e-12);
        assert!((points.start_early_seconds - 1.0).abs() < 1e-12);
        assert!((points.start_late_seconds - 5.0).abs() < 1e-12);
        assert!((points.segment_duration_seconds - 2.0).abs() < 1e-12);
        assert!((points.rewind_from_seconds - 7.0).abs() < 1e-12);
        assert_eq!(points.frames_per_second, 10.0);
        assert!((points.rewind_from_seconds - points.rewind_to_seconds - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_tail_guard_clamps() {
        // Match ends at 19.5s, guard leaves 19.0s usable
        let points = compute_loop_points(0, 95, 100, 10.0, 20.0, 1.0);
        assert!((points.rewind_from_seconds - 19.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_match() {
        let found = RepeatMatch {
            length: 20,
            early_start_frame: 10,
            late_start_frame: 50,
            similarity: 0.85,
            strategy: SearchStrategy::Cross,
        };
        let points = LoopPoints::from_match(&found, 10.0, 20.0, 1.0);
        assert_eq!(points, compute_loop_points(10, 50, 20, 10.0, 20.0, 1.0));
    }
}
