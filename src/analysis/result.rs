//! Analysis result types

use super::loop_points::LoopPoints;
use super::waveform::MinMax;
use crate::matching::{MatchSpan, SearchStrategy};
use serde::{Deserialize, Serialize};

/// Snapshot of the search state, for inspection and visualization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticInfo {
    /// Search that produced the match
    pub strategy: SearchStrategy,

    /// Similarity threshold the match was accepted at
    pub min_similarity_used: f64,

    /// Cross-half thresholds evaluated, in order
    pub thresholds_tried: Vec<f64>,

    /// Total feature frames `T`
    pub frames: usize,

    /// Minimum segment length in frames
    pub min_segment_frames: usize,

    /// Matched run length in frames
    pub match_frames: usize,

    /// First frame of the early occurrence
    pub early_start_frame: usize,

    /// First frame of the late occurrence
    pub late_start_frame: usize,

    /// Track duration in seconds
    pub duration_seconds: f64,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Hop size in samples
    pub hop_size: usize,

    /// Feature frames per second
    pub frames_per_second: f64,

    /// Longest cross-half spans of the last productive trial, longest first.
    /// Capped at `AnalysisConfig::max_diagnostic_spans`; span late starts
    /// are absolute frame indices.
    pub top_spans: Vec<MatchSpan>,

    /// Downsampled waveform envelope
    pub waveform: Vec<MinMax>,

    /// Processing time in milliseconds
    pub processing_time_ms: f32,
}

/// Complete loop analysis result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopAnalysis {
    /// Loop points for playback
    pub points: LoopPoints,

    /// Search diagnostics
    pub diagnostics: DiagnosticInfo,
}
