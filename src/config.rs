//! Configuration parameters for loop analysis

/// Analysis configuration parameters
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    // Decoding
    /// Sample rate the decoded audio is resampled to (default: 22050)
    pub target_sample_rate: u32,

    // Feature extraction
    /// Analysis frame size in samples (default: 4096)
    pub frame_size: usize,

    /// Hop size between analysis frames in samples (default: 2048)
    /// Larger hops give fewer, coarser frames
    pub hop_size: usize,

    /// Number of MFCC coefficients per frame (default: 20)
    pub feature_count: usize,

    /// Number of triangular mel filters (default: 40)
    pub mel_bands: usize,

    /// Pre-emphasis coefficient applied inside each frame (default: 0.97)
    pub pre_emphasis: f32,

    // Matching
    /// Shortest acceptable repeated segment in seconds (default: 6.0)
    pub min_segment_seconds: f64,

    /// Starting similarity threshold for the cross-half search (default: 0.85)
    pub min_similarity: f64,

    // Loop points
    /// Seconds kept clear at the end of the track (default: 1.0)
    /// The rewind-from point never lands inside this guard band
    pub tail_guard_seconds: f64,

    // Diagnostics
    /// Resolution of the waveform envelope (default: 2000)
    pub waveform_bins: usize,

    /// Maximum number of match spans kept in diagnostics (default: 64)
    pub max_diagnostic_spans: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            target_sample_rate: 22050,
            frame_size: 4096,
            hop_size: 2048,
            feature_count: 20,
            mel_bands: 40,
            pre_emphasis: 0.97,
            min_segment_seconds: 6.0,
            min_similarity: 0.85,
            tail_guard_seconds: 1.0,
            waveform_bins: 2000,
            max_diagnostic_spans: 64,
        }
    }
}

impl AnalysisConfig {
    /// Feature frames per second for audio at `sample_rate`
    pub fn frames_per_second(&self, sample_rate: u32) -> f64 {
        sample_rate as f64 / self.hop_size as f64
    }

    /// Minimum segment duration converted to frames (never below 1)
    pub fn min_segment_frames(&self, frames_per_second: f64) -> usize {
        ((self.min_segment_seconds * frames_per_second).round() as usize).max(1)
    }
}
