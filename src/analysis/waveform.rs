//! Waveform envelope for visualization
//!
//! Downsamples the raw sample buffer into per-bin (min, max) pairs. Bin `i`
//! covers samples `[i * n / bins, (i + 1) * n / bins)`, so bins tile the
//! buffer with no gap or overlap.

use serde::{Deserialize, Serialize};

/// Bin count used when zero bins are requested
pub const DEFAULT_WAVEFORM_BINS: usize = 1000;

/// Amplitude range of one bin
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MinMax {
    /// Lowest sample in the bin
    pub min: f32,
    /// Highest sample in the bin
    pub max: f32,
}

/// Summarize `samples` into `bins` (min, max) pairs
///
/// Empty bins, which only occur when there are fewer samples than bins,
/// are `(0, 0)`.
///
/// # Example
///
/// ```
/// use loop_finder::analysis::waveform::summarize_waveform;
///
/// let envelope = summarize_waveform(&[0.5, -0.25, 1.0, 0.0], 2);
/// assert_eq!((envelope[0].min, envelope[0].max), (-0.25, 0.5));
/// assert_eq!((envelope[1].min, envelope[1].max), (0.0, 1.0));
/// ```
pub fn summarize_waveform(samples: &[f32], bins: usize) -> Vec<MinMax> {
    let bins = if bins == 0 { DEFAULT_WAVEFORM_BINS } else { bins };
    let n = samples.len();

    (0..bins)
        .map(|i| {
            let start = (i as u64 * n as u64 / bins as u64) as usize;
            let end = ((i as u64 + 1) * n as u64 / bins as u64) as usize;
            let bin = &samples[start..end];
            if bin.is_empty() {
                return MinMax::default();
            }
            bin.iter().fold(
                MinMax {
                    min: f32::INFINITY,
                    max: f32::NEG_INFINITY,
                },
                |acc, &v| MinMax {
                    min: acc.min.min(v),
                    max: acc.max.max(v),
                },
            )
        })
        .collect()
}
