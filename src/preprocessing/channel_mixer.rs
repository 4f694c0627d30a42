//! Channel mixing utilities (interleaved multi-channel to mono)

/// Average interleaved channels into a mono buffer
///
/// # Arguments
///
/// * `interleaved` - Interleaved samples (`L R L R ...` for stereo)
/// * `channels` - Channel count; 0 is treated as mono
///
/// # Returns
///
/// One sample per frame. A trailing partial frame is dropped.
///
/// # Example
///
/// ```
/// use loop_finder::preprocessing::channel_mixer::downmix_to_mono;
///
/// let mono = downmix_to_mono(&[1.0, 0.0, 0.5, 0.5], 2);
/// assert_eq!(mono, vec![0.5, 0.5]);
/// ```
pub fn downmix_to_mono(interleaved: &[f32], channels: u16) -> Vec<f32> {
    let channels = channels.max(1) as usize;
    if channels == 1 {
        return interleaved.to_vec();
    }

    log::debug!(
        "Downmixing {} interleaved samples from {} channels",
        interleaved.len(),
        channels
    );

    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}
