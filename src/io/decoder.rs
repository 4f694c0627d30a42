//! Audio decoding using Symphonia

use crate::error::AnalysisError;
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decoded audio as interleaved `f32` samples
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Interleaved samples in [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Channel count
    pub channels: u16,
}

/// Decode an audio file to interleaved PCM samples
///
/// # Arguments
///
/// * `path` - Path to audio file (any format Symphonia can probe)
///
/// # Errors
///
/// Returns `AnalysisError::DecodingError` if the file cannot be opened,
/// has no decodable track, or decodes to zero samples.
pub fn decode_audio(path: &Path) -> Result<DecodedAudio, AnalysisError> {
    log::debug!("Decoding audio file: {}", path.display());

    let file = File::open(path).map_err(|err| {
        AnalysisError::DecodingError(format!("Open {}: {}", path.display(), err))
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|err| {
            AnalysisError::DecodingError(format!("Probe failed for {}: {}", path.display(), err))
        })?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| {
            AnalysisError::DecodingError(format!("No supported audio track in {}", path.display()))
        })?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|err| {
            AnalysisError::DecodingError(format!(
                "No decoder for {}: {}",
                path.display(),
                err
            ))
        })?;

    let mut sample_rate = codec_params.sample_rate.unwrap_or(0);
    let mut channels = codec_params.channels.map(|c| c.count() as u16).unwrap_or(0);
    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(Error::IoError(_)) => break,
            Err(err) => {
                return Err(AnalysisError::DecodingError(format!(
                    "Packet read failed for {}: {}",
                    path.display(),
                    err
                )))
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(Error::DecodeError(msg)) => {
                log::warn!("Skipping undecodable packet in {}: {}", path.display(), msg);
                continue;
            }
            Err(err) => {
                return Err(AnalysisError::DecodingError(format!(
                    "Decode failed for {}: {}",
                    path.display(),
                    err
                )))
            }
        };

        let spec = *decoded.spec();
        sample_rate = spec.rate;
        channels = spec.channels.count() as u16;

        let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buffer.copy_interleaved_ref(decoded);
        samples.extend_from_slice(buffer.samples());
    }

    if samples.is_empty() || sample_rate == 0 || channels == 0 {
        return Err(AnalysisError::DecodingError(format!(
            "Decoded 0 samples from {}",
            path.display()
        )));
    }

    log::debug!(
        "Decoded {} samples ({} channels) at {} Hz",
        samples.len(),
        channels,
        sample_rate
    );

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
    })
}
