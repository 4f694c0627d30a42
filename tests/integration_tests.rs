//! Integration tests for the loop analysis engine

use loop_finder::matching::escalation::threshold_ladder;
use loop_finder::{
    analyze_audio, analyze_file, find_loop_points, AnalysisConfig, AnalysisError,
    SearchStrategy,
};
use std::path::PathBuf;

/// 1000 Hz with a 100-sample hop: 10 frames per second
const SAMPLE_RATE: u32 = 1000;
const HOP: usize = 100;

fn frame_config(min_segment_seconds: f64) -> AnalysisConfig {
    AnalysisConfig {
        hop_size: HOP,
        min_segment_seconds,
        ..AnalysisConfig::default()
    }
}

fn one_hot(index: usize, dims: usize) -> Vec<f32> {
    let mut v = vec![0.0; dims];
    v[index] = 1.0;
    v
}

/// Silent buffer long enough to cover `frames` hops
fn samples_for(frames: usize) -> Vec<f32> {
    vec![0.0; frames * HOP]
}

/// Write a mono 16-bit WAV file to the temp directory
fn write_wav(name: &str, samples: &[f32], sample_rate: u32) -> PathBuf {
    let path = std::env::temp_dir().join(name);
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec).expect("create wav");
    for &s in samples {
        writer
            .write_sample((s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
            .expect("write sample");
    }
    writer.finalize().expect("finalize wav");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_pattern_uses_cross_strategy() {
        // 20 distinct frames played twice
        let pattern: Vec<Vec<f32>> = (0..20).map(|i| one_hot(i, 20)).collect();
        let mut features = pattern.clone();
        features.extend(pattern);

        let config = frame_config(1.0);
        let analysis = find_loop_points(&samples_for(40), SAMPLE_RATE, features, config)
            .expect("Analysis should succeed");
        let diag = &analysis.diagnostics;

        assert_eq!(diag.strategy, SearchStrategy::Cross);
        assert_eq!(diag.match_frames, 20);
        assert_eq!(diag.min_similarity_used, 0.85);
        assert_eq!(diag.thresholds_tried, vec![0.85]);
        assert_eq!(diag.early_start_frame, 0);
        assert_eq!(diag.late_start_frame, 20);
        assert_eq!(diag.frames, 40);
        assert_eq!(diag.min_segment_frames, 10);
        assert_eq!(diag.hop_size, HOP);
        assert_eq!(diag.sample_rate, SAMPLE_RATE);

        let points = &analysis.points;
        assert!((points.frames_per_second - 10.0).abs() < 1e-12);
        assert!((points.rewind_to_seconds - 0.0).abs() < 1e-12);
        assert!((points.start_late_seconds - 2.0).abs() < 1e-12);
        assert!((points.segment_duration_seconds - 2.0).abs() < 1e-12);
        // Match ends at 4.0s, tail guard clamps to 3.0s
        assert!((points.rewind_from_seconds - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_repeat_after_intro() {
        // 5 intro frames, 15-frame pattern twice, 5 outro frames
        let dims = 25;
        let mut features: Vec<Vec<f32>> = (0..5).map(|i| one_hot(i, dims)).collect();
        for _ in 0..2 {
            features.extend((5..20).map(|i| one_hot(i, dims)));
        }
        features.extend((20..25).map(|i| one_hot(i, dims)));
        assert_eq!(features.len(), 40);

        let config = AnalysisConfig {
            tail_guard_seconds: 0.0,
            ..frame_config(1.0)
        };
        let analysis = find_loop_points(&samples_for(40), SAMPLE_RATE, features, config)
            .expect("Analysis should succeed");

        assert_eq!(analysis.diagnostics.strategy, SearchStrategy::Cross);
        assert_eq!(analysis.diagnostics.match_frames, 15);
        assert_eq!(analysis.diagnostics.early_start_frame, 5);
        assert_eq!(analysis.diagnostics.late_start_frame, 20);
        assert!((analysis.points.rewind_to_seconds - 0.5).abs() < 1e-12);
        assert!((analysis.points.rewind_from_seconds - 3.5).abs() < 1e-12);
        let loop_length = analysis.points.rewind_from_seconds - analysis.points.rewind_to_seconds;
        assert!((loop_length - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_repeat_inside_one_half_uses_global_fallback() {
        // Frames 2..8 recur at 10..16, all inside the first half
        let mut features: Vec<Vec<f32>> = (0..40).map(|i| one_hot(i, 40)).collect();
        for i in 2..8 {
            features[i + 8] = one_hot(i, 40);
        }

        let config = frame_config(0.5);
        let analysis = find_loop_points(&samples_for(40), SAMPLE_RATE, features, config)
            .expect("Analysis should succeed");
        let diag = &analysis.diagnostics;

        assert_eq!(diag.strategy, SearchStrategy::Global);
        assert_eq!(diag.match_frames, 6);
        assert_eq!(diag.early_start_frame, 2);
        assert_eq!(diag.late_start_frame, 10);
        assert!((diag.min_similarity_used - 0.75).abs() < 1e-9);
        assert_eq!(diag.thresholds_tried, threshold_ladder(0.85));
        assert!(diag.top_spans.is_empty());
    }

    #[test]
    fn test_no_repeat_found() {
        let features: Vec<Vec<f32>> = (0..40).map(|i| one_hot(i, 40)).collect();
        let result = find_loop_points(&samples_for(40), SAMPLE_RATE, features, frame_config(1.0));

        match result {
            Err(AnalysisError::NoRepeatFound {
                min_segment_frames, ..
            }) => assert_eq!(min_segment_frames, 10),
            other => panic!("expected NoRepeatFound, got {:?}", other),
        }
    }

    #[test]
    fn test_insufficient_data() {
        // 19 frames, minimum segment of 10 frames needs 20
        let features: Vec<Vec<f32>> = (0..19).map(|_| vec![1.0, 0.0]).collect();
        let result = find_loop_points(&samples_for(19), SAMPLE_RATE, features, frame_config(1.0));

        assert_eq!(
            result.unwrap_err(),
            AnalysisError::InsufficientData {
                frames: 19,
                min_segment_frames: 10
            }
        );
    }

    #[test]
    fn test_insufficient_data_checked_before_feature_shape() {
        // Ragged features would be rejected by the search, but the frame
        // count check comes first
        let features = vec![vec![1.0, 0.0], vec![1.0]];
        let result = find_loop_points(&samples_for(2), SAMPLE_RATE, features, frame_config(1.0));
        assert!(matches!(result, Err(AnalysisError::InsufficientData { .. })));
    }

    #[test]
    fn test_ragged_features_rejected() {
        let mut features: Vec<Vec<f32>> = (0..20).map(|i| one_hot(i % 4, 4)).collect();
        features[7] = vec![1.0];
        let result = find_loop_points(&samples_for(20), SAMPLE_RATE, features, frame_config(0.5));
        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
    }

    #[test]
    fn test_top_spans_capped() {
        // Constant features: every cross-half cell matches, one span per diagonal
        let features = vec![vec![0.2, 0.9, 0.4]; 40];
        let config = AnalysisConfig {
            max_diagnostic_spans: 5,
            ..frame_config(1.0)
        };
        let analysis = find_loop_points(&samples_for(40), SAMPLE_RATE, features, config)
            .expect("Analysis should succeed");

        let spans = &analysis.diagnostics.top_spans;
        assert_eq!(spans.len(), 5);
        assert_eq!(spans[0].length, 20);
        for pair in spans.windows(2) {
            assert!(pair[0].length >= pair[1].length);
        }
    }

    #[test]
    fn test_waveform_envelope_in_diagnostics() {
        let features: Vec<Vec<f32>> = (0..40).map(|i| one_hot(i % 20, 20)).collect();
        let samples: Vec<f32> = (0..4000).map(|i| ((i as f32) * 0.05).sin() * 0.8).collect();
        let config = AnalysisConfig {
            waveform_bins: 40,
            ..frame_config(1.0)
        };
        let analysis = find_loop_points(&samples, SAMPLE_RATE, features, config)
            .expect("Analysis should succeed");

        let waveform = &analysis.diagnostics.waveform;
        assert_eq!(waveform.len(), 40);
        assert!(waveform.iter().all(|b| b.min <= b.max));
        assert!((analysis.diagnostics.duration_seconds - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_diagnostics_serialize() {
        let features: Vec<Vec<f32>> = (0..40).map(|i| one_hot(i % 20, 20)).collect();
        let analysis = find_loop_points(&samples_for(40), SAMPLE_RATE, features, frame_config(1.0))
            .expect("Analysis should succeed");

        let json = serde_json::to_value(&analysis).expect("serialize");
        assert_eq!(json["diagnostics"]["strategy"], "cross");
        assert_eq!(json["diagnostics"]["match_frames"], 20);
        assert!(json["points"]["rewind_from_seconds"].is_number());
    }

    #[test]
    fn test_invalid_parameters() {
        let features = vec![vec![1.0]; 40];
        let result = find_loop_points(&samples_for(40), 0, features.clone(), frame_config(1.0));
        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));

        let config = AnalysisConfig {
            hop_size: 0,
            ..AnalysisConfig::default()
        };
        let result = find_loop_points(&samples_for(40), SAMPLE_RATE, features, config);
        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
    }

    #[test]
    fn test_invalid_min_segment_duration() {
        for &seconds in &[f64::INFINITY, f64::NAN, -1.0] {
            let features = vec![vec![1.0]; 40];
            let result =
                find_loop_points(&samples_for(40), SAMPLE_RATE, features, frame_config(seconds));
            assert!(
                matches!(result, Err(AnalysisError::InvalidInput(_))),
                "min_segment_seconds={}: {:?}",
                seconds,
                result
            );
        }
    }

    #[test]
    fn test_huge_min_segment_is_insufficient_data() {
        // 1e300 seconds saturates the frame count instead of overflowing
        let features = vec![vec![1.0]; 40];
        let result = find_loop_points(&samples_for(40), SAMPLE_RATE, features, frame_config(1e300));

        match result {
            Err(AnalysisError::InsufficientData {
                frames,
                min_segment_frames,
            }) => {
                assert_eq!(frames, 40);
                assert_eq!(min_segment_frames, usize::MAX);
            }
            other => panic!("expected InsufficientData, got {:?}", other),
        }
    }

    #[test]
    fn test_analyze_audio_non_finite_samples() {
        let mut samples: Vec<f32> = (0..22050)
            .map(|i| (i as f32 * 440.0 * 2.0 * std::f32::consts::PI / 22050.0).sin() * 0.5)
            .collect();
        samples[5000] = f32::NAN;
        let result = analyze_audio(&samples, 22050, AnalysisConfig::default());
        assert!(
            matches!(result, Err(AnalysisError::ProcessingError(_))),
            "{:?}",
            result
        );
    }

    #[test]
    fn test_analyze_audio_empty() {
        let result = analyze_audio(&[], 22050, AnalysisConfig::default());
        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
    }

    #[test]
    fn test_analyze_audio_too_short() {
        // One second yields 9 frames; the default 6s minimum needs 130
        let samples: Vec<f32> = (0..22050)
            .map(|i| (i as f32 * 440.0 * 2.0 * std::f32::consts::PI / 22050.0).sin() * 0.5)
            .collect();
        let result = analyze_audio(&samples, 22050, AnalysisConfig::default());

        match result {
            Err(AnalysisError::InsufficientData {
                frames,
                min_segment_frames,
            }) => {
                assert_eq!(frames, 9);
                assert_eq!(min_segment_frames, 65);
            }
            other => panic!("expected InsufficientData, got {:?}", other),
        }
    }

    #[test]
    fn test_analyze_file_repeated_phrase() {
        let config = AnalysisConfig {
            min_segment_seconds: 2.0,
            ..AnalysisConfig::default()
        };
        let sample_rate = config.target_sample_rate;
        let hop = config.hop_size;

        // Six notes of 8 hops each; the phrase is an exact number of hops
        // long so both copies produce identical frames
        let note_len = 8 * hop;
        let freqs = [220.0f32, 330.0, 262.0, 392.0, 294.0, 494.0];
        let mut phrase = Vec::with_capacity(note_len * freqs.len());
        for (n, &freq) in freqs.iter().enumerate() {
            for i in 0..note_len {
                let t = i as f32 / sample_rate as f32;
                let env = 0.3 + 0.4 * (1.0 - i as f32 / note_len as f32);
                let overtone = if n % 2 == 0 { 0.3 } else { 0.1 };
                let x = (2.0 * std::f32::consts::PI * freq * t).sin()
                    + overtone * (2.0 * std::f32::consts::PI * freq * 3.0 * t).sin();
                phrase.push(x * env * 0.6);
            }
        }
        let mut samples = phrase.clone();
        samples.extend_from_slice(&phrase);

        let path = write_wav("loop_finder_repeated_phrase.wav", &samples, sample_rate);
        let result = analyze_file(&path, config);
        let _ = std::fs::remove_file(&path);
        let analysis = result.expect("Analysis should succeed");

        let diag = &analysis.diagnostics;
        let points = &analysis.points;
        println!(
            "Repeated phrase: strategy={}, sim={:.2}, match={} frames, {:.3}s -> {:.3}s",
            diag.strategy.as_str(),
            diag.min_similarity_used,
            diag.match_frames,
            points.rewind_from_seconds,
            points.rewind_to_seconds
        );

        assert_eq!(diag.strategy, SearchStrategy::Cross);
        assert_eq!(diag.min_similarity_used, 0.85);
        assert_eq!(diag.sample_rate, sample_rate);
        assert_eq!(diag.frames, 1 + (samples.len() - config_frame_size()) / hop);
        assert!(diag.match_frames >= diag.min_segment_frames);
        assert!(points.segment_duration_seconds >= 2.0 - 0.1);
        assert!(points.rewind_to_seconds < points.rewind_from_seconds);
        assert!(points.rewind_from_seconds <= diag.duration_seconds - 1.0 + 1e-9);
        assert_eq!(diag.waveform.len(), 2000);
    }

    #[test]
    fn test_analyze_file_missing() {
        let result = analyze_file("/nonexistent/loop-finder/track.ogg", AnalysisConfig::default());
        assert!(matches!(result, Err(AnalysisError::DecodingError(_))));
    }

    fn config_frame_size() -> usize {
        AnalysisConfig::default().frame_size
    }
}
