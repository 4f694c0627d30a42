//! Example: Find loop points in an audio file
//!
//! Usage:
//!   cargo run --release --example find_loop -- [--json] [--min-sim X] [--min-seg SECONDS] <file>

use loop_finder::{analyze_file, AnalysisConfig};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    let mut config = AnalysisConfig::default();
    let mut json = false;
    let mut path: Option<String> = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--min-sim" => {
                config.min_similarity = args.next().ok_or("--min-sim needs a value")?.parse()?;
            }
            "--min-seg" => {
                config.min_segment_seconds =
                    args.next().ok_or("--min-seg needs a value")?.parse()?;
            }
            "--tail-guard" => {
                config.tail_guard_seconds =
                    args.next().ok_or("--tail-guard needs a value")?.parse()?;
            }
            _ => path = Some(arg),
        }
    }

    let path = path.ok_or("Usage: find_loop [--json] [--min-sim X] [--min-seg SECONDS] <file>")?;
    let analysis = analyze_file(&path, config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    let points = &analysis.points;
    let diag = &analysis.diagnostics;
    println!("Loop points for {}:", path);
    println!("  Rewind from: {:.3} s", points.rewind_from_seconds);
    println!("  Rewind to:   {:.3} s", points.rewind_to_seconds);
    println!(
        "  Segment:     {:.3} s ({} frames)",
        points.segment_duration_seconds, diag.match_frames
    );
    println!(
        "  Early/late:  {:.3} s / {:.3} s",
        points.start_early_seconds, points.start_late_seconds
    );
    println!(
        "  Strategy:    {} (similarity {:.2})",
        diag.strategy.as_str(),
        diag.min_similarity_used
    );
    println!("  Frames:      {} at {:.2} fps", diag.frames, diag.frames_per_second);
    println!("  Processing time: {:.2} ms", diag.processing_time_ms);

    Ok(())
}
