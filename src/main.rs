use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;

use pdr_tracker_rs::config::PdrConfig;
use pdr_tracker_rs::csv_loader;
use pdr_tracker_rs::pipeline::compute_trajectory;
use pdr_tracker_rs::types::{PdrOutcome, PdrResults};

#[derive(Parser, Debug)]
#[command(name = "pdr_tracker")]
#[command(about = "Pedestrian dead reckoning from recorded IMU logs", long_about = None)]
struct Args {
    /// CSV or gzipped CSV log: timestamp, accel XYZ, gyro XYZ
    input: PathBuf,

    /// Fallback step length (meters)
    #[arg(long, default_value = "0.7")]
    step_length: f64,

    /// Minimum interval between steps (seconds)
    #[arg(long, default_value = "0.3")]
    min_step_interval: f64,

    /// Detection sensitivity (reserved)
    #[arg(long, default_value = "1.5")]
    acc_threshold: f64,

    /// Low-pass cutoff for raw channels (Hz)
    #[arg(long, default_value = "5.0")]
    lowpass_cutoff: f64,

    /// Heading at the start of the walk (radians)
    #[arg(long, default_value = "0.0")]
    initial_heading: f64,

    /// Output directory
    #[arg(long, default_value = "pdr_sessions")]
    output_dir: String,

    /// Skip writing the JSON result bundle
    #[arg(long)]
    no_export: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("[{}] PDR Tracker Starting", ts_now());
    println!("  Input: {}", args.input.display());
    println!("  Step Length: {} m", args.step_length);
    println!("  Min Step Interval: {} s", args.min_step_interval);
    println!("  Lowpass Cutoff: {} Hz", args.lowpass_cutoff);
    println!("  Output Dir: {}", args.output_dir);

    let recording = csv_loader::load_recording(&args.input)
        .with_context(|| format!("failed to load {:?}", args.input))?;
    println!("[{}] Loaded {} samples", ts_now(), recording.len());

    let config = PdrConfig {
        step_length_default: args.step_length,
        min_step_interval: args.min_step_interval,
        acc_threshold: args.acc_threshold,
        lowpass_cutoff: args.lowpass_cutoff,
        initial_heading: args.initial_heading,
        ..PdrConfig::default()
    };

    match compute_trajectory(&recording, &config)? {
        PdrOutcome::Trajectory(results) => {
            print_statistics(&results);
            if !args.no_export {
                std::fs::create_dir_all(&args.output_dir)?;
                let filename = format!("{}/pdr_{}.json", args.output_dir, ts_now_clean());
                let json = serde_json::to_string_pretty(&results)?;
                std::fs::write(&filename, json)?;
                println!(
                    "[{}] Saved {} steps to {}",
                    ts_now(),
                    results.steps.len(),
                    filename
                );
            }
        }
        PdrOutcome::TooFewSteps { detected } => {
            println!("Too few steps detected ({detected}), cannot calculate trajectory");
        }
    }

    Ok(())
}

fn print_statistics(results: &PdrResults) {
    let lengths = &results.step_lengths;
    let mean = lengths.iter().sum::<f64>() / lengths.len() as f64;
    let min = lengths.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = lengths.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let displacement = results
        .trajectory
        .last()
        .map(|p| (p.x * p.x + p.y * p.y).sqrt())
        .unwrap_or(0.0);

    println!("=== Trajectory Statistics ===");
    println!("Total steps: {}", results.steps.len());
    println!("Total distance: {:.2} m", results.total_distance);
    println!("Average step length: {:.2} m", mean);
    println!("Step length range: {:.2} - {:.2} m", min, max);
    println!("Start-End displacement: {:.2} m", displacement);
}

fn ts_now() -> String {
    Utc::now().format("%H:%M:%S").to_string()
}

fn ts_now_clean() -> String {
    Utc::now().format("%Y%m%d_%H%M%S").to_string()
}
