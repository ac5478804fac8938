// pipeline.rs — Pure computation layer for the dead-reckoning run
//
// Everything in this module is independent of:
//   - File I/O, CSV parsing, session export
//   - CLI argument handling
//
// It takes a complete recording in, produces a trajectory bundle out, so it
// can be unit-tested with synthetic data and reused against any frontend
// that can supply timestamped accel/gyro buffers. Processing is strictly
// batch: the zero-phase filters need the whole signal before the first
// output sample.

use crate::config::PdrConfig;
use crate::error::PdrResult;
use crate::heading::estimate_headings;
use crate::preprocess::preprocess;
use crate::step_detection::detect_steps;
use crate::step_length::estimate_step_lengths;
use crate::trajectory::{integrate_trajectory, total_distance};
use crate::types::{ImuRecording, PdrOutcome, PdrResults, StepEvent};

/// Run the full pipeline over one recording.
///
/// Fatal input problems (too few samples, unusable timestamps) come back
/// as errors; detecting too little to walk on is a normal outcome, not an
/// error.
pub fn compute_trajectory(
    recording: &ImuRecording,
    config: &PdrConfig,
) -> PdrResult<PdrOutcome> {
    let signals = preprocess(recording, config)?;

    let detection = detect_steps(&signals.accel, signals.sample_rate, config);
    log::info!("detected {} steps", detection.indices.len());
    if detection.indices.len() < 2 {
        log::warn!(
            "too few steps detected ({}), trajectory undeterminable",
            detection.indices.len()
        );
        return Ok(PdrOutcome::TooFewSteps {
            detected: detection.indices.len(),
        });
    }

    let headings = estimate_headings(&signals.gyro, &detection.indices, signals.dt, config);
    let step_lengths = estimate_step_lengths(&signals.accel, &detection.indices, config);
    let trajectory = integrate_trajectory(&headings, &step_lengths, config);
    let distance = total_distance(&step_lengths);

    let steps = detection
        .indices
        .iter()
        .map(|&index| StepEvent {
            index,
            time: recording.timestamps[index],
        })
        .collect();

    Ok(PdrOutcome::Trajectory(PdrResults {
        trajectory,
        steps,
        step_lengths,
        headings,
        detection_signal: detection.filtered_signal,
        total_distance: distance,
        sample_rate: signals.sample_rate,
    }))
}
