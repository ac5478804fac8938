//! Sampling-rate derivation and raw channel conditioning.

use ndarray::Array2;

use crate::config::PdrConfig;
use crate::error::{PdrError, PdrResult};
use crate::filters::Butterworth;
use crate::types::ImuRecording;

/// Conditioned channels plus the timing derived from the timestamps.
#[derive(Clone, Debug)]
pub struct Preprocessed {
    /// Samples per second, `1 / dt`
    pub sample_rate: f64,
    /// Mean spacing between consecutive timestamps (seconds)
    pub dt: f64,
    pub accel: Array2<f64>,
    pub gyro: Array2<f64>,
}

/// Derive the sampling rate from the timestamps and low-pass every
/// accelerometer and gyroscope axis at the configured cutoff.
pub fn preprocess(recording: &ImuRecording, config: &PdrConfig) -> PdrResult<Preprocessed> {
    let n = recording.timestamps.len();
    if n < 2 {
        return Err(PdrError::InsufficientSamples { count: n });
    }
    let span: f64 = recording.timestamps.windows(2).map(|w| w[1] - w[0]).sum();
    let dt = span / (n - 1) as f64;
    if !dt.is_finite() || dt <= 0.0 {
        return Err(PdrError::NonIncreasingTimestamps);
    }
    let sample_rate = 1.0 / dt;
    log::info!("sampling rate {sample_rate:.1} Hz over {n} samples");

    let cutoff = effective_cutoff(config.lowpass_cutoff, sample_rate);
    let filter = Butterworth::lowpass(cutoff, sample_rate);
    Ok(Preprocessed {
        sample_rate,
        dt,
        accel: lowpass_channels(&recording.accel, &filter),
        gyro: lowpass_channels(&recording.gyro, &filter),
    })
}

/// Clamp a requested cutoff to a third of the sampling rate when the
/// request is not representable below Nyquist.
pub fn effective_cutoff(requested_hz: f64, sample_rate_hz: f64) -> f64 {
    if sample_rate_hz <= 2.0 * requested_hz {
        let clamped = sample_rate_hz / 3.0;
        log::warn!(
            "cutoff {requested_hz:.2} Hz unusable at {sample_rate_hz:.1} Hz sampling, clamping to {clamped:.2} Hz"
        );
        clamped
    } else {
        requested_hz
    }
}

/// Zero-phase low-pass, one column at a time.
fn lowpass_channels(channels: &Array2<f64>, filter: &Butterworth) -> Array2<f64> {
    let mut filtered = Array2::zeros(channels.raw_dim());
    for axis in 0..channels.ncols() {
        let smoothed = filter.filtfilt(&channels.column(axis).to_vec());
        for (row, value) in smoothed.into_iter().enumerate() {
            filtered[[row, axis]] = value;
        }
    }
    filtered
}
