//! Heading accumulation from gyroscope yaw rate.

use ndarray::Array2;

use crate::config::PdrConfig;

/// Gyro axis carrying yaw rate (device-frame Z), recorded in deg/s.
const YAW_AXIS: usize = 2;

/// Integrate yaw rate into one cumulative heading per detected step.
///
/// Each step's heading adds the trapezoidal integral of the yaw rate over
/// the samples since the previous step (since the start of the recording
/// for the first step) to the configured initial heading. Headings are
/// left unwrapped; callers normalize if they need a bounded angle.
/// Fewer than two steps yields no headings at all.
pub fn estimate_headings(
    gyro: &Array2<f64>,
    steps: &[usize],
    dt: f64,
    config: &PdrConfig,
) -> Vec<f64> {
    if steps.len() < 2 {
        return Vec::new();
    }
    let yaw_rate: Vec<f64> = gyro.column(YAW_AXIS).iter().map(|deg| deg.to_radians()).collect();

    let mut headings = Vec::with_capacity(steps.len());
    let mut heading = config.initial_heading;
    let mut window_start = 0;
    for &step in steps {
        heading += trapezoid(&yaw_rate[window_start..step], dt);
        headings.push(heading);
        window_start = step;
    }
    headings
}

/// Trapezoidal integral of uniformly spaced samples. Windows with fewer
/// than two samples integrate to zero.
fn trapezoid(samples: &[f64], dt: f64) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let interior: f64 = samples[1..samples.len() - 1].iter().sum();
    dt * (interior + (samples[0] + samples[samples.len() - 1]) / 2.0)
}
