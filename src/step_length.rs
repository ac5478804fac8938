//! Per-step distance from an empirical acceleration-amplitude model.

use ndarray::{s, Array2};

use crate::config::PdrConfig;

/// Estimate one length per detected step.
///
/// For each step after the first, the length follows the peak-to-peak
/// spread of the acceleration magnitude over the window since the previous
/// step: `intercept + slope * (p2p / scale)`, clamped to the configured
/// range. The coefficients are tuned on walking data, not derived from
/// physics. The first step has no preceding window and takes the default
/// length; so does every step when fewer than two were detected.
pub fn estimate_step_lengths(
    accel: &Array2<f64>,
    steps: &[usize],
    config: &PdrConfig,
) -> Vec<f64> {
    if steps.len() < 2 {
        return vec![config.step_length_default; steps.len()];
    }
    let mut lengths = Vec::with_capacity(steps.len());
    lengths.push(config.step_length_default);
    for pair in steps.windows(2) {
        let window = accel.slice(s![pair[0]..pair[1], ..]);
        let mut max_mag = f64::NEG_INFINITY;
        let mut min_mag = f64::INFINITY;
        for r in 0..window.nrows() {
            let magnitude = (window[[r, 0]] * window[[r, 0]]
                + window[[r, 1]] * window[[r, 1]]
                + window[[r, 2]] * window[[r, 2]])
                .sqrt();
            max_mag = max_mag.max(magnitude);
            min_mag = min_mag.min(magnitude);
        }
        let peak_to_peak = max_mag - min_mag;
        let raw = config.length_intercept
            + config.length_slope * (peak_to_peak / config.length_accel_scale);
        lengths.push(raw.clamp(config.length_min, config.length_max));
    }
    lengths
}
