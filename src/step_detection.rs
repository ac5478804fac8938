//! Footstep detection from the vertical acceleration channel.

use ndarray::Array2;

use crate::config::PdrConfig;
use crate::filters::Butterworth;
use crate::preprocess::effective_cutoff;

/// Device-frame axis used for gait analysis (Z, vertical).
const VERTICAL_AXIS: usize = 2;

/// Accepted step indices plus the band-limited signal they were picked
/// from, kept for diagnostics and export.
#[derive(Clone, Debug)]
pub struct StepDetection {
    /// Sample indices of accepted steps, strictly increasing
    pub indices: Vec<usize>,
    pub filtered_signal: Vec<f64>,
}

/// Pick steps out of the conditioned acceleration channels.
///
/// The vertical axis is narrowed to the human gait band (zero-phase
/// high-pass then low-pass), then scanned with a sliding window. A sample
/// is accepted when it exceeds a fraction of the window's standard
/// deviation, clears the fixed minimum peak height, is a strict local
/// maximum, and lies more than the refractory interval past the previous
/// accepted step.
pub fn detect_steps(accel: &Array2<f64>, sample_rate: f64, config: &PdrConfig) -> StepDetection {
    let vertical = accel.column(VERTICAL_AXIS).to_vec();

    let band_low = effective_cutoff(config.gait_band_low_hz, sample_rate);
    let band_high = effective_cutoff(config.gait_band_high_hz, sample_rate);
    let highpassed = Butterworth::highpass(band_low, sample_rate).filtfilt(&vertical);
    let filtered_signal = Butterworth::lowpass(band_high, sample_rate).filtfilt(&highpassed);

    let indices = pick_peaks(&filtered_signal, sample_rate, config);
    StepDetection { indices, filtered_signal }
}

/// Adaptive peak picking over an already band-limited signal.
fn pick_peaks(signal: &[f64], sample_rate: f64, config: &PdrConfig) -> Vec<usize> {
    let window_size = (config.detection_window_secs * sample_rate) as usize;
    let half_window = (window_size / 2).max(1);
    if signal.len() <= 2 * half_window {
        return Vec::new();
    }
    let refractory = config.min_step_interval * sample_rate;

    let mut indices: Vec<usize> = Vec::new();
    for i in half_window..signal.len() - half_window {
        let window = &signal[i - half_window..=i + half_window];
        let threshold = config.threshold_std_factor * std_dev(window);
        let is_peak = signal[i] > threshold
            && signal[i] > config.min_peak_height
            && signal[i] > signal[i - 1]
            && signal[i] > signal[i + 1];
        if !is_peak {
            continue;
        }
        match indices.last() {
            Some(&last) if (i - last) as f64 <= refractory => {}
            _ => indices.push(i),
        }
    }
    indices
}

/// Population standard deviation.
fn std_dev(window: &[f64]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    let mean = window.iter().sum::<f64>() / window.len() as f64;
    let variance =
        window.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / window.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accel_from_vertical(vertical: &[f64]) -> Array2<f64> {
        let mut accel = Array2::zeros((vertical.len(), 3));
        for (i, v) in vertical.iter().enumerate() {
            accel[[i, VERTICAL_AXIS]] = *v;
        }
        accel
    }

    /// A spike shaped like a step peak: low shoulders, sharp top.
    fn place_spike(signal: &mut [f64], at: usize, height: f64) {
        signal[at - 1] = height / 2.0;
        signal[at] = height;
        signal[at + 1] = height / 2.0;
    }

    #[test]
    fn test_flat_signal_yields_no_steps() {
        let accel = accel_from_vertical(&vec![0.0; 200]);
        let detection = detect_steps(&accel, 50.0, &PdrConfig::default());
        assert!(detection.indices.is_empty());
        assert_eq!(detection.filtered_signal.len(), 200);
    }

    #[test]
    fn test_cadence_of_sinusoidal_walk() {
        // 2 Hz bounce at 100 Hz for 10 s, phase-shifted so crests never
        // land exactly between two samples. One crest per cycle, minus the
        // half-window exclusion zone at each end: 19 in-range crests.
        let sample_rate = 100.0;
        let vertical: Vec<f64> = (0..1000)
            .map(|i| {
                let t = i as f64 / sample_rate;
                2.0 * (2.0 * std::f64::consts::PI * 2.0 * t + 0.3).sin()
            })
            .collect();
        let accel = accel_from_vertical(&vertical);
        let detection = detect_steps(&accel, sample_rate, &PdrConfig::default());

        let count = detection.indices.len();
        assert!(
            (17..=21).contains(&count),
            "expected ~19 steps for a 2 Hz walk, got {count}"
        );
        // cadence: one crest every 50 samples
        for pair in detection.indices.windows(2) {
            let gap = pair[1] - pair[0];
            assert!(
                (45..=55).contains(&gap),
                "irregular step spacing {gap} samples"
            );
        }
    }

    #[test]
    fn test_refractory_interval_suppresses_double_counts() {
        // refractory at 50 Hz with the 0.3 s default is 15 samples
        let mut signal = vec![0.0; 200];
        place_spike(&mut signal, 60, 3.0);
        place_spike(&mut signal, 70, 3.0); // 10 samples after, too close
        place_spike(&mut signal, 120, 3.0);

        let indices = pick_peaks(&signal, 50.0, &PdrConfig::default());
        assert_eq!(indices, vec![60, 120]);
    }

    #[test]
    fn test_minimum_peak_height_gates_weak_peaks() {
        let mut signal = vec![0.0; 200];
        place_spike(&mut signal, 60, 0.8); // below the 1.0 floor
        place_spike(&mut signal, 120, 1.4);

        let indices = pick_peaks(&signal, 50.0, &PdrConfig::default());
        assert_eq!(indices, vec![120]);
    }

    #[test]
    fn test_window_margins_are_excluded() {
        // half-window is 12 at 50 Hz; peaks inside the margins are unseen
        let mut signal = vec![0.0; 100];
        place_spike(&mut signal, 5, 3.0);
        place_spike(&mut signal, 95, 3.0);

        let indices = pick_peaks(&signal, 50.0, &PdrConfig::default());
        assert!(indices.is_empty(), "margin peaks leaked: {indices:?}");
    }

    #[test]
    fn test_short_signal_is_rejected_whole() {
        // shorter than one analysis window
        let signal = vec![2.0; 10];
        assert!(pick_peaks(&signal, 50.0, &PdrConfig::default()).is_empty());
    }
}
