//! Tuning knobs for one dead-reckoning run.

/// Parameters for one pass over a recording. Construct with
/// `PdrConfig::default()` and override the fields you need; the pipeline
/// never mutates it.
#[derive(Clone, Debug)]
pub struct PdrConfig {
    // ── Walk model ──
    pub step_length_default: f64,
    pub min_step_interval: f64,
    pub initial_heading: f64,
    pub initial_position: (f64, f64),

    // ── Raw channel conditioning ──
    pub lowpass_cutoff: f64,

    // ── Step detection ──
    /// Reserved sensitivity knob. The detector thresholds on window
    /// statistics and `min_peak_height`; this field is accepted for
    /// compatibility with existing tuning setups but not consulted.
    pub acc_threshold: f64,
    pub gait_band_low_hz: f64,
    pub gait_band_high_hz: f64,
    pub detection_window_secs: f64,
    pub threshold_std_factor: f64,
    pub min_peak_height: f64,

    // ── Step length model ──
    pub length_intercept: f64,
    pub length_slope: f64,
    pub length_accel_scale: f64,
    pub length_min: f64,
    pub length_max: f64,
}

impl Default for PdrConfig {
    fn default() -> Self {
        Self {
            step_length_default: 0.7,
            min_step_interval: 0.3,
            initial_heading: 0.0,
            initial_position: (0.0, 0.0),
            lowpass_cutoff: 5.0,
            acc_threshold: 1.5,
            gait_band_low_hz: 0.5,
            gait_band_high_hz: 3.0,
            detection_window_secs: 0.5,
            threshold_std_factor: 0.5,
            min_peak_height: 1.0,
            length_intercept: 0.4,
            length_slope: 0.3,
            length_accel_scale: 10.0,
            length_min: 0.3,
            length_max: 1.2,
        }
    }
}
