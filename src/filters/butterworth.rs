//! Fourth-order Butterworth filtering with zero-phase application.
//!
//! The designs come from the prewarped bilinear transform, realized as two
//! cascaded second-order sections. `filtfilt` runs the cascade forward and
//! backward over the whole buffer so the combined response has no phase
//! shift, which is what keeps detected step peaks aligned with the raw
//! signal. The price is that the complete signal must be available up
//! front; there is no streaming variant.

use nalgebra::{Matrix2, Vector2};

/// Filter order of every design in this module (two biquad sections).
const FILTER_ORDER: usize = 4;

/// Effective tap count of the expanded cascade, used to size edge padding.
const CASCADE_TAPS: usize = FILTER_ORDER + 1;

/// One second-order section in direct form II transposed. `a0` is
/// normalized to 1.
#[derive(Clone, Copy, Debug)]
struct Biquad {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl Biquad {
    /// Prewarped bilinear low-pass section with quality factor `q`.
    fn lowpass(cutoff_hz: f64, sample_rate_hz: f64, q: f64) -> Self {
        let c = (std::f64::consts::PI * cutoff_hz / sample_rate_hz).tan();
        let d = c * c + c / q + 1.0;
        Self {
            b0: c * c / d,
            b1: 2.0 * c * c / d,
            b2: c * c / d,
            a1: 2.0 * (c * c - 1.0) / d,
            a2: (c * c - c / q + 1.0) / d,
        }
    }

    /// Prewarped bilinear high-pass section with quality factor `q`.
    fn highpass(cutoff_hz: f64, sample_rate_hz: f64, q: f64) -> Self {
        let c = (std::f64::consts::PI * cutoff_hz / sample_rate_hz).tan();
        let d = c * c + c / q + 1.0;
        Self {
            b0: 1.0 / d,
            b1: -2.0 / d,
            b2: 1.0 / d,
            a1: 2.0 * (c * c - 1.0) / d,
            a2: (c * c - c / q + 1.0) / d,
        }
    }

    /// Gain at DC, used to scale initial conditions through the cascade.
    fn dc_gain(&self) -> f64 {
        (self.b0 + self.b1 + self.b2) / (1.0 + self.a1 + self.a2)
    }

    /// Filter state that makes the section start in steady-state response
    /// to a unit input: solve (I - A) z = B for the transposed direct form
    /// II companion matrix.
    fn steady_state(&self) -> [f64; 2] {
        let m = Matrix2::new(1.0 + self.a1, -1.0, self.a2, 1.0);
        let rhs = Vector2::new(self.b1 - self.b0 * self.a1, self.b2 - self.b0 * self.a2);
        match m.lu().solve(&rhs) {
            Some(z) => [z[0], z[1]],
            None => [0.0, 0.0],
        }
    }

    /// One directional pass over `data`, starting from `state`.
    fn run_in_place(&self, data: &mut [f64], mut state: [f64; 2]) {
        for x in data.iter_mut() {
            let y = self.b0 * *x + state[0];
            state[0] = self.b1 * *x - self.a1 * y + state[1];
            state[1] = self.b2 * *x - self.a2 * y;
            *x = y;
        }
    }
}

/// Quality factors of the two sections of a 4th-order Butterworth. The
/// analog prototype poles sit at π/8 and 3π/8 off the negative real axis.
fn section_q() -> [f64; 2] {
    [
        0.5 / (std::f64::consts::PI / 8.0).cos(),
        0.5 / (3.0 * std::f64::consts::PI / 8.0).cos(),
    ]
}

fn assert_valid_cutoff(cutoff_hz: f64, sample_rate_hz: f64) {
    assert!(sample_rate_hz > 0.0);
    assert!(
        cutoff_hz > 0.0 && cutoff_hz < sample_rate_hz / 2.0,
        "cutoff {} Hz must lie strictly inside (0, {}) Hz",
        cutoff_hz,
        sample_rate_hz / 2.0
    );
}

/// Fourth-order Butterworth filter as two cascaded biquads.
#[derive(Clone, Debug)]
pub struct Butterworth {
    sections: [Biquad; 2],
    /// Per-section steady states for a unit input, pre-scaled by the DC
    /// gain of the sections before them in the cascade.
    initial_states: [[f64; 2]; 2],
}

impl Butterworth {
    pub fn lowpass(cutoff_hz: f64, sample_rate_hz: f64) -> Self {
        assert_valid_cutoff(cutoff_hz, sample_rate_hz);
        let [q1, q2] = section_q();
        Self::new([
            Biquad::lowpass(cutoff_hz, sample_rate_hz, q1),
            Biquad::lowpass(cutoff_hz, sample_rate_hz, q2),
        ])
    }

    pub fn highpass(cutoff_hz: f64, sample_rate_hz: f64) -> Self {
        assert_valid_cutoff(cutoff_hz, sample_rate_hz);
        let [q1, q2] = section_q();
        Self::new([
            Biquad::highpass(cutoff_hz, sample_rate_hz, q1),
            Biquad::highpass(cutoff_hz, sample_rate_hz, q2),
        ])
    }

    fn new(sections: [Biquad; 2]) -> Self {
        let mut initial_states = [[0.0; 2]; 2];
        let mut scale = 1.0;
        for (i, section) in sections.iter().enumerate() {
            let z = section.steady_state();
            initial_states[i] = [z[0] * scale, z[1] * scale];
            scale *= section.dc_gain();
        }
        Self { sections, initial_states }
    }

    /// Apply the cascade forward and backward over the whole buffer.
    ///
    /// The input is extended on both ends with an odd reflection before
    /// filtering, and each pass starts from the steady-state response to
    /// its first sample, which keeps edge transients out of the returned
    /// signal. Output length equals input length.
    pub fn filtfilt(&self, signal: &[f64]) -> Vec<f64> {
        if signal.is_empty() {
            return Vec::new();
        }
        let pad = (3 * CASCADE_TAPS).min(signal.len() - 1);
        let mut extended = odd_extension(signal, pad);

        self.run_cascade(&mut extended);
        extended.reverse();
        self.run_cascade(&mut extended);
        extended.reverse();

        extended[pad..pad + signal.len()].to_vec()
    }

    /// One directional pass of both sections. `data` must be non-empty.
    fn run_cascade(&self, data: &mut [f64]) {
        let first = data[0];
        for (section, init) in self.sections.iter().zip(self.initial_states.iter()) {
            let state = [init[0] * first, init[1] * first];
            section.run_in_place(data, state);
        }
    }
}

/// Reflect `pad` samples around each endpoint: prefix j holds
/// `2·x[0] − x[pad−j]`, suffix j holds `2·x[n−1] − x[n−2−j]`.
/// Requires `pad < signal.len()`.
fn odd_extension(signal: &[f64], pad: usize) -> Vec<f64> {
    let n = signal.len();
    let mut extended = Vec::with_capacity(n + 2 * pad);
    for j in (1..=pad).rev() {
        extended.push(2.0 * signal[0] - signal[j]);
    }
    extended.extend_from_slice(signal);
    for j in 1..=pad {
        extended.push(2.0 * signal[n - 1] - signal[n - 1 - j]);
    }
    extended
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sine(freq_hz: f64, sample_rate_hz: f64, seconds: f64) -> Vec<f64> {
        let n = (seconds * sample_rate_hz) as usize;
        (0..n)
            .map(|i| (2.0 * std::f64::consts::PI * freq_hz * i as f64 / sample_rate_hz).sin())
            .collect()
    }

    fn peak_index(signal: &[f64], from: usize, to: usize) -> usize {
        let mut best = from;
        for i in from..to {
            if signal[i] > signal[best] {
                best = i;
            }
        }
        best
    }

    #[test]
    fn test_constant_input_passes_unchanged() {
        // With proper steady-state initialization a low-pass filtfilt of a
        // constant is that constant, with no edge transient
        let signal = vec![2.5; 100];
        let filtered = Butterworth::lowpass(5.0, 50.0).filtfilt(&signal);
        assert_eq!(filtered.len(), 100);
        for v in &filtered {
            assert_relative_eq!(*v, 2.5, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_lowpass_removes_high_frequency() {
        // 1 Hz tone plus 20 Hz interference, cutoff between them.
        // 20 Hz sits two octaves above 5 Hz, so each 4th-order pass takes
        // it down ~48 dB and the double pass buries it entirely.
        let sample_rate = 100.0;
        let low = sine(1.0, sample_rate, 5.0);
        let high = sine(20.0, sample_rate, 5.0);
        let mixed: Vec<f64> = low.iter().zip(&high).map(|(a, b)| a + b).collect();

        let filtered = Butterworth::lowpass(5.0, sample_rate).filtfilt(&mixed);
        for i in 50..filtered.len() - 50 {
            assert!(
                (filtered[i] - low[i]).abs() < 0.05,
                "sample {} deviates from clean tone by {}",
                i,
                (filtered[i] - low[i]).abs()
            );
        }
    }

    #[test]
    fn test_lowpass_is_zero_phase() {
        // Peaks of a 1 Hz tone must not shift; a single directional pass
        // would lag them by several samples
        let sample_rate = 50.0;
        let signal = sine(1.0, sample_rate, 4.0);
        let filtered = Butterworth::lowpass(5.0, sample_rate).filtfilt(&signal);
        assert_eq!(filtered.len(), signal.len());

        // second crest of the tone lands near sample 62
        let before = peak_index(&signal, 40, 90);
        let after = peak_index(&filtered, 40, 90);
        assert!(
            (before as i64 - after as i64).abs() <= 1,
            "peak moved from {} to {}",
            before,
            after
        );
    }

    #[test]
    fn test_highpass_removes_offset_keeps_tone() {
        // 2 Hz tone riding on a 5.0 offset; 0.5 Hz high-pass strips the
        // offset and leaves the tone amplitude essentially untouched
        let sample_rate = 100.0;
        let tone = sine(2.0, sample_rate, 6.0);
        let shifted: Vec<f64> = tone.iter().map(|v| v + 5.0).collect();

        let filtered = Butterworth::highpass(0.5, sample_rate).filtfilt(&shifted);
        let middle = &filtered[100..filtered.len() - 100];

        let mean: f64 = middle.iter().sum::<f64>() / middle.len() as f64;
        assert!(mean.abs() < 0.05, "residual offset {mean}");

        let peak = middle.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert!((peak - 1.0).abs() < 0.05, "tone amplitude became {peak}");
    }

    #[test]
    fn test_short_inputs() {
        let filter = Butterworth::lowpass(5.0, 50.0);
        assert!(filter.filtfilt(&[]).is_empty());

        // padding shrinks to len-1, output still matches input length
        let out = filter.filtfilt(&[3.0]);
        assert_eq!(out.len(), 1);
        assert_relative_eq!(out[0], 3.0, epsilon = 1e-9);

        let out = filter.filtfilt(&[1.0, 1.0, 1.0]);
        assert_eq!(out.len(), 3);
        for v in &out {
            assert_relative_eq!(*v, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    #[should_panic]
    fn test_rejects_cutoff_at_nyquist() {
        Butterworth::lowpass(25.0, 50.0);
    }
}
