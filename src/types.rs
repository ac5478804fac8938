use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// One row of a recorded IMU log. Accelerometer in m/s² (device frame,
/// Z vertical), gyroscope in deg/s.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ImuSample {
    pub timestamp: f64,
    pub accel_x: f64,
    pub accel_y: f64,
    pub accel_z: f64,
    pub gyro_x: f64,
    pub gyro_y: f64,
    pub gyro_z: f64,
}

/// A complete recording, channel-major so each axis can be filtered as one
/// contiguous signal.
#[derive(Clone, Debug)]
pub struct ImuRecording {
    pub timestamps: Vec<f64>,
    /// n×3 accelerometer samples
    pub accel: Array2<f64>,
    /// n×3 gyroscope samples
    pub gyro: Array2<f64>,
}

impl ImuRecording {
    pub fn from_samples(samples: &[ImuSample]) -> Self {
        let n = samples.len();
        let mut timestamps = Vec::with_capacity(n);
        let mut accel = Array2::zeros((n, 3));
        let mut gyro = Array2::zeros((n, 3));
        for (i, s) in samples.iter().enumerate() {
            timestamps.push(s.timestamp);
            accel[[i, 0]] = s.accel_x;
            accel[[i, 1]] = s.accel_y;
            accel[[i, 2]] = s.accel_z;
            gyro[[i, 0]] = s.gyro_x;
            gyro[[i, 1]] = s.gyro_y;
            gyro[[i, 2]] = s.gyro_z;
        }
        Self { timestamps, accel, gyro }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// A detected footstep.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepEvent {
    /// Sample index of the accepted peak
    pub index: usize,
    /// Recorded timestamp at that index (seconds)
    pub time: f64,
}

/// One 2D position estimate (meters, local frame).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub x: f64,
    pub y: f64,
}

/// Everything a successful run produces.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PdrResults {
    /// One point per detected step; the first is the configured start
    pub trajectory: Vec<TrajectoryPoint>,
    pub steps: Vec<StepEvent>,
    /// Per-step distance estimates; index 0 is the configured default
    pub step_lengths: Vec<f64>,
    /// Cumulative unwrapped heading at each step (radians)
    pub headings: Vec<f64>,
    /// Gait-band vertical acceleration the steps were picked from
    pub detection_signal: Vec<f64>,
    /// Sum of every step length, including the index-0 seed that the
    /// integrator never projects
    pub total_distance: f64,
    /// Samples per second derived from the timestamps
    pub sample_rate: f64,
}

/// Outcome of a run: either a trajectory bundle or an explicit signal that
/// too little was detected to form one.
#[derive(Clone, Debug)]
pub enum PdrOutcome {
    Trajectory(PdrResults),
    /// Fewer than two steps found, so no displacement can be integrated
    TooFewSteps { detected: usize },
}
