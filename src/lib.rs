//! Pedestrian dead reckoning over recorded IMU buffers.
//!
//! Turns a timestamped accelerometer + gyroscope log into a 2D walking
//! trajectory: zero-phase conditioning, footstep detection, per-step
//! heading and length estimation, and forward integration. Every stage is
//! a pure function over an explicit [`PdrConfig`], and processing is
//! strictly batch because the zero-phase filters need the whole buffer.

pub mod config;
pub mod csv_loader;
pub mod error;
pub mod filters;
pub mod heading;
pub mod pipeline;
pub mod preprocess;
pub mod step_detection;
pub mod step_length;
pub mod trajectory;
pub mod types;

pub use config::PdrConfig;
pub use error::{PdrError, PdrResult};
pub use pipeline::compute_trajectory;
pub use types::{ImuRecording, ImuSample, PdrOutcome, PdrResults, StepEvent, TrajectoryPoint};
