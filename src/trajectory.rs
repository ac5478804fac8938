//! Forward integration of per-step displacements.

use crate::config::PdrConfig;
use crate::types::TrajectoryPoint;

/// Project per-step headings and lengths into a 2D position sequence.
///
/// The first point is the configured start position. Step 0's heading and
/// length seed the sequence but are never projected; each later step moves
/// the position by its own length along its own heading. Both slices must
/// be the same length.
pub fn integrate_trajectory(
    headings: &[f64],
    lengths: &[f64],
    config: &PdrConfig,
) -> Vec<TrajectoryPoint> {
    debug_assert_eq!(headings.len(), lengths.len());
    let mut trajectory = Vec::with_capacity(headings.len());
    if headings.is_empty() {
        return trajectory;
    }
    let (mut x, mut y) = config.initial_position;
    trajectory.push(TrajectoryPoint { x, y });
    for i in 1..headings.len() {
        x += lengths[i] * headings[i].cos();
        y += lengths[i] * headings[i].sin();
        trajectory.push(TrajectoryPoint { x, y });
    }
    trajectory
}

/// Walked distance over the whole run: the sum of every step length,
/// including the index-0 seed the integrator never projects.
pub fn total_distance(lengths: &[f64]) -> f64 {
    lengths.iter().sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_input_yields_empty_path() {
        assert!(integrate_trajectory(&[], &[], &PdrConfig::default()).is_empty());
    }

    #[test]
    fn test_first_point_is_start_and_step_zero_is_not_projected() {
        let config = PdrConfig {
            initial_position: (3.0, -1.0),
            ..PdrConfig::default()
        };
        let trajectory = integrate_trajectory(&[0.0, 0.0], &[0.7, 0.5], &config);
        assert_eq!(trajectory.len(), 2);
        assert_eq!(trajectory[0], TrajectoryPoint { x: 3.0, y: -1.0 });
        // only the 0.5 m step moves the position; the 0.7 m seed does not
        assert_relative_eq!(trajectory[1].x, 3.5, epsilon = 1e-12);
        assert_relative_eq!(trajectory[1].y, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_square_walk_returns_near_start() {
        use std::f64::consts::FRAC_PI_2;
        // four 1 m legs turning left 90 degrees each time; the heading at
        // index 0 never matters
        let headings = [0.0, 0.0, FRAC_PI_2, 2.0 * FRAC_PI_2, 3.0 * FRAC_PI_2];
        let lengths = [0.7, 1.0, 1.0, 1.0, 1.0];
        let trajectory = integrate_trajectory(&headings, &lengths, &PdrConfig::default());

        assert_eq!(trajectory.len(), 5);
        let last = trajectory[4];
        assert_relative_eq!(last.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(last.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_total_distance_sums_every_length() {
        assert_relative_eq!(total_distance(&[0.7, 0.5, 0.6]), 1.8, epsilon = 1e-12);
        assert_eq!(total_distance(&[]), 0.0);
    }
}
