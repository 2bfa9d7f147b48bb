//! Camera - smoothed chase rig
//!
//! Two vectors (position, look-at target) eased toward fixed offsets from
//! the player body each tick. Runs in every phase so the camera keeps
//! tracking through Ready and Ended.

use rapier3d::na::Vector3;
use serde::Serialize;

/// The chase camera's smoothed state.
#[derive(Debug, Clone)]
pub struct CameraRig {
    pub position: Vector3<f32>,
    pub target: Vector3<f32>,
}

impl CameraRig {
    /// Per-tick interpolation factor. Deliberately not scaled by dt: the
    /// session contract is one tick per fixed-rate frame.
    const SMOOTHING: f32 = 0.1;
    const POSITION_OFFSET_Y: f32 = 2.25;
    const POSITION_OFFSET_Z: f32 = 2.65;
    const TARGET_OFFSET_Y: f32 = 0.25;

    pub fn new() -> Self {
        Self {
            position: Vector3::new(10.0, 10.0, 10.0),
            target: Vector3::zeros(),
        }
    }

    /// Ease toward the chase offsets from the given body position.
    pub fn follow(&mut self, body_position: &Vector3<f32>) {
        let desired_position = body_position
            + Vector3::new(0.0, Self::POSITION_OFFSET_Y, Self::POSITION_OFFSET_Z);
        let desired_target = body_position + Vector3::new(0.0, Self::TARGET_OFFSET_Y, 0.0);

        self.position += (desired_position - self.position) * Self::SMOOTHING;
        self.target += (desired_target - self.target) * Self::SMOOTHING;
    }

    pub fn snapshot(&self) -> CameraSnapshot {
        CameraSnapshot {
            position: [self.position.x, self.position.y, self.position.z],
            target: [self.target.x, self.target.y, self.target.z],
        }
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new()
    }
}

/// Camera vectors for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct CameraSnapshot {
    pub position: [f32; 3],
    pub target: [f32; 3],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_moves_a_tenth_of_the_way() {
        let mut rig = CameraRig::new();
        let body = Vector3::new(0.0, 1.0, -4.0);
        rig.follow(&body);

        // Desired position is (0, 3.25, -1.35); start was (10, 10, 10).
        assert!((rig.position.x - 9.0).abs() < 1e-5);
        assert!((rig.position.y - (10.0 + (3.25 - 10.0) * 0.1)).abs() < 1e-5);
        assert!((rig.target.y - 0.125).abs() < 1e-5);
    }

    #[test]
    fn rig_converges_on_a_stationary_body() {
        let mut rig = CameraRig::new();
        let body = Vector3::new(0.0, 1.0, -8.0);
        for _ in 0..400 {
            rig.follow(&body);
        }

        assert!((rig.position.y - 3.25).abs() < 1e-3);
        assert!((rig.position.z - (-8.0 + 2.65)).abs() < 1e-3);
        assert!((rig.target.y - 1.25).abs() < 1e-3);
        assert!((rig.target.z - (-8.0)).abs() < 1e-3);
    }
}
