//! Obstacle - archetype library of kinematic motion functions
//!
//! Each moving archetype is a pure function from elapsed time (plus
//! per-instance parameters sampled once at spawn) to a kinematic pose
//! target. The physics engine interpolates kinematic bodies toward these
//! targets; obstacles are never driven by impulses.

use std::f32::consts::TAU;

use rapier3d::na::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Obstacle kinds eligible for random slot assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchetypeKind {
    Spinner,
    Limbo,
    Axe,
}

impl ArchetypeKind {
    /// Every moving archetype, the default selection pool.
    pub const ALL: [ArchetypeKind; 3] =
        [ArchetypeKind::Spinner, ArchetypeKind::Limbo, ArchetypeKind::Axe];

    /// Sample per-instance motion parameters, producing a concrete archetype.
    pub fn spawn(self) -> Archetype {
        match self {
            ArchetypeKind::Spinner => {
                let sign = if rand::random::<f32>() > 0.5 { 1.0 } else { -1.0 };
                Archetype::Spinner {
                    speed: (rand::random::<f32>() + 0.2) * sign,
                }
            }
            ArchetypeKind::Limbo => Archetype::Limbo {
                phase_offset: rand::random::<f32>() * TAU,
            },
            ArchetypeKind::Axe => Archetype::Axe {
                phase_offset: rand::random::<f32>() * TAU,
            },
        }
    }
}

/// A pose command for a kinematic obstacle body.
#[derive(Debug, Clone, PartialEq)]
pub enum KinematicTarget {
    /// Absolute rotation; translation stays at the spawn pose.
    Rotation(UnitQuaternion<f32>),
    /// Absolute translation; rotation stays at the spawn pose.
    Translation(Vector3<f32>),
}

/// One segment's behavior, with per-instance parameters baked in.
///
/// `Start` and `End` are the fixed bookend segments and carry no moving
/// obstacle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Archetype {
    Start,
    /// Horizontal bar spinning about +y. Signed speed, magnitude in
    /// [0.2, 1.2).
    Spinner { speed: f32 },
    /// Bar bobbing vertically on a sine wave.
    Limbo { phase_offset: f32 },
    /// Blade sweeping laterally on a sine wave.
    Axe { phase_offset: f32 },
    End,
}

impl Archetype {
    /// Limbo bar rest height above the segment base.
    const LIMBO_BASE_HEIGHT: f32 = 1.15;
    /// Axe blade height above the segment base.
    const AXE_HEIGHT: f32 = 0.75;

    /// Short name for snapshots and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Archetype::Start => "start",
            Archetype::Spinner { .. } => "spinner",
            Archetype::Limbo { .. } => "limbo",
            Archetype::Axe { .. } => "axe",
            Archetype::End => "end",
        }
    }

    /// Whether this segment hosts a moving kinematic obstacle.
    pub fn is_moving(&self) -> bool {
        !matches!(self, Archetype::Start | Archetype::End)
    }

    /// Spawn translation of the obstacle body relative to the world, given
    /// the segment base position.
    pub fn spawn_translation(&self, base: &Vector3<f32>) -> Option<Vector3<f32>> {
        match self {
            Archetype::Spinner { .. } => Some(base + Vector3::new(0.0, 0.3, 0.0)),
            Archetype::Limbo { .. } | Archetype::Axe { .. } => {
                Some(base + Vector3::new(0.0, 0.5, 0.0))
            }
            Archetype::Start | Archetype::End => None,
        }
    }

    /// Collider half extents of the obstacle body.
    pub fn collider_half_extents(&self) -> Option<Vector3<f32>> {
        match self {
            // 3.5 x 0.3 x 0.3 bar
            Archetype::Spinner { .. } | Archetype::Limbo { .. } => {
                Some(Vector3::new(1.75, 0.15, 0.15))
            }
            // 1.5 x 1.5 x 0.3 blade
            Archetype::Axe { .. } => Some(Vector3::new(0.75, 0.75, 0.15)),
            Archetype::Start | Archetype::End => None,
        }
    }

    /// Kinematic pose target at `elapsed` seconds. Stateless: the same
    /// inputs always produce the same target. Returns `None` for the
    /// non-moving bookend segments.
    pub fn kinematic_target(
        &self,
        elapsed: f32,
        base: &Vector3<f32>,
    ) -> Option<KinematicTarget> {
        match *self {
            Archetype::Spinner { speed } => Some(KinematicTarget::Rotation(
                UnitQuaternion::from_axis_angle(&Vector3::y_axis(), elapsed * speed),
            )),
            Archetype::Limbo { phase_offset } => {
                Some(KinematicTarget::Translation(Vector3::new(
                    base.x,
                    base.y + (elapsed + phase_offset).sin() + Self::LIMBO_BASE_HEIGHT,
                    base.z,
                )))
            }
            Archetype::Axe { phase_offset } => {
                Some(KinematicTarget::Translation(Vector3::new(
                    base.x + (elapsed + phase_offset).sin(),
                    base.y + Self::AXE_HEIGHT,
                    base.z,
                )))
            }
            Archetype::Start | Archetype::End => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spinner_yaw_tracks_elapsed_time() {
        let spinner = Archetype::Spinner { speed: 0.5 };
        let base = Vector3::zeros();

        let target = spinner.kinematic_target(2.0, &base).unwrap();
        let KinematicTarget::Rotation(rotation) = target else {
            panic!("spinner must command a rotation");
        };
        let expected = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 1.0);
        assert!(rotation.angle_to(&expected) < 1e-5);
    }

    #[test]
    fn limbo_bobs_within_one_unit_of_rest_height() {
        let limbo = Archetype::Limbo { phase_offset: 0.7 };
        let base = Vector3::new(0.0, 0.0, -8.0);

        for i in 0..100 {
            let elapsed = i as f32 * 0.13;
            let Some(KinematicTarget::Translation(pos)) =
                limbo.kinematic_target(elapsed, &base)
            else {
                panic!("limbo must command a translation");
            };
            assert!(pos.y >= 0.15 - 1e-5 && pos.y <= 2.15 + 1e-5, "y = {}", pos.y);
            assert_eq!(pos.x, 0.0);
            assert_eq!(pos.z, -8.0);
        }
    }

    #[test]
    fn axe_sweeps_laterally_at_fixed_height() {
        let axe = Archetype::Axe { phase_offset: 0.0 };
        let base = Vector3::new(0.0, 0.0, -12.0);

        let Some(KinematicTarget::Translation(pos)) =
            axe.kinematic_target(std::f32::consts::FRAC_PI_2, &base)
        else {
            panic!("axe must command a translation");
        };
        assert!((pos.x - 1.0).abs() < 1e-5);
        assert_eq!(pos.y, 0.75);
        assert_eq!(pos.z, -12.0);
    }

    #[test]
    fn bookends_have_no_motion() {
        let base = Vector3::zeros();
        assert_eq!(Archetype::Start.kinematic_target(1.0, &base), None);
        assert_eq!(Archetype::End.kinematic_target(1.0, &base), None);
        assert!(!Archetype::Start.is_moving());
        assert!(!Archetype::End.is_moving());
    }

    #[test]
    fn spinner_speed_sampling_stays_in_range() {
        for _ in 0..200 {
            let Archetype::Spinner { speed } = ArchetypeKind::Spinner.spawn() else {
                panic!("spawn must preserve the kind");
            };
            let magnitude = speed.abs();
            assert!((0.2..1.2).contains(&magnitude), "speed = {speed}");
        }
    }

    #[test]
    fn phase_offset_sampling_stays_in_range() {
        for _ in 0..200 {
            let Archetype::Limbo { phase_offset } = ArchetypeKind::Limbo.spawn() else {
                panic!("spawn must preserve the kind");
            };
            assert!((0.0..TAU).contains(&phase_offset));
        }
    }
}
