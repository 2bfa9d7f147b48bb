//! Player - impulse-driven ball controller
//!
//! Owns the handle to the single dynamic body under player control.
//! Directional input becomes impulses plus torques coupled so the ball
//! rolls in the direction it moves; jumping is gated by a downward ray
//! cast against the physics world.

use rapier3d::na::{Point3, Vector3};
use rapier3d::prelude::RigidBodyHandle;
use serde::{Deserialize, Serialize};

use crate::game::physics::PhysicsWorld;

/// Directional input for one tick, sampled by the host.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub leftward: bool,
    pub rightward: bool,
    pub jump: bool,
}

impl InputState {
    /// Any activity at all; used to arm the run timer.
    pub fn any(&self) -> bool {
        self.forward || self.backward || self.leftward || self.rightward || self.jump
    }
}

/// The player's rolling-ball controller.
pub struct PlayerController {
    body: RigidBodyHandle,
    /// Last tick's jump key state, for edge triggering.
    jump_held: bool,
}

impl PlayerController {
    /// Falling below this y fails the run.
    pub const FALL_LIMIT_Y: f32 = -4.0;

    /// Ball collider radius.
    const RADIUS: f32 = 0.4;
    const RESTITUTION: f32 = 0.2;
    /// Impulse per second of held directional input.
    const IMPULSE_STRENGTH: f32 = 0.6;
    /// Torque per second of held directional input.
    const TORQUE_STRENGTH: f32 = 0.2;
    /// Upward impulse applied on a grounded jump.
    const JUMP_IMPULSE_Y: f32 = 1.0;
    /// Ray origin offset below the body center, near the ball's surface.
    const RAY_MARGIN: f32 = 0.31;
    /// Maximum time of impact that still counts as grounded.
    const GROUND_TOI: f32 = 0.15;
    /// Ray length; anything farther is treated as no ground at all.
    const RAY_MAX_TOI: f32 = 4.0;

    /// Spawn point after reset.
    pub fn spawn_point() -> Vector3<f32> {
        Vector3::new(0.0, 1.0, 0.0)
    }

    /// Insert the player body at the spawn point.
    pub fn spawn(world: &mut PhysicsWorld) -> Self {
        let body = world.insert_dynamic_ball(Self::spawn_point(), Self::RADIUS, Self::RESTITUTION);
        Self {
            body,
            jump_held: false,
        }
    }

    pub fn body_handle(&self) -> RigidBodyHandle {
        self.body
    }

    /// Translate this tick's input into impulses on the body. A jump key
    /// press (edge, not hold) attempts a ground-gated jump first; held
    /// directional keys then become an impulse and a rolling torque scaled
    /// by `dt`.
    ///
    /// A missing body is a benign no-op.
    pub fn apply_input(&mut self, world: &mut PhysicsWorld, input: &InputState, dt: f32) {
        if input.jump && !self.jump_held {
            self.try_jump(world);
        }
        self.jump_held = input.jump;

        let impulse_strength = Self::IMPULSE_STRENGTH * dt;
        let torque_strength = Self::TORQUE_STRENGTH * dt;

        let mut impulse = Vector3::zeros();
        let mut torque = Vector3::zeros();

        if input.forward {
            impulse.z -= impulse_strength;
            torque.x -= torque_strength;
        }
        if input.backward {
            impulse.z += impulse_strength;
            torque.x += torque_strength;
        }
        if input.leftward {
            impulse.x -= impulse_strength;
            torque.z += torque_strength;
        }
        if input.rightward {
            impulse.x += impulse_strength;
            torque.z -= torque_strength;
        }

        if let Some(body) = world.body_mut(self.body) {
            body.apply_impulse(impulse, true);
            body.apply_torque_impulse(torque, true);
        }
    }

    /// Jump if the ground is close enough below. The ray starts just under
    /// the ball surface and ignores the player's own collider; no hit, or a
    /// hit farther than the threshold, silently drops the request (no air
    /// jumps).
    fn try_jump(&mut self, world: &mut PhysicsWorld) {
        let Some(body) = world.body(self.body) else { return };
        let translation = *body.translation();
        let origin = Point3::new(
            translation.x,
            translation.y - Self::RAY_MARGIN,
            translation.z,
        );

        let grounded = world
            .cast_ray_down(origin, Self::RAY_MAX_TOI, self.body)
            .is_some_and(|toi| toi < Self::GROUND_TOI);

        if grounded {
            if let Some(body) = world.body_mut(self.body) {
                body.apply_impulse(Vector3::new(0.0, Self::JUMP_IMPULSE_Y, 0.0), true);
            }
        }
    }

    /// Current world position, `None` while the body is unavailable.
    pub fn position(&self, world: &PhysicsWorld) -> Option<Vector3<f32>> {
        world.body(self.body).map(|body| *body.translation())
    }

    /// Overwrite the pose back to the spawn point and zero both velocities.
    /// Runs on entry into the Ready phase, before a new run can start, so
    /// no residual motion carries over.
    pub fn reset(&mut self, world: &mut PhysicsWorld) {
        self.jump_held = false;
        if let Some(body) = world.body_mut(self.body) {
            body.set_translation(Self::spawn_point(), true);
            body.set_linvel(Vector3::zeros(), true);
            body.set_angvel(Vector3::zeros(), true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// World with a floor whose top face is at y = 0.
    fn world_with_floor() -> PhysicsWorld {
        let mut world = PhysicsWorld::new();
        let floor = world.insert_fixed_body();
        world.attach_cuboid(
            floor,
            Vector3::new(10.0, 0.1, 10.0),
            Vector3::new(0.0, -0.1, 0.0),
            0.0,
            Some(1.0),
        );
        world
    }

    fn place(world: &mut PhysicsWorld, player: &PlayerController, y: f32) {
        let body = world.body_mut(player.body_handle()).unwrap();
        body.set_translation(Vector3::new(0.0, y, 0.0), true);
        body.set_linvel(Vector3::zeros(), true);
    }

    fn linvel_y(world: &PhysicsWorld, player: &PlayerController) -> f32 {
        world.body(player.body_handle()).unwrap().linvel().y
    }

    #[test]
    fn jump_applies_when_ground_is_within_threshold() {
        let mut world = world_with_floor();
        let mut player = PlayerController::spawn(&mut world);
        // Ray origin at 0.41 - 0.31 = 0.10 above the floor: grounded.
        place(&mut world, &player, 0.41);

        player.try_jump(&mut world);
        assert!(linvel_y(&world, &player) > 0.0);
    }

    #[test]
    fn jump_denied_when_ground_is_too_far() {
        let mut world = world_with_floor();
        let mut player = PlayerController::spawn(&mut world);
        // Ray origin 0.20 above the floor: just past the 0.15 threshold.
        place(&mut world, &player, 0.51);

        player.try_jump(&mut world);
        assert_eq!(linvel_y(&world, &player), 0.0);
    }

    #[test]
    fn jump_denied_when_nothing_is_below() {
        let mut world = PhysicsWorld::new();
        let mut player = PlayerController::spawn(&mut world);
        place(&mut world, &player, 0.44);

        player.try_jump(&mut world);
        assert_eq!(linvel_y(&world, &player), 0.0);
    }

    #[test]
    fn held_jump_key_fires_only_once() {
        let mut world = world_with_floor();
        let mut player = PlayerController::spawn(&mut world);
        place(&mut world, &player, 0.44);

        let input = InputState {
            jump: true,
            ..InputState::default()
        };
        player.apply_input(&mut world, &input, 1.0 / 60.0);
        let after_first = linvel_y(&world, &player);
        assert!(after_first > 0.0);

        // Still held, still grounded: no second impulse.
        player.apply_input(&mut world, &input, 1.0 / 60.0);
        assert_eq!(linvel_y(&world, &player), after_first);
    }

    #[test]
    fn forward_input_pushes_negative_z_and_rolls() {
        let mut world = world_with_floor();
        let mut player = PlayerController::spawn(&mut world);

        let input = InputState {
            forward: true,
            ..InputState::default()
        };
        player.apply_input(&mut world, &input, 1.0 / 60.0);

        let body = world.body(player.body_handle()).unwrap();
        assert!(body.linvel().z < 0.0);
        assert!(body.angvel().x < 0.0);
    }

    #[test]
    fn reset_returns_to_spawn_with_zero_velocity() {
        let mut world = world_with_floor();
        let mut player = PlayerController::spawn(&mut world);

        let input = InputState {
            forward: true,
            rightward: true,
            ..InputState::default()
        };
        for _ in 0..30 {
            player.apply_input(&mut world, &input, 1.0 / 60.0);
            world.step(1.0 / 60.0);
        }

        player.reset(&mut world);
        let body = world.body(player.body_handle()).unwrap();
        assert_eq!(*body.translation(), PlayerController::spawn_point());
        assert_eq!(*body.linvel(), Vector3::zeros());
        assert_eq!(*body.angvel(), Vector3::zeros());
    }
}
