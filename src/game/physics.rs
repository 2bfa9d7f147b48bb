//! Physics - rapier3d world wrapper
//!
//! Holds every rapier set and pipeline object in one place;
//! `PhysicsPipeline::step()` needs mutable access to all of them at once.
//! The rest of the crate talks to rapier exclusively through this wrapper:
//! body insertion/removal, impulses, kinematic pose targets, and ray casts.

use rapier3d::prelude::*;

/// Downward gravity matching the reference world.
const GRAVITY_Y: f32 = -9.81;

/// All rapier state for one game session.
pub struct PhysicsWorld {
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    integration_parameters: IntegrationParameters,
    gravity: Vector<Real>,
}

impl PhysicsWorld {
    /// Create an empty world with default gravity.
    pub fn new() -> Self {
        Self {
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            integration_parameters: IntegrationParameters::default(),
            gravity: vector![0.0, GRAVITY_Y, 0.0],
        }
    }

    /// Advance the simulation by one tick of `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Insert a fixed body at the world origin. Colliders carry their own
    /// offsets, so one fixed body can anchor all static track geometry.
    pub fn insert_fixed_body(&mut self) -> RigidBodyHandle {
        self.bodies.insert(RigidBodyBuilder::fixed().build())
    }

    /// Attach a cuboid collider (half extents) to an existing body.
    pub fn attach_cuboid(
        &mut self,
        body: RigidBodyHandle,
        half_extents: Vector<Real>,
        offset: Vector<Real>,
        restitution: f32,
        friction: Option<f32>,
    ) {
        let mut builder = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(offset)
            .restitution(restitution);
        if let Some(friction) = friction {
            builder = builder.friction(friction);
        }
        self.colliders
            .insert_with_parent(builder.build(), body, &mut self.bodies);
    }

    /// Attach an upright cylinder collider to an existing body.
    pub fn attach_cylinder(
        &mut self,
        body: RigidBodyHandle,
        half_height: f32,
        radius: f32,
        offset: Vector<Real>,
        restitution: f32,
    ) {
        let collider = ColliderBuilder::cylinder(half_height, radius)
            .translation(offset)
            .restitution(restitution)
            .build();
        self.colliders
            .insert_with_parent(collider, body, &mut self.bodies);
    }

    /// Insert a kinematic position-based body with a single cuboid collider.
    /// Kinematic bodies ignore forces; they follow `set_next_kinematic_*`
    /// pose targets written each tick.
    pub fn insert_kinematic_cuboid(
        &mut self,
        translation: Vector<Real>,
        half_extents: Vector<Real>,
        restitution: f32,
        friction: f32,
    ) -> RigidBodyHandle {
        let body = self.bodies.insert(
            RigidBodyBuilder::kinematic_position_based()
                .translation(translation)
                .build(),
        );
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .restitution(restitution)
            .friction(friction)
            .build();
        self.colliders
            .insert_with_parent(collider, body, &mut self.bodies);
        body
    }

    /// Insert a dynamic ball body (the player).
    pub fn insert_dynamic_ball(
        &mut self,
        translation: Vector<Real>,
        radius: f32,
        restitution: f32,
    ) -> RigidBodyHandle {
        let body = self
            .bodies
            .insert(RigidBodyBuilder::dynamic().translation(translation).build());
        let collider = ColliderBuilder::ball(radius).restitution(restitution).build();
        self.colliders
            .insert_with_parent(collider, body, &mut self.bodies);
        body
    }

    /// Remove a body and every collider attached to it.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    pub fn body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    pub fn body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    /// Cast a ray straight down from `origin`, ignoring `exclude` (the
    /// caster's own body). Returns the first hit's time of impact, or `None`
    /// when nothing is below within `max_toi`.
    pub fn cast_ray_down(
        &mut self,
        origin: Point<Real>,
        max_toi: f32,
        exclude: RigidBodyHandle,
    ) -> Option<f32> {
        self.query_pipeline.update(&self.bodies, &self.colliders);
        let ray = Ray::new(origin, vector![0.0, -1.0, 0.0]);
        let filter = QueryFilter::default().exclude_rigid_body(exclude);
        self.query_pipeline
            .cast_ray(&self.bodies, &self.colliders, &ray, max_toi, true, filter)
            .map(|(_, toi)| toi)
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
