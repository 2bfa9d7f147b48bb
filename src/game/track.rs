//! Track - procedural course assembly
//!
//! Builds the ordered segment sequence (start block, randomly assigned
//! obstacle blocks, end block), the boundary walls scaled to the track
//! length, and the physics bodies backing all of it. Tracks are generated
//! as a batch and replaced wholesale on regeneration; segments are never
//! mutated in place.

use rand::Rng;
use rapier3d::na::Vector3;
use rapier3d::prelude::RigidBodyHandle;

use crate::error::GameError;
use crate::game::obstacle::{Archetype, ArchetypeKind, KinematicTarget};
use crate::game::physics::PhysicsWorld;

/// Distance between consecutive segment centers.
pub const SEGMENT_SPACING: f32 = 4.0;

/// One track unit.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Ordinal along the track; 0 is the start block.
    pub index: usize,
    /// Behavior variant with per-instance motion parameters baked in.
    pub archetype: Archetype,
    /// Segment base position; `z = -(index) * 4`.
    pub position: Vector3<f32>,
    /// Kinematic obstacle body, present only for moving archetypes after
    /// `build`.
    pub body: Option<RigidBodyHandle>,
}

/// An assembled course: bookended segment sequence plus boundary geometry.
#[derive(Debug)]
pub struct Track {
    pub segments: Vec<Segment>,
    obstacle_count: u32,
    static_body: Option<RigidBodyHandle>,
}

impl Track {
    /// Wall thickness (half extent).
    const WALL_HALF_THICKNESS: f32 = 0.15;
    /// Wall half height.
    const WALL_HALF_HEIGHT: f32 = 0.75;
    /// Lateral wall offset from the track center line.
    const WALL_X: f32 = 2.15;
    /// Floor half extents per segment.
    const FLOOR_HALF: [f32; 3] = [2.0, 0.1, 2.0];

    /// Assemble a new track: `count` obstacle segments, each independently
    /// sampled uniformly from `kinds`, between the fixed start and end
    /// blocks. Sampling is deliberately unseeded; two calls with identical
    /// arguments differ in archetype choice and motion phases.
    pub fn generate(count: u32, kinds: &[ArchetypeKind]) -> Result<Track, GameError> {
        if kinds.is_empty() {
            return Err(GameError::EmptyArchetypeSet);
        }

        let mut rng = rand::thread_rng();
        let mut segments = Vec::with_capacity(count as usize + 2);

        segments.push(Segment {
            index: 0,
            archetype: Archetype::Start,
            position: Vector3::zeros(),
            body: None,
        });

        for i in 0..count as usize {
            let kind = kinds[rng.gen_range(0..kinds.len())];
            let index = i + 1;
            segments.push(Segment {
                index,
                archetype: kind.spawn(),
                position: Vector3::new(0.0, 0.0, -(index as f32) * SEGMENT_SPACING),
                body: None,
            });
        }

        let end_index = count as usize + 1;
        segments.push(Segment {
            index: end_index,
            archetype: Archetype::End,
            position: Vector3::new(0.0, 0.0, -(end_index as f32) * SEGMENT_SPACING),
            body: None,
        });

        Ok(Track {
            segments,
            obstacle_count: count,
            static_body: None,
        })
    }

    /// Number of obstacle segments between the bookends.
    pub fn obstacle_count(&self) -> u32 {
        self.obstacle_count
    }

    /// Boundary wall extent, in segments. Monotonic in the obstacle count.
    pub fn bounds_length(&self) -> f32 {
        (self.obstacle_count + 2) as f32
    }

    /// Crossing this z plane completes the run.
    pub fn finish_line_z(&self) -> f32 {
        -(self.obstacle_count as f32 * SEGMENT_SPACING + 2.0)
    }

    /// Insert the track's physics bodies: one fixed body anchoring floors,
    /// walls, and the end marker, plus one kinematic body per moving
    /// obstacle.
    pub fn build(&mut self, world: &mut PhysicsWorld) {
        let anchor = world.insert_fixed_body();
        self.static_body = Some(anchor);

        for segment in &mut self.segments {
            if segment.archetype.is_moving() {
                // Per-block floor under each obstacle.
                world.attach_cuboid(
                    anchor,
                    Vector3::from(Self::FLOOR_HALF),
                    segment.position + Vector3::new(0.0, -0.1, 0.0),
                    0.0,
                    None,
                );
            }

            if let (Some(translation), Some(half_extents)) = (
                segment.archetype.spawn_translation(&segment.position),
                segment.archetype.collider_half_extents(),
            ) {
                segment.body =
                    Some(world.insert_kinematic_cuboid(translation, half_extents, 0.2, 0.0));
            }

            if segment.archetype == Archetype::End {
                // Static decorative collider marking the finish.
                world.attach_cylinder(
                    anchor,
                    0.25,
                    0.5,
                    segment.position + Vector3::new(0.0, 0.25, 0.0),
                    0.2,
                );
            }
        }

        let length = self.bounds_length();
        let mid_z = -(length * 2.0) + 2.0;

        // Side walls.
        for x in [Self::WALL_X, -Self::WALL_X] {
            world.attach_cuboid(
                anchor,
                Vector3::new(Self::WALL_HALF_THICKNESS, Self::WALL_HALF_HEIGHT, length * 2.0),
                Vector3::new(x, Self::WALL_HALF_HEIGHT, mid_z),
                0.2,
                Some(0.0),
            );
        }

        // End wall behind the finish block.
        world.attach_cuboid(
            anchor,
            Vector3::new(2.0, Self::WALL_HALF_HEIGHT, Self::WALL_HALF_THICKNESS),
            Vector3::new(0.0, Self::WALL_HALF_HEIGHT, -(length * SEGMENT_SPACING) + 2.0),
            0.2,
            Some(0.0),
        );

        // Full-length floor spanning start to end.
        world.attach_cuboid(
            anchor,
            Vector3::new(2.0, 0.1, length * 2.0),
            Vector3::new(0.0, -0.1, mid_z),
            0.0,
            Some(1.0),
        );
    }

    /// Remove every body this track inserted. The segment batch is dead
    /// after this; regeneration constructs a fresh `Track`.
    pub fn teardown(&mut self, world: &mut PhysicsWorld) {
        for segment in &mut self.segments {
            if let Some(body) = segment.body.take() {
                world.remove_body(body);
            }
        }
        if let Some(anchor) = self.static_body.take() {
            world.remove_body(anchor);
        }
    }

    /// Write this tick's kinematic pose target for every moving obstacle.
    /// Must run once per tick regardless of player state.
    pub fn update_obstacles(&self, world: &mut PhysicsWorld, elapsed: f32) {
        for segment in &self.segments {
            let Some(handle) = segment.body else { continue };
            let Some(target) = segment
                .archetype
                .kinematic_target(elapsed, &segment.position)
            else {
                continue;
            };
            let Some(body) = world.body_mut(handle) else { continue };
            match target {
                KinematicTarget::Rotation(rotation) => body.set_next_kinematic_rotation(rotation),
                KinematicTarget::Translation(translation) => {
                    body.set_next_kinematic_translation(translation)
                }
            }
        }
    }
}
