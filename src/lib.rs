//! Marble Run - obstacle-course runner core
//!
//! A procedurally assembled sequence of physics-driven hazard segments
//! that a player-controlled ball traverses by steering and jumping inside
//! a timed run. The crate owns track assembly, kinematic obstacle motion,
//! the impulse-based player controller, the chase camera, and the
//! run-phase state machine; a host supplies input and renders the
//! serde-serializable snapshots polled each tick. Rigid-body simulation is
//! delegated to rapier3d through a thin world wrapper.

pub mod error;
pub mod game;

pub use error::GameError;
pub use game::{
    Archetype, ArchetypeKind, CameraRig, CourseConfig, CourseSnapshot, GameServer, GameSession,
    InputState, KinematicTarget, ListenerHandle, PhaseChange, PhysicsWorld, PlayerController,
    RunPhase, Segment, ServerStats, Track,
};
