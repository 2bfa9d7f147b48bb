//! Game Core Module
//!
//! Everything that simulates one obstacle-course run: the physics world
//! wrapper, the archetype library, the track generator, the player and
//! camera controllers, the phase machine, and the session/server that tie
//! them together once per tick.

pub mod camera;
pub mod obstacle;
pub mod phase;
pub mod physics;
pub mod player;
pub mod session;
pub mod simulation;
pub mod track;

pub use camera::{CameraRig, CameraSnapshot};
pub use obstacle::{Archetype, ArchetypeKind, KinematicTarget};
pub use phase::{ListenerHandle, PhaseChange, RunPhase};
pub use physics::PhysicsWorld;
pub use player::{InputState, PlayerController};
pub use session::{BodySnapshot, CourseConfig, CourseSnapshot, GameSession, SegmentSnapshot};
pub use simulation::{GameServer, ServerStats};
pub use track::{Segment, Track};
