//! Session - one live course and its tick orchestration
//!
//! Owns the physics world, the track, the player, the camera rig, and the
//! phase machine, and runs them in a fixed order every tick: input, player
//! impulses, kinematic obstacle targets, physics step, position read-back,
//! boundary checks, camera smoothing. Provides compact snapshots for the
//! presentation layer.

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::game::camera::{CameraRig, CameraSnapshot};
use crate::game::obstacle::ArchetypeKind;
use crate::game::phase::{ListenerHandle, PhaseChange, PhaseMachine, RunPhase};
use crate::game::physics::PhysicsWorld;
use crate::game::player::{InputState, PlayerController};
use crate::game::track::Track;

/// Course configuration, supplied by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseConfig {
    /// Obstacle segments between the start and end blocks.
    pub segment_count: u32,
    /// Kinds eligible for random slot assignment; must not be empty.
    pub archetypes: Vec<ArchetypeKind>,
    /// Opaque regeneration trigger. A changed value requests a rebuild; it
    /// does not seed the sampling.
    pub trigger: u64,
}

impl Default for CourseConfig {
    fn default() -> Self {
        Self {
            segment_count: 5,
            archetypes: ArchetypeKind::ALL.to_vec(),
            trigger: 0,
        }
    }
}

/// A complete session: world, track, player, camera, phase.
pub struct GameSession {
    config: CourseConfig,
    world: PhysicsWorld,
    track: Track,
    player: PlayerController,
    camera: CameraRig,
    phase: PhaseMachine,
    /// Session clock in seconds, advanced once per tick.
    clock: f64,
}

impl GameSession {
    /// Build the world, the initial track, and the player. Starts in
    /// Ready. Fails only on a configuration contract violation.
    pub fn new(config: CourseConfig) -> Result<Self, GameError> {
        let mut world = PhysicsWorld::new();
        let mut track = Track::generate(config.segment_count, &config.archetypes)?;
        track.build(&mut world);
        let player = PlayerController::spawn(&mut world);

        log::info!(
            "course ready: {} obstacle segments, {} archetype kinds",
            config.segment_count,
            config.archetypes.len()
        );

        Ok(Self {
            config,
            world,
            track,
            player,
            camera: CameraRig::new(),
            phase: PhaseMachine::new(),
            clock: 0.0,
        })
    }

    /// Advance the session by one tick of `dt` seconds.
    pub fn update(&mut self, input: &InputState, dt: f32) {
        self.clock += f64::from(dt);

        // Any activity arms the run; the machine ignores it outside Ready.
        if input.any() {
            self.phase.start(self.clock);
        }

        self.player.apply_input(&mut self.world, input, dt);
        self.track.update_obstacles(&mut self.world, self.clock as f32);
        self.world.step(dt);

        // Player-dependent work is skipped while the body is unavailable.
        let Some(position) = self.player.position(&self.world) else {
            return;
        };

        if position.z < self.track.finish_line_z() && self.phase.finish(self.clock) {
            log::info!("run completed in {:.2}s", self.phase.elapsed(self.clock));
        }
        if position.y < PlayerController::FALL_LIMIT_Y {
            log::info!("player fell at z {:.2}, restarting", position.z);
            self.enter_ready();
        }

        self.camera.follow(&position);
    }

    /// Explicit restart request from the presentation layer. Honored while
    /// Playing or Ended; ignored otherwise.
    pub fn request_restart(&mut self) -> bool {
        if !matches!(self.phase.phase(), RunPhase::Playing | RunPhase::Ended) {
            return false;
        }
        self.enter_ready();
        true
    }

    /// Tear down the current segment batch and build a fresh one. The
    /// obstacle assignment and motion phases are re-rolled; everything else
    /// is unchanged.
    pub fn regenerate_track(&mut self) {
        self.track.teardown(&mut self.world);
        // The archetype set was validated at construction, so this cannot
        // fail; keep the old (now bodyless) track on the off chance it does.
        match Track::generate(self.config.segment_count, &self.config.archetypes) {
            Ok(mut track) => {
                track.build(&mut self.world);
                self.track = track;
                log::info!(
                    "track regenerated: {} segments",
                    self.track.segments.len()
                );
            }
            Err(err) => log::error!("track regeneration failed: {err}"),
        }
    }

    /// Enter Ready: reset the player before Playing can resume, and
    /// present a fresh obstacle sequence.
    fn enter_ready(&mut self) {
        self.phase.reset(self.clock);
        self.player.reset(&mut self.world);
        self.regenerate_track();
    }

    pub fn phase(&self) -> RunPhase {
        self.phase.phase()
    }

    pub fn start_time(&self) -> f64 {
        self.phase.start_time()
    }

    pub fn end_time(&self) -> f64 {
        self.phase.end_time()
    }

    /// Elapsed run time in seconds at the current clock.
    pub fn elapsed_seconds(&self) -> f64 {
        self.phase.elapsed(self.clock)
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    /// Direct world access for hosts that need to query or stage bodies.
    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    /// Register a phase-transition listener for the session's lifetime.
    pub fn subscribe_phase(
        &mut self,
        listener: Box<dyn FnMut(&PhaseChange) + Send>,
    ) -> ListenerHandle {
        self.phase.subscribe(listener)
    }

    /// Deregister a phase-transition listener.
    pub fn unsubscribe_phase(&mut self, handle: ListenerHandle) -> bool {
        self.phase.unsubscribe(handle)
    }

    /// Compact state for the presentation layer.
    pub fn snapshot(&self) -> CourseSnapshot {
        let player = self.world.body(self.player.body_handle()).map(|body| {
            let t = body.translation();
            let q = body.rotation().coords;
            BodySnapshot {
                position: [t.x, t.y, t.z],
                rotation: [q.x, q.y, q.z, q.w],
            }
        });

        let segments = self
            .track
            .segments
            .iter()
            .map(|segment| {
                let obstacle = segment
                    .body
                    .and_then(|handle| self.world.body(handle))
                    .map(|body| {
                        let t = body.translation();
                        let q = body.rotation().coords;
                        BodySnapshot {
                            position: [t.x, t.y, t.z],
                            rotation: [q.x, q.y, q.z, q.w],
                        }
                    });
                SegmentSnapshot {
                    index: segment.index,
                    kind: segment.archetype.name(),
                    base_position: [
                        segment.position.x,
                        segment.position.y,
                        segment.position.z,
                    ],
                    obstacle,
                }
            })
            .collect();

        CourseSnapshot {
            phase: self.phase.phase(),
            elapsed_seconds: round_centis(self.elapsed_seconds()),
            player,
            camera: self.camera.snapshot(),
            segments,
        }
    }
}

/// Two-decimal rounding for the timer display contract.
fn round_centis(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}

/// A rigid body pose for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct BodySnapshot {
    pub position: [f32; 3],
    /// Quaternion, xyzw.
    pub rotation: [f32; 4],
}

/// One segment as the renderer should draw it.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentSnapshot {
    pub index: usize,
    pub kind: &'static str,
    pub base_position: [f32; 3],
    /// Current kinematic obstacle pose; absent for the bookend segments.
    pub obstacle: Option<BodySnapshot>,
}

/// Complete per-tick state for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct CourseSnapshot {
    pub phase: RunPhase,
    /// Elapsed run time, rounded to two decimals.
    pub elapsed_seconds: f64,
    pub player: Option<BodySnapshot>,
    pub camera: CameraSnapshot,
    pub segments: Vec<SegmentSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn session(count: u32) -> GameSession {
        GameSession::new(CourseConfig {
            segment_count: count,
            ..CourseConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn idle_ticks_stay_ready() {
        let mut session = session(3);
        for _ in 0..10 {
            session.update(&InputState::default(), DT);
        }
        assert_eq!(session.phase(), RunPhase::Ready);
        assert_eq!(session.elapsed_seconds(), 0.0);
    }

    #[test]
    fn input_activity_starts_the_run() {
        let mut session = session(3);
        let input = InputState {
            forward: true,
            ..InputState::default()
        };
        session.update(&input, DT);
        assert_eq!(session.phase(), RunPhase::Playing);
        assert!(session.start_time() > 0.0);
    }

    #[test]
    fn clock_accumulates_tick_deltas() {
        let mut session = session(1);
        for _ in 0..60 {
            session.update(&InputState::default(), DT);
        }
        assert!((session.clock() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn restart_is_ignored_while_ready() {
        let mut session = session(2);
        assert!(!session.request_restart());
        assert_eq!(session.phase(), RunPhase::Ready);
    }

    #[test]
    fn snapshot_reflects_track_layout() {
        let session = session(3);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.segments.len(), 5);
        assert_eq!(snapshot.segments[0].kind, "start");
        assert_eq!(snapshot.segments[4].kind, "end");
        assert_eq!(snapshot.segments[2].base_position[2], -8.0);
        assert!(snapshot.player.is_some());

        // Snapshots are the host-facing wire format.
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"phase\":\"ready\""));
    }

    #[test]
    fn elapsed_rounds_to_two_decimals() {
        assert_eq!(round_centis(1.23456), 1.23);
        assert_eq!(round_centis(0.005), 0.01);
    }
}
