//! Simulation - real-time server wrapper
//!
//! Drives a [`GameSession`] from wall-clock time, one tick per rendered
//! frame, and tracks tick timing for diagnostics. The host calls `tick`
//! with the frame's input; everything else is polled through snapshots.

use std::time::Instant;

use serde::Serialize;

use crate::error::GameError;
use crate::game::phase::RunPhase;
use crate::game::player::InputState;
use crate::game::session::{CourseConfig, CourseSnapshot, GameSession};

/// Server statistics for diagnostics overlays.
#[derive(Debug, Clone, Serialize)]
pub struct ServerStats {
    pub avg_tick_time_ms: f32,
    pub segment_count: u32,
    pub phase: RunPhase,
}

/// Owns at most one session and the wall clock that drives it.
pub struct GameServer {
    session: Option<GameSession>,
    /// Last tick timestamp.
    last_tick: Instant,
    /// Accumulated tick times for averaging.
    tick_times: Vec<f32>,
    /// Last seen regeneration trigger value.
    trigger: u64,
}

impl GameServer {
    /// Create an idle server with no session.
    pub fn new() -> Self {
        Self {
            session: None,
            last_tick: Instant::now(),
            tick_times: Vec::with_capacity(60),
            trigger: 0,
        }
    }

    /// Build a session for the given course. Replaces any existing one.
    pub fn init_course(&mut self, config: CourseConfig) -> Result<(), GameError> {
        self.trigger = config.trigger;
        let segment_count = config.segment_count;
        self.session = Some(GameSession::new(config)?);
        self.last_tick = Instant::now();
        log::info!("course initialized with {segment_count} obstacle segments");
        Ok(())
    }

    /// Perform one simulation tick with this frame's input. A missing
    /// session is a benign no-op.
    pub fn tick(&mut self, input: &InputState) -> Option<CourseSnapshot> {
        let session = self.session.as_mut()?;

        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;

        let tick_start = Instant::now();
        session.update(input, delta);
        let tick_time = tick_start.elapsed().as_secs_f32() * 1000.0;

        self.tick_times.push(tick_time);
        if self.tick_times.len() > 60 {
            self.tick_times.remove(0);
        }

        Some(session.snapshot())
    }

    /// Forward an explicit restart request from the presentation layer.
    pub fn request_restart(&mut self) -> bool {
        match self.session.as_mut() {
            Some(session) => {
                let restarted = session.request_restart();
                if restarted {
                    log::info!("restart requested");
                }
                restarted
            }
            None => false,
        }
    }

    /// A changed trigger value requests a track rebuild. The value is
    /// opaque; it does not seed the sampling.
    pub fn set_regeneration_trigger(&mut self, value: u64) -> bool {
        if value == self.trigger {
            return false;
        }
        self.trigger = value;
        if let Some(session) = self.session.as_mut() {
            session.regenerate_track();
            return true;
        }
        false
    }

    /// Current snapshot without advancing the simulation.
    pub fn snapshot(&self) -> Option<CourseSnapshot> {
        self.session.as_ref().map(GameSession::snapshot)
    }

    /// Current phase; Idle while no session exists.
    pub fn phase(&self) -> RunPhase {
        self.session
            .as_ref()
            .map_or(RunPhase::Idle, GameSession::phase)
    }

    pub fn stats(&self) -> ServerStats {
        let avg_tick_time = if self.tick_times.is_empty() {
            0.0
        } else {
            self.tick_times.iter().sum::<f32>() / self.tick_times.len() as f32
        };

        ServerStats {
            avg_tick_time_ms: avg_tick_time,
            segment_count: self
                .session
                .as_ref()
                .map_or(0, |s| s.track().obstacle_count()),
            phase: self.phase(),
        }
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut GameSession> {
        self.session.as_mut()
    }

    /// Tear the session down and return to Idle. Phase listeners die with
    /// the session's machine.
    pub fn reset(&mut self) {
        self.session = None;
        self.tick_times.clear();
        log::info!("server reset to idle");
    }
}

impl Default for GameServer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_server_ticks_are_no_ops() {
        let mut server = GameServer::new();
        assert_eq!(server.phase(), RunPhase::Idle);
        assert!(server.tick(&InputState::default()).is_none());
        assert!(!server.request_restart());
    }

    #[test]
    fn init_then_tick_produces_snapshots() {
        let mut server = GameServer::new();
        server.init_course(CourseConfig::default()).unwrap();
        assert_eq!(server.phase(), RunPhase::Ready);

        let snapshot = server.tick(&InputState::default()).unwrap();
        assert_eq!(snapshot.segments.len(), 7);
        assert!(server.stats().avg_tick_time_ms >= 0.0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut server = GameServer::new();
        let config = CourseConfig {
            archetypes: Vec::new(),
            ..CourseConfig::default()
        };
        assert!(server.init_course(config).is_err());
        assert_eq!(server.phase(), RunPhase::Idle);
    }

    #[test]
    fn trigger_change_requests_a_rebuild() {
        let mut server = GameServer::new();
        server.init_course(CourseConfig::default()).unwrap();

        assert!(!server.set_regeneration_trigger(0));
        assert!(server.set_regeneration_trigger(7));
        assert!(!server.set_regeneration_trigger(7));
        assert_eq!(server.stats().segment_count, 5);
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut server = GameServer::new();
        server.init_course(CourseConfig::default()).unwrap();
        server.reset();
        assert_eq!(server.phase(), RunPhase::Idle);
        assert!(server.snapshot().is_none());
    }
}
