//! Phase - run-phase state machine and timing
//!
//! One machine per session tracks the current phase, the run timestamps,
//! and a set of transition listeners. Transitions are guarded: a signal
//! that does not apply to the current phase is ignored, not an error.

use serde::{Deserialize, Serialize};

/// The stage of the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    /// No session yet.
    Idle,
    /// Reset at the spawn point, timer armed, waiting for input.
    Ready,
    /// Run in progress, timer counting.
    Playing,
    /// Finish line crossed, timer frozen until an explicit restart.
    Ended,
}

/// Payload delivered to transition listeners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseChange {
    pub from: RunPhase,
    pub to: RunPhase,
    /// Session-clock timestamp of the transition, in seconds.
    pub at: f64,
}

/// Token returned by `subscribe`; hand it back to stop delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerHandle(u32);

type Listener = Box<dyn FnMut(&PhaseChange) + Send>;

/// Phase, timestamps, and transition listeners for one session.
pub struct PhaseMachine {
    phase: RunPhase,
    start_time: f64,
    end_time: f64,
    listeners: Vec<(u32, Listener)>,
    next_listener: u32,
}

impl PhaseMachine {
    /// A fresh machine starts Ready: the session constructor has already
    /// placed the body at the spawn point.
    pub fn new() -> Self {
        Self {
            phase: RunPhase::Ready,
            start_time: 0.0,
            end_time: 0.0,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    /// Ready -> Playing on the first input activity. Records the start
    /// timestamp. Returns whether a transition happened.
    pub fn start(&mut self, now: f64) -> bool {
        if self.phase != RunPhase::Ready {
            return false;
        }
        self.start_time = now;
        self.transition(RunPhase::Playing, now);
        true
    }

    /// Playing -> Ended on crossing the finish line. Records the end
    /// timestamp, which freezes the elapsed time.
    pub fn finish(&mut self, now: f64) -> bool {
        if self.phase != RunPhase::Playing {
            return false;
        }
        self.end_time = now;
        debug_assert!(self.end_time >= self.start_time);
        self.transition(RunPhase::Ended, now);
        true
    }

    /// Any phase -> Ready: explicit restart or a failed run. Clears the
    /// timestamps. Returns false when already Ready (the caller still
    /// resets the body).
    pub fn reset(&mut self, now: f64) -> bool {
        self.start_time = 0.0;
        self.end_time = 0.0;
        if self.phase == RunPhase::Ready {
            return false;
        }
        self.transition(RunPhase::Ready, now);
        true
    }

    /// Elapsed run time in seconds: live while Playing, frozen while
    /// Ended, zero otherwise.
    pub fn elapsed(&self, now: f64) -> f64 {
        match self.phase {
            RunPhase::Playing => now - self.start_time,
            RunPhase::Ended => self.end_time - self.start_time,
            RunPhase::Idle | RunPhase::Ready => 0.0,
        }
    }

    /// Register a transition listener. The returned handle must be passed
    /// to `unsubscribe` to stop delivery; listeners otherwise live as long
    /// as the machine.
    pub fn subscribe(&mut self, listener: Listener) -> ListenerHandle {
        let id = self.next_listener;
        self.next_listener += 1;
        self.listeners.push((id, listener));
        ListenerHandle(id)
    }

    /// Deregister a listener. Returns whether it was still registered.
    pub fn unsubscribe(&mut self, handle: ListenerHandle) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != handle.0);
        self.listeners.len() != before
    }

    fn transition(&mut self, to: RunPhase, now: f64) {
        let change = PhaseChange {
            from: self.phase,
            to,
            at: now,
        };
        self.phase = to;
        log::debug!("phase {:?} -> {:?} at {:.2}s", change.from, change.to, now);
        for (_, listener) in &mut self.listeners {
            listener(&change);
        }
    }
}

impl Default for PhaseMachine {
    fn default() -> Self {
        Self::new()
    }
}
