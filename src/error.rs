//! Error types for the runner core.
//!
//! Gameplay boundary crossings (falling off, finishing) are state-machine
//! inputs, not errors; the only failures this crate surfaces are
//! construction-time contract violations.

use thiserror::Error;

/// Top-level error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("archetype set must not be empty")]
    EmptyArchetypeSet,
}
