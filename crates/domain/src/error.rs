//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`VacBotError`]
//! via `From` when crossing a port boundary.

use crate::geometry::Point;
use crate::session::TransitionError;

/// Top-level error shared by every crate in the workspace.
#[derive(Debug, thiserror::Error)]
pub enum VacBotError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("device unreachable")]
    Connectivity(#[from] ConnectivityError),

    #[error("invalid session transition")]
    Transition(#[from] TransitionError),

    #[error("device error")]
    Device(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("rectangle corners share the same {axis} coordinate ({value})")]
    DegenerateRectangle { axis: char, value: i32 },

    #[error("offset {offset} moves {point} out of the coordinate range")]
    CoordinateOverflow { point: Point, offset: Point },

    #[error("iterations must be at least 1")]
    ZeroIterations,

    #[error("zone {0:?} has no cleaning regions")]
    EmptyZone(String),

    #[error("zone {0:?} is defined more than once")]
    DuplicateZone(String),

    #[error("unknown fan level {0:?}")]
    UnknownFanLevel(String),

    #[error("admin allow-list must not be empty")]
    NoAdmins,
}

/// The device could not be reached while constructing an adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot establish connection to vacuum cleaner at {address} after {attempts} attempts")]
pub struct ConnectivityError {
    pub address: String,
    pub attempts: u32,
}
