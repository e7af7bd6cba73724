//! Error types for the triangulation, collapsing and matching pipeline.

use thiserror::Error;

/// Errors that can occur while cutting and pairing shapes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MorphError {
    /// The input ring is degenerate or self-intersecting.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// A caller-supplied argument is out of range or inconsistent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The mesh topology is corrupted. Never recoverable.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}
