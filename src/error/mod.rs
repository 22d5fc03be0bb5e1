//! Error types for mlopt
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

use crate::graph::{NodeId, ValueId};

/// Main error type for IR container and pass operations
#[derive(Error, Debug)]
pub enum IrError {
    /// Handle does not exist or was retired
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// Removal blocked by existing consumers or graph outputs
    #[error("Node {node} is in use: output {value} still has uses")]
    NodeInUse {
        /// Node that was asked to be removed
        node: NodeId,
        /// First output value found to be in use
        value: ValueId,
    },

    /// Mutation rejected because it would introduce a data-dependency cycle
    #[error("Mutation would create a cycle: {0}")]
    WouldCreateCycle(String),

    /// Topological sort found a cycle
    #[error("Cycle detected: {0}")]
    CycleDetected(String),

    /// Structural invariant does not hold
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Persisted document has an IR version this build cannot read
    #[error("Unsupported IR version: {found}, expected {expected}")]
    UnsupportedVersion {
        /// Version found in the document
        found: u32,
        /// Version this build reads and writes
        expected: u32,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode error
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Error raised by a pass
    #[error("Pass '{name}' failed: {message}")]
    Pass {
        /// Pass name
        name: String,
        /// Failure description
        message: String,
    },
}

/// Result type alias for IR operations
pub type IrResult<T> = Result<T, IrError>;
