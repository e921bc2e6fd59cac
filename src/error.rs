//! Error types for the simulator
//!
//! Three families live here:
//!
//! - [`EngineError`]: an unexpected internal failure while a mutation engine
//!   applies one operation.  The trace recorder catches these per operation and
//!   keeps folding with the last good snapshot.
//! - [`ValidationError`]: malformed operation input (non-numeric tree value,
//!   missing field).  Never fatal; the operation produces zero steps and the
//!   reason is attached to its span in the trace.
//! - [`ScriptError`] / [`AppError`]: loading scripts and configuration, and the
//!   binary boundary.

use crate::engine::StructureKind;
use crate::operation::OperationKind;
use serde::Serialize;
use thiserror::Error;

/// Internal failures raised by a mutation engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("operation '{kind}' is not supported by a {structure}")]
    UnsupportedOperation {
        kind: OperationKind,
        structure: StructureKind,
    },

    #[error("tree slot {index} is empty or out of bounds")]
    DanglingNode { index: usize },
}

/// Why an operation was skipped without producing any steps
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("a value is required")]
    MissingValue,

    #[error("'{value}' is not a number")]
    NonNumericValue { value: String },

    #[error("a position is required")]
    MissingPosition,

    #[error("'{position}' is not a whole number")]
    InvalidPosition { position: String },

    #[error("a new value is required")]
    MissingNewValue,
}

/// Failures while loading a script or configuration file
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors surfaced by the `dsviz` binary
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Script(#[from] ScriptError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to initialise logging: {0}")]
    Logging(String),

    #[error("operation index {index} is out of range for a log of {len}")]
    IndexOutOfRange { index: usize, len: usize },
}
