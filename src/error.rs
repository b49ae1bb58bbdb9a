//! Error types for the kepler-fpp-report library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`FppError`]: **Fatal**: the batch cannot start at all (input list
//!   missing, unreadable or empty, configuration invalid). Returned as
//!   `Err(FppError)` from the top-level `generate*` functions.
//!
//! * [`ReportError`]: **Non-fatal**: one candidate's report hit a problem
//!   (source file not writable, a typesetting pass failed). Stored inside
//!   [`crate::output::ReportOutcome`]; the batch carries on with the next
//!   identifier exactly as if rendering had succeeded.
//!
//! A missing plot image is not an error of either kind: the slot falls back
//! to the placeholder and the substitution is only recorded in the outcome.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the kepler-fpp-report library.
#[derive(Debug, Error)]
pub enum FppError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The identifier list file was not found.
    #[error("Input list not found: '{path}'\nCheck the path exists and is readable.")]
    InputNotFound { path: PathBuf },

    /// Process does not have read permission on the identifier list.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    InputPermissionDenied { path: PathBuf },

    /// The identifier list could be opened but not read to the end.
    #[error("Failed to read input list '{path}': {source}")]
    InputReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The identifier list contained no identifiers.
    #[error("Input List is Empty! Exiting...")]
    EmptyIdentifierList { source_name: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A non-fatal error for a single report.
///
/// Stored in [`crate::output::ReportOutcome::errors`]. The remaining steps
/// for the candidate (further passes, cleanup) still run.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum ReportError {
    /// The LaTeX source could not be written.
    #[error("{identifier}: failed to write '{path}': {detail}")]
    SourceWriteFailed {
        identifier: String,
        path: PathBuf,
        detail: String,
    },

    /// A typesetting pass did not complete successfully.
    #[error("{identifier}: typesetting pass {pass} failed: {detail}")]
    TypesetFailed {
        identifier: String,
        pass: u8,
        detail: String,
    },
}

/// Failure reported by a [`crate::pipeline::typeset::Typesetter`].
#[derive(Debug, Clone, Error)]
pub enum TypesetError {
    /// The engine binary is not installed or not on `PATH`.
    #[error("typesetting engine '{engine}' not found")]
    EngineNotFound { engine: String },

    /// The engine could not be started or exited unsuccessfully.
    #[error("{0}")]
    Engine(String),
}

impl From<texrun::TexrunError> for TypesetError {
    fn from(e: texrun::TexrunError) -> Self {
        match e {
            texrun::TexrunError::EngineNotFound { name } => {
                TypesetError::EngineNotFound { engine: name }
            }
            other => TypesetError::Engine(other.to_string()),
        }
    }
}
