//! The umbrella error for a solver run.

use std::fmt;
use std::path::PathBuf;

use sluice_checkpoint::CheckpointError;
use sluice_comm::CommError;
use sluice_core::{DimensionError, FieldError};
use sluice_hydro::HydroError;
use thiserror::Error;

use crate::config::ConfigError;

/// Coarse classification of a [`SolverError`], used for reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad or missing configuration.
    Config,
    /// Grid cannot be decomposed as requested.
    Dimension,
    /// Transport failure or halo inconsistency.
    Communication,
    /// Missing or unreadable file.
    Io,
    /// Checkpoint does not fit the running configuration.
    RestartMismatch,
    /// Physics or field access failure inside a step.
    Physics,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Config => "configuration error",
            Self::Dimension => "dimension error",
            Self::Communication => "communication error",
            Self::Io => "I/O error",
            Self::RestartMismatch => "restart mismatch",
            Self::Physics => "physics error",
        };
        f.write_str(s)
    }
}

/// Any fatal error from setting up or running the solver.
#[derive(Debug, Error)]
pub enum SolverError {
    /// Configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Domain decomposition.
    #[error(transparent)]
    Dimension(#[from] DimensionError),
    /// Field access or registry.
    #[error(transparent)]
    Field(#[from] FieldError),
    /// Process-group communication.
    #[error(transparent)]
    Comm(#[from] CommError),
    /// Checkpoint read or write.
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
    /// Physics step.
    #[error(transparent)]
    Hydro(#[from] HydroError),
    /// File I/O outside checkpoints.
    #[error("{}: {source}", path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl SolverError {
    /// Which class of failure this is.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::Dimension(_) => ErrorKind::Dimension,
            Self::Field(_) | Self::Hydro(_) => ErrorKind::Physics,
            Self::Comm(_) => ErrorKind::Communication,
            Self::Io { .. } => ErrorKind::Io,
            Self::Checkpoint(e) => match e {
                CheckpointError::Mismatch(_) => ErrorKind::RestartMismatch,
                CheckpointError::Comm(_) => ErrorKind::Communication,
                CheckpointError::Field(_) => ErrorKind::Physics,
                CheckpointError::Io { .. }
                | CheckpointError::MissingHeader(_)
                | CheckpointError::MissingPayload { .. }
                | CheckpointError::Malformed { .. } => ErrorKind::Io,
            },
        }
    }
}
