//! Checkpoint errors.

use std::io;
use std::path::PathBuf;

use sluice_comm::CommError;
use sluice_core::{FieldError, Rank};
use thiserror::Error;

/// A checkpoint could not be written or read back.
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Filesystem failure.
    #[error("{}: {source}", path.display())]
    Io {
        /// File or directory being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The restart directory has no `header.txt`.
    #[error("could not find header file {}", .0.display())]
    MissingHeader(PathBuf),
    /// No payload in the restart directory carries this rank.
    #[error("could not find data file for rank {rank} in {}", dir.display())]
    MissingPayload {
        /// Restart directory.
        dir: PathBuf,
        /// Rank that was looked for.
        rank: Rank,
    },
    /// A header or payload line could not be parsed.
    #[error("{}:{line}: {reason}", path.display())]
    Malformed {
        /// File being parsed.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// What was wrong.
        reason: String,
    },
    /// The checkpoint does not fit the running configuration.
    #[error("restart mismatch: {0}")]
    Mismatch(#[from] RestartMismatch),
    /// Storing a value into the field failed.
    #[error(transparent)]
    Field(#[from] FieldError),
    /// Synchronising the group around the write failed.
    #[error(transparent)]
    Comm(#[from] CommError),
}

/// Why a checkpoint cannot be loaded into the current grid.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RestartMismatch {
    /// Written by a different number of processes.
    #[error("checkpoint was written by {written} processes, running with {running}")]
    ProcessCount {
        /// Group size recorded in the header.
        written: u32,
        /// Current group size.
        running: u32,
    },
    /// The payload has the wrong number of cells.
    #[error("rank {rank}: file contains {found} cells, grid expects {expected}")]
    RowCount {
        /// Reading rank.
        rank: Rank,
        /// Rows in the payload.
        found: usize,
        /// Rows the local block needs.
        expected: usize,
    },
    /// A row has too few or too many values.
    #[error("cell {row}: found {found} values, expected {expected}")]
    RowWidth {
        /// 0-based row within the payload.
        row: usize,
        /// Values on the row, excluding the position.
        found: usize,
        /// Declared variable count.
        expected: usize,
    },
    /// The payload declares a variable the run does not know.
    #[error("checkpoint declares unknown variable '{name}'")]
    UnknownVariable {
        /// Declared name.
        name: String,
    },
    /// The payload declares the same variable twice.
    #[error("checkpoint declares variable '{name}' more than once")]
    DuplicateVariable {
        /// Declared name.
        name: String,
    },
    /// A registered variable is absent from the payload.
    #[error("checkpoint has no data for variable '{name}'")]
    MissingVariable {
        /// Registered name.
        name: String,
    },
}

impl CheckpointError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
