//! Communication errors.

use sluice_core::{FieldError, Rank};
use thiserror::Error;

/// A communication round failed.
///
/// Every variant is fatal for the whole process group.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CommError {
    /// A peer hung up while this rank was talking to it.
    #[error("rank {peer} disconnected during {during}")]
    Disconnected {
        /// The peer that went away.
        peer: Rank,
        /// Operation in progress.
        during: &'static str,
    },
    /// Another rank failed and the group is shutting down.
    #[error("process group aborted by a failure on another rank")]
    Aborted,
    /// A message of the wrong kind arrived for the current collective.
    #[error("protocol violation in {during}: unexpected {got} message")]
    Protocol {
        /// Operation in progress.
        during: &'static str,
        /// Kind of the message that arrived.
        got: &'static str,
    },
    /// A halo buffer had the wrong length.
    #[error("halo buffer from rank {peer} holds {got} values, expected {expected}")]
    BufferSize {
        /// Sender of the buffer.
        peer: Rank,
        /// Expected length, `Ng * n_vars`.
        expected: usize,
        /// Received length.
        got: usize,
    },
    /// Reading an owned strip into a send buffer failed.
    #[error("error packing send buffers in boundary fill: {0}")]
    Pack(FieldError),
    /// Writing a received buffer into a ghost strip failed.
    #[error("error unpacking receive buffers in boundary fill: {0}")]
    Unpack(FieldError),
    /// A process group needs at least one rank.
    #[error("process group is empty")]
    EmptyGroup,
    /// A rank thread could not be started.
    #[error("failed to start rank {rank}: {reason}")]
    Spawn {
        /// Rank that failed to start.
        rank: Rank,
        /// OS error text.
        reason: String,
    },
}
