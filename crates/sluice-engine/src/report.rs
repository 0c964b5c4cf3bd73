//! Rank-aware log output.
//!
//! Progress messages are emitted once for the whole group, by the root.
//! Per-rank messages are gathered to the root and emitted in rank order so
//! that output from a decomposed run reads the same as a serial one.

use sluice_comm::{CommError, Communicator};

/// Whether this rank emits group-wide messages.
pub fn single<C: Communicator + ?Sized>(comm: &C) -> bool {
    comm.rank().is_root()
}

/// Emit one line per rank, in rank order, from the root. Collective.
pub fn all<C: Communicator + ?Sized>(comm: &C, line: String) -> Result<(), CommError> {
    if let Some(lines) = comm.gather(line)? {
        for (rank, line) in lines.iter().enumerate() {
            tracing::info!(rank, "{line}");
        }
    }
    Ok(())
}
