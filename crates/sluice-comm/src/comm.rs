//! The [`Communicator`] trait.

use sluice_core::{DimensionError, Rank};
use sluice_grid::RingTopology;

use crate::error::CommError;

/// Message passing between the ranks of a process group.
///
/// # Contract
///
/// - Every rank calls collectives in the same order (SPMD). Backends may
///   deadlock or fail with [`CommError::Protocol`] otherwise.
/// - A failed call leaves the group unusable; callers abort.
/// - Collectives rooted at [`Rank::ROOT`] return their result there.
pub trait Communicator {
    /// This process.
    fn rank(&self) -> Rank;

    /// Number of processes in the group.
    fn size(&self) -> u32;

    /// Ring neighbours of this rank.
    fn topology(&self) -> Result<RingTopology, DimensionError> {
        RingTopology::new(self.rank(), self.size())
    }

    /// One halo round with both ring neighbours.
    ///
    /// Sends `lo_send` down and `hi_send` up, then fills `lo_recv` with
    /// the lower neighbour's upward buffer and `hi_recv` with the upper
    /// neighbour's downward buffer. Returns once all four transfers are
    /// complete.
    fn exchange(
        &self,
        lo_send: &[f64],
        hi_send: &[f64],
        lo_recv: &mut [f64],
        hi_recv: &mut [f64],
    ) -> Result<(), CommError>;

    /// Block until every rank has arrived.
    fn barrier(&self) -> Result<(), CommError>;

    /// Collect one string per rank at the root, in rank order.
    ///
    /// Returns `Some(lines)` on the root and `None` elsewhere.
    fn gather(&self, line: String) -> Result<Option<Vec<String>>, CommError>;

    /// Group-wide minimum, returned on every rank.
    fn all_reduce_min(&self, value: f64) -> Result<f64, CommError>;

    /// Element-wise group-wide sum, returned on every rank.
    fn all_reduce_sum(&self, values: &[f64]) -> Result<Vec<f64>, CommError>;

    /// `true` on every rank if `flag` is set on any rank.
    fn any(&self, flag: bool) -> Result<bool, CommError>;
}
