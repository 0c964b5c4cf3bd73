//! Leaf error types: grid dimensioning and bounds-checked field access.

use thiserror::Error;

use crate::id::{CellIndex, Rank, VarId};

/// The global grid cannot be decomposed as requested.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum DimensionError {
    /// The global cell count is zero.
    #[error("grid has no cells")]
    EmptyGrid,
    /// Coordinate bounds are not strictly increasing and finite.
    #[error("invalid coordinate bounds: xmin = {xmin}, xmax = {xmax}")]
    InvalidBounds {
        /// Lower bound as configured.
        xmin: f64,
        /// Upper bound as configured.
        xmax: f64,
    },
    /// The process group is empty, or `rank` is outside it.
    #[error("rank {rank} is outside a group of {n_ranks} processes")]
    BadRank {
        /// Requested rank.
        rank: Rank,
        /// Group size.
        n_ranks: u32,
    },
    /// A block owns fewer interior cells than the ghost width, so a halo
    /// strip would have to reach past its immediate neighbour.
    #[error(
        "rank {rank} owns {nx_local} interior cells but the ghost width is {ng}; \
         the number of local cells must be at least the number of guard cells"
    )]
    LocalTooSmall {
        /// Offending rank.
        rank: Rank,
        /// Interior cells owned by that rank.
        nx_local: usize,
        /// Ghost width.
        ng: usize,
    },
}

/// A bounds-checked field access failed.
///
/// Each variant names the invariant it violated so a failing halo pack or
/// restart load can report exactly which index was wrong.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Cell coordinate outside `[lo, hi)`.
    #[error("cell index {index} outside [{lo}, {hi})")]
    CellOutOfRange {
        /// Requested global coordinate.
        index: CellIndex,
        /// First valid coordinate.
        lo: CellIndex,
        /// One past the last valid coordinate.
        hi: CellIndex,
    },
    /// Face coordinate outside `[lo, hi)`.
    #[error("face index {index} outside [{lo}, {hi})")]
    FaceOutOfRange {
        /// Requested lower-cell coordinate of the face.
        index: CellIndex,
        /// First valid face.
        lo: CellIndex,
        /// One past the last valid face.
        hi: CellIndex,
    },
    /// Variable column outside `[0, n_vars)`.
    #[error("variable column {var} outside [0, {n_vars})")]
    VariableOutOfRange {
        /// Requested column.
        var: VarId,
        /// Number of registered columns.
        n_vars: usize,
    },
    /// No variable is registered under this name.
    #[error("no variable named '{name}'")]
    UnknownVariable {
        /// The name that was looked up.
        name: String,
    },
    /// The registry was modified after the field store froze it.
    #[error("cannot add variable '{name}': registry is frozen at {n_vars} columns")]
    RegistryFrozen {
        /// Name that was being added.
        name: String,
        /// Frozen column count.
        n_vars: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_too_small_mentions_guard_cells() {
        let e = DimensionError::LocalTooSmall {
            rank: Rank(3),
            nx_local: 1,
            ng: 2,
        };
        let msg = e.to_string();
        assert!(msg.contains("rank 3"));
        assert!(msg.contains("guard cells"));
    }

    #[test]
    fn field_errors_name_the_axis() {
        let cell = FieldError::CellOutOfRange {
            index: 10,
            lo: -1,
            hi: 9,
        };
        assert_eq!(cell.to_string(), "cell index 10 outside [-1, 9)");
        let var = FieldError::VariableOutOfRange {
            var: VarId(4),
            n_vars: 2,
        };
        assert_eq!(var.to_string(), "variable column 4 outside [0, 2)");
    }
}
