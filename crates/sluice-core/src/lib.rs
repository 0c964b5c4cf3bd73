//! Core types for the sluice finite-volume solver.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! identifiers shared across the workspace (process ranks, variable
//! columns, global cell coordinates), the [`AssignOnce`] cell used for
//! run-constant values, and the leaf error types raised by grid setup and
//! bounds-checked field access.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod once;

pub use error::{DimensionError, FieldError};
pub use id::{CellIndex, Rank, VarId};
pub use once::AssignOnce;
