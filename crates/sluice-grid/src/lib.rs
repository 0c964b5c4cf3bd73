//! Decomposed one-dimensional grid for the sluice solver.
//!
//! A [`Domain`] describes the block of the global grid owned by one
//! process, padded with ghost cells on both sides. A [`RingTopology`] names
//! the two processes that border it. A [`VarRegistry`] maps variable names
//! to columns, and a [`FieldStore`] owns the coordinate and state arrays
//! addressed by global cell coordinate.
//!
//! # Index conventions
//!
//! | range | meaning |
//! |---|---|
//! | `[ilo, ihi)` | every local cell, ghosts included |
//! | `[ilo+Ng, ihi-Ng)` | interior cells owned by this process |
//! | `[ilo, ilo+Ng)`, `[ihi-Ng, ihi)` | ghost strips |
//! | `[ilo, ihi-1)` | faces, addressed by their lower cell |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod domain;
pub mod field;
pub mod registry;
pub mod store;
pub mod topology;

pub use domain::{Domain, DomainSpec};
pub use field::{Cell, CellField, Centering, Face, FaceField, GridArray};
pub use registry::VarRegistry;
pub use store::FieldStore;
pub use topology::RingTopology;
