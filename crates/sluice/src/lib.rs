//! Sluice: a domain-decomposed 1D finite-volume solver for hyperbolic
//! conservation laws.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all sluice sub-crates. For most users, adding `sluice` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use sluice::prelude::*;
//!
//! // Eight cells on [0, 8), one ghost layer, a single process.
//! let spec = DomainSpec { nx_global: 8, xmin: 0.0, xmax: 8.0, ng: 1 };
//! let physics = LinearAdvection::builder()
//!     .speed(1.0)
//!     .f_cfl(0.5)
//!     .variable("q")
//!     .build()
//!     .unwrap();
//!
//! let mut vars = VarRegistry::new();
//! physics.add_variables(&mut vars).unwrap();
//! let mut store = FieldStore::new(Domain::new(&spec, Rank::ROOT, 1).unwrap(), vars);
//! store.data_mut().set(3, VarId(0), 1.0).unwrap();
//!
//! let comm = LocalComm::new();
//! let mut scratch = FluxScratch::new(store.domain(), store.n_vars());
//! fill_ghosts(&comm, &mut store).unwrap();
//! let dt = physics.max_dt(&store).unwrap();
//! physics.step(&mut StepContext::new(&mut store, &mut scratch, dt)).unwrap();
//!
//! // Half the pulse moved one cell to the right.
//! assert_eq!(store.data().get(3, VarId(0)).unwrap(), 0.5);
//! assert_eq!(store.data().get(4, VarId(0)).unwrap(), 0.5);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `sluice-core` | Ranks, variable ids, `AssignOnce`, leaf errors |
//! | [`grid`] | `sluice-grid` | Domain decomposition, variable registry, field storage |
//! | [`comm`] | `sluice-comm` | Communicators, process groups, halo exchange |
//! | [`hydro`] | `sluice-hydro` | Reconstruction, Riemann solver, update, CFL |
//! | [`checkpoint`] | `sluice-checkpoint` | Checkpoint layout, writer and restart reader |
//! | [`engine`] | `sluice-engine` | Configuration, evolution driver, run entry point |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core ids, `AssignOnce` and leaf errors (`sluice-core`).
pub use sluice_core as types;

/// Domain decomposition and field storage (`sluice-grid`).
///
/// [`grid::Domain`] partitions the global grid; [`grid::FieldStore`]
/// holds one block's coordinates and state.
pub use sluice_grid as grid;

/// Communicators and halo exchange (`sluice-comm`).
///
/// [`comm::LocalComm`] for one process, [`comm::run_group`] for a
/// channel-linked group, [`comm::fill_ghosts`] for ghost refresh.
pub use sluice_comm as comm;

/// Finite-volume flux engine and step-size policy (`sluice-hydro`).
pub use sluice_hydro as hydro;

/// Checkpoint output and restart (`sluice-checkpoint`).
pub use sluice_checkpoint as checkpoint;

/// Configuration and the evolution driver (`sluice-engine`).
pub use sluice_engine as engine;

/// Common imports for typical sluice usage.
///
/// ```rust
/// use sluice::prelude::*;
/// ```
pub mod prelude {
    // Core
    pub use sluice_core::{AssignOnce, CellIndex, Rank, VarId};

    // Grid
    pub use sluice_grid::{CellField, Domain, DomainSpec, FaceField, FieldStore, VarRegistry};

    // Communication
    pub use sluice_comm::{fill_ghosts, run_group, Communicator, LocalComm};

    // Physics
    pub use sluice_hydro::{FluxScratch, LinearAdvection, Physics, StepContext};

    // Checkpoints
    pub use sluice_checkpoint::{read_checkpoint, CheckpointLayout, CheckpointWriter};

    // Engine
    pub use sluice_engine::{
        run, Driver, Parameters, RunConfig, RunSummary, SolverError, StopReason,
    };
}
