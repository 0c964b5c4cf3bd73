//! Finite-volume physics for the sluice solver.
//!
//! One step of a [`Physics`] implementation runs the classic three-stage
//! cycle over every face of a block:
//!
//! 1. [`Reconstruction`]: estimate the state on each side of a face from
//!    the neighbouring cell averages.
//! 2. [`RiemannSolver`]: turn the two face states into a single flux.
//! 3. [`conservative_update`]: move `flux * dt / dx` out of the lower cell
//!    and into the upper one.
//!
//! [`CflLimit`] bounds the step size; [`LinearAdvection`] wires the stages
//! together for a constant advection speed.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod advection;
pub mod cfl;
pub mod error;
pub mod physics;
pub mod reconstruct;
pub mod riemann;
pub mod update;

pub use advection::{LinearAdvection, LinearAdvectionBuilder};
pub use cfl::{combine_limits, CflLimit};
pub use error::HydroError;
pub use physics::{FluxScratch, Physics, StepContext};
pub use reconstruct::{PiecewiseConstant, Reconstruction};
pub use riemann::{upwind_flux, RiemannSolver, Upwind};
pub use update::conservative_update;
