//! Configuration, evolution driver and run orchestration for sluice.
//!
//! This crate ties the lower layers together:
//!
//! - [`Parameters`] and [`RunConfig`] read and validate the run settings.
//! - [`Driver`] sets up one rank, loops until a stop condition, and
//!   writes the final checkpoint.
//! - [`run()`] launches a whole process group and returns its
//!   [`RunSummary`].
//!
//! All failures surface as a [`SolverError`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod clock;
pub mod config;
pub mod driver;
pub mod error;
pub mod initial;
pub mod monitor;
pub mod report;
pub mod run;
pub mod schedule;
pub mod sentinel;

pub use clock::Clock;
pub use config::{
    ConfigError, DriverConfig, GridConfig, HydroConfig, InitConfig, MonitorConfig, Parameters,
    RunConfig,
};
pub use driver::{Driver, RunSummary, StopReason};
pub use error::{ErrorKind, SolverError};
pub use initial::{GaussianPulse, InitialConditions};
pub use monitor::Monitor;
pub use run::run;
pub use schedule::OutputSchedule;
pub use sentinel::StopSentinel;
