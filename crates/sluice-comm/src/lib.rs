//! Process-group communication for the sluice solver.
//!
//! The [`Communicator`] trait is the only channel between ranks: ring
//! halo exchange, barriers, ordered gathers and reductions. Two backends
//! implement it:
//!
//! - [`LocalComm`]: a single process that is its own ring neighbour.
//! - [`ChannelComm`]: one rank per thread, linked by crossbeam channels,
//!   created by [`run_group`]. Ranks share no mutable state.
//!
//! [`fill_ghosts`] builds the halo protocol on top of
//! [`Communicator::exchange`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod channel;
pub mod comm;
pub mod error;
pub mod halo;
pub mod launch;
pub mod local;

pub use channel::ChannelComm;
pub use comm::Communicator;
pub use error::CommError;
pub use halo::fill_ghosts;
pub use launch::run_group;
pub use local::LocalComm;
