//! Checkpoint output and restart for the sluice solver.
//!
//! A checkpoint is a directory named after the step it was taken at:
//!
//! ```text
//! <output_dir>/step_000120/
//!     header.txt         time, step, guard flag, process count
//!     grid.dat           one process
//!     grid_000000.dat    ... or one payload per rank
//!     grid_000001.dat
//! ```
//!
//! Payloads are whitespace-separated text: a `# position` line, one
//! `# <name>` line per variable in column order, then one row per cell.
//! On restart the payload is found by its numeric rank (padding may
//! differ) and columns are matched by name, so the variable order in the
//! file need not match the running registry.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod header;
pub mod layout;
pub mod reader;
pub mod writer;

pub use error::{CheckpointError, RestartMismatch};
pub use header::Header;
pub use layout::{padded_width, parse_payload_rank, CheckpointLayout};
pub use reader::{read_checkpoint, read_payload};
pub use writer::{write_payload, CheckpointWriter};
