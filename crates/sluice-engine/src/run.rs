//! Whole-group entry point.

use sluice_comm::{run_group, CommError, LocalComm};

use crate::config::RunConfig;
use crate::driver::{Driver, RunSummary};
use crate::error::SolverError;

/// Run `config` on `n_procs` ranks and return the root's summary.
///
/// One rank runs on the calling thread over [`LocalComm`]; more ranks run
/// one thread each over a channel group. A failure on any rank aborts the
/// group and is returned.
pub fn run(config: &RunConfig, n_procs: u32) -> Result<RunSummary, SolverError> {
    config.validate()?;
    match n_procs {
        0 => Err(CommError::EmptyGroup.into()),
        1 => {
            let comm = LocalComm::new();
            Driver::new(&comm, config)?.run()
        }
        n => {
            let summaries = run_group(n, |comm| -> Result<RunSummary, SolverError> {
                Driver::new(comm, config)?.run()
            })?;
            summaries
                .into_iter()
                .next()
                .ok_or_else(|| CommError::EmptyGroup.into())
        }
    }
}
