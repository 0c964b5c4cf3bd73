//! External stop request: a flag file checked once per iteration.

use std::path::{Path, PathBuf};

use sluice_comm::{CommError, Communicator};

/// Watches for a stop file.
///
/// The check is collective: if any rank sees the file, every rank
/// reports a stop, so the whole group leaves the loop on the same step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StopSentinel {
    path: PathBuf,
}

impl StopSentinel {
    /// Watch `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Watched file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a stop has been requested on any rank.
    pub fn requested<C: Communicator + ?Sized>(&self, comm: &C) -> Result<bool, CommError> {
        comm.any(self.path.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sluice_comm::LocalComm;

    #[test]
    fn file_presence_requests_stop() {
        let tmp = tempfile::tempdir().unwrap();
        let s = StopSentinel::new(tmp.path().join("_force_quit"));
        assert!(!s.requested(&LocalComm).unwrap());
        std::fs::write(s.path(), "").unwrap();
        assert!(s.requested(&LocalComm).unwrap());
    }
}
