//! Single-process communicator.

use sluice_core::Rank;

use crate::comm::Communicator;
use crate::error::CommError;

/// A group of one. Halo exchange wraps locally and collectives are
/// identities.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalComm;

impl LocalComm {
    /// The single rank.
    pub fn new() -> Self {
        Self
    }
}

impl Communicator for LocalComm {
    fn rank(&self) -> Rank {
        Rank::ROOT
    }

    fn size(&self) -> u32 {
        1
    }

    fn exchange(
        &self,
        lo_send: &[f64],
        hi_send: &[f64],
        lo_recv: &mut [f64],
        hi_recv: &mut [f64],
    ) -> Result<(), CommError> {
        // Our own upper edge is the strip below our lower ghosts.
        if lo_recv.len() != hi_send.len() {
            return Err(CommError::BufferSize {
                peer: Rank::ROOT,
                expected: lo_recv.len(),
                got: hi_send.len(),
            });
        }
        if hi_recv.len() != lo_send.len() {
            return Err(CommError::BufferSize {
                peer: Rank::ROOT,
                expected: hi_recv.len(),
                got: lo_send.len(),
            });
        }
        lo_recv.copy_from_slice(hi_send);
        hi_recv.copy_from_slice(lo_send);
        Ok(())
    }

    fn barrier(&self) -> Result<(), CommError> {
        Ok(())
    }

    fn gather(&self, line: String) -> Result<Option<Vec<String>>, CommError> {
        Ok(Some(vec![line]))
    }

    fn all_reduce_min(&self, value: f64) -> Result<f64, CommError> {
        Ok(value)
    }

    fn all_reduce_sum(&self, values: &[f64]) -> Result<Vec<f64>, CommError> {
        Ok(values.to_vec())
    }

    fn any(&self, flag: bool) -> Result<bool, CommError> {
        Ok(flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchange_wraps_edges() {
        let comm = LocalComm::new();
        let (mut lo, mut hi) = ([0.0; 2], [0.0; 2]);
        comm.exchange(&[1.0, 2.0], &[8.0, 9.0], &mut lo, &mut hi)
            .unwrap();
        assert_eq!(lo, [8.0, 9.0]);
        assert_eq!(hi, [1.0, 2.0]);
    }

    #[test]
    fn mismatched_buffers_rejected() {
        let comm = LocalComm::new();
        let (mut lo, mut hi) = ([0.0; 1], [0.0; 2]);
        assert!(matches!(
            comm.exchange(&[1.0, 2.0], &[8.0, 9.0], &mut lo, &mut hi),
            Err(CommError::BufferSize { .. })
        ));
    }

    #[test]
    fn collectives_are_identities() {
        let comm = LocalComm::new();
        assert_eq!(comm.gather("x".into()).unwrap(), Some(vec!["x".into()]));
        assert_eq!(comm.all_reduce_min(2.5).unwrap(), 2.5);
        assert_eq!(comm.all_reduce_sum(&[1.0, 2.0]).unwrap(), vec![1.0, 2.0]);
        assert!(comm.any(true).unwrap());
        assert!(comm.topology().unwrap().is_self_loop());
    }
}
