//! Ghost-cell halo fill.
//!
//! Each block sends its lowest `Ng` owned rows to the lower neighbour and
//! its highest `Ng` owned rows to the upper neighbour, then overwrites its
//! ghost strips with what arrives. Buffers are laid out row-major:
//! `buf[i * n_vars + v]` is column `v` of the `i`-th row of the strip.

use std::ops::Range;

use smallvec::SmallVec;
use sluice_core::{CellIndex, FieldError};
use sluice_grid::{CellField, FieldStore};

use crate::comm::Communicator;
use crate::error::CommError;

/// Halo buffers up to this many values stay on the stack.
const INLINE_HALO: usize = 16;

type HaloBuf = SmallVec<[f64; INLINE_HALO]>;

fn pack(field: &CellField, strip: Range<CellIndex>, out: &mut HaloBuf) -> Result<(), FieldError> {
    for i in strip {
        out.extend_from_slice(field.row(i)?);
    }
    Ok(())
}

fn unpack(field: &mut CellField, strip: Range<CellIndex>, buf: &[f64]) -> Result<(), FieldError> {
    let n = field.n_vars();
    for (i, row) in strip.zip(buf.chunks_exact(n)) {
        field.row_mut(i)?.copy_from_slice(row);
    }
    Ok(())
}

/// Refresh both ghost strips of `store` from its ring neighbours.
///
/// Postcondition: the lower ghosts equal the lower neighbour's
/// `[ihi-2Ng, ihi-Ng)` rows and the upper ghosts equal the upper
/// neighbour's `[ilo+Ng, ilo+2Ng)` rows, for every column. Interior rows
/// are not touched.
pub fn fill_ghosts<C: Communicator + ?Sized>(
    comm: &C,
    store: &mut FieldStore,
) -> Result<(), CommError> {
    let domain = store.domain().clone();
    let n_trans = domain.ng() * store.n_vars();
    if n_trans == 0 {
        return Ok(());
    }

    let mut lo_send = HaloBuf::with_capacity(n_trans);
    let mut hi_send = HaloBuf::with_capacity(n_trans);
    pack(store.data(), domain.lo_edge(), &mut lo_send).map_err(CommError::Pack)?;
    pack(store.data(), domain.hi_edge(), &mut hi_send).map_err(CommError::Pack)?;

    let mut lo_recv: HaloBuf = SmallVec::from_elem(0.0, n_trans);
    let mut hi_recv: HaloBuf = SmallVec::from_elem(0.0, n_trans);
    comm.exchange(&lo_send, &hi_send, &mut lo_recv, &mut hi_recv)?;

    let data = store.data_mut();
    unpack(data, domain.lo_ghost(), &lo_recv).map_err(CommError::Unpack)?;
    unpack(data, domain.hi_ghost(), &hi_recv).map_err(CommError::Unpack)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::LocalComm;
    use sluice_core::{Rank, VarId};
    use sluice_grid::{Domain, DomainSpec, VarRegistry};

    fn store(nx: usize, ng: usize, vars: &[&str]) -> FieldStore {
        let spec = DomainSpec {
            nx_global: nx,
            xmin: 0.0,
            xmax: 1.0,
            ng,
        };
        let mut reg = VarRegistry::new();
        for v in vars {
            reg.add(v).unwrap();
        }
        FieldStore::new(Domain::new(&spec, Rank(0), 1).unwrap(), reg)
    }

    #[test]
    fn single_process_wraps_periodically() {
        let mut s = store(6, 2, &["a", "b"]);
        for i in 0..6 {
            s.data_mut().set(i, VarId(0), i as f64).unwrap();
            s.data_mut().set(i, VarId(1), -(i as f64)).unwrap();
        }
        fill_ghosts(&LocalComm, &mut s).unwrap();
        let col = |s: &FieldStore, v| -> Vec<f64> {
            (-2..8).map(|i| s.data().get(i, VarId(v)).unwrap()).collect()
        };
        assert_eq!(col(&s, 0), vec![4.0, 5.0, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 0.0, 1.0]);
        assert_eq!(col(&s, 1)[0..2], [-4.0, -5.0]);
        assert_eq!(col(&s, 1)[8..10], [-0.0, -1.0]);
    }

    #[test]
    fn interior_untouched() {
        let mut s = store(4, 1, &["q"]);
        s.data_mut().fill(7.0);
        s.data_mut().set(-1, VarId(0), 99.0).unwrap();
        let before: Vec<f64> = (0..4).map(|i| s.data().get(i, VarId(0)).unwrap()).collect();
        fill_ghosts(&LocalComm, &mut s).unwrap();
        let after: Vec<f64> = (0..4).map(|i| s.data().get(i, VarId(0)).unwrap()).collect();
        assert_eq!(before, after);
        assert_eq!(s.data().get(-1, VarId(0)).unwrap(), 7.0);
    }

    #[test]
    fn no_variables_is_a_no_op() {
        let mut s = store(4, 1, &[]);
        fill_ghosts(&LocalComm, &mut s).unwrap();
    }
}
