//! Test utilities and mock types for sluice development.
//!
//! Provides grid fixtures (specs, stores and deterministic fills), a
//! [`FailingComm`] that breaks after a set number of calls, and physics
//! fixtures in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::atomic::{AtomicUsize, Ordering};

use sluice_comm::{CommError, Communicator, LocalComm};
use sluice_core::{Rank, VarId};
use sluice_grid::{Domain, DomainSpec, FieldStore, VarRegistry};

/// `DomainSpec` shorthand.
pub fn spec(nx_global: usize, xmin: f64, xmax: f64, ng: usize) -> DomainSpec {
    DomainSpec {
        nx_global,
        xmin,
        xmax,
        ng,
    }
}

/// Zeroed store for `rank` of `n_ranks` with the given variables.
///
/// Panics if the grid cannot be decomposed.
pub fn store(spec: &DomainSpec, rank: u32, n_ranks: u32, vars: &[&str]) -> FieldStore {
    let domain = Domain::new(spec, Rank(rank), n_ranks)
        .unwrap_or_else(|e| panic!("fixture domain rank {rank}/{n_ranks}: {e}"));
    let mut reg = VarRegistry::new();
    for v in vars {
        reg.add(v)
            .unwrap_or_else(|e| panic!("fixture variable '{v}': {e}"));
    }
    FieldStore::new(domain, reg)
}

/// Deterministic value for global cell `i`, column `var`.
///
/// Depends only on its arguments, so blocks of different decompositions
/// agree on shared cells.
pub fn seeded_value(seed: u64, i: i64, var: usize) -> f64 {
    let h = (i as u64)
        .wrapping_add(seed)
        .wrapping_mul(6364136223846793007)
        .wrapping_add((var as u64).wrapping_mul(1442695040888963407));
    ((h >> 40) % 1000) as f64 / 10.0
}

/// Fill every interior cell with [`seeded_value`]. Ghosts are set to NaN
/// so a missing halo fill is visible.
pub fn seed_interior(store: &mut FieldStore, seed: u64) {
    let domain = store.domain().clone();
    let n_vars = store.n_vars();
    for i in domain.cells() {
        for v in 0..n_vars {
            let value = if domain.interior().contains(&i) {
                seeded_value(seed, i, v)
            } else {
                f64::NAN
            };
            store
                .data_mut()
                .set(i, VarId(v as u32), value)
                .unwrap_or_else(|e| panic!("fixture fill: {e}"));
        }
    }
}

/// Periodic image of global cell `i` in `[0, nx_global)`.
pub fn wrap(i: i64, nx_global: usize) -> i64 {
    i.rem_euclid(nx_global as i64)
}

// ── FailingComm ────────────────────────────────────────────────────

/// A single-rank communicator that fails after `ok_calls` calls.
///
/// Until then it behaves like [`LocalComm`]. Every trait method counts as
/// one call; failures report [`CommError::Disconnected`] naming the
/// operation.
#[derive(Debug)]
pub struct FailingComm {
    inner: LocalComm,
    ok_calls: usize,
    calls: AtomicUsize,
}

impl FailingComm {
    pub fn new(ok_calls: usize) -> Self {
        Self {
            inner: LocalComm::new(),
            ok_calls,
            calls: AtomicUsize::new(0),
        }
    }

    /// Calls made so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn tick(&self, during: &'static str) -> Result<(), CommError> {
        let n = self.calls.fetch_add(1, Ordering::Relaxed);
        if n >= self.ok_calls {
            return Err(CommError::Disconnected {
                peer: Rank::ROOT,
                during,
            });
        }
        Ok(())
    }
}

impl Communicator for FailingComm {
    fn rank(&self) -> Rank {
        self.inner.rank()
    }

    fn size(&self) -> u32 {
        self.inner.size()
    }

    fn exchange(
        &self,
        lo_send: &[f64],
        hi_send: &[f64],
        lo_recv: &mut [f64],
        hi_recv: &mut [f64],
    ) -> Result<(), CommError> {
        self.tick("exchange")?;
        self.inner.exchange(lo_send, hi_send, lo_recv, hi_recv)
    }

    fn barrier(&self) -> Result<(), CommError> {
        self.tick("barrier")?;
        self.inner.barrier()
    }

    fn gather(&self, line: String) -> Result<Option<Vec<String>>, CommError> {
        self.tick("gather")?;
        self.inner.gather(line)
    }

    fn all_reduce_min(&self, value: f64) -> Result<f64, CommError> {
        self.tick("all_reduce_min")?;
        self.inner.all_reduce_min(value)
    }

    fn all_reduce_sum(&self, values: &[f64]) -> Result<Vec<f64>, CommError> {
        self.tick("all_reduce_sum")?;
        self.inner.all_reduce_sum(values)
    }

    fn any(&self, flag: bool) -> Result<bool, CommError> {
        self.tick("any")?;
        self.inner.any(flag)
    }
}
