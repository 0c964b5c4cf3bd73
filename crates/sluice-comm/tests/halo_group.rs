//! Halo exchange across a multi-rank group.
//!
//! Runs the ring protocol over `ChannelComm` and checks the ghost-cell
//! invariant against a serially computed global array.

use proptest::prelude::*;
use sluice_comm::{fill_ghosts, run_group, CommError, Communicator};
use sluice_core::{CellIndex, Rank, VarId};
use sluice_grid::{Domain, DomainSpec, FieldStore};
use sluice_test_utils::{seed_interior, seeded_value, store, wrap};

const SEED: u64 = 5;

/// Value the periodic global array holds at cell `i`.
fn global_value(i: CellIndex, v: usize, nx: usize) -> f64 {
    seeded_value(SEED, wrap(i, nx), v)
}

fn seeded_store(spec: &DomainSpec, rank: Rank, n_ranks: u32, n_vars: usize) -> FieldStore {
    let names: Vec<String> = (0..n_vars).map(|v| format!("v{v}")).collect();
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    let mut s = store(spec, rank.0, n_ranks, &names);
    seed_interior(&mut s, SEED);
    s
}

fn check_ghosts(spec: DomainSpec, n_ranks: u32, n_vars: usize) -> Vec<bool> {
    run_group(n_ranks, |comm| -> Result<bool, CommError> {
        let mut s = seeded_store(&spec, comm.rank(), comm.size(), n_vars);
        fill_ghosts(comm, &mut s)?;
        let d = s.domain().clone();
        let ok = d.cells().all(|i| {
            (0..n_vars).all(|v| {
                s.data().get(i, VarId(v as u32)).unwrap() == global_value(i, v, spec.nx_global)
            })
        });
        Ok(ok)
    })
    .unwrap()
}

#[test]
fn four_ranks_two_ghosts() {
    let spec = DomainSpec {
        nx_global: 100,
        xmin: 0.0,
        xmax: 1.0,
        ng: 2,
    };
    assert!(check_ghosts(spec, 4, 1).into_iter().all(|ok| ok));
}

#[test]
fn two_ranks_multiple_variables() {
    let spec = DomainSpec {
        nx_global: 9,
        xmin: -1.0,
        xmax: 1.0,
        ng: 3,
    };
    assert!(check_ghosts(spec, 2, 3).into_iter().all(|ok| ok));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn ghosts_match_neighbour_edges(nx in 4usize..64, p in 1u32..5, ng in 1usize..3, n_vars in 1usize..3) {
        let spec = DomainSpec { nx_global: nx, xmin: 0.0, xmax: 1.0, ng };
        prop_assume!(Domain::decompose(&spec, p).is_ok());
        prop_assert!(check_ghosts(spec, p, n_vars).into_iter().all(|ok| ok));
    }
}
