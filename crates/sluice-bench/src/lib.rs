//! Benchmark profiles for the sluice solver.
//!
//! - [`reference_profile`]: 10K cells, one variable, single block.
//! - [`profile`]: any size and variable count, for scaling runs.
//! - [`block_profile`]: one rank's block of a decomposed profile.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use sluice_core::{Rank, VarId};
use sluice_grid::{Domain, DomainSpec, FieldStore, VarRegistry};
use sluice_hydro::{FluxScratch, LinearAdvection, Physics};

/// Physics, state and scratch ready for repeated steps.
pub struct Profile {
    pub physics: LinearAdvection,
    pub store: FieldStore,
    pub scratch: FluxScratch,
}

/// Reference profile: 10K cells on `[0, 1)`, `Ng = 2`, one variable.
pub fn reference_profile() -> Profile {
    profile(10_000, 1)
}

/// `nx` cells with `n_vars` advected variables, filled with a smooth
/// periodic profile.
///
/// Panics on an invalid size; profiles are fixed at compile time.
pub fn profile(nx: usize, n_vars: usize) -> Profile {
    block_profile(nx, n_vars, Rank::ROOT, 1)
}

/// Block `rank` of [`profile`] split over `n_ranks`.
pub fn block_profile(nx: usize, n_vars: usize, rank: Rank, n_ranks: u32) -> Profile {
    let mut builder = LinearAdvection::builder().speed(1.0).f_cfl(0.8);
    for v in 0..n_vars {
        builder = builder.variable(format!("q{v}"));
    }
    let physics = match builder.build() {
        Ok(p) => p,
        Err(e) => panic!("bench physics: {e}"),
    };

    let spec = DomainSpec {
        nx_global: nx,
        xmin: 0.0,
        xmax: 1.0,
        ng: 2,
    };
    let domain = match Domain::new(&spec, rank, n_ranks) {
        Ok(d) => d,
        Err(e) => panic!("bench domain: {e}"),
    };
    let mut vars = VarRegistry::new();
    if let Err(e) = physics.add_variables(&mut vars) {
        panic!("bench variables: {e}");
    }
    let mut store = FieldStore::new(domain, vars);
    let cells: Vec<i64> = store.domain().cells().collect();
    for i in cells {
        let x = store.domain().x(i);
        for v in 0..n_vars {
            let value = 1.0 + (std::f64::consts::TAU * x).sin() * (v + 1) as f64;
            if let Err(e) = store.data_mut().set(i, VarId(v as u32), value) {
                panic!("bench fill: {e}");
            }
        }
    }
    let scratch = FluxScratch::new(store.domain(), n_vars);
    Profile {
        physics,
        store,
        scratch,
    }
}
