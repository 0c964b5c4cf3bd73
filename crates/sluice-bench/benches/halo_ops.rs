//! Criterion micro-benchmarks for ghost-cell fills.

use criterion::{criterion_group, criterion_main, Criterion};
use sluice_bench::{block_profile, reference_profile};
use sluice_comm::{fill_ghosts, run_group, CommError, Communicator, LocalComm};

/// Benchmark: single-process periodic fill on the reference profile.
fn bench_fill_local(c: &mut Criterion) {
    let mut p = reference_profile();

    c.bench_function("fill_ghosts_local_10k", |b| {
        b.iter(|| fill_ghosts(&LocalComm, &mut p.store).unwrap());
    });
}

/// Benchmark: 100 fills across a four-rank channel group, including
/// group start-up.
fn bench_fill_group(c: &mut Criterion) {
    c.bench_function("fill_ghosts_group4_x100", |b| {
        b.iter(|| {
            run_group(4, |comm| -> Result<(), CommError> {
                let mut p = block_profile(4_096, 4, comm.rank(), comm.size());
                for _ in 0..100 {
                    fill_ghosts(comm, &mut p.store)?;
                }
                Ok(())
            })
            .unwrap();
        });
    });
}

criterion_group!(benches, bench_fill_local, bench_fill_group);
criterion_main!(benches);
