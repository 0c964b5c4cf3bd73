//! The evolution driver.
//!
//! [`Driver`] owns one rank's share of a run: its field store, physics,
//! output schedule and checkpoint writer. Every rank of a group builds
//! its own driver from the same [`RunConfig`] and calls
//! [`run()`](Driver::run); the collectives inside keep them in lockstep.
//!
//! # Lifecycle
//!
//! ```text
//! setup ─► iterate* ─► finalize
//! ```
//!
//! Each iteration fills ghosts, checks the stop file, writes a
//! checkpoint if one is due, agrees on a global `dt` and steps the
//! physics. The loop ends on `max_steps`, on `tmax` or on a stop
//! request; finalize always writes one more checkpoint.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use sluice_checkpoint::{read_checkpoint, CheckpointLayout, CheckpointWriter};
use sluice_comm::{fill_ghosts, Communicator};
use sluice_grid::{Domain, DomainSpec, FieldStore, VarRegistry};
use sluice_hydro::{FluxScratch, LinearAdvection, Physics, StepContext};

use crate::clock::Clock;
use crate::config::{ConfigError, RunConfig};
use crate::error::SolverError;
use crate::initial::InitialConditions;
use crate::monitor::Monitor;
use crate::report;
use crate::schedule::OutputSchedule;
use crate::sentinel::StopSentinel;

// ── RunSummary ─────────────────────────────────────────────────────

/// Why the main loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// Simulated time reached `tmax`.
    TimeLimit,
    /// Step count reached `max_steps`.
    StepLimit,
    /// The stop file appeared.
    StopRequested,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimeLimit => write!(f, "time limit reached"),
            Self::StepLimit => write!(f, "step limit reached"),
            Self::StopRequested => write!(f, "stop requested"),
        }
    }
}

/// Outcome of a completed run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    /// Clock after the last step.
    pub clock: Clock,
    /// Why the loop ended.
    pub stop: StopReason,
    /// Checkpoint directories written, in order.
    pub checkpoints: Vec<PathBuf>,
}

// ── Driver ─────────────────────────────────────────────────────────

/// One rank's view of a run.
pub struct Driver<'c, C: Communicator + ?Sized> {
    comm: &'c C,
    physics: Box<dyn Physics>,
    store: FieldStore,
    scratch: FluxScratch,
    clock: Clock,
    schedule: OutputSchedule,
    writer: CheckpointWriter,
    sentinel: StopSentinel,
    monitor: Option<Monitor>,
    tmax: f64,
    max_steps: u64,
    checkpoints: Vec<PathBuf>,
}

impl<'c, C: Communicator + ?Sized> Driver<'c, C> {
    /// Set up a linear-advection run from `config`. Collective.
    pub fn new(comm: &'c C, config: &RunConfig) -> Result<Self, SolverError> {
        let physics = LinearAdvection::builder()
            .speed(config.hydro.v_adv)
            .f_cfl(config.hydro.f_cfl)
            .build()
            .map_err(|reason| ConfigError::BadValue {
                key: "Hydro".to_string(),
                reason,
            })?;
        Self::with_physics(comm, config, Box::new(physics))
    }

    /// Set up a run of `physics` from `config`. Collective.
    ///
    /// Registers variables, decomposes the grid, allocates state and
    /// either loads the restart checkpoint or applies the initial
    /// conditions. Ghost cells are not filled until the first iteration.
    pub fn with_physics(
        comm: &'c C,
        config: &RunConfig,
        physics: Box<dyn Physics>,
    ) -> Result<Self, SolverError> {
        config.validate()?;
        let single = report::single(comm);

        let initial = InitialConditions::new(config.init.variables.clone(), config.init.pulse);
        let mut vars = VarRegistry::new();
        physics.add_variables(&mut vars)?;
        initial.add_variables(&mut vars)?;

        let ng = config.grid.ng.max(physics.guard_width()).max(1);
        let spec = DomainSpec {
            nx_global: config.grid.nx,
            xmin: config.grid.xmin,
            xmax: config.grid.xmax,
            ng,
        };
        let domain = Domain::new(&spec, comm.rank(), comm.size())?;
        if single {
            tracing::info!(
                "grid: Nx = {}, [{}, {}], dx = {}, Ng = {}, {} process(es)",
                spec.nx_global,
                spec.xmin,
                spec.xmax,
                domain.dx(),
                ng,
                comm.size()
            );
            tracing::info!("physics: {}", physics.name());
        }
        report::all(
            comm,
            format!(
                "{} cells [{}, {})",
                comm.topology()?,
                domain.ilo(),
                domain.ihi()
            ),
        )?;

        let mut store = FieldStore::new(domain, vars);
        if single {
            for (var, name) in store.vars().iter() {
                tracing::info!("variable {:0>2} : {name}", var.column());
            }
        }

        let output_dir = &config.driver.output_dir;
        if single {
            fs::create_dir_all(output_dir).map_err(|source| SolverError::Io {
                path: output_dir.clone(),
                source,
            })?;
        }
        comm.barrier()?;

        let clock = match &config.driver.restart_dir {
            Some(dir) => {
                let header = read_checkpoint(dir, &mut store)?;
                if single {
                    tracing::info!(
                        "restart: loaded \"{}\" at n = {}, t = {}",
                        dir.display(),
                        header.step,
                        header.time
                    );
                }
                Clock::resume(header.step, header.time)
            }
            None => {
                initial.apply(&mut store)?;
                Clock::new()
            }
        };

        let monitor = if config.monitor.enabled {
            Some(Monitor::open(
                comm,
                &output_dir.join(&config.monitor.file),
                &store,
            )?)
        } else {
            None
        };

        let layout = CheckpointLayout::new(output_dir, config.driver.max_steps, comm.size());
        let scratch = FluxScratch::new(store.domain(), store.n_vars());
        Ok(Self {
            comm,
            physics,
            store,
            scratch,
            clock,
            schedule: OutputSchedule::new(config.driver.output_dt, config.driver.output_dn),
            writer: CheckpointWriter::new(layout, config.grid.write_guard),
            sentinel: StopSentinel::new(&config.driver.stop_file),
            monitor,
            tmax: config.driver.tmax,
            max_steps: config.driver.max_steps,
            checkpoints: Vec::new(),
        })
    }

    /// Current clock.
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// This rank's state.
    pub fn store(&self) -> &FieldStore {
        &self.store
    }

    /// Checkpoints written so far.
    pub fn checkpoints(&self) -> &[PathBuf] {
        &self.checkpoints
    }

    /// Run the main loop to completion, then finalize. Collective.
    ///
    /// Both bounds are tested before each iteration, so `n_step < max_steps`
    /// and `t < tmax` together act as the loop condition.
    pub fn run(mut self) -> Result<RunSummary, SolverError> {
        let stop = loop {
            if self.clock.n_step >= self.max_steps {
                break StopReason::StepLimit;
            }
            if self.clock.time >= self.tmax {
                break StopReason::TimeLimit;
            }
            if let Some(reason) = self.iterate()? {
                break reason;
            }
        };
        self.finalize()?;
        if report::single(self.comm) {
            tracing::info!("run finished: {stop}");
        }
        Ok(RunSummary {
            clock: self.clock,
            stop,
            checkpoints: self.checkpoints,
        })
    }

    /// One pass of the loop body. Returns a reason when the loop must end
    /// before stepping.
    fn iterate(&mut self) -> Result<Option<StopReason>, SolverError> {
        let single = report::single(self.comm);
        fill_ghosts(self.comm, &mut self.store)?;

        if self.sentinel.requested(self.comm)? {
            if single {
                tracing::info!("--- FORCED EXIT ---");
            }
            return Ok(Some(StopReason::StopRequested));
        }

        if self.schedule.due(&self.clock) {
            self.checkpoint()?;
        }
        if let Some(monitor) = &mut self.monitor {
            monitor.record(self.comm, &self.store, self.clock.time)?;
        }

        let dt = self.next_dt()?;
        if single {
            tracing::info!(
                "n = {}; t = {:.6e}; dt = {:.6e}",
                self.clock.n_step,
                self.clock.time,
                dt
            );
        }
        let mut ctx = StepContext::new(&mut self.store, &mut self.scratch, dt);
        self.physics.step(&mut ctx)?;
        self.clock.advance(dt);
        Ok(None)
    }

    /// Global step size: the smallest limit over all ranks.
    fn next_dt(&self) -> Result<f64, SolverError> {
        let local = self.physics.max_dt(&self.store).unwrap_or(f64::INFINITY);
        let dt = self.comm.all_reduce_min(local)?;
        if dt.is_finite() {
            return Ok(dt);
        }
        let dt = self.tmax - self.clock.time;
        if report::single(self.comm) {
            tracing::warn!("no step-size limit from any contributor; stepping to tmax (dt = {dt})");
        }
        Ok(dt)
    }

    fn checkpoint(&mut self) -> Result<(), SolverError> {
        let dir = self
            .writer
            .write(self.comm, &self.store, self.clock.time, self.clock.n_step)?;
        if report::single(self.comm) {
            tracing::info!("OUTPUT : wrote output \"{}\"", dir.display());
        }
        if self.checkpoints.last() != Some(&dir) {
            self.checkpoints.push(dir);
        }
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), SolverError> {
        fill_ghosts(self.comm, &mut self.store)?;
        if report::single(self.comm) {
            tracing::info!("n = {}; t = {:.6e}", self.clock.n_step, self.clock.time);
        }
        self.checkpoint()?;
        if let Some(monitor) = &mut self.monitor {
            monitor.record(self.comm, &self.store, self.clock.time)?;
        }
        Ok(())
    }
}

impl<C: Communicator + ?Sized> fmt::Debug for Driver<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("rank", &self.comm.rank())
            .field("physics", &self.physics.name())
            .field("clock", &self.clock)
            .field("checkpoints", &self.checkpoints)
            .finish_non_exhaustive()
    }
}
