//! The [`Physics`] trait and its per-step context.

use sluice_core::FieldError;
use sluice_grid::{Domain, FaceField, FieldStore, VarRegistry};

use crate::error::HydroError;

/// Face-centred work arrays reused across steps.
#[derive(Clone, Debug)]
pub struct FluxScratch {
    /// State approaching each face from below.
    pub lower: FaceField,
    /// State approaching each face from above.
    pub upper: FaceField,
    /// Interface flux.
    pub flux: FaceField,
}

impl FluxScratch {
    /// Arrays spanning the faces of `domain`.
    pub fn new(domain: &Domain, n_vars: usize) -> Self {
        Self {
            lower: FaceField::new(domain, n_vars),
            upper: FaceField::new(domain, n_vars),
            flux: FaceField::new(domain, n_vars),
        }
    }
}

/// Everything a [`Physics`] step may touch.
pub struct StepContext<'a> {
    store: &'a mut FieldStore,
    scratch: &'a mut FluxScratch,
    dt: f64,
}

impl<'a> StepContext<'a> {
    /// Context for one step of size `dt`.
    ///
    /// Typically built by the driver; tests build it directly.
    pub fn new(store: &'a mut FieldStore, scratch: &'a mut FluxScratch, dt: f64) -> Self {
        Self { store, scratch, dt }
    }

    /// Step size.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Grid state.
    pub fn store(&self) -> &FieldStore {
        &*self.store
    }

    /// Grid state and scratch, borrowed together.
    pub fn split(&mut self) -> (&mut FieldStore, &mut FluxScratch) {
        (&mut *self.store, &mut *self.scratch)
    }
}

/// A conservation law advanced by the driver once per step.
///
/// # Contract
///
/// - `add_variables()` and `guard_width()` are called once during setup,
///   before the field store is allocated.
/// - `step()` may assume ghost cells are fresh and must not depend on
///   their values after it returns.
pub trait Physics: Send {
    /// Human-readable name.
    fn name(&self) -> &str;

    /// Ghost cells this scheme reads beyond a block edge.
    fn guard_width(&self) -> usize;

    /// Register the variables this scheme evolves.
    fn add_variables(&self, vars: &mut VarRegistry) -> Result<(), FieldError>;

    /// Largest stable step for the current state, or `None` for no limit.
    fn max_dt(&self, store: &FieldStore) -> Option<f64>;

    /// Advance `ctx.store()` by `ctx.dt()`.
    fn step(&self, ctx: &mut StepContext<'_>) -> Result<(), HydroError>;
}
