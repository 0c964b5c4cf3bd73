//! Reusable physics fixtures.
//!
//! - [`FrozenPhysics`]: registers variables but never changes them and
//!   places no limit on the step size.
//! - [`FailingPhysics`]: fails deterministically after N steps.

use std::sync::atomic::{AtomicUsize, Ordering};

use sluice_core::FieldError;
use sluice_grid::{FieldStore, VarRegistry};
use sluice_hydro::{HydroError, Physics, StepContext};

/// Leaves the state untouched.
pub struct FrozenPhysics {
    pub variables: Vec<String>,
    pub guard_width: usize,
}

impl FrozenPhysics {
    pub fn new(variables: &[&str]) -> Self {
        Self {
            variables: variables.iter().map(|v| v.to_string()).collect(),
            guard_width: 1,
        }
    }
}

impl Physics for FrozenPhysics {
    fn name(&self) -> &str {
        "frozen"
    }

    fn guard_width(&self) -> usize {
        self.guard_width
    }

    fn add_variables(&self, vars: &mut VarRegistry) -> Result<(), FieldError> {
        for v in &self.variables {
            vars.add(v)?;
        }
        Ok(())
    }

    fn max_dt(&self, _store: &FieldStore) -> Option<f64> {
        None
    }

    fn step(&self, _ctx: &mut StepContext<'_>) -> Result<(), HydroError> {
        Ok(())
    }
}

/// Fails with [`HydroError::BadStep`] on call `fail_after + 1`.
///
/// Steps before that succeed without touching the state. Reports a fixed
/// step limit of `dt`.
pub struct FailingPhysics {
    pub dt: f64,
    fail_after: usize,
    calls: AtomicUsize,
}

impl FailingPhysics {
    pub fn new(dt: f64, fail_after: usize) -> Self {
        Self {
            dt,
            fail_after,
            calls: AtomicUsize::new(0),
        }
    }

    /// Steps attempted so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Physics for FailingPhysics {
    fn name(&self) -> &str {
        "failing"
    }

    fn guard_width(&self) -> usize {
        1
    }

    fn add_variables(&self, _vars: &mut VarRegistry) -> Result<(), FieldError> {
        Ok(())
    }

    fn max_dt(&self, _store: &FieldStore) -> Option<f64> {
        Some(self.dt)
    }

    fn step(&self, ctx: &mut StepContext<'_>) -> Result<(), HydroError> {
        let n = self.calls.fetch_add(1, Ordering::Relaxed);
        if n >= self.fail_after {
            return Err(HydroError::BadStep { dt: ctx.dt() });
        }
        Ok(())
    }
}
