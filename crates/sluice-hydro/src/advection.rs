//! Linear advection `q_t + v * q_x = 0` for every registered variable.

use std::fmt;

use sluice_core::FieldError;
use sluice_grid::{FieldStore, VarRegistry};

use crate::cfl::CflLimit;
use crate::error::HydroError;
use crate::physics::{Physics, StepContext};
use crate::reconstruct::{PiecewiseConstant, Reconstruction};
use crate::riemann::{RiemannSolver, Upwind};
use crate::update::conservative_update;

/// Constant-speed advection with a pluggable reconstruction and the
/// upwind Riemann solver.
///
/// Every column of the state is advected at the same speed.
///
/// # Construction
///
/// ```
/// use sluice_hydro::LinearAdvection;
///
/// let adv = LinearAdvection::builder()
///     .speed(1.0)
///     .f_cfl(0.5)
///     .build()
///     .unwrap();
/// assert_eq!(adv.speed(), 1.0);
/// ```
pub struct LinearAdvection {
    riemann: Upwind,
    cfl: CflLimit,
    reconstruction: Box<dyn Reconstruction>,
    variables: Vec<String>,
}

/// Builder for [`LinearAdvection`].
///
/// Defaults: speed 1, `f_cfl` 0.75, piecewise-constant reconstruction,
/// no variables of its own.
pub struct LinearAdvectionBuilder {
    speed: f64,
    f_cfl: f64,
    reconstruction: Box<dyn Reconstruction>,
    variables: Vec<String>,
}

impl LinearAdvection {
    /// Create a new builder.
    pub fn builder() -> LinearAdvectionBuilder {
        LinearAdvectionBuilder {
            speed: 1.0,
            f_cfl: 0.75,
            reconstruction: Box::new(PiecewiseConstant),
            variables: Vec::new(),
        }
    }

    /// Advection speed.
    pub fn speed(&self) -> f64 {
        self.riemann.speed()
    }

    /// CFL fraction.
    pub fn f_cfl(&self) -> f64 {
        self.cfl.f_cfl
    }
}

impl fmt::Debug for LinearAdvection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinearAdvection")
            .field("speed", &self.speed())
            .field("f_cfl", &self.cfl.f_cfl)
            .field("reconstruction", &self.reconstruction.name())
            .field("variables", &self.variables)
            .finish()
    }
}

impl LinearAdvectionBuilder {
    /// Advection speed `v`. Any finite value, including zero.
    pub fn speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Fraction of the stable step to take, in `(0, 1]`.
    pub fn f_cfl(mut self, f_cfl: f64) -> Self {
        self.f_cfl = f_cfl;
        self
    }

    /// Replace the reconstruction stage.
    pub fn reconstruction(mut self, r: impl Reconstruction + 'static) -> Self {
        self.reconstruction = Box::new(r);
        self
    }

    /// Register an extra variable to advect.
    pub fn variable(mut self, name: impl Into<String>) -> Self {
        self.variables.push(name.into());
        self
    }

    /// Build the physics. Fails on a non-finite speed or an `f_cfl`
    /// outside `(0, 1]`.
    pub fn build(self) -> Result<LinearAdvection, String> {
        if !self.speed.is_finite() {
            return Err(format!("advection speed must be finite, got {}", self.speed));
        }
        if !(self.f_cfl > 0.0 && self.f_cfl <= 1.0) {
            return Err(format!("f_cfl must be in (0, 1], got {}", self.f_cfl));
        }
        Ok(LinearAdvection {
            riemann: Upwind::new(self.speed),
            cfl: CflLimit {
                f_cfl: self.f_cfl,
                speed: self.speed,
            },
            reconstruction: self.reconstruction,
            variables: self.variables,
        })
    }
}

impl Physics for LinearAdvection {
    fn name(&self) -> &str {
        "linear_advection"
    }

    fn guard_width(&self) -> usize {
        self.reconstruction.stencil_radius()
    }

    fn add_variables(&self, vars: &mut VarRegistry) -> Result<(), FieldError> {
        for v in &self.variables {
            vars.add(v)?;
        }
        Ok(())
    }

    fn max_dt(&self, store: &FieldStore) -> Option<f64> {
        self.cfl.max_dt(store.domain().dx())
    }

    fn step(&self, ctx: &mut StepContext<'_>) -> Result<(), HydroError> {
        let dt = ctx.dt();
        if !(dt.is_finite() && dt >= 0.0) {
            return Err(HydroError::BadStep { dt });
        }
        let (store, scratch) = ctx.split();
        let dt_over_dx = dt / store.domain().dx();
        self.reconstruction
            .reconstruct(store.data(), &mut scratch.lower, &mut scratch.upper)?;
        self.riemann
            .solve(&scratch.lower, &scratch.upper, &mut scratch.flux)?;
        conservative_update(store.data_mut(), &scratch.flux, dt_over_dx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::FluxScratch;
    use sluice_core::{Rank, VarId};
    use sluice_grid::{Domain, DomainSpec};

    fn store(nx: usize, width: f64) -> FieldStore {
        let spec = DomainSpec {
            nx_global: nx,
            xmin: 0.0,
            xmax: width,
            ng: 1,
        };
        let mut vars = VarRegistry::new();
        vars.add("data").unwrap();
        FieldStore::new(Domain::new(&spec, Rank(0), 1).unwrap(), vars)
    }

    #[test]
    fn builder_rejects_bad_cfl() {
        assert!(LinearAdvection::builder().f_cfl(0.0).build().is_err());
        assert!(LinearAdvection::builder().f_cfl(1.5).build().is_err());
        assert!(LinearAdvection::builder().f_cfl(1.0).build().is_ok());
    }

    #[test]
    fn builder_rejects_non_finite_speed() {
        let err = LinearAdvection::builder()
            .speed(f64::NAN)
            .build()
            .unwrap_err();
        assert!(err.contains("finite"));
    }

    #[test]
    fn registers_its_variables() {
        let adv = LinearAdvection::builder()
            .variable("tracer")
            .build()
            .unwrap();
        let mut vars = VarRegistry::new();
        adv.add_variables(&mut vars).unwrap();
        assert_eq!(vars.get("tracer").unwrap(), VarId(0));
        assert_eq!(adv.guard_width(), 1);
    }

    #[test]
    fn max_dt_follows_cfl() {
        let adv = LinearAdvection::builder()
            .speed(-2.0)
            .f_cfl(0.5)
            .build()
            .unwrap();
        let s = store(10, 5.0);
        assert_eq!(adv.max_dt(&s), Some(0.125));
        let still = LinearAdvection::builder().speed(0.0).build().unwrap();
        assert_eq!(still.max_dt(&s), None);
    }

    #[test]
    fn negative_dt_rejected() {
        let adv = LinearAdvection::builder().build().unwrap();
        let mut s = store(4, 4.0);
        let mut scratch = FluxScratch::new(s.domain(), 1);
        let mut ctx = StepContext::new(&mut s, &mut scratch, -1.0);
        assert_eq!(
            adv.step(&mut ctx),
            Err(HydroError::BadStep { dt: -1.0 })
        );
    }

    #[test]
    fn leftward_step_pulls_from_above() {
        let adv = LinearAdvection::builder()
            .speed(-1.0)
            .f_cfl(1.0)
            .build()
            .unwrap();
        let mut s = store(4, 4.0);
        for i in -1..5 {
            s.data_mut().set(i, VarId(0), i as f64).unwrap();
        }
        let mut scratch = FluxScratch::new(s.domain(), 1);
        let mut ctx = StepContext::new(&mut s, &mut scratch, 1.0);
        adv.step(&mut ctx).unwrap();
        // A full-CFL step shifts every interior cell down by one.
        for i in 0..4 {
            assert_eq!(s.data().get(i, VarId(0)).unwrap(), (i + 1) as f64);
        }
    }
}
