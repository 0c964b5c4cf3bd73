//! Riemann solvers: face states → interface flux.

use sluice_grid::FaceField;

use crate::error::HydroError;

/// Computes the flux through each face from its reconstructed states.
pub trait RiemannSolver: Send + Sync {
    /// Human-readable name.
    fn name(&self) -> &str;

    /// Fill `flux` for every face, every column.
    fn solve(
        &self,
        lower: &FaceField,
        upper: &FaceField,
        flux: &mut FaceField,
    ) -> Result<(), HydroError>;
}

/// Upwind flux for linear advection at `speed`.
///
/// Zero speed gives zero flux; otherwise the state on the side the flow
/// comes from is carried across.
#[inline]
pub fn upwind_flux(speed: f64, lower: f64, upper: f64) -> f64 {
    if speed > 0.0 {
        speed * lower
    } else if speed < 0.0 {
        speed * upper
    } else {
        0.0
    }
}

/// Exact solver for `q_t + speed * q_x = 0`, applied to every column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Upwind {
    speed: f64,
}

impl Upwind {
    /// Solver for a constant advection speed.
    pub fn new(speed: f64) -> Self {
        Self { speed }
    }

    /// Advection speed.
    pub fn speed(&self) -> f64 {
        self.speed
    }
}

impl RiemannSolver for Upwind {
    fn name(&self) -> &str {
        "upwind"
    }

    fn solve(
        &self,
        lower: &FaceField,
        upper: &FaceField,
        flux: &mut FaceField,
    ) -> Result<(), HydroError> {
        if lower.as_slice().len() != upper.as_slice().len()
            || lower.as_slice().len() != flux.as_slice().len()
        {
            return Err(HydroError::Shape {
                stage: "riemann solve",
                face_lo: flux.lo(),
                face_hi: flux.hi(),
                cell_lo: lower.lo(),
                cell_hi: lower.hi() + 1,
            });
        }
        for ((f, &l), &u) in flux
            .as_mut_slice()
            .iter_mut()
            .zip(lower.as_slice())
            .zip(upper.as_slice())
        {
            *f = upwind_flux(self.speed, l, u);
        }
        Ok(())
    }
}
