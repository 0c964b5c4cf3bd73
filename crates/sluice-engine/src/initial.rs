//! Initial conditions.

use sluice_core::FieldError;
use sluice_grid::{FieldStore, VarRegistry};

/// `y0 + dy * exp(-((x - x0) / width)^2)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaussianPulse {
    /// Centre.
    pub x0: f64,
    /// Half-width scale.
    pub width: f64,
    /// Background level.
    pub y0: f64,
    /// Peak height above the background.
    pub dy: f64,
}

impl Default for GaussianPulse {
    fn default() -> Self {
        Self {
            x0: 0.0,
            width: 0.75,
            y0: 10.0,
            dy: 1.25,
        }
    }
}

impl GaussianPulse {
    /// Profile value at `x`.
    pub fn at(&self, x: f64) -> f64 {
        let r = (x - self.x0) / self.width;
        self.y0 + self.dy * (-(r * r)).exp()
    }
}

/// Starting state: the same profile in each of a list of variables.
#[derive(Clone, Debug, PartialEq)]
pub struct InitialConditions {
    variables: Vec<String>,
    profile: GaussianPulse,
}

impl InitialConditions {
    /// Fill `variables` with `profile`.
    pub fn new(variables: Vec<String>, profile: GaussianPulse) -> Self {
        Self { variables, profile }
    }

    /// Register the variables this component fills.
    pub fn add_variables(&self, vars: &mut VarRegistry) -> Result<(), FieldError> {
        for v in &self.variables {
            vars.add(v)?;
        }
        Ok(())
    }

    /// Write the profile into every cell, ghosts included.
    pub fn apply(&self, store: &mut FieldStore) -> Result<(), FieldError> {
        let vars = self
            .variables
            .iter()
            .map(|name| store.vars().get(name))
            .collect::<Result<Vec<_>, _>>()?;
        for i in store.domain().cells() {
            let value = self.profile.at(store.x(i)?);
            for &var in &vars {
                store.data_mut().set(i, var, value)?;
            }
        }
        Ok(())
    }
}
