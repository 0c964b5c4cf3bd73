//! [`FieldStore`]: the per-process grid state.

use sluice_core::{CellIndex, FieldError, VarId};

use crate::domain::Domain;
use crate::field::CellField;
use crate::registry::VarRegistry;

/// Coordinates and cell-centred state for one block.
///
/// Owns the [`Domain`] it was built from and the frozen [`VarRegistry`]
/// that names its columns.
#[derive(Clone, Debug)]
pub struct FieldStore {
    domain: Domain,
    vars: VarRegistry,
    x: Vec<f64>,
    data: CellField,
}

impl FieldStore {
    /// Allocate zeroed state for every registered variable.
    ///
    /// Freezes `vars`; the column layout cannot change afterwards.
    pub fn new(domain: Domain, mut vars: VarRegistry) -> Self {
        let n_vars = vars.freeze();
        let x = domain.cells().map(|i| domain.x(i)).collect();
        let data = CellField::new(&domain, n_vars);
        Self {
            domain,
            vars,
            x,
            data,
        }
    }

    /// Block geometry.
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Column names.
    pub fn vars(&self) -> &VarRegistry {
        &self.vars
    }

    /// Number of columns.
    pub fn n_vars(&self) -> usize {
        self.data.n_vars()
    }

    /// Cell-centre coordinate of `i`.
    pub fn x(&self, i: CellIndex) -> Result<f64, FieldError> {
        if !self.domain.cells().contains(&i) {
            return Err(FieldError::CellOutOfRange {
                index: i,
                lo: self.domain.ilo(),
                hi: self.domain.ihi(),
            });
        }
        Ok(self.x[(i - self.domain.ilo()) as usize])
    }

    /// State array.
    pub fn data(&self) -> &CellField {
        &self.data
    }

    /// State array, mutably.
    pub fn data_mut(&mut self) -> &mut CellField {
        &mut self.data
    }

    /// `Σ data(i, var) * dx` over interior cells of this block.
    pub fn local_total(&self, var: VarId) -> Result<f64, FieldError> {
        let mut sum = 0.0;
        for i in self.domain.interior() {
            sum += self.data.get(i, var)?;
        }
        Ok(sum * self.domain.dx())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainSpec;
    use sluice_core::Rank;

    fn store() -> FieldStore {
        let spec = DomainSpec {
            nx_global: 4,
            xmin: 0.0,
            xmax: 2.0,
            ng: 1,
        };
        let mut vars = VarRegistry::new();
        vars.add("data").unwrap();
        FieldStore::new(Domain::new(&spec, Rank(0), 1).unwrap(), vars)
    }

    #[test]
    fn allocation_freezes_registry() {
        let s = store();
        assert!(s.vars().is_frozen());
        assert_eq!(s.n_vars(), 1);
        assert_eq!(s.data().n_rows(), 6);
    }

    #[test]
    fn coordinates_cover_ghosts() {
        let s = store();
        assert_eq!(s.x(-1).unwrap(), -0.25);
        assert_eq!(s.x(4).unwrap(), 2.25);
        assert!(matches!(s.x(5), Err(FieldError::CellOutOfRange { .. })));
    }

    #[test]
    fn total_ignores_ghosts() {
        let mut s = store();
        s.data_mut().fill(100.0);
        for i in 0..4 {
            s.data_mut().set(i, VarId(0), 1.0).unwrap();
        }
        assert_eq!(s.local_total(VarId(0)).unwrap(), 2.0);
    }
}
