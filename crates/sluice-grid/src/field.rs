//! Cell- and face-centred arrays addressed by global coordinate.

use std::fmt;
use std::marker::PhantomData;

use sluice_core::{CellIndex, FieldError, VarId};

use crate::domain::Domain;

/// Where values of a [`GridArray`] live.
pub trait Centering {
    /// Rows dropped from the top of the `[ilo, ihi)` cell range.
    const TRIM: CellIndex;

    /// Error for an index outside the array.
    fn out_of_range(index: CellIndex, lo: CellIndex, hi: CellIndex) -> FieldError;
}

/// Cell centres, one row per cell in `[ilo, ihi)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell;

/// Interfaces `i+1/2`, one row per face in `[ilo, ihi-1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face;

impl Centering for Cell {
    const TRIM: CellIndex = 0;

    fn out_of_range(index: CellIndex, lo: CellIndex, hi: CellIndex) -> FieldError {
        FieldError::CellOutOfRange { index, lo, hi }
    }
}

impl Centering for Face {
    const TRIM: CellIndex = 1;

    fn out_of_range(index: CellIndex, lo: CellIndex, hi: CellIndex) -> FieldError {
        FieldError::FaceOutOfRange { index, lo, hi }
    }
}

/// Dense row-major table: one row per index, `n_vars` columns per row.
pub struct GridArray<C: Centering> {
    lo: CellIndex,
    hi: CellIndex,
    n_vars: usize,
    data: Vec<f64>,
    _centering: PhantomData<C>,
}

/// State at cell centres.
pub type CellField = GridArray<Cell>;

/// Values at cell interfaces.
pub type FaceField = GridArray<Face>;

impl<C: Centering> GridArray<C> {
    /// Zero-filled array spanning `domain`.
    pub fn new(domain: &Domain, n_vars: usize) -> Self {
        Self::zeros(domain.ilo(), domain.ihi() - C::TRIM, n_vars)
    }

    /// Zero-filled array over rows `[lo, hi)`.
    pub fn zeros(lo: CellIndex, hi: CellIndex, n_vars: usize) -> Self {
        let rows = (hi - lo).max(0) as usize;
        Self {
            lo,
            hi: lo + rows as CellIndex,
            n_vars,
            data: vec![0.0; rows * n_vars],
            _centering: PhantomData,
        }
    }

    /// First valid index.
    pub fn lo(&self) -> CellIndex {
        self.lo
    }

    /// One past the last valid index.
    pub fn hi(&self) -> CellIndex {
        self.hi
    }

    /// Columns per row.
    pub fn n_vars(&self) -> usize {
        self.n_vars
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        (self.hi - self.lo) as usize
    }

    fn row_start(&self, i: CellIndex) -> Result<usize, FieldError> {
        if i < self.lo || i >= self.hi {
            return Err(C::out_of_range(i, self.lo, self.hi));
        }
        Ok((i - self.lo) as usize * self.n_vars)
    }

    fn offset(&self, i: CellIndex, var: VarId) -> Result<usize, FieldError> {
        if var.column() >= self.n_vars {
            return Err(FieldError::VariableOutOfRange {
                var,
                n_vars: self.n_vars,
            });
        }
        Ok(self.row_start(i)? + var.column())
    }

    /// Value at `(i, var)`.
    pub fn get(&self, i: CellIndex, var: VarId) -> Result<f64, FieldError> {
        let at = self.offset(i, var)?;
        Ok(self.data[at])
    }

    /// Overwrite `(i, var)`.
    pub fn set(&mut self, i: CellIndex, var: VarId, value: f64) -> Result<(), FieldError> {
        let at = self.offset(i, var)?;
        self.data[at] = value;
        Ok(())
    }

    /// All columns of row `i`.
    pub fn row(&self, i: CellIndex) -> Result<&[f64], FieldError> {
        let at = self.row_start(i)?;
        Ok(&self.data[at..at + self.n_vars])
    }

    /// All columns of row `i`, mutably.
    pub fn row_mut(&mut self, i: CellIndex) -> Result<&mut [f64], FieldError> {
        let at = self.row_start(i)?;
        let n = self.n_vars;
        Ok(&mut self.data[at..at + n])
    }

    /// Flat row-major storage.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Flat row-major storage, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Set every entry to `value`.
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }
}

impl<C: Centering> Clone for GridArray<C> {
    fn clone(&self) -> Self {
        Self {
            lo: self.lo,
            hi: self.hi,
            n_vars: self.n_vars,
            data: self.data.clone(),
            _centering: PhantomData,
        }
    }
}

impl<C: Centering> PartialEq for GridArray<C> {
    fn eq(&self, other: &Self) -> bool {
        self.lo == other.lo
            && self.hi == other.hi
            && self.n_vars == other.n_vars
            && self.data == other.data
    }
}

impl<C: Centering> fmt::Debug for GridArray<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridArray")
            .field("lo", &self.lo)
            .field("hi", &self.hi)
            .field("n_vars", &self.n_vars)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainSpec;
    use sluice_core::Rank;

    fn domain() -> Domain {
        let spec = DomainSpec {
            nx_global: 8,
            xmin: 0.0,
            xmax: 8.0,
            ng: 1,
        };
        Domain::new(&spec, Rank(0), 1).unwrap()
    }

    #[test]
    fn cell_field_spans_ghosts() {
        let f = CellField::new(&domain(), 2);
        assert_eq!((f.lo(), f.hi()), (-1, 9));
        assert_eq!(f.n_rows(), 10);
        assert_eq!(f.as_slice().len(), 20);
    }

    #[test]
    fn face_field_has_one_fewer_row() {
        let f = FaceField::new(&domain(), 2);
        assert_eq!((f.lo(), f.hi()), (-1, 8));
        assert_eq!(f.n_rows(), 9);
    }

    #[test]
    fn set_get_by_global_index() {
        let mut f = CellField::new(&domain(), 2);
        f.set(-1, VarId(1), 3.5).unwrap();
        f.set(8, VarId(0), -2.0).unwrap();
        assert_eq!(f.get(-1, VarId(1)).unwrap(), 3.5);
        assert_eq!(f.row(8).unwrap(), &[-2.0, 0.0]);
        assert_eq!(f.as_slice()[1], 3.5);
    }

    #[test]
    fn cell_out_of_range_names_cells() {
        let f = CellField::new(&domain(), 1);
        assert_eq!(
            f.get(9, VarId(0)),
            Err(FieldError::CellOutOfRange {
                index: 9,
                lo: -1,
                hi: 9
            })
        );
    }

    #[test]
    fn face_out_of_range_names_faces() {
        let f = FaceField::new(&domain(), 1);
        assert_eq!(
            f.get(8, VarId(0)),
            Err(FieldError::FaceOutOfRange {
                index: 8,
                lo: -1,
                hi: 8
            })
        );
    }

    #[test]
    fn variable_out_of_range_names_column() {
        let mut f = CellField::new(&domain(), 1);
        assert_eq!(
            f.set(0, VarId(1), 1.0),
            Err(FieldError::VariableOutOfRange {
                var: VarId(1),
                n_vars: 1
            })
        );
    }

    #[test]
    fn row_mut_writes_through() {
        let mut f = CellField::new(&domain(), 3);
        f.row_mut(2).unwrap().copy_from_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(f.get(2, VarId(2)).unwrap(), 3.0);
        f.fill(0.25);
        assert!(f.as_slice().iter().all(|&v| v == 0.25));
    }
}
