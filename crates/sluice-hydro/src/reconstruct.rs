//! Face-state reconstruction.

use sluice_grid::{CellField, FaceField};

use crate::error::HydroError;

/// Estimates the state just below and just above every face.
///
/// For the face between cells `i` and `i+1`, `lower[i]` is the value
/// approaching from cell `i` and `upper[i]` from cell `i+1`.
pub trait Reconstruction: Send + Sync {
    /// Human-readable name.
    fn name(&self) -> &str;

    /// Cells needed on each side of a face. The ghost width must be at
    /// least this.
    fn stencil_radius(&self) -> usize;

    /// Fill `lower` and `upper` for every face in their range.
    fn reconstruct(
        &self,
        data: &CellField,
        lower: &mut FaceField,
        upper: &mut FaceField,
    ) -> Result<(), HydroError>;
}

/// First-order reconstruction: each face sees the unmodified cell
/// averages on either side.
#[derive(Clone, Copy, Debug, Default)]
pub struct PiecewiseConstant;

pub(crate) fn check_faces(
    stage: &'static str,
    data: &CellField,
    face: &FaceField,
) -> Result<(), HydroError> {
    if face.lo() != data.lo() || face.hi() != data.hi() - 1 || face.n_vars() != data.n_vars() {
        return Err(HydroError::Shape {
            stage,
            face_lo: face.lo(),
            face_hi: face.hi(),
            cell_lo: data.lo(),
            cell_hi: data.hi(),
        });
    }
    Ok(())
}

impl Reconstruction for PiecewiseConstant {
    fn name(&self) -> &str {
        "piecewise_constant"
    }

    fn stencil_radius(&self) -> usize {
        1
    }

    fn reconstruct(
        &self,
        data: &CellField,
        lower: &mut FaceField,
        upper: &mut FaceField,
    ) -> Result<(), HydroError> {
        check_faces("reconstruction", data, lower)?;
        check_faces("reconstruction", data, upper)?;
        let n = data.n_vars();
        let cells = data.as_slice();
        let faces = lower.as_slice().len();
        // Row i of the face arrays pairs cell rows i and i+1.
        lower.as_mut_slice().copy_from_slice(&cells[..faces]);
        upper.as_mut_slice().copy_from_slice(&cells[n..n + faces]);
        Ok(())
    }
}
