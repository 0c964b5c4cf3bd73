//! Conservative flux-difference update.

use sluice_grid::{CellField, FaceField};

use crate::error::HydroError;
use crate::reconstruct::check_faces;

/// Apply `flux` to `data` over one step.
///
/// For every face `i`, `dq = flux(i) * dt_over_dx` is removed from cell
/// `i` and added to cell `i+1`. Whatever leaves one cell enters its
/// neighbour, so the sum over a periodic block is unchanged.
pub fn conservative_update(
    data: &mut CellField,
    flux: &FaceField,
    dt_over_dx: f64,
) -> Result<(), HydroError> {
    check_faces("update", data, flux)?;
    let n = data.n_vars();
    let cells = data.as_mut_slice();
    for (face, f) in flux.as_slice().chunks_exact(n).enumerate() {
        let at = face * n;
        for (v, &fv) in f.iter().enumerate() {
            let dq = fv * dt_over_dx;
            cells[at + v] -= dq;
            cells[at + n + v] += dq;
        }
    }
    Ok(())
}
