//! Stability-limited step size.

/// Courant–Friedrichs–Lewy limit for a constant wave speed:
/// `dt = f_cfl * dx / |speed|`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CflLimit {
    /// Fraction of the largest stable step, in `(0, 1]`.
    pub f_cfl: f64,
    /// Signal speed.
    pub speed: f64,
}

impl CflLimit {
    /// Largest stable step for cells of width `dx`.
    ///
    /// `None` when the speed is zero: nothing moves, so there is no limit.
    pub fn max_dt(&self, dx: f64) -> Option<f64> {
        let s = self.speed.abs();
        if s == 0.0 {
            return None;
        }
        Some(self.f_cfl * dx / s)
    }
}

/// Combine independent step limits by taking the smallest.
///
/// `None` if no contributor imposes a limit.
pub fn combine_limits(limits: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    limits.into_iter().flatten().reduce(f64::min)
}
