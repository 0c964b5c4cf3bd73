//! The driver clock.

/// Step counter, simulated time and the last step size.
///
/// `time` and `n_step` only move forward.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Clock {
    /// Completed steps.
    pub n_step: u64,
    /// Simulated time.
    pub time: f64,
    /// Size of the most recent step.
    pub dt: f64,
}

impl Clock {
    /// Clock at step 0, time 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock restored from a checkpoint.
    pub fn resume(n_step: u64, time: f64) -> Self {
        Self {
            n_step,
            time,
            dt: 0.0,
        }
    }

    /// Record a completed step of size `dt`.
    pub fn advance(&mut self, dt: f64) {
        self.dt = dt;
        self.time += dt;
        self.n_step += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_moves_forward() {
        let mut c = Clock::new();
        c.advance(0.5);
        c.advance(0.25);
        assert_eq!(c.n_step, 2);
        assert_eq!(c.time, 0.75);
        assert_eq!(c.dt, 0.25);
    }

    #[test]
    fn resume_keeps_step_and_time() {
        let c = Clock::resume(40, 3.5);
        assert_eq!((c.n_step, c.time, c.dt), (40, 3.5, 0.0));
    }
}
