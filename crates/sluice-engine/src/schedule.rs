//! When to write checkpoints during the loop.

use crate::clock::Clock;

/// Output triggers, each tracked on its own.
///
/// A checkpoint is due when any of these fires:
///
/// - the first step of a fresh run (`time == 0`);
/// - `floor(time / output_dt)` has grown since the previous check;
/// - `n_step / output_dn` has grown since the previous check.
///
/// Every tracker is updated on every check, whether or not another one
/// already fired, so a trigger is never reported twice for the same
/// interval.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputSchedule {
    output_dt: f64,
    output_dn: u64,
    last_dt_interval: Option<i64>,
    last_dn_interval: Option<u64>,
}

impl OutputSchedule {
    /// Schedule with the given cadences; zero disables a trigger.
    pub fn new(output_dt: f64, output_dn: u64) -> Self {
        Self {
            output_dt,
            output_dn,
            last_dt_interval: None,
            last_dn_interval: None,
        }
    }

    /// Whether a checkpoint is due at `clock`. Call once per iteration.
    pub fn due(&mut self, clock: &Clock) -> bool {
        let first = clock.time == 0.0;

        let mut by_time = false;
        if self.output_dt > 0.0 {
            let current = (clock.time / self.output_dt).floor() as i64;
            by_time = self.last_dt_interval.is_none_or(|last| current > last);
            self.last_dt_interval = Some(current);
        }

        let mut by_step = false;
        if self.output_dn > 0 {
            let current = clock.n_step / self.output_dn;
            by_step = self.last_dn_interval.is_none_or(|last| current > last);
            self.last_dn_interval = Some(current);
        }

        first || by_time || by_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(n_step: u64, time: f64) -> Clock {
        Clock::resume(n_step, time)
    }

    #[test]
    fn first_step_always_written() {
        let mut s = OutputSchedule::new(0.0, 0);
        assert!(s.due(&at(0, 0.0)));
        assert!(!s.due(&at(1, 0.1)));
    }

    #[test]
    fn time_interval_crossings() {
        let mut s = OutputSchedule::new(0.25, 0);
        let times = [0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.55, 0.8];
        let fired: Vec<bool> = times
            .iter()
            .enumerate()
            .map(|(n, &t)| s.due(&at(n as u64, t)))
            .collect();
        assert_eq!(fired, [true, false, false, true, false, true, false, true]);
    }

    #[test]
    fn step_interval_crossings() {
        let mut s = OutputSchedule::new(0.0, 3);
        let fired: Vec<u64> = (0..10)
            .filter(|&n| s.due(&at(n, 1.0 + n as f64)))
            .collect();
        assert_eq!(fired, vec![0, 3, 6, 9]);
    }

    #[test]
    fn first_step_write_still_advances_trackers() {
        let mut s = OutputSchedule::new(1.0, 0);
        assert!(s.due(&at(0, 0.0)));
        // The interval containing t = 0 was consumed by the first write.
        assert!(!s.due(&at(1, 0.5)));
        assert!(s.due(&at(2, 1.0)));
    }

    #[test]
    fn restart_fires_on_first_check() {
        let mut s = OutputSchedule::new(0.5, 0);
        assert!(s.due(&at(40, 7.3)));
        assert!(!s.due(&at(41, 7.4)));
    }

    proptest! {
        #[test]
        fn at_most_one_write_per_interval(dt in 0.01f64..0.5, out_dt in 0.1f64..2.0, n in 1usize..200) {
            let mut s = OutputSchedule::new(out_dt, 0);
            let mut last_interval = None;
            for k in 0..n {
                let t = k as f64 * dt;
                if s.due(&at(k as u64, t)) && t > 0.0 {
                    let interval = (t / out_dt).floor() as i64;
                    prop_assert!(last_interval != Some(interval));
                    last_interval = Some(interval);
                }
            }
        }
    }
}
