//! `header.txt`: the driver clock and payload flags.

use std::fmt::Write as _;
use std::path::Path;

use crate::error::CheckpointError;

/// Contents of a checkpoint header.
///
/// Rendered as aligned `key = value` lines:
///
/// ```text
/// time        = 1.25
/// step        = 10
/// write_guard = false
/// n_procs     = 4
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    /// Simulation time at the checkpoint.
    pub time: f64,
    /// Step count at the checkpoint.
    pub step: u64,
    /// Whether payloads include ghost rows.
    pub write_guard: bool,
    /// Number of processes that wrote the checkpoint. Absent in headers
    /// from older writers.
    pub n_procs: Option<u32>,
}

impl Header {
    /// Text form, one key per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(out, "time        = {}", self.time);
        let _ = writeln!(out, "step        = {}", self.step);
        let _ = writeln!(out, "write_guard = {}", self.write_guard);
        if let Some(n) = self.n_procs {
            let _ = writeln!(out, "n_procs     = {n}");
        }
        out
    }

    /// Parse header text. `path` is only used in error messages.
    ///
    /// `time` and `step` are required; `write_guard` defaults to `false`.
    /// Unknown keys and lines without `=` are ignored.
    pub fn parse(text: &str, path: &Path) -> Result<Self, CheckpointError> {
        let malformed = |line: usize, reason: String| CheckpointError::Malformed {
            path: path.to_path_buf(),
            line,
            reason,
        };

        let mut time = None;
        let mut step = None;
        let mut write_guard = false;
        let mut n_procs = None;
        for (idx, line) in text.lines().enumerate() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim();
            let lineno = idx + 1;
            match key.trim() {
                "time" => {
                    time = Some(value.parse::<f64>().map_err(|e| {
                        malformed(lineno, format!("bad time '{value}': {e}"))
                    })?)
                }
                "step" => {
                    step = Some(value.parse::<u64>().map_err(|e| {
                        malformed(lineno, format!("bad step '{value}': {e}"))
                    })?)
                }
                "write_guard" => {
                    write_guard = parse_bool(value).ok_or_else(|| {
                        malformed(lineno, format!("bad write_guard '{value}'"))
                    })?
                }
                "n_procs" => {
                    n_procs = Some(value.parse::<u32>().map_err(|e| {
                        malformed(lineno, format!("bad n_procs '{value}': {e}"))
                    })?)
                }
                _ => {}
            }
        }

        let end = text.lines().count();
        Ok(Self {
            time: time.ok_or_else(|| malformed(end, "missing 'time'".into()))?,
            step: step.ok_or_else(|| malformed(end, "missing 'step'".into()))?,
            write_guard,
            n_procs,
        })
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parse(text: &str) -> Result<Header, CheckpointError> {
        Header::parse(text, Path::new("header.txt"))
    }

    #[test]
    fn render_then_parse() {
        let h = Header {
            time: 0.1 + 0.2,
            step: 17,
            write_guard: true,
            n_procs: Some(4),
        };
        let text = h.render();
        assert!(text.starts_with("time        = 0.30000000000000004\n"));
        assert_eq!(parse(&text).unwrap(), h);
    }

    #[test]
    fn legacy_header_without_flags() {
        let h = parse("time        = 2.5\nstep        = 8\n").unwrap();
        assert_eq!(h.time, 2.5);
        assert_eq!(h.step, 8);
        assert!(!h.write_guard);
        assert_eq!(h.n_procs, None);
    }

    #[test]
    fn missing_step_is_malformed() {
        let err = parse("time = 1.0\n").unwrap_err();
        assert!(err.to_string().contains("missing 'step'"));
    }

    #[test]
    fn bad_number_reports_line() {
        let err = parse("time = 1.0\nstep = ten\n").unwrap_err();
        assert!(matches!(err, CheckpointError::Malformed { line: 2, .. }));
    }

    proptest! {
        #[test]
        fn any_clock_survives(time in 0.0f64..1e12, step in 0u64..u64::MAX, guard in any::<bool>()) {
            let h = Header { time, step, write_guard: guard, n_procs: None };
            prop_assert_eq!(parse(&h.render()).unwrap(), h);
        }
    }
}
