//! Checkpoint directory and file naming.

use std::path::{Path, PathBuf};

use sluice_core::Rank;

/// Minimum zero-padding for step and rank numbers.
const MIN_WIDTH: usize = 6;

/// Name of the header file inside a checkpoint directory.
pub const HEADER_FILE: &str = "header.txt";

/// Decimal digits needed for `x` (1 for zero).
fn digits(mut x: u64) -> usize {
    let mut n = 1;
    while x >= 10 {
        x /= 10;
        n += 1;
    }
    n
}

/// Zero-padding width for numbers up to `max`: its digit count, but at
/// least six.
pub fn padded_width(max: u64) -> usize {
    digits(max).max(MIN_WIDTH)
}

/// Rank embedded in a payload file name such as `grid_0003.dat`.
///
/// Any amount of zero padding is accepted. Returns `None` for `grid.dat`
/// and for names that are not payloads.
pub fn parse_payload_rank(file_name: &str) -> Option<u32> {
    let digits = file_name.strip_prefix("grid_")?.strip_suffix(".dat")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Where checkpoints for one run live and how their files are named.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckpointLayout {
    output_dir: PathBuf,
    step_width: usize,
    rank_width: usize,
    n_ranks: u32,
}

impl CheckpointLayout {
    /// Layout under `output_dir` for a run of at most `max_steps` steps on
    /// `n_ranks` processes.
    pub fn new(output_dir: impl Into<PathBuf>, max_steps: u64, n_ranks: u32) -> Self {
        Self {
            output_dir: output_dir.into(),
            step_width: padded_width(max_steps),
            rank_width: padded_width(u64::from(n_ranks)),
            n_ranks,
        }
    }

    /// Parent directory of every checkpoint.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Padding applied to step numbers.
    pub fn step_width(&self) -> usize {
        self.step_width
    }

    /// Padding applied to rank numbers.
    pub fn rank_width(&self) -> usize {
        self.rank_width
    }

    /// Directory for the checkpoint taken at `step`.
    pub fn step_dir(&self, step: u64) -> PathBuf {
        self.output_dir
            .join(format!("step_{step:0width$}", width = self.step_width))
    }

    /// Payload file name for `rank`.
    pub fn payload_name(&self, rank: Rank) -> String {
        if self.n_ranks == 1 {
            "grid.dat".to_string()
        } else {
            format!("grid_{:0width$}.dat", rank.0, width = self.rank_width)
        }
    }
}
