//! Restart reader.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use sluice_core::{Rank, VarId};
use sluice_grid::FieldStore;

use crate::error::{CheckpointError, RestartMismatch};
use crate::header::Header;
use crate::layout::{parse_payload_rank, HEADER_FILE};

/// Load one block's payload into `store`.
///
/// Declared columns are matched to the registry by name. Every declared
/// name must be registered and every registered variable declared. The
/// payload must hold one row per interior cell, or per cell including
/// ghosts when `write_guard` is set. Positions in the file are not used;
/// coordinates come from the running grid.
pub fn read_payload<R: BufRead>(
    reader: R,
    path: &Path,
    store: &mut FieldStore,
    write_guard: bool,
) -> Result<(), CheckpointError> {
    let rank = store.domain().rank();
    let mut columns: Vec<VarId> = Vec::new();
    let mut seen = HashSet::new();
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(CheckpointError::io(path))?;
        if let Some(name) = line.trim_start().strip_prefix('#') {
            let name = name.trim();
            if name == "position" {
                continue;
            }
            let var = store.vars().get(name).map_err(|_| RestartMismatch::UnknownVariable {
                name: name.to_string(),
            })?;
            if !seen.insert(var) {
                return Err(RestartMismatch::DuplicateVariable {
                    name: name.to_string(),
                }
                .into());
            }
            columns.push(var);
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(str::parse::<f64>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CheckpointError::Malformed {
                path: path.to_path_buf(),
                line: idx + 1,
                reason: format!("bad number: {e}"),
            })?;
        rows.push(row);
    }

    for (var, name) in store.vars().iter() {
        if !seen.contains(&var) {
            return Err(RestartMismatch::MissingVariable {
                name: name.to_string(),
            }
            .into());
        }
    }

    let domain = store.domain();
    let (first, expected) = if write_guard {
        (domain.ilo(), domain.n_cells())
    } else {
        (domain.interior().start, domain.nx_local())
    };
    if rows.len() != expected {
        tracing::error!(%rank, found = rows.len(), expected, "payload length does not match grid");
        return Err(RestartMismatch::RowCount {
            rank,
            found: rows.len(),
            expected,
        }
        .into());
    }

    // Validate every row before the store is touched.
    let mut values = Vec::with_capacity(rows.len());
    for (k, row) in rows.iter().enumerate() {
        // First value is the position.
        let row_values = row.get(1..).unwrap_or(&[]);
        if row_values.len() != columns.len() {
            return Err(RestartMismatch::RowWidth {
                row: k,
                found: row_values.len(),
                expected: columns.len(),
            }
            .into());
        }
        values.push(row_values);
    }

    let data = store.data_mut();
    for (k, row_values) in values.into_iter().enumerate() {
        let i = first + k as i64;
        for (&var, &v) in columns.iter().zip(row_values) {
            data.set(i, var, v)?;
        }
    }
    Ok(())
}

/// Find the payload written by `rank`, whatever its zero padding.
fn find_payload(dir: &Path, rank: Rank, n_ranks: u32) -> Result<PathBuf, CheckpointError> {
    let missing = || CheckpointError::MissingPayload {
        dir: dir.to_path_buf(),
        rank,
    };
    if n_ranks == 1 {
        let path = dir.join("grid.dat");
        return if path.is_file() { Ok(path) } else { Err(missing()) };
    }
    for entry in fs::read_dir(dir).map_err(CheckpointError::io(dir))? {
        let entry = entry.map_err(CheckpointError::io(dir))?;
        let name = entry.file_name();
        if name.to_str().and_then(parse_payload_rank) == Some(rank.0) {
            return Ok(entry.path());
        }
    }
    Err(missing())
}

/// Group size implied by the payload files in `dir`.
///
/// `grid.dat` means a single process; otherwise one more than the highest
/// rank found. `None` when the directory holds no payloads.
fn infer_process_count(dir: &Path) -> Result<Option<u32>, CheckpointError> {
    if dir.join("grid.dat").is_file() {
        return Ok(Some(1));
    }
    let mut highest = None;
    for entry in fs::read_dir(dir).map_err(CheckpointError::io(dir))? {
        let entry = entry.map_err(CheckpointError::io(dir))?;
        if let Some(r) = entry.file_name().to_str().and_then(parse_payload_rank) {
            highest = highest.max(Some(r));
        }
    }
    Ok(highest.map(|r| r + 1))
}

/// Restore `store` from the checkpoint directory `dir` and return its
/// header.
///
/// Fails with [`RestartMismatch::ProcessCount`] when the header records a
/// different group size. Headers without a count are checked against the
/// payload files present. Each rank reads only its own payload.
pub fn read_checkpoint(
    dir: &Path,
    store: &mut FieldStore,
) -> Result<Header, CheckpointError> {
    let header_path = dir.join(HEADER_FILE);
    if !header_path.is_file() {
        return Err(CheckpointError::MissingHeader(header_path));
    }
    let text = fs::read_to_string(&header_path).map_err(CheckpointError::io(&header_path))?;
    let header = Header::parse(&text, &header_path)?;

    let domain = store.domain();
    let (rank, running) = (domain.rank(), domain.n_ranks());
    let written = match header.n_procs {
        Some(n) => Some(n),
        None => infer_process_count(dir)?,
    };
    if let Some(written) = written {
        if written != running {
            return Err(RestartMismatch::ProcessCount { written, running }.into());
        }
    }

    let path = find_payload(dir, rank, running)?;
    let file = File::open(&path).map_err(CheckpointError::io(&path))?;
    read_payload(BufReader::new(file), &path, store, header.write_guard)?;
    Ok(header)
}
