//! Checkpoint writer.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use sluice_comm::Communicator;
use sluice_core::{CellIndex, FieldError};
use sluice_grid::FieldStore;

use crate::error::CheckpointError;
use crate::header::Header;
use crate::layout::{CheckpointLayout, HEADER_FILE};

/// Column width for payload values.
const WIDTH: usize = 30;
/// Significant digits after the point; enough to round-trip an `f64`.
const PRECISION: usize = WIDTH - 8;

/// Write the payload for one block.
///
/// Rows cover the interior, or every cell when `write_guard` is set.
/// Generic over `W: Write` so tests can use `Vec<u8>`.
pub fn write_payload<W: Write>(
    mut w: W,
    store: &FieldStore,
    write_guard: bool,
) -> Result<(), CheckpointError> {
    let io = CheckpointError::io("<payload>");
    write_text(&mut w, store, write_guard).map_err(|e| match e {
        Payload::Io(source) => io(source),
        Payload::Field(f) => CheckpointError::Field(f),
    })
}

enum Payload {
    Io(std::io::Error),
    Field(FieldError),
}

impl From<std::io::Error> for Payload {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<FieldError> for Payload {
    fn from(e: FieldError) -> Self {
        Self::Field(e)
    }
}

fn write_text<W: Write>(w: &mut W, store: &FieldStore, write_guard: bool) -> Result<(), Payload> {
    writeln!(w, "# position")?;
    for (_, name) in store.vars().iter() {
        writeln!(w, "# {name}")?;
    }
    let domain = store.domain();
    let rows = if write_guard {
        domain.cells()
    } else {
        domain.interior()
    };
    for i in rows {
        write_row(w, store, i)?;
    }
    w.flush()?;
    Ok(())
}

fn write_row<W: Write>(w: &mut W, store: &FieldStore, i: CellIndex) -> Result<(), Payload> {
    let x = store.x(i)?;
    write!(w, "{x:>WIDTH$.PRECISION$e}")?;
    for v in store.data().row(i)? {
        write!(w, "   {v:>WIDTH$.PRECISION$e}")?;
    }
    writeln!(w)?;
    Ok(())
}

/// Writes numbered checkpoint directories for one rank of a run.
#[derive(Clone, Debug)]
pub struct CheckpointWriter {
    layout: CheckpointLayout,
    write_guard: bool,
}

impl CheckpointWriter {
    /// Writer following `layout`; `write_guard` includes ghost rows.
    pub fn new(layout: CheckpointLayout, write_guard: bool) -> Self {
        Self {
            layout,
            write_guard,
        }
    }

    /// Naming scheme in use.
    pub fn layout(&self) -> &CheckpointLayout {
        &self.layout
    }

    /// Write the checkpoint for `step`. Collective: every rank must call it.
    ///
    /// The root replaces any existing directory of the same name, and no
    /// rank writes until it exists. Returns the directory once every rank
    /// has finished its payload.
    pub fn write<C: Communicator + ?Sized>(
        &self,
        comm: &C,
        store: &FieldStore,
        time: f64,
        step: u64,
    ) -> Result<PathBuf, CheckpointError> {
        let dir = self.layout.step_dir(step);
        if comm.rank().is_root() {
            if dir.exists() {
                fs::remove_dir_all(&dir).map_err(CheckpointError::io(&dir))?;
            }
            fs::create_dir_all(&dir).map_err(CheckpointError::io(&dir))?;
            let header = Header {
                time,
                step,
                write_guard: self.write_guard,
                n_procs: Some(comm.size()),
            };
            let path = dir.join(HEADER_FILE);
            fs::write(&path, header.render()).map_err(CheckpointError::io(&path))?;
        }
        comm.barrier()?;

        let path = dir.join(self.layout.payload_name(comm.rank()));
        let file = File::create(&path).map_err(CheckpointError::io(&path))?;
        write_payload(BufWriter::new(file), store, self.write_guard).map_err(|e| match e {
            CheckpointError::Io { source, .. } => CheckpointError::Io {
                path: path.clone(),
                source,
            },
            other => other,
        })?;
        tracing::trace!(rank = %comm.rank(), path = %path.display(), "payload written");

        comm.barrier()?;
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sluice_comm::LocalComm;
    use sluice_core::{Rank, VarId};
    use sluice_grid::{Domain, DomainSpec, VarRegistry};

    fn store() -> FieldStore {
        let spec = DomainSpec {
            nx_global: 2,
            xmin: 0.0,
            xmax: 2.0,
            ng: 1,
        };
        let mut vars = VarRegistry::new();
        vars.add("rho").unwrap();
        vars.add("tracer").unwrap();
        let mut s = FieldStore::new(Domain::new(&spec, Rank(0), 1).unwrap(), vars);
        s.data_mut().set(0, VarId(0), 1.5).unwrap();
        s.data_mut().set(1, VarId(1), -2.0).unwrap();
        s
    }

    #[test]
    fn payload_text_format() {
        let mut buf = Vec::new();
        write_payload(&mut buf, &store(), false).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(&lines[..3], &["# position", "# rho", "# tracer"]);
        assert_eq!(lines.len(), 5);
        let row0: Vec<f64> = lines[3]
            .split_whitespace()
            .map(|t| t.parse().unwrap())
            .collect();
        assert_eq!(row0, vec![0.5, 1.5, 0.0]);
        assert_eq!(lines[3].len(), 3 * WIDTH + 2 * 3);
    }

    #[test]
    fn guarded_payload_has_ghost_rows() {
        let mut buf = Vec::new();
        write_payload(&mut buf, &store(), true).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().filter(|l| !l.starts_with('#')).count(), 4);
    }

    #[test]
    fn rewrite_replaces_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let w = CheckpointWriter::new(CheckpointLayout::new(tmp.path(), 100, 1), false);
        let dir = w.write(&LocalComm, &store(), 0.0, 3).unwrap();
        fs::write(dir.join("stale.txt"), "x").unwrap();
        let again = w.write(&LocalComm, &store(), 0.0, 3).unwrap();
        assert_eq!(dir, again);
        assert!(!dir.join("stale.txt").exists());
        assert!(dir.join("header.txt").exists());
        assert!(dir.join("grid.dat").exists());
        assert_eq!(dir.file_name().and_then(|n| n.to_str()), Some("step_000003"));
    }
}
