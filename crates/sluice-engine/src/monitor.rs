//! Per-step diagnostics file.
//!
//! Each record holds the simulated time and the global integral
//! `Σ q * dx` of every variable. With periodic boundaries the integrals
//! are conserved, so drift in this file flags a broken halo or update.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use sluice_comm::Communicator;
use sluice_core::VarId;
use sluice_grid::FieldStore;

use crate::error::SolverError;

const WIDTH: usize = 13;

/// Appends one line per call to the monitor file on the root.
///
/// Every rank holds a `Monitor` because the totals are a collective
/// reduction; only the root holds the open file.
#[derive(Debug)]
pub struct Monitor {
    out: Option<(PathBuf, BufWriter<File>)>,
    vars: Vec<VarId>,
}

impl Monitor {
    /// Open `path` for appending on the root and write a column header.
    pub fn open<C: Communicator + ?Sized>(
        comm: &C,
        path: &Path,
        store: &FieldStore,
    ) -> Result<Self, SolverError> {
        let vars = store.vars().iter().map(|(v, _)| v).collect();
        let out = if comm.rank().is_root() {
            let io = |source| SolverError::Io {
                path: path.to_path_buf(),
                source,
            };
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(io)?;
            let mut w = BufWriter::new(file);
            writeln!(w, "\n#{}", "=".repeat(78)).map_err(io)?;
            write!(w, "# {:>WIDTH$}", "time").map_err(io)?;
            for (_, name) in store.vars().iter() {
                write!(w, "  {name:>WIDTH$}").map_err(io)?;
            }
            writeln!(w).map_err(io)?;
            w.flush().map_err(io)?;
            Some((path.to_path_buf(), w))
        } else {
            None
        };
        Ok(Self { out, vars })
    }

    /// Append a record for the current state. Collective.
    pub fn record<C: Communicator + ?Sized>(
        &mut self,
        comm: &C,
        store: &FieldStore,
        time: f64,
    ) -> Result<(), SolverError> {
        let local = self
            .vars
            .iter()
            .map(|&v| store.local_total(v))
            .collect::<Result<Vec<_>, _>>()?;
        let totals = comm.all_reduce_sum(&local)?;
        if let Some((path, w)) = &mut self.out {
            let io = |source| SolverError::Io {
                path: path.clone(),
                source,
            };
            write!(w, "  {time:>WIDTH$.6e}").map_err(io)?;
            for t in &totals {
                write!(w, "  {t:>WIDTH$.6e}").map_err(io)?;
            }
            writeln!(w).map_err(io)?;
            w.flush().map_err(io)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sluice_comm::LocalComm;
    use sluice_core::Rank;
    use sluice_grid::{Domain, DomainSpec, VarRegistry};

    #[test]
    fn header_then_records() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("monitor.dat");
        let spec = DomainSpec {
            nx_global: 4,
            xmin: 0.0,
            xmax: 2.0,
            ng: 1,
        };
        let mut vars = VarRegistry::new();
        vars.add("data").unwrap();
        let mut s = FieldStore::new(Domain::new(&spec, Rank(0), 1).unwrap(), vars);
        s.data_mut().fill(3.0);

        let mut m = Monitor::open(&LocalComm, &path, &s).unwrap();
        m.record(&LocalComm, &s, 0.0).unwrap();
        m.record(&LocalComm, &s, 0.5).unwrap();
        drop(m);

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().filter(|l| !l.is_empty()).collect();
        assert!(lines[0].starts_with("#==="));
        assert!(lines[1].contains("time") && lines[1].contains("data"));
        let rec: Vec<f64> = lines[3]
            .split_whitespace()
            .map(|t| t.parse().unwrap())
            .collect();
        assert_eq!(rec, vec![0.5, 6.0]);
    }
}
