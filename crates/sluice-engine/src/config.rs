//! Run configuration, parameter lookup and validation.
//!
//! [`Parameters`] is a case-insensitive `Section.key` view over a TOML
//! document plus command-line overrides. [`RunConfig::from_parameters`]
//! reads every key the solver uses, applying defaults, and
//! [`RunConfig::validate`] checks structural invariants before any grid
//! is allocated.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use toml::{Table, Value};

use crate::initial::GaussianPulse;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while reading or validating the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The parameter file could not be read.
    #[error("cannot read parameter file {}: {source}", path.display())]
    Read {
        /// File that was opened.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The parameter file is not valid TOML.
    #[error("cannot parse parameters: {0}")]
    Parse(#[from] toml::de::Error),
    /// A top-level entry is not a `[Section]` table.
    #[error("'{0}' is not inside a section")]
    Unsectioned(String),
    /// A required parameter is absent.
    #[error("required parameter '{key}' not found")]
    Missing {
        /// `Section.key` name.
        key: String,
    },
    /// A parameter is present but unusable.
    #[error("parameter '{key}': {reason}")]
    BadValue {
        /// `Section.key` name.
        key: String,
        /// What was wrong.
        reason: String,
    },
    /// A command-line override is not of the form `Section.key=value`.
    #[error("override '{0}' is not of the form Section.key=value")]
    BadOverride(String),
}

// ── Parameters ─────────────────────────────────────────────────────

/// Sectioned key–value parameters.
///
/// Section and key names are matched case-insensitively, so `Grid.Nx`
/// and `grid.nx` name the same value.
///
/// # Examples
///
/// ```
/// use sluice_engine::Parameters;
///
/// let p = Parameters::from_toml_str("[Grid]\nNx = 64\n").unwrap();
/// assert_eq!(p.required::<usize>("Grid.Nx").unwrap(), 64);
/// assert_eq!(p.optional("Hydro.f_cfl", 0.75).unwrap(), 0.75);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Parameters {
    sections: Table,
}

fn split_key(key: &str) -> Option<(String, String)> {
    let (section, name) = key.split_once('.')?;
    let (section, name) = (section.trim(), name.trim());
    if section.is_empty() || name.is_empty() {
        return None;
    }
    Some((section.to_lowercase(), name.to_lowercase()))
}

impl Parameters {
    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let doc: Table = text.parse()?;
        let mut sections = Table::new();
        for (section, body) in doc {
            let Value::Table(body) = body else {
                return Err(ConfigError::Unsectioned(section));
            };
            let entry = sections
                .entry(section.to_lowercase())
                .or_insert_with(|| Value::Table(Table::new()));
            if let Value::Table(t) = entry {
                for (k, v) in body {
                    t.insert(k.to_lowercase(), v);
                }
            }
        }
        Ok(Self { sections })
    }

    /// Read and parse a TOML parameter file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply `Section.key=value`. The value is read as a TOML literal,
    /// falling back to a bare string.
    pub fn set_override(&mut self, assignment: &str) -> Result<(), ConfigError> {
        let bad = || ConfigError::BadOverride(assignment.to_string());
        let (key, raw) = assignment.split_once('=').ok_or_else(bad)?;
        let (section, name) = split_key(key).ok_or_else(bad)?;
        let raw = raw.trim();
        let value = format!("v = {raw}")
            .parse::<Table>()
            .ok()
            .and_then(|mut t| t.remove("v"))
            .unwrap_or_else(|| Value::String(raw.to_string()));
        let entry = self
            .sections
            .entry(section)
            .or_insert_with(|| Value::Table(Table::new()));
        match entry {
            Value::Table(t) => {
                t.insert(name, value);
                Ok(())
            }
            _ => Err(bad()),
        }
    }

    fn lookup(&self, key: &str) -> Option<&Value> {
        let (section, name) = split_key(key)?;
        self.sections
            .get(&section)
            .and_then(Value::as_table)
            .and_then(|t| t.get(&name))
    }

    fn convert<T: DeserializeOwned>(key: &str, value: &Value) -> Result<T, ConfigError> {
        value.clone().try_into().map_err(|e: toml::de::Error| ConfigError::BadValue {
            key: key.to_string(),
            reason: e.message().to_string(),
        })
    }

    /// Whether `key` is set.
    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Value of a parameter that must be present.
    pub fn required<T: DeserializeOwned>(&self, key: &str) -> Result<T, ConfigError> {
        let value = self.lookup(key).ok_or_else(|| ConfigError::Missing {
            key: key.to_string(),
        })?;
        Self::convert(key, value)
    }

    /// Value of a parameter, or `default` when absent.
    pub fn optional<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T, ConfigError> {
        match self.lookup(key) {
            Some(value) => Self::convert(key, value),
            None => Ok(default),
        }
    }
}

// ── RunConfig ──────────────────────────────────────────────────────

/// `[Grid]`: global geometry and payload layout.
#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    /// Global interior cell count (`Grid.Nx`).
    pub nx: usize,
    /// Lower bound (`Grid.xmin`).
    pub xmin: f64,
    /// Upper bound (`Grid.xmax`).
    pub xmax: f64,
    /// Minimum ghost width (`Grid.Ng`), raised to the physics stencil.
    pub ng: usize,
    /// Include ghost rows in checkpoints (`Grid.write_guard`).
    pub write_guard: bool,
}

/// `[Hydro]`: advection physics.
#[derive(Clone, Debug, PartialEq)]
pub struct HydroConfig {
    /// Advection speed (`Hydro.v_adv`).
    pub v_adv: f64,
    /// CFL fraction (`Hydro.f_cfl`).
    pub f_cfl: f64,
}

/// `[Driver]`: termination, output cadence and file locations.
#[derive(Clone, Debug, PartialEq)]
pub struct DriverConfig {
    /// Stop once simulated time reaches this (`Driver.tmax`).
    pub tmax: f64,
    /// Stop after this many steps (`Driver.max_steps`).
    pub max_steps: u64,
    /// Simulated time between checkpoints; 0 disables (`Driver.output_dt`).
    pub output_dt: f64,
    /// Steps between checkpoints; 0 disables (`Driver.output_dn`).
    pub output_dn: u64,
    /// Parent directory for checkpoints and the monitor file.
    pub output_dir: PathBuf,
    /// Checkpoint to restart from (`Driver.restart_dir`), if any.
    pub restart_dir: Option<PathBuf>,
    /// File whose presence requests a clean stop (`Driver.stop_file`).
    pub stop_file: PathBuf,
}

/// `[InitConds]`: variables and their starting profile.
#[derive(Clone, Debug, PartialEq)]
pub struct InitConfig {
    /// Variables to create and fill (`InitConds.variables`).
    pub variables: Vec<String>,
    /// Profile applied to each of them.
    pub pulse: GaussianPulse,
}

/// `[Monitor]`: per-step diagnostics file.
#[derive(Clone, Debug, PartialEq)]
pub struct MonitorConfig {
    /// Write the monitor file (`Monitor.enabled`).
    pub enabled: bool,
    /// File name inside the output directory (`Monitor.monitor_file`).
    pub file: PathBuf,
}

/// Everything the driver needs to set up and run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    /// Grid section.
    pub grid: GridConfig,
    /// Hydro section.
    pub hydro: HydroConfig,
    /// Driver section.
    pub driver: DriverConfig,
    /// Initial conditions section.
    pub init: InitConfig,
    /// Monitor section.
    pub monitor: MonitorConfig,
}

fn dir_or_cwd(s: String) -> PathBuf {
    if s.is_empty() {
        PathBuf::from(".")
    } else {
        PathBuf::from(s)
    }
}

impl RunConfig {
    /// Read every solver key from `p`, applying defaults.
    pub fn from_parameters(p: &Parameters) -> Result<Self, ConfigError> {
        let grid = GridConfig {
            nx: p.required("Grid.Nx")?,
            xmin: p.required("Grid.xmin")?,
            xmax: p.required("Grid.xmax")?,
            ng: p.optional("Grid.Ng", 1)?,
            write_guard: p.optional("Grid.write_guard", false)?,
        };
        let hydro = HydroConfig {
            v_adv: p.optional("Hydro.v_adv", 1.0)?,
            f_cfl: p.optional("Hydro.f_cfl", 0.75)?,
        };
        let restart: String = p.optional("Driver.restart_dir", String::new())?;
        let driver = DriverConfig {
            tmax: p.required("Driver.tmax")?,
            max_steps: p.optional("Driver.max_steps", 999_999)?,
            output_dt: p.optional("Driver.output_dt", 0.0)?,
            output_dn: p.optional("Driver.output_dn", 0)?,
            output_dir: dir_or_cwd(p.optional("Driver.output_dir", "output/".to_string())?),
            restart_dir: (!restart.is_empty()).then(|| PathBuf::from(restart)),
            stop_file: PathBuf::from(p.optional("Driver.stop_file", "_force_quit".to_string())?),
        };
        let defaults = GaussianPulse::default();
        let init = InitConfig {
            variables: p.optional("InitConds.variables", vec!["data".to_string()])?,
            pulse: GaussianPulse {
                x0: p.optional("InitConds.x0", defaults.x0)?,
                width: p.optional("InitConds.dx", defaults.width)?,
                y0: p.optional("InitConds.y0", defaults.y0)?,
                dy: p.optional("InitConds.dy", defaults.dy)?,
            },
        };
        let monitor = MonitorConfig {
            enabled: p.optional("Monitor.enabled", false)?,
            file: PathBuf::from(p.optional("Monitor.monitor_file", "monitor.dat".to_string())?),
        };
        Ok(Self {
            grid,
            hydro,
            driver,
            init,
            monitor,
        })
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bad = |key: &str, reason: String| {
            Err(ConfigError::BadValue {
                key: key.to_string(),
                reason,
            })
        };
        if self.grid.nx == 0 {
            return bad("Grid.Nx", "must be positive".into());
        }
        if !(self.grid.xmin.is_finite() && self.grid.xmax.is_finite()) {
            return bad("Grid.xmin", "bounds must be finite".into());
        }
        if self.grid.xmax <= self.grid.xmin {
            return bad(
                "Grid.xmax",
                format!("must exceed xmin ({} <= {})", self.grid.xmax, self.grid.xmin),
            );
        }
        if !self.hydro.v_adv.is_finite() {
            return bad("Hydro.v_adv", format!("must be finite, got {}", self.hydro.v_adv));
        }
        if !(self.hydro.f_cfl > 0.0 && self.hydro.f_cfl <= 1.0) {
            return bad("Hydro.f_cfl", format!("must be in (0, 1], got {}", self.hydro.f_cfl));
        }
        if !(self.driver.tmax.is_finite() && self.driver.tmax >= 0.0) {
            return bad("Driver.tmax", format!("must be finite and >= 0, got {}", self.driver.tmax));
        }
        if !(self.driver.output_dt.is_finite() && self.driver.output_dt >= 0.0) {
            return bad(
                "Driver.output_dt",
                format!("must be finite and >= 0, got {}", self.driver.output_dt),
            );
        }
        if self.init.variables.is_empty() {
            return bad("InitConds.variables", "at least one variable is required".into());
        }
        if !(self.init.pulse.width.is_finite() && self.init.pulse.width != 0.0) {
            return bad("InitConds.dx", format!("must be finite and non-zero, got {}", self.init.pulse.width));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "\
[Grid]
Nx = 8
xmin = 0.0
xmax = 8.0

[Driver]
tmax = 1.0
";

    #[test]
    fn defaults_fill_optional_keys() {
        let cfg = RunConfig::from_parameters(&Parameters::from_toml_str(MINIMAL).unwrap()).unwrap();
        assert_eq!(cfg.grid.nx, 8);
        assert_eq!(cfg.grid.ng, 1);
        assert!(!cfg.grid.write_guard);
        assert_eq!(cfg.hydro.v_adv, 1.0);
        assert_eq!(cfg.hydro.f_cfl, 0.75);
        assert_eq!(cfg.driver.max_steps, 999_999);
        assert_eq!(cfg.driver.output_dir, PathBuf::from("output/"));
        assert_eq!(cfg.driver.restart_dir, None);
        assert_eq!(cfg.driver.stop_file, PathBuf::from("_force_quit"));
        assert_eq!(cfg.init.variables, vec!["data".to_string()]);
        assert_eq!(cfg.init.pulse, GaussianPulse::default());
        assert!(!cfg.monitor.enabled);
        cfg.validate().unwrap();
    }

    #[test]
    fn missing_required_key() {
        let p = Parameters::from_toml_str("[Grid]\nNx = 8\n").unwrap();
        let err = RunConfig::from_parameters(&p).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { ref key } if key == "Grid.xmin"));
        assert_eq!(err.to_string(), "required parameter 'Grid.xmin' not found");
    }

    #[test]
    fn keys_are_case_insensitive() {
        let p = Parameters::from_toml_str("[grid]\nNX = 3\n[GRID]\nxMin = 1.5\n").unwrap();
        assert_eq!(p.required::<usize>("Grid.Nx").unwrap(), 3);
        assert_eq!(p.required::<f64>("grid.XMIN").unwrap(), 1.5);
    }

    #[test]
    fn wrong_type_is_bad_value() {
        let p = Parameters::from_toml_str("[Grid]\nNx = \"many\"\n").unwrap();
        assert!(matches!(
            p.required::<usize>("Grid.Nx"),
            Err(ConfigError::BadValue { .. })
        ));
    }

    #[test]
    fn unsectioned_key_rejected() {
        assert!(matches!(
            Parameters::from_toml_str("Nx = 3\n"),
            Err(ConfigError::Unsectioned(ref k)) if k == "Nx"
        ));
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut p = Parameters::from_toml_str(MINIMAL).unwrap();
        p.set_override("Grid.Nx=32").unwrap();
        p.set_override("Driver.output_dir = runs/a").unwrap();
        p.set_override("InitConds.variables=[\"rho\", \"tracer\"]").unwrap();
        let cfg = RunConfig::from_parameters(&p).unwrap();
        assert_eq!(cfg.grid.nx, 32);
        assert_eq!(cfg.driver.output_dir, PathBuf::from("runs/a"));
        assert_eq!(cfg.init.variables, vec!["rho".to_string(), "tracer".to_string()]);
        assert!(matches!(
            p.set_override("nonsense"),
            Err(ConfigError::BadOverride(_))
        ));
    }

    #[test]
    fn empty_dirs() {
        let mut p = Parameters::from_toml_str(MINIMAL).unwrap();
        p.set_override("Driver.output_dir=\"\"").unwrap();
        p.set_override("Driver.restart_dir=\"\"").unwrap();
        let cfg = RunConfig::from_parameters(&p).unwrap();
        assert_eq!(cfg.driver.output_dir, PathBuf::from("."));
        assert_eq!(cfg.driver.restart_dir, None);
    }

    #[test]
    fn validation_rejects_bad_geometry() {
        let mut cfg =
            RunConfig::from_parameters(&Parameters::from_toml_str(MINIMAL).unwrap()).unwrap();
        cfg.grid.xmax = -1.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::BadValue { ref key, .. }) if key == "Grid.xmax"));
        cfg.grid.xmax = 8.0;
        cfg.hydro.f_cfl = 1.2;
        assert!(cfg.validate().is_err());
        cfg.hydro.f_cfl = 0.5;
        cfg.init.variables.clear();
        assert!(cfg.validate().is_err());
    }
}
