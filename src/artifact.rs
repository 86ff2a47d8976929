//! Static JSON artifacts, one per (fiscal year, unit)

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use log::debug;
use thiserror::Error;

use crate::models::EnergyBalance;
use crate::units::Unit;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode balance for {year} {unit}: {source}")]
    Encode {
        year: String,
        unit: Unit,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} is not a valid energy balance: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// `{dir}/energy-sankey-{year}-{unit}.json`
pub fn artifact_path(dir: &Path, year: &str, unit: Unit) -> PathBuf {
    dir.join(format!("energy-sankey-{}-{}.json", year, unit.slug()))
}

/// Serialize a balance as pretty-printed JSON
pub fn write_balance(path: &Path, balance: &EnergyBalance) -> Result<(), ArtifactError> {
    let json = serde_json::to_string_pretty(balance).map_err(|source| ArtifactError::Encode {
        year: balance.year.clone(),
        unit: balance.unit,
        source,
    })?;

    fs::write(path, json).map_err(|source| ArtifactError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Wrote {}", path.display());
    Ok(())
}

/// Load a previously written balance
pub fn read_balance(path: &Path) -> Result<EnergyBalance, ArtifactError> {
    let raw = fs::read_to_string(path).map_err(|source| ArtifactError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| ArtifactError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Which unit(s) a failure applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedUnit {
    One(Unit),
    All,
}

impl fmt::Display for FailedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailedUnit::One(unit) => write!(f, "{}", unit),
            FailedUnit::All => write!(f, "all units"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub year: String,
    pub unit: FailedUnit,
    pub error: String,
}

/// Outcome of a generation run
#[derive(Debug, Default)]
pub struct GenerateReport {
    pub expected: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<Failure>,
    pub sources: Vec<(String, String)>, // (year, consumption source)
}

impl GenerateReport {
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            ..Self::default()
        }
    }

    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    /// Record a failure covering `count` artifacts
    pub fn record_failure(&mut self, year: &str, unit: FailedUnit, count: usize, error: String) {
        self.failed += count;
        self.failures.push(Failure {
            year: year.to_string(),
            unit,
            error,
        });
    }

    /// 0 when everything was written, 1 when nothing was, 2 otherwise
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }

    pub fn exit_status(&self) -> u8 {
        if self.failed == 0 {
            0
        } else if self.succeeded == 0 {
            1
        } else {
            2
        }
    }
}

impl fmt::Display for GenerateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Summary ===")?;
        writeln!(f, "  Total expected:  {}", self.expected)?;
        writeln!(f, "  Succeeded:       {}", self.succeeded)?;
        writeln!(f, "  Failed:          {}", self.failed)?;

        if !self.sources.is_empty() {
            writeln!(f)?;
            writeln!(f, "  Consumption data sources:")?;
            for (year, source) in &self.sources {
                writeln!(f, "    {}: {}", year, source)?;
            }
        }

        if !self.failures.is_empty() {
            writeln!(f)?;
            writeln!(f, "  Failed combinations:")?;
            for failure in &self.failures {
                writeln!(f, "    - {} {}: {}", failure.year, failure.unit, failure.error)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology;
    use tempfile::tempdir;

    fn balance() -> EnergyBalance {
        EnergyBalance {
            nodes: topology::nodes(),
            links: vec![],
            unit: Unit::PetaJoules,
            year: "2021-22".to_string(),
            total_supply: 12.5,
            total_consumption: 7.25,
        }
    }

    #[test]
    fn paths_are_keyed_by_year_and_unit() {
        let dir = Path::new("public/data/mospi");
        assert_eq!(
            artifact_path(dir, "2023-24", Unit::KToE),
            dir.join("energy-sankey-2023-24-ktoe.json")
        );
        assert_eq!(
            artifact_path(dir, "2012-13", Unit::PetaJoules),
            dir.join("energy-sankey-2012-13-petajoules.json")
        );
    }

    #[test]
    fn written_balance_reads_back() {
        let dir = tempdir().unwrap();
        let path = artifact_path(dir.path(), "2021-22", Unit::PetaJoules);
        write_balance(&path, &balance()).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"totalSupply\": 12.5"));
        assert!(raw.contains("\"id\": \"solar_wind_others\""));
        assert_eq!(read_balance(&path).unwrap(), balance());
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");
        let err = write_balance(&path, &balance()).unwrap_err();
        assert!(matches!(err, ArtifactError::Write { .. }));
    }

    #[test]
    fn reading_garbage_is_a_decode_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{\"nodes\": 3}").unwrap();
        assert!(matches!(read_balance(&path), Err(ArtifactError::Decode { .. })));
        assert!(matches!(
            read_balance(&dir.path().join("absent.json")),
            Err(ArtifactError::Read { .. })
        ));
    }

    #[test]
    fn exit_status_reflects_partial_failure() {
        let mut report = GenerateReport::new(4);
        report.record_success();
        report.record_success();
        assert_eq!(report.exit_status(), 0);

        report.record_failure("2030-31", FailedUnit::All, 2, "No supply data".to_string());
        assert_eq!(report.exit_status(), 2);
        assert_eq!(report.failed, 2);

        let mut report = GenerateReport::new(2);
        report.record_failure("2030-31", FailedUnit::One(Unit::KToE), 1, "boom".to_string());
        assert_eq!(report.exit_status(), 1);
    }

    #[test]
    fn report_lists_failures() {
        let mut report = GenerateReport::new(2);
        report.record_success();
        report.record_failure("2011-12", FailedUnit::One(Unit::PetaJoules), 1, "disk full".to_string());
        report.sources.push(("2011-12".to_string(), "estimated".to_string()));

        let text = report.to_string();
        assert!(text.contains("Succeeded:       1"));
        assert!(text.contains("- 2011-12 PetaJoules: disk full"));
        assert!(text.contains("2011-12: estimated"));
    }
}
