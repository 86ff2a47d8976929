//! Saved MoSPI Energy Balance API responses
//!
//! Reads JSON pages captured from the eSankhyiki `fetchData` endpoint,
//! turns their rows into energy rows and derives a balance from them. When
//! that fails the pre-generated static artifact is used instead, once, with
//! no retry.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Deserialize;
use thiserror::Error;
use walkdir::WalkDir;

use crate::artifact::{ArtifactError, read_balance};
use crate::models::{EnergyBalance, EnergyRow};
use crate::transform::transform;
use crate::units::Unit;

/// Supply-side sector names; every other sector is consumption
const SUPPLY_SECTORS: [&str; 5] = [
    "Production",
    "Imports",
    "Exports",
    "Stock changes",
    "Total primary energy supply",
];

#[derive(Debug, Error)]
pub enum MospiError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("{path} is not an API response: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("MoSPI API returned error in {path}: {msg}")]
    Api { path: PathBuf, msg: String },

    #[error("page {page} of {total} missing under {dir}")]
    MissingPage { dir: PathBuf, page: u32, total: u32 },

    #[error("no response pages found under {0}")]
    NoPages(PathBuf),

    #[error("no supply rows for {0}")]
    NoRows(String),
}

/// Pagination block; record counts are not needed
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u32,
    pub total_pages: u32,
}

/// Response envelope; `statusCode` false means failure whatever else it holds
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    pub data: Option<Vec<ApiRow>>,
    pub meta_data: PageMeta,
    #[serde(default)]
    pub msg: String,
    #[serde(rename = "statusCode")]
    pub status_code: bool,
}

/// Raw row. The unit and balance side are implied by the query and the sector.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiRow {
    pub year: String,
    pub energy_commodities: String,
    pub end_use_sector: String,
    pub end_use_sub_sector: Option<String>,
    pub value: Option<f64>,
}

impl ApiRow {
    /// The row as an energy row, or `None` when the API left its value null
    pub fn into_energy_row(self) -> Option<EnergyRow> {
        Some(EnergyRow {
            value: self.value?,
            year: self.year,
            commodity: self.energy_commodities,
            sector: self.end_use_sector,
            sub_sector: self.end_use_sub_sector.filter(|s| !s.is_empty()),
        })
    }
}

/// Rows split by side of the balance
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BalanceRows {
    pub supply: Vec<EnergyRow>,
    pub consumption: Vec<EnergyRow>,
}

impl BalanceRows {
    pub fn push(&mut self, row: EnergyRow) {
        if SUPPLY_SECTORS.contains(&row.sector.as_str()) {
            self.supply.push(row);
        } else {
            self.consumption.push(row);
        }
    }
}

/// Parse one saved page, rejecting responses flagged as errors
pub fn parse_page(raw: &str, path: &Path) -> Result<ApiResponse, MospiError> {
    let response: ApiResponse = serde_json::from_str(raw).map_err(|source| MospiError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    if !response.status_code {
        return Err(MospiError::Api {
            path: path.to_path_buf(),
            msg: response.msg,
        });
    }

    Ok(response)
}

/// Find all saved response pages under `dir`
pub fn find_page_files(dir: &Path) -> Result<Vec<PathBuf>, MospiError> {
    let mut pages = Vec::new();

    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|source| MospiError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
            pages.push(path.to_path_buf());
        }
    }

    Ok(pages)
}

/// Load every page under `dir` and keep the rows for `year`.
///
/// Pages belonging to one query are expected to sit in the same directory,
/// and every page from 1 to `totalPages` must be present.
pub fn load_rows(dir: &Path, year: &str) -> Result<BalanceRows, MospiError> {
    let files = find_page_files(dir)?;
    if files.is_empty() {
        return Err(MospiError::NoPages(dir.to_path_buf()));
    }

    let mut seen: BTreeMap<PathBuf, (BTreeSet<u32>, u32)> = BTreeMap::new();
    let mut rows = BalanceRows::default();

    for path in &files {
        let raw = fs::read_to_string(path).map_err(|source| MospiError::Io {
            path: path.clone(),
            source,
        })?;
        let response = parse_page(&raw, path)?;
        debug!(
            "{}: page {} of {}",
            path.display(),
            response.meta_data.page,
            response.meta_data.total_pages
        );

        let group = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let (pages, total) = seen.entry(group).or_default();
        pages.insert(response.meta_data.page);
        *total = (*total).max(response.meta_data.total_pages);

        for row in response.data.unwrap_or_default() {
            if row.year != year {
                continue;
            }
            match row.into_energy_row() {
                Some(row) => rows.push(row),
                None => debug!("{}: skipping row with null value", path.display()),
            }
        }
    }

    for (group, (pages, total)) in &seen {
        if let Some(page) = (1..=*total).find(|p| !pages.contains(p)) {
            return Err(MospiError::MissingPage {
                dir: group.clone(),
                page,
                total: *total,
            });
        }
    }

    if rows.supply.is_empty() {
        return Err(MospiError::NoRows(year.to_string()));
    }

    info!(
        "Loaded {} supply and {} consumption rows for {} from {} pages",
        rows.supply.len(),
        rows.consumption.len(),
        year,
        files.len()
    );
    Ok(rows)
}

/// Derive a balance from saved API pages already expressed in `unit`
pub fn derive_balance(dir: &Path, year: &str, unit: Unit) -> Result<EnergyBalance, MospiError> {
    let rows = load_rows(dir, year)?;
    Ok(transform(&rows.supply, &rows.consumption, unit, year))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BalanceOrigin {
    Live,
    Static(PathBuf),
}

#[derive(Debug, Error)]
#[error("live balance failed ({live}) and static fallback failed ({fallback})")]
pub struct FallbackError {
    pub live: MospiError,
    pub fallback: ArtifactError,
}

/// Try the live derivation, substituting the static artifact on failure
pub fn balance_with_fallback<F>(
    live: F,
    fallback: &Path,
) -> Result<(EnergyBalance, BalanceOrigin), FallbackError>
where
    F: FnOnce() -> Result<EnergyBalance, MospiError>,
{
    match live() {
        Ok(balance) => Ok((balance, BalanceOrigin::Live)),
        Err(live) => {
            warn!("Live balance unavailable: {}", live);
            warn!("Falling back to {}", fallback.display());
            match read_balance(fallback) {
                Ok(balance) => Ok((balance, BalanceOrigin::Static(fallback.to_path_buf()))),
                Err(fallback) => Err(FallbackError { live, fallback }),
            }
        }
    }
}
