//! Energy Sankey generator
//!
//! Builds static Sankey flow artifacts from India's national energy
//! balance (MoSPI), one JSON file per fiscal year and unit.

mod artifact;
mod dataset;
mod estimate;
mod models;
mod mospi;
mod overrides;
mod resolve;
mod rows;
mod topology;
mod transform;
mod units;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::{info, warn};

use crate::artifact::{FailedUnit, GenerateReport, artifact_path, write_balance};
use crate::dataset::{ENERGY_YEARS, EnergyDataset};
use crate::models::{EnergyBalance, EnergyRow, parse_fiscal_year};
use crate::mospi::{BalanceOrigin, balance_with_fallback, derive_balance};
use crate::overrides::{Overrides, load_overrides};
use crate::resolve::{ConsumptionSource, resolve_consumption};
use crate::rows::{consumption_rows_for, supply_rows_for};
use crate::transform::{format_flows, summarize_balance, transform};
use crate::units::{Unit, to_unit};

#[derive(Parser)]
#[command(name = "energy-sankey")]
#[command(about = "Static energy balance Sankey generator for India")]
struct Cli {
    /// Directory artifacts are written to
    #[arg(short, long, default_value = "public/data/mospi")]
    output_dir: PathBuf,

    /// Optional consumption overrides (JSON keyed by fiscal year)
    #[arg(long, default_value = "raw-data/consumption-overrides.json")]
    overrides: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate artifacts for every (year, unit) pair
    Generate {
        /// Fiscal year to generate (repeatable, default: all embedded years)
        #[arg(short, long = "year", value_parser = parse_fiscal_year)]
        years: Vec<String>,

        /// Unit to generate (repeatable, default: ktoe and petajoules)
        #[arg(short, long = "unit")]
        units: Vec<Unit>,
    },

    /// Build one balance and print its summary
    Show {
        /// Fiscal year, e.g. "2023-24"
        #[arg(value_parser = parse_fiscal_year)]
        year: String,

        #[arg(short, long, default_value = "ktoe")]
        unit: Unit,

        /// List every flow
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the estimated consumption for a year with supply data
    Estimate {
        #[arg(value_parser = parse_fiscal_year)]
        year: String,
    },

    /// Derive a balance from saved MoSPI API pages, falling back to the static artifact
    Import {
        /// Directory of saved API response pages (searched recursively)
        dir: PathBuf,

        #[arg(short, long, value_parser = parse_fiscal_year)]
        year: String,

        /// Unit the saved pages are expressed in
        #[arg(short, long, default_value = "ktoe")]
        unit: Unit,

        /// Static artifact to use if the pages are unusable
        #[arg(long)]
        fallback: Option<PathBuf>,

        /// Persist the resulting balance into the output directory
        #[arg(long)]
        write: bool,
    },

    /// List embedded years and where their consumption data comes from
    Years,
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let dataset = EnergyDataset::embedded();

    match cli.command {
        Commands::Generate { years, units } => {
            let years = if years.is_empty() {
                ENERGY_YEARS.iter().map(|y| y.to_string()).collect()
            } else {
                years
            };
            let units = if units.is_empty() { Unit::ALL.to_vec() } else { units };

            let overrides = load_overrides(&cli.overrides);
            let report = generate(&dataset, &overrides, &years, &units, &cli.output_dir)?;
            println!("\n{}", report);
            return Ok(report.exit_code());
        }

        Commands::Show { year, unit, verbose } => {
            let overrides = load_overrides(&cli.overrides);
            let Some((supply, consumption, source)) = year_rows(&dataset, &overrides, &year) else {
                bail!("No supply data for {}", year);
            };

            let balance = build_balance(&supply, &consumption, unit, &year);
            if verbose {
                println!("Flows:\n");
                println!("{}", format_flows(&balance));
            }
            println!("{}", summarize_balance(&balance));
            println!("Consumption source: {}", source);
        }

        Commands::Estimate { year } => {
            let Some(supply) = dataset.supply_for(&year) else {
                bail!("No supply data for {}", year);
            };
            let consumption = estimate::estimate(supply);
            println!("{}", serde_json::to_string_pretty(&consumption)?);
        }

        Commands::Import {
            dir,
            year,
            unit,
            fallback,
            write,
        } => {
            let fallback = fallback.unwrap_or_else(|| artifact_path(&cli.output_dir, &year, unit));
            let (balance, origin) =
                balance_with_fallback(|| derive_balance(&dir, &year, unit), &fallback)?;

            match &origin {
                BalanceOrigin::Live => println!("Balance derived from {}", dir.display()),
                BalanceOrigin::Static(path) => println!("Balance read from {}", path.display()),
            }
            println!("{}", summarize_balance(&balance));

            if write {
                fs::create_dir_all(&cli.output_dir)
                    .with_context(|| format!("creating {}", cli.output_dir.display()))?;
                let path = artifact_path(&cli.output_dir, &year, unit);
                write_balance(&path, &balance)?;
                println!("Wrote {}", path.display());
            }
        }

        Commands::Years => {
            let overrides = load_overrides(&cli.overrides);
            println!("{:<10} {}", "Year", "Consumption source");
            println!("{}", "-".repeat(32));
            for year in dataset.years() {
                let resolved = resolve_consumption(year, &dataset, &overrides);
                println!("{:<10} {}", year, resolved.source);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Supply rows, consumption rows and the consumption source for one year,
/// or `None` when the year has no supply data
fn year_rows(
    dataset: &EnergyDataset,
    overrides: &Overrides,
    year: &str,
) -> Option<(Vec<EnergyRow>, Vec<EnergyRow>, ConsumptionSource)> {
    let supply = dataset
        .supply_for(year)
        .map(|s| supply_rows_for(year, s))
        .unwrap_or_default();
    if supply.is_empty() {
        return None;
    }

    let resolved = resolve_consumption(year, dataset, overrides);
    info!("{}: consumption from {}", year, resolved.source);
    let consumption = consumption_rows_for(year, &resolved.data);

    Some((supply, consumption, resolved.source))
}

/// Rescale the rows into `unit` and transform them
fn build_balance(supply: &[EnergyRow], consumption: &[EnergyRow], unit: Unit, year: &str) -> EnergyBalance {
    let supply = to_unit(supply.to_vec(), unit);
    let consumption = to_unit(consumption.to_vec(), unit);
    let balance = transform(&supply, &consumption, unit, year);

    if balance.total_supply < balance.total_consumption {
        warn!(
            "{} {}: supply {:.2} below consumption {:.2}",
            year, unit, balance.total_supply, balance.total_consumption
        );
    }

    balance
}

/// Write every (year, unit) artifact, collecting failures instead of stopping
fn generate(
    dataset: &EnergyDataset,
    overrides: &Overrides,
    years: &[String],
    units: &[Unit],
    output_dir: &Path,
) -> Result<GenerateReport> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    let mut report = GenerateReport::new(years.len() * units.len());

    for year in years {
        let Some((supply, consumption, source)) = year_rows(dataset, overrides, year) else {
            warn!("{}: no supply data, skipping", year);
            println!("  FAIL {} (all units): No supply data", year);
            report.record_failure(year, FailedUnit::All, units.len(), "No supply data".to_string());
            continue;
        };
        report.sources.push((year.clone(), source.to_string()));

        for &unit in units {
            let balance = build_balance(&supply, &consumption, unit, year);
            let path = artifact_path(output_dir, year, unit);

            match write_balance(&path, &balance) {
                Ok(()) => {
                    println!(
                        "  OK   {} {:<10} {} nodes, {} links",
                        year,
                        unit.slug(),
                        balance.nodes.len(),
                        balance.links.len()
                    );
                    report.record_success();
                }
                Err(e) => {
                    println!("  FAIL {} {}: {}", year, unit, e);
                    report.record_failure(year, FailedUnit::One(unit), 1, e.to_string());
                }
            }
        }
    }

    Ok(report)
}
