//! Data models for energy balance rows and flow graphs

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::topology::NodeId;
use crate::units::Unit;

/// One quantity of energy for a commodity in a sector role during a fiscal year
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyRow {
    pub year: String,
    pub commodity: String,
    pub sector: String,
    pub sub_sector: Option<String>, // Set only on sub-breakdowns, which never become flows
    pub value: f64,
}

impl EnergyRow {
    pub fn new(year: &str, commodity: &str, sector: &str, value: f64) -> Self {
        Self {
            year: year.to_string(),
            commodity: commodity.to_string(),
            sector: sector.to_string(),
            sub_sector: None,
            value,
        }
    }
}

/// Supply-side sector that originates a flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplySource {
    Production,
    Imports,
}

impl SupplySource {
    pub const ALL: [SupplySource; 2] = [SupplySource::Production, SupplySource::Imports];

    pub fn label(self) -> &'static str {
        match self {
            SupplySource::Production => "Production",
            SupplySource::Imports => "Imports",
        }
    }

    pub fn from_sector(sector: &str) -> Option<Self> {
        match sector {
            "Production" => Some(SupplySource::Production),
            "Imports" => Some(SupplySource::Imports),
            _ => None,
        }
    }
}

/// Consumption-side sector role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorRole {
    Industry,
    Transport,
    Others,
    NonEnergyUse,
    FinalConsumption,
}

impl SectorRole {
    pub const ALL: [SectorRole; 5] = [
        SectorRole::Industry,
        SectorRole::Transport,
        SectorRole::Others,
        SectorRole::NonEnergyUse,
        SectorRole::FinalConsumption,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SectorRole::Industry => "Industry",
            SectorRole::Transport => "Transport",
            SectorRole::Others => "Others",
            SectorRole::NonEnergyUse => "Non-energy use",
            SectorRole::FinalConsumption => "Final consumption",
        }
    }
}

/// Production and imports of one commodity in one year
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplyFigures {
    #[serde(rename = "Production", default)]
    pub production: f64,
    #[serde(rename = "Imports", default)]
    pub imports: f64,
}

impl SupplyFigures {
    pub const fn new(production: f64, imports: f64) -> Self {
        Self { production, imports }
    }

    pub fn get(&self, source: SupplySource) -> f64 {
        match source {
            SupplySource::Production => self.production,
            SupplySource::Imports => self.imports,
        }
    }

    pub fn total(&self) -> f64 {
        self.production + self.imports
    }
}

/// commodity -> Production/Imports, for one year
pub type SupplyMap = IndexMap<String, SupplyFigures>;

/// sector role label -> value
pub type SectorValues = IndexMap<String, f64>;

/// commodity -> sector role -> value, for one year
pub type ConsumptionMap = IndexMap<String, SectorValues>;

/// A vertex of the fixed flow topology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: NodeId,
    pub label: String,
    pub color: String,
    pub column: u8,
}

/// A directed, weighted edge between two node indices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub source: usize,
    pub target: usize,
    pub value: f64,
    pub color: String,
    pub label: String,
}

/// Complete flow graph for one (year, unit)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyBalance {
    pub nodes: Vec<FlowNode>,
    pub links: Vec<FlowEdge>,
    pub unit: Unit,
    pub year: String,
    pub total_supply: f64,
    pub total_consumption: f64,
}

static FISCAL_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})$").expect("fiscal year pattern is valid"));

/// Check a fiscal year label of the form "2023-24"
pub fn parse_fiscal_year(s: &str) -> Result<String, String> {
    let cap = FISCAL_YEAR_RE
        .captures(s)
        .ok_or_else(|| format!("'{}' is not a fiscal year like 2023-24", s))?;

    let start: u32 = cap[1].parse().map_err(|e| format!("{}", e))?;
    let end: u32 = cap[2].parse().map_err(|e| format!("{}", e))?;
    if (start + 1) % 100 != end {
        return Err(format!("'{}' does not span consecutive years", s));
    }

    Ok(s.to_string())
}
