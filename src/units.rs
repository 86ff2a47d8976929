//! Energy units and conversion between them

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::EnergyRow;

/// 1 KToE = 0.04187 PetaJoules
pub const KTOE_TO_PJ: f64 = 0.04187;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    KToE,
    PetaJoules,
}

impl Unit {
    pub const ALL: [Unit; 2] = [Unit::KToE, Unit::PetaJoules];

    /// Lowercase form used in artifact file names
    pub fn slug(self) -> &'static str {
        match self {
            Unit::KToE => "ktoe",
            Unit::PetaJoules => "petajoules",
        }
    }

    /// Multiplier from KToE, the unit data is stored in, or `None` if no rescaling is needed
    pub fn factor_from_storage(self) -> Option<f64> {
        match self {
            Unit::KToE => None,
            Unit::PetaJoules => Some(KTOE_TO_PJ),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::KToE => write!(f, "KToE"),
            Unit::PetaJoules => write!(f, "PetaJoules"),
        }
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ktoe" => Ok(Unit::KToE),
            "petajoules" | "pj" => Ok(Unit::PetaJoules),
            other => Err(format!("unknown unit '{}' (expected ktoe or petajoules)", other)),
        }
    }
}

/// Multiply every row's value by `factor`, leaving everything else untouched
pub fn convert(rows: &[EnergyRow], factor: f64) -> Vec<EnergyRow> {
    rows.iter()
        .map(|row| EnergyRow {
            value: row.value * factor,
            ..row.clone()
        })
        .collect()
}

/// Rescale storage-unit rows into `unit`
pub fn to_unit(rows: Vec<EnergyRow>, unit: Unit) -> Vec<EnergyRow> {
    match unit.factor_from_storage() {
        Some(factor) => convert(&rows, factor),
        None => rows,
    }
}
