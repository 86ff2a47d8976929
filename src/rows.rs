//! Flattening of supply and consumption maps into energy rows

use crate::models::{ConsumptionMap, EnergyRow, SectorRole, SupplyMap, SupplySource};

/// One row per commodity and supply source with a strictly positive value
pub fn supply_rows_for(year: &str, supply: &SupplyMap) -> Vec<EnergyRow> {
    let mut rows = Vec::new();
    for (commodity, figures) in supply {
        for source in SupplySource::ALL {
            let value = figures.get(source);
            if value > 0.0 {
                rows.push(EnergyRow::new(year, commodity, source.label(), value));
            }
        }
    }
    rows
}

/// One sector-level row per commodity and known sector role with a positive value.
/// Keys outside the five sector roles are ignored.
pub fn consumption_rows_for(year: &str, consumption: &ConsumptionMap) -> Vec<EnergyRow> {
    let mut rows = Vec::new();
    for (commodity, sectors) in consumption {
        for role in SectorRole::ALL {
            match sectors.get(role.label()) {
                Some(&value) if value > 0.0 => {
                    rows.push(EnergyRow::new(year, commodity, role.label(), value));
                }
                _ => {}
            }
        }
    }
    rows
}
