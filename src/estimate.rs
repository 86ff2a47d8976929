//! Consumption estimation for years without verified figures
//!
//! Every ratio below was calibrated once against the verified 2023-24
//! balance and is applied unchanged to other years. The results are an
//! approximation of the sector split, not a model of it.

use crate::dataset::commodity::*;
use crate::models::{ConsumptionMap, SectorRole, SectorValues, SupplyMap};

/// Coal: 200,947 of 545,438 supplied went to final use
pub const COAL_FINAL_SHARE: f64 = 0.368;

/// Natural gas: 39,687 of 63,115
pub const GAS_FINAL_SHARE: f64 = 0.629;
pub const GAS_SPLIT: Split = Split::new(0.034, 0.359, 0.027, 0.580);

/// Lignite: 1,585 of 9,798
pub const LIGNITE_FINAL_SHARE: f64 = 0.162;

/// Oil products: 252,286 of a 317,620 market (crude supply + product imports)
pub const OIL_FINAL_SHARE: f64 = 0.794;
pub const OIL_SPLIT: Split = Split::new(0.137, 0.585, 0.185, 0.093);

/// Electricity: 132,698 against 662,692 of generation fuel supply
pub const ELECTRICITY_FINAL_SHARE: f64 = 0.200;
pub const ELECTRICITY_SPLIT: Split = Split::new(0.418, 0.021, 0.561, 0.0);

/// Generation fuels whose supply drives the electricity estimate
const ELECTRICITY_FUEL_COMMODITIES: [&str; 6] =
    [COAL, NATURAL_GAS, HYDRO, NUCLEAR, SOLAR_WIND_OTHERS, LIGNITE];

/// Shares of final consumption per end-use sector
#[derive(Debug, Clone, Copy)]
pub struct Split {
    pub industry: f64,
    pub transport: f64,
    pub others: f64,
    pub non_energy_use: f64,
}

impl Split {
    pub const fn new(industry: f64, transport: f64, others: f64, non_energy_use: f64) -> Self {
        Self {
            industry,
            transport,
            others,
            non_energy_use,
        }
    }

    fn apply(&self, final_consumption: f64) -> SectorValues {
        sector_values([
            final_consumption * self.industry,
            final_consumption * self.transport,
            final_consumption * self.others,
            final_consumption * self.non_energy_use,
            final_consumption,
        ])
    }
}

fn sector_values(values: [f64; 5]) -> SectorValues {
    SectorRole::ALL
        .iter()
        .zip(values)
        .map(|(role, value)| (role.label().to_string(), value))
        .collect()
}

/// Estimate a sector consumption breakdown from one year's supply
pub fn estimate(year_supply: &SupplyMap) -> ConsumptionMap {
    let supply = |commodity: &str| year_supply.get(commodity).map_or(0.0, |s| s.total());

    let coal_final = supply(COAL) * COAL_FINAL_SHARE;
    let gas_final = supply(NATURAL_GAS) * GAS_FINAL_SHARE;
    let lignite_final = supply(LIGNITE) * LIGNITE_FINAL_SHARE;

    // Product supply is imports only, refined crude covers the rest of the market
    let oil_market = supply(CRUDE_OIL) + supply(OIL_PRODUCTS);
    let oil_final = oil_market * OIL_FINAL_SHARE;

    let fuel_supply: f64 = ELECTRICITY_FUEL_COMMODITIES.iter().map(|c| supply(*c)).sum();
    let electricity_final = fuel_supply * ELECTRICITY_FINAL_SHARE + supply(ELECTRICITY);

    let mut result = ConsumptionMap::new();
    result.insert(COAL.to_string(), industry_only(coal_final));
    result.insert(CRUDE_OIL.to_string(), no_final_use());
    result.insert(NATURAL_GAS.to_string(), GAS_SPLIT.apply(gas_final));
    result.insert(HYDRO.to_string(), no_final_use());
    result.insert(NUCLEAR.to_string(), no_final_use());
    result.insert(SOLAR_WIND_OTHERS.to_string(), no_final_use());
    result.insert(LIGNITE.to_string(), industry_only(lignite_final));
    result.insert(OIL_PRODUCTS.to_string(), OIL_SPLIT.apply(oil_final));
    result.insert(ELECTRICITY.to_string(), ELECTRICITY_SPLIT.apply(electricity_final));
    result
}

fn no_final_use() -> SectorValues {
    sector_values([0.0; 5])
}

fn industry_only(final_consumption: f64) -> SectorValues {
    sector_values([final_consumption, 0.0, 0.0, 0.0, final_consumption])
}
