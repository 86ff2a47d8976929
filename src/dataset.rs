//! Verified MoSPI energy balance tables, in KToE
//!
//! Supply (Production and Imports) is known for every fiscal year from
//! 2012-13 to 2023-24. Sector-level consumption is verified for 2023-24 only.

use indexmap::IndexMap;

use crate::models::{ConsumptionMap, SectorRole, SectorValues, SupplyFigures, SupplyMap};

/// MoSPI commodity names
pub mod commodity {
    pub const COAL: &str = "Coal";
    pub const CRUDE_OIL: &str = "Crude Oil";
    pub const NATURAL_GAS: &str = "Natural Gas";
    pub const HYDRO: &str = "Hydro";
    pub const NUCLEAR: &str = "Nuclear";
    pub const SOLAR_WIND_OTHERS: &str = "Solar, Wind, Others";
    pub const LIGNITE: &str = "Lignite";
    pub const OIL_PRODUCTS: &str = "Oil Products";
    pub const ELECTRICITY: &str = "Electricity";
}

use commodity::*;

/// Fiscal years with embedded supply, newest first
pub const ENERGY_YEARS: [&str; 12] = [
    "2023-24", "2022-23", "2021-22", "2020-21", "2019-20", "2018-19", "2017-18", "2016-17",
    "2015-16", "2014-15", "2013-14", "2012-13",
];

type SupplyTable = [(&'static str, f64, f64); 9];

const SUPPLY: [(&'static str, SupplyTable); 12] = [
    (
        "2023-24",
        [
            (COAL, 403799.46, 141638.82),
            (CRUDE_OIL, 30002.27, 239414.80),
            (NATURAL_GAS, 33704.73, 29410.30),
            (HYDRO, 11558.82, 0.0),
            (NUCLEAR, 12492.78, 0.0),
            (SOLAR_WIND_OTHERS, 20288.67, 0.0),
            (LIGNITE, 9786.09, 11.88),
            (OIL_PRODUCTS, 0.0, 48202.82),
            (ELECTRICITY, 0.0, 571.79),
        ],
    ),
    (
        "2022-23",
        [
            (COAL, 359797.83, 126342.73),
            (CRUDE_OIL, 29820.95, 237819.29),
            (NATURAL_GAS, 31866.22, 24331.37),
            (HYDRO, 13965.49, 0.0),
            (NUCLEAR, 11951.68, 0.0),
            (SOLAR_WIND_OTHERS, 18252.85, 0.0),
            (LIGNITE, 10038.71, 5.22),
            (OIL_PRODUCTS, 0.0, 44702.72),
            (ELECTRICITY, 0.0, 657.02),
        ],
    ),
    (
        "2021-22",
        [
            (COAL, 312680.97, 115989.25),
            (CRUDE_OIL, 30343.85, 217053.53),
            (NATURAL_GAS, 31471.48, 28700.65),
            (HYDRO, 13070.62, 0.0),
            (NUCLEAR, 12277.69, 0.0),
            (SOLAR_WIND_OTHERS, 15284.37, 0.0),
            (LIGNITE, 10828.28, 2.57),
            (OIL_PRODUCTS, 0.0, 39911.65),
            (ELECTRICITY, 0.0, 685.76),
        ],
    ),
    (
        "2020-21",
        [
            (COAL, 297774.74, 115541.29),
            (CRUDE_OIL, 31164.89, 200782.55),
            (NATURAL_GAS, 26521.88, 30553.74),
            (HYDRO, 12954.92, 0.0),
            (NUCLEAR, 11213.64, 0.0),
            (SOLAR_WIND_OTHERS, 13278.87, 0.0),
            (LIGNITE, 9553.92, 0.82),
            (OIL_PRODUCTS, 0.0, 42915.38),
            (ELECTRICITY, 0.0, 821.10),
        ],
    ),
    (
        "2019-20",
        [
            (COAL, 308651.92, 130996.86),
            (CRUDE_OIL, 32876.92, 231947.15),
            (NATURAL_GAS, 28685.04, 31170.93),
            (HYDRO, 13426.08, 0.0),
            (NUCLEAR, 12111.00, 0.0),
            (SOLAR_WIND_OTHERS, 12439.68, 0.0),
            (LIGNITE, 10175.43, 2.64),
            (OIL_PRODUCTS, 0.0, 43047.24),
            (ELECTRICITY, 0.0, 546.15),
        ],
    ),
    (
        "2018-19",
        [
            (COAL, 310731.41, 123696.31),
            (CRUDE_OIL, 34955.64, 231480.04),
            (NATURAL_GAS, 30238.82, 26437.13),
            (HYDRO, 11624.07, 0.0),
            (NUCLEAR, 9854.19, 0.0),
            (SOLAR_WIND_OTHERS, 11217.24, 0.0),
            (LIGNITE, 10484.26, 76.96),
            (OIL_PRODUCTS, 0.0, 33119.79),
            (ELECTRICITY, 0.0, 378.04),
        ],
    ),
    (
        "2017-18",
        [
            (COAL, 289970.60, 110333.76),
            (CRUDE_OIL, 36469.31, 225281.81),
            (NATURAL_GAS, 30032.71, 25239.93),
            (HYDRO, 10856.23, 0.0),
            (NUCLEAR, 9993.23, 0.0),
            (SOLAR_WIND_OTHERS, 8958.42, 0.0),
            (LIGNITE, 10437.38, 32.41),
            (OIL_PRODUCTS, 0.0, 33920.34),
            (ELECTRICITY, 0.0, 436.20),
        ],
    ),
    (
        "2016-17",
        [
            (COAL, 290295.92, 101177.63),
            (CRUDE_OIL, 36800.94, 218637.84),
            (NATURAL_GAS, 29340.42, 22857.53),
            (HYDRO, 10536.82, 0.0),
            (NUCLEAR, 9881.11, 0.0),
            (SOLAR_WIND_OTHERS, 7208.97, 0.0),
            (LIGNITE, 9952.88, 3.02),
            (OIL_PRODUCTS, 0.0, 34412.35),
            (ELECTRICITY, 0.0, 483.09),
        ],
    ),
    (
        "2015-16",
        [
            (COAL, 285600.07, 107058.46),
            (CRUDE_OIL, 37754.39, 207312.74),
            (NATURAL_GAS, 29664.69, 19674.17),
            (HYDRO, 10447.86, 0.0),
            (NUCLEAR, 9750.22, 0.0),
            (SOLAR_WIND_OTHERS, 5833.12, 0.0),
            (LIGNITE, 10543.92, 1.98),
            (OIL_PRODUCTS, 0.0, 28362.25),
            (ELECTRICITY, 0.0, 451.00),
        ],
    ),
    (
        "2014-15",
        [
            (COAL, 274301.05, 110186.74),
            (CRUDE_OIL, 38285.05, 193601.99),
            (NATURAL_GAS, 30960.05, 17115.36),
            (HYDRO, 11127.40, 0.0),
            (NUCLEAR, 9408.28, 0.0),
            (SOLAR_WIND_OTHERS, 6554.89, 0.0),
            (LIGNITE, 10527.32, 4.37),
            (OIL_PRODUCTS, 0.0, 20887.26),
            (ELECTRICITY, 0.0, 430.67),
        ],
    ),
    (
        "2013-14",
        [
            (COAL, 256930.84, 83249.70),
            (CRUDE_OIL, 38619.70, 193401.01),
            (NATURAL_GAS, 32569.29, 16374.20),
            (HYDRO, 11607.99, 0.0),
            (NUCLEAR, 8919.97, 0.0),
            (SOLAR_WIND_OTHERS, 5798.32, 0.0),
            (LIGNITE, 10654.50, 5.44),
            (OIL_PRODUCTS, 0.0, 16637.49),
            (ELECTRICITY, 0.0, 481.42),
        ],
    ),
    (
        "2012-13",
        [
            (COAL, 253772.52, 74274.78),
            (CRUDE_OIL, 38692.83, 188860.32),
            (NATURAL_GAS, 37419.81, 16202.74),
            (HYDRO, 9790.11, 0.0),
            (NUCLEAR, 8565.11, 0.0),
            (SOLAR_WIND_OTHERS, 5091.14, 0.0),
            (LIGNITE, 10797.75, 0.35),
            (OIL_PRODUCTS, 0.0, 16425.56),
            (ELECTRICITY, 0.0, 412.33),
        ],
    ),
];

// (commodity, [Industry, Transport, Others, Non-energy use, Final consumption])
type ConsumptionTable = [(&'static str, [f64; 5]); 9];

const CONSUMPTION: [(&'static str, ConsumptionTable); 1] = [(
    "2023-24",
    [
        (COAL, [200947.38, 0.0, 0.0, 0.0, 200947.38]),
        (CRUDE_OIL, [0.0, 0.0, 0.0, 0.0, 0.0]),
        (NATURAL_GAS, [1348.41, 14258.81, 1057.22, 23022.90, 39687.34]),
        (HYDRO, [0.0, 0.0, 0.0, 0.0, 0.0]),
        (NUCLEAR, [0.0, 0.0, 0.0, 0.0, 0.0]),
        (SOLAR_WIND_OTHERS, [0.0, 0.0, 0.0, 0.0, 0.0]),
        (LIGNITE, [1584.87, 0.0, 0.0, 0.0, 1584.87]),
        (OIL_PRODUCTS, [34456.93, 147680.08, 46723.92, 23425.37, 252286.30]),
        (ELECTRICITY, [55470.0, 2838.0, 74390.0, 0.0, 132698.0]),
    ],
)];

/// Read-only supply and consumption tables keyed by fiscal year
#[derive(Debug, Clone, Default)]
pub struct EnergyDataset {
    supply: IndexMap<String, SupplyMap>,
    consumption: IndexMap<String, ConsumptionMap>,
}

impl EnergyDataset {
    /// Tables verified against the MoSPI Energy Balance API
    pub fn embedded() -> Self {
        let supply = SUPPLY
            .iter()
            .map(|(year, table)| {
                let map: SupplyMap = table
                    .iter()
                    .map(|(name, production, imports)| {
                        (name.to_string(), SupplyFigures::new(*production, *imports))
                    })
                    .collect();
                (year.to_string(), map)
            })
            .collect();

        let consumption = CONSUMPTION
            .iter()
            .map(|(year, table)| {
                let map: ConsumptionMap = table
                    .iter()
                    .map(|(name, values)| (name.to_string(), sector_values(values)))
                    .collect();
                (year.to_string(), map)
            })
            .collect();

        Self { supply, consumption }
    }

    pub fn supply_for(&self, year: &str) -> Option<&SupplyMap> {
        self.supply.get(year)
    }

    pub fn consumption_for(&self, year: &str) -> Option<&ConsumptionMap> {
        self.consumption.get(year)
    }

    /// Years with supply data, in table order
    pub fn years(&self) -> impl Iterator<Item = &str> {
        self.supply.keys().map(String::as_str)
    }
}

fn sector_values(values: &[f64; 5]) -> SectorValues {
    SectorRole::ALL
        .iter()
        .zip(values)
        .map(|(role, value)| (role.label().to_string(), *value))
        .collect()
}
