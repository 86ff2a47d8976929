//! Choice of consumption data for a fiscal year
//!
//! Sources are tried in a fixed order and the first that applies wins:
//! verified embedded data, then the override file, then an estimate from
//! that year's supply.

use std::fmt;

use crate::dataset::EnergyDataset;
use crate::estimate::estimate;
use crate::models::ConsumptionMap;
use crate::overrides::Overrides;

/// Where a year's consumption figures came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumptionSource {
    Embedded,
    Override,
    Estimated,
    None,
}

impl fmt::Display for ConsumptionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsumptionSource::Embedded => write!(f, "embedded (verified)"),
            ConsumptionSource::Override => write!(f, "overrides file"),
            ConsumptionSource::Estimated => write!(f, "estimated"),
            ConsumptionSource::None => write!(f, "none (no supply data)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConsumption {
    pub data: ConsumptionMap,
    pub source: ConsumptionSource,
}

/// Inputs every strategy can consult
struct Context<'a> {
    year: &'a str,
    dataset: &'a EnergyDataset,
    overrides: &'a Overrides,
}

type Strategy = fn(&Context<'_>) -> Option<ResolvedConsumption>;

const STRATEGIES: [Strategy; 3] = [from_embedded, from_overrides, from_estimate];

fn from_embedded(ctx: &Context<'_>) -> Option<ResolvedConsumption> {
    ctx.dataset
        .consumption_for(ctx.year)
        .map(|data| ResolvedConsumption {
            data: data.clone(),
            source: ConsumptionSource::Embedded,
        })
}

fn from_overrides(ctx: &Context<'_>) -> Option<ResolvedConsumption> {
    ctx.overrides.get(ctx.year).map(|data| ResolvedConsumption {
        data: data.clone(),
        source: ConsumptionSource::Override,
    })
}

fn from_estimate(ctx: &Context<'_>) -> Option<ResolvedConsumption> {
    ctx.dataset
        .supply_for(ctx.year)
        .map(|supply| ResolvedConsumption {
            data: estimate(supply),
            source: ConsumptionSource::Estimated,
        })
}

/// Pick the consumption data for `year`
pub fn resolve_consumption(
    year: &str,
    dataset: &EnergyDataset,
    overrides: &Overrides,
) -> ResolvedConsumption {
    let ctx = Context {
        year,
        dataset,
        overrides,
    };

    STRATEGIES
        .iter()
        .find_map(|strategy| strategy(&ctx))
        .unwrap_or_else(|| ResolvedConsumption {
            data: ConsumptionMap::new(),
            source: ConsumptionSource::None,
        })
}
