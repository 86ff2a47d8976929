//! Energy balance to flow graph transformation
//!
//! Builds the Sankey edges for one (year, unit) in four phases:
//!
//! 1. supply: Production/Imports -> primary commodity
//! 2. consumption: commodity -> end-use sector, sector-level rows only
//! 3. transformation: crude -> oil products, fuels -> generation,
//!    generation -> electricity
//! 4. filtering of anything not strictly positive
//!
//! Unknown commodity or sector names are skipped, never reported as errors.

use std::fmt;

use crate::models::{EnergyBalance, EnergyRow, FlowEdge, SectorRole, SupplySource};
use crate::topology::{self, ELECTRICITY_FUELS, NodeId, NodeTotals};
use crate::units::Unit;

/// Alpha applied to the source node color for edges
const EDGE_ALPHA: f64 = 0.3;

/// Edges in insertion order, at most one per (source, target) pair
#[derive(Debug, Default)]
struct EdgeList {
    keys: Vec<(NodeId, NodeId)>,
    edges: Vec<FlowEdge>,
}

impl EdgeList {
    /// Add a flow, summing into an existing edge for the same pair
    fn push(&mut self, source: NodeId, target: NodeId, value: f64) {
        if let Some(pos) = self.keys.iter().position(|k| *k == (source, target)) {
            self.edges[pos].value += value;
            return;
        }

        self.keys.push((source, target));
        self.edges.push(FlowEdge {
            source: source.index(),
            target: target.index(),
            value,
            color: source.color().with_alpha(EDGE_ALPHA).to_css(),
            label: format!("{} \u{2192} {}", source.label(), target.label()),
        });
    }

    fn into_positive(self) -> Vec<FlowEdge> {
        self.edges.into_iter().filter(|e| e.value > 0.0).collect()
    }
}

/// Build the flow graph for one year from supply and consumption rows
pub fn transform(
    supply_rows: &[EnergyRow],
    consumption_rows: &[EnergyRow],
    unit: Unit,
    year: &str,
) -> EnergyBalance {
    let mut edges = EdgeList::default();
    let mut commodity_supply = NodeTotals::zeroed();
    let mut final_consumption = NodeTotals::zeroed();

    // Phase 1: supply
    let mut total_supply = 0.0;
    for row in supply_rows {
        if row.value <= 0.0 {
            continue;
        }
        let Some(commodity) = topology::commodity_to_node(&row.commodity) else {
            continue;
        };
        let source = match SupplySource::from_sector(&row.sector) {
            Some(SupplySource::Production) => NodeId::Production,
            Some(SupplySource::Imports) => NodeId::Imports,
            None => continue,
        };

        edges.push(source, commodity, row.value);
        commodity_supply.add(commodity, row.value);

        if source == NodeId::Production {
            total_supply += row.value;
        }
    }

    // Imports join TPES in a second pass over every row
    for row in supply_rows {
        if row.sector == SupplySource::Imports.label() && row.value > 0.0 {
            total_supply += row.value;
        }
    }

    // Phase 2: consumption
    for row in consumption_rows {
        if row.value <= 0.0 || row.sub_sector.is_some() {
            continue;
        }
        let Some(sector) = topology::sector_to_node(&row.sector) else {
            continue;
        };
        let Some(commodity) = topology::commodity_to_node(&row.commodity) else {
            continue;
        };
        // Crude only reaches end use through oil products
        if commodity == NodeId::CrudeOil {
            continue;
        }

        edges.push(commodity, sector, row.value);
        final_consumption.add(commodity, row.value);
    }

    let final_rows: Vec<f64> = consumption_rows
        .iter()
        .filter(|r| {
            r.sector == SectorRole::FinalConsumption.label()
                && r.sub_sector.is_none()
                && r.value > 0.0
        })
        .map(|r| r.value)
        .collect();

    let total_consumption = if final_rows.is_empty() {
        final_consumption.sum()
    } else {
        final_rows.iter().sum()
    };

    // Phase 3: transformation
    let crude_total = commodity_supply.get(NodeId::CrudeOil);
    if crude_total > 0.0 {
        edges.push(NodeId::CrudeOil, NodeId::OilProducts, crude_total);
    }

    for fuel in ELECTRICITY_FUELS {
        let to_generation = commodity_supply.get(fuel) - final_consumption.get(fuel);
        if to_generation > 0.0 {
            edges.push(fuel, NodeId::ElectricityGen, to_generation);
        }
    }

    // Final electricity use stands in for generation output; losses are not modelled
    let electricity_final = final_consumption.get(NodeId::Electricity);
    if electricity_final > 0.0 {
        edges.push(NodeId::ElectricityGen, NodeId::Electricity, electricity_final);
    }

    // Phase 4: filtering
    EnergyBalance {
        nodes: topology::nodes(),
        links: edges.into_positive(),
        unit,
        year: year.to_string(),
        total_supply,
        total_consumption,
    }
}

/// Format every flow of a balance, grouped by the column of its source
pub fn format_flows(balance: &EnergyBalance) -> String {
    let mut output = String::new();

    for column in 0..=2u8 {
        let flows: Vec<&FlowEdge> = balance
            .links
            .iter()
            .filter(|e| balance.nodes.get(e.source).is_some_and(|n| n.column == column))
            .collect();
        if flows.is_empty() {
            continue;
        }

        output.push_str(&format!("Column {} flows:\n", column));
        for flow in flows {
            output.push_str(&format!(
                "  {:<40} {:>14.2} {}\n",
                flow.label, flow.value, balance.unit
            ));
        }
    }

    output
}

/// Headline figures of one balance
#[derive(Debug)]
pub struct BalanceSummary {
    pub year: String,
    pub unit: Unit,
    pub flows: usize,
    pub total_supply: f64,
    pub total_consumption: f64,
    pub supply_by_commodity: Vec<(String, f64)>,
    pub consumption_by_sector: Vec<(String, f64)>,
}

/// Summarise a balance: totals plus inflow per primary commodity and per end use
pub fn summarize_balance(balance: &EnergyBalance) -> BalanceSummary {
    let inflow = |index: usize| -> f64 {
        balance
            .links
            .iter()
            .filter(|e| e.target == index)
            .map(|e| e.value)
            .sum()
    };

    let by_column = |column: u8| -> Vec<(String, f64)> {
        balance
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.column == column)
            .map(|(i, n)| (n.label.clone(), inflow(i)))
            .filter(|(_, v)| *v > 0.0)
            .collect()
    };

    BalanceSummary {
        year: balance.year.clone(),
        unit: balance.unit,
        flows: balance.links.len(),
        total_supply: balance.total_supply,
        total_consumption: balance.total_consumption,
        supply_by_commodity: by_column(1),
        consumption_by_sector: by_column(3),
    }
}

impl fmt::Display for BalanceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Energy Balance {} ({}) ===", self.year, self.unit)?;
        writeln!(f, "Flows: {}", self.flows)?;
        writeln!(f)?;

        writeln!(f, "Primary supply:")?;
        for (name, value) in &self.supply_by_commodity {
            writeln!(f, "  {:<24} {:>14.2}", name, value)?;
        }
        writeln!(f)?;

        writeln!(f, "End use:")?;
        for (name, value) in &self.consumption_by_sector {
            writeln!(f, "  {:<24} {:>14.2}", name, value)?;
        }
        writeln!(f)?;

        writeln!(f, "Totals:")?;
        writeln!(f, "  Supply:      {:.2}", self.total_supply)?;
        writeln!(f, "  Consumption: {:.2}", self.total_consumption)?;
        if self.total_supply > 0.0 {
            writeln!(
                f,
                "  Share:       {:.1}%",
                self.total_consumption / self.total_supply * 100.0
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::EnergyDataset;
    use crate::estimate::estimate;
    use crate::resolve::resolve_consumption;
    use crate::overrides::Overrides;
    use crate::rows::{consumption_rows_for, supply_rows_for};
    use crate::units::{KTOE_TO_PJ, convert};
    use approx::assert_relative_eq;

    fn rows_for(year: &str) -> (Vec<EnergyRow>, Vec<EnergyRow>) {
        let dataset = EnergyDataset::embedded();
        let supply = supply_rows_for(year, dataset.supply_for(year).unwrap());
        let resolved = resolve_consumption(year, &dataset, &Overrides::new());
        let consumption = consumption_rows_for(year, &resolved.data);
        (supply, consumption)
    }

    fn edge(balance: &EnergyBalance, source: NodeId, target: NodeId) -> Option<&FlowEdge> {
        balance
            .links
            .iter()
            .find(|e| e.source == source.index() && e.target == target.index())
    }

    fn row(commodity: &str, sector: &str, value: f64) -> EnergyRow {
        EnergyRow::new("2023-24", commodity, sector, value)
    }

    #[test]
    fn verified_year_coal_residual_feeds_generation() {
        let (supply, consumption) = rows_for("2023-24");
        let balance = transform(&supply, &consumption, Unit::KToE, "2023-24");

        let coal_to_gen = edge(&balance, NodeId::Coal, NodeId::ElectricityGen).unwrap();
        assert_relative_eq!(coal_to_gen.value, 344490.90, max_relative = 1e-9);
        assert_eq!(coal_to_gen.label, "Coal \u{2192} Electricity Generation");
        assert_eq!(coal_to_gen.color, "rgba(74,74,74,0.3)");
    }

    #[test]
    fn verified_year_total_consumption_uses_final_rows() {
        let (supply, consumption) = rows_for("2023-24");
        let balance = transform(&supply, &consumption, Unit::KToE, "2023-24");

        let expected = 200947.38 + 39687.34 + 1584.87 + 252286.30 + 132698.0;
        assert_relative_eq!(balance.total_consumption, expected, max_relative = 1e-12);

        let without_finals: Vec<EnergyRow> = consumption
            .iter()
            .filter(|r| r.sector != "Final consumption")
            .cloned()
            .collect();
        // Final consumption rows count even when the commodity is unmapped
        let mut with_extra = consumption.clone();
        with_extra.push(row("Firewood", "Final consumption", 1000.0));
        let extra = transform(&supply, &with_extra, Unit::KToE, "2023-24");
        assert_relative_eq!(extra.total_consumption, expected + 1000.0, max_relative = 1e-12);

        let fallback = transform(&supply, &without_finals, Unit::KToE, "2023-24");
        assert_relative_eq!(fallback.total_consumption, expected, max_relative = 1e-9);
    }

    #[test]
    fn verified_year_conserves_energy() {
        let (supply, consumption) = rows_for("2023-24");
        let balance = transform(&supply, &consumption, Unit::KToE, "2023-24");
        assert!(balance.total_supply >= balance.total_consumption);
    }

    #[test]
    fn total_supply_is_production_plus_imports() {
        let dataset = EnergyDataset::embedded();
        let (supply, consumption) = rows_for("2023-24");
        let balance = transform(&supply, &consumption, Unit::KToE, "2023-24");

        let expected: f64 = dataset
            .supply_for("2023-24")
            .unwrap()
            .values()
            .map(|s| s.total())
            .sum();
        assert_relative_eq!(balance.total_supply, expected, max_relative = 1e-12);
    }

    #[test]
    fn estimated_year_assigns_coal_to_industry() {
        let (supply, consumption) = rows_for("2022-23");
        let balance = transform(&supply, &consumption, Unit::KToE, "2022-23");

        let coal_industry = edge(&balance, NodeId::Coal, NodeId::Industry).unwrap();
        assert_eq!(coal_industry.value, (359797.83 + 126342.73) * 0.368);
        assert!(edge(&balance, NodeId::Coal, NodeId::Transport).is_none());
        assert!(edge(&balance, NodeId::Coal, NodeId::Others).is_none());
        assert!(edge(&balance, NodeId::Coal, NodeId::NonEnergyUse).is_none());
    }

    #[test]
    fn transform_is_idempotent() {
        let (supply, consumption) = rows_for("2019-20");
        let first = transform(&supply, &consumption, Unit::KToE, "2019-20");
        let second = transform(&supply, &consumption, Unit::KToE, "2019-20");

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn converting_inputs_scales_every_edge() {
        for year in ["2023-24", "2017-18"] {
            let (supply, consumption) = rows_for(year);
            let ktoe = transform(&supply, &consumption, Unit::KToE, year);
            let pj = transform(
                &convert(&supply, KTOE_TO_PJ),
                &convert(&consumption, KTOE_TO_PJ),
                Unit::PetaJoules,
                year,
            );

            assert_eq!(ktoe.links.len(), pj.links.len());
            for (a, b) in ktoe.links.iter().zip(&pj.links) {
                assert_eq!((a.source, a.target), (b.source, b.target));
                assert_relative_eq!(b.value, a.value * KTOE_TO_PJ, max_relative = 1e-9);
            }
            assert_relative_eq!(pj.total_supply, ktoe.total_supply * KTOE_TO_PJ, max_relative = 1e-9);
        }
    }

    #[test]
    fn crude_oil_never_reaches_end_use() {
        let supply = vec![row("Crude Oil", "Production", 100.0), row("Crude Oil", "Imports", 50.0)];
        let consumption = vec![
            row("Crude Oil", "Industry", 30.0),
            row("Crude Oil", "Final consumption", 30.0),
            row("Oil Products", "Transport", 120.0),
        ];
        let balance = transform(&supply, &consumption, Unit::KToE, "2023-24");

        let crude = NodeId::CrudeOil.index();
        let crude_edges: Vec<&FlowEdge> = balance.links.iter().filter(|e| e.source == crude).collect();
        assert_eq!(crude_edges.len(), 1);
        assert_eq!(crude_edges[0].target, NodeId::OilProducts.index());
        assert_eq!(crude_edges[0].value, 150.0);
        assert!(
            !balance
                .links
                .iter()
                .any(|e| e.source == crude && balance.nodes[e.target].column == 3)
        );
    }

    #[test]
    fn every_year_and_unit_has_only_positive_edges() {
        let dataset = EnergyDataset::embedded();
        for year in dataset.years() {
            let (supply, consumption) = rows_for(year);
            for unit in Unit::ALL {
                let factor = unit.factor_from_storage().unwrap_or(1.0);
                let balance = transform(
                    &convert(&supply, factor),
                    &convert(&consumption, factor),
                    unit,
                    year,
                );
                assert!(balance.links.iter().all(|e| e.value > 0.0), "{} {}", year, unit);
                assert_eq!(balance.nodes.len(), 16);
            }
        }
    }

    #[test]
    fn generation_edge_omitted_when_residual_not_positive() {
        let supply = vec![row("Lignite", "Production", 100.0)];
        let consumption = vec![row("Lignite", "Industry", 100.0)];
        let balance = transform(&supply, &consumption, Unit::KToE, "2023-24");
        assert!(edge(&balance, NodeId::Lignite, NodeId::ElectricityGen).is_none());

        let consumption = vec![row("Lignite", "Industry", 150.0)];
        let balance = transform(&supply, &consumption, Unit::KToE, "2023-24");
        assert!(edge(&balance, NodeId::Lignite, NodeId::ElectricityGen).is_none());
    }

    #[test]
    fn electricity_final_use_becomes_generation_output() {
        let supply = vec![row("Coal", "Production", 500.0)];
        let consumption = vec![
            row("Electricity", "Industry", 40.0),
            row("Electricity", "Others", 60.0),
        ];
        let balance = transform(&supply, &consumption, Unit::KToE, "2023-24");

        let output = edge(&balance, NodeId::ElectricityGen, NodeId::Electricity).unwrap();
        assert_eq!(output.value, 100.0);
        assert_eq!(edge(&balance, NodeId::Coal, NodeId::ElectricityGen).unwrap().value, 500.0);
        // no Final consumption rows, so the per-commodity sum is used
        assert_eq!(balance.total_consumption, 100.0);
    }

    #[test]
    fn unknown_and_sub_sector_rows_are_skipped() {
        let mut sub = row("Coal", "Industry", 70.0);
        sub.sub_sector = Some("Iron and steel".to_string());
        let supply = vec![
            row("Firewood", "Production", 10.0),
            row("Coal", "Exports", 10.0),
            row("Coal", "Production", -4.0),
            row("Coal", "Production", 0.0),
        ];
        let consumption = vec![sub, row("Coal", "Aviation", 5.0), row("Peat", "Industry", 5.0)];
        let balance = transform(&supply, &consumption, Unit::KToE, "2023-24");

        assert!(balance.links.is_empty());
        assert_eq!(balance.total_supply, 0.0);
        assert_eq!(balance.total_consumption, 0.0);
    }

    #[test]
    fn unrecognised_imports_still_count_towards_supply() {
        let supply = vec![row("Firewood", "Imports", 10.0), row("Firewood", "Production", 25.0)];
        let balance = transform(&supply, &[], Unit::KToE, "2023-24");

        assert!(balance.links.is_empty());
        assert_eq!(balance.total_supply, 10.0);
    }

    #[test]
    fn repeated_rows_sum_into_one_edge() {
        let supply = vec![row("Coal", "Production", 10.0), row("Coal", "Production", 5.0)];
        let consumption = vec![row("Coal", "Industry", 3.0), row("Coal", "Industry", 4.0)];
        let balance = transform(&supply, &consumption, Unit::KToE, "2023-24");

        assert_eq!(edge(&balance, NodeId::Production, NodeId::Coal).unwrap().value, 15.0);
        assert_eq!(edge(&balance, NodeId::Coal, NodeId::Industry).unwrap().value, 7.0);
        assert_eq!(edge(&balance, NodeId::Coal, NodeId::ElectricityGen).unwrap().value, 8.0);
        let pairs: Vec<(usize, usize)> = balance.links.iter().map(|e| (e.source, e.target)).collect();
        let mut unique = pairs.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(pairs.len(), unique.len());
    }

    #[test]
    fn empty_input_still_builds_the_topology() {
        let balance = transform(&[], &[], Unit::PetaJoules, "2030-31");
        assert_eq!(balance.nodes.len(), 16);
        assert!(balance.links.is_empty());
        assert_eq!(balance.unit, Unit::PetaJoules);
        assert_eq!(balance.year, "2030-31");
    }

    #[test]
    fn estimated_years_flag_but_do_not_fail_conservation() {
        let dataset = EnergyDataset::embedded();
        for year in dataset.years().filter(|y| *y != "2023-24") {
            let supply = supply_rows_for(year, dataset.supply_for(year).unwrap());
            let consumption = consumption_rows_for(year, &estimate(dataset.supply_for(year).unwrap()));
            let balance = transform(&supply, &consumption, Unit::KToE, year);
            if balance.total_supply < balance.total_consumption {
                eprintln!("{}: consumption exceeds supply", year);
            }
            assert!(balance.total_supply > 0.0);
        }
    }

    #[test]
    fn summary_reports_inflows() {
        let (supply, consumption) = rows_for("2023-24");
        let balance = transform(&supply, &consumption, Unit::KToE, "2023-24");
        let summary = summarize_balance(&balance);

        assert_eq!(summary.flows, balance.links.len());
        let coal = summary.supply_by_commodity.iter().find(|(n, _)| n == "Coal").unwrap();
        assert_relative_eq!(coal.1, 545438.28, max_relative = 1e-12);
        assert!(summary.consumption_by_sector.iter().any(|(n, _)| n == "Transport"));

        let text = summary.to_string();
        assert!(text.contains("Energy Balance 2023-24 (KToE)"));
        assert!(format_flows(&balance).contains("Production \u{2192} Coal"));
    }
}
