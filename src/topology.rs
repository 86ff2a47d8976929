//! Fixed 16-node flow topology and the name mappings onto it
//!
//! Columns run left to right: origins (0), primary commodities (1),
//! transformation (2) and end-use sectors (3). The node set never changes
//! between years or units, only the edges do.

use serde::{Deserialize, Serialize};

use crate::models::FlowNode;

/// RGBA color
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    pub fn to_css(self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

/// Identity of a node in the topology. Declaration order is node index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeId {
    Production,
    Imports,
    Coal,
    CrudeOil,
    NaturalGas,
    Hydro,
    Nuclear,
    SolarWindOthers,
    Lignite,
    OilProducts,
    ElectricityGen,
    Electricity,
    Industry,
    Transport,
    Others,
    NonEnergyUse,
}

pub const NODE_COUNT: usize = 16;

/// Static description of a node
#[derive(Debug, Clone, Copy)]
pub struct NodeSpec {
    pub id: NodeId,
    pub label: &'static str,
    pub color: Color,
    pub column: u8,
}

const fn spec(id: NodeId, label: &'static str, color: Color, column: u8) -> NodeSpec {
    NodeSpec { id, label, color, column }
}

pub const TOPOLOGY: [NodeSpec; NODE_COUNT] = [
    // Sources
    spec(NodeId::Production, "Production", Color::rgba(255, 153, 51, 0.8), 0),
    spec(NodeId::Imports, "Imports", Color::rgba(0, 0, 128, 0.8), 0),
    // Primary energy
    spec(NodeId::Coal, "Coal", Color::rgba(74, 74, 74, 0.8), 1),
    spec(NodeId::CrudeOil, "Crude Oil", Color::rgba(139, 69, 19, 0.8), 1),
    spec(NodeId::NaturalGas, "Natural Gas", Color::rgba(135, 206, 235, 0.8), 1),
    spec(NodeId::Hydro, "Hydro", Color::rgba(70, 130, 180, 0.8), 1),
    spec(NodeId::Nuclear, "Nuclear", Color::rgba(255, 99, 71, 0.8), 1),
    spec(NodeId::SolarWindOthers, "Solar/Wind/Others", Color::rgba(255, 215, 0, 0.8), 1),
    spec(NodeId::Lignite, "Lignite", Color::rgba(160, 82, 45, 0.8), 1),
    // Transformation
    spec(NodeId::OilProducts, "Oil Products", Color::rgba(210, 105, 30, 0.8), 2),
    spec(NodeId::ElectricityGen, "Electricity Generation", Color::rgba(241, 196, 15, 0.8), 2),
    spec(NodeId::Electricity, "Electricity", Color::rgba(241, 196, 15, 0.8), 2),
    // End-use sectors
    spec(NodeId::Industry, "Industry", Color::rgba(255, 153, 51, 0.6), 3),
    spec(NodeId::Transport, "Transport", Color::rgba(155, 89, 182, 0.6), 3),
    spec(NodeId::Others, "Others", Color::rgba(46, 204, 113, 0.6), 3),
    spec(NodeId::NonEnergyUse, "Non-energy Use", Color::rgba(52, 152, 219, 0.6), 3),
];

/// Fuels whose residual supply (after direct final use) feeds power generation.
/// Oil products and crude oil never feed it.
pub const ELECTRICITY_FUELS: [NodeId; 6] = [
    NodeId::Coal,
    NodeId::Lignite,
    NodeId::NaturalGas,
    NodeId::Hydro,
    NodeId::Nuclear,
    NodeId::SolarWindOthers,
];

impl NodeId {
    /// Position in the node list
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn spec(self) -> &'static NodeSpec {
        &TOPOLOGY[self.index()]
    }

    pub fn label(self) -> &'static str {
        self.spec().label
    }

    pub fn color(self) -> Color {
        self.spec().color
    }
}

/// Accumulator holding one value per node, all initialised up front
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTotals([f64; NODE_COUNT]);

impl NodeTotals {
    pub fn zeroed() -> Self {
        Self([0.0; NODE_COUNT])
    }

    pub fn add(&mut self, id: NodeId, value: f64) {
        self.0[id.index()] += value;
    }

    pub fn get(&self, id: NodeId) -> f64 {
        self.0[id.index()]
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }
}

/// The ordered node list every balance carries
pub fn nodes() -> Vec<FlowNode> {
    TOPOLOGY
        .iter()
        .map(|spec| FlowNode {
            id: spec.id,
            label: spec.label.to_string(),
            color: spec.color.to_css(),
            column: spec.column,
        })
        .collect()
}

/// Map a MoSPI commodity name onto its node
pub fn commodity_to_node(name: &str) -> Option<NodeId> {
    match name {
        "Coal" => Some(NodeId::Coal),
        "Crude Oil" => Some(NodeId::CrudeOil),
        "Natural Gas" => Some(NodeId::NaturalGas),
        "Hydro" => Some(NodeId::Hydro),
        "Nuclear" => Some(NodeId::Nuclear),
        "Solar, Wind, Others" | "Solar/Wind/Others" => Some(NodeId::SolarWindOthers),
        "Lignite" => Some(NodeId::Lignite),
        "Oil Products" => Some(NodeId::OilProducts),
        "Electricity" => Some(NodeId::Electricity),
        _ => None,
    }
}

/// Map a MoSPI end-use sector name onto its node
pub fn sector_to_node(name: &str) -> Option<NodeId> {
    match name {
        "Industry" => Some(NodeId::Industry),
        "Transport" => Some(NodeId::Transport),
        "Others" => Some(NodeId::Others),
        "Non-energy use" | "Non-energy Use" => Some(NodeId::NonEnergyUse),
        _ => None,
    }
}
