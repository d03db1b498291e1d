use crate::model::NodeRole;
use serde::{Deserialize, Serialize};

/// Largest accepted payload: 10 MiB.
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 10 * 1024 * 1024;
/// Largest accepted canonical graph.
pub const DEFAULT_MAX_NODES: usize = 1000;
/// Deepest accepted nesting of Make routes.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 32;

/// Limits and layout settings for one `Importer`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ImportConfig {
    pub max_payload_bytes: usize,
    pub max_nodes: usize,
    pub max_nesting_depth: usize,
    /// Ignore design-time coordinates from the export and lay out every node.
    pub discard_source_positions: bool,
    pub layout: LayoutConfig,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            max_nodes: DEFAULT_MAX_NODES,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            discard_source_positions: false,
            layout: LayoutConfig::default(),
        }
    }
}

impl ImportConfig {
    /// Loads a configuration from JSON. Missing fields fall back to their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// The axis along which ranks advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutDirection {
    /// Ranks advance along x; nodes within a rank stack along y.
    #[default]
    LeftToRight,
    /// Ranks advance along y; nodes within a rank stack along x.
    TopToBottom,
}

/// Spacing parameters for the layered layout, in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub direction: LayoutDirection,
    pub node_width: f64,
    pub node_height: f64,
    /// Decision nodes reserve a larger box than triggers and actions.
    pub decision_width: f64,
    pub decision_height: f64,
    /// Gap between consecutive ranks along the primary axis.
    pub rank_spacing: f64,
    /// Gap between nodes sharing a rank along the secondary axis.
    pub node_spacing: f64,
    /// Gap between the bounding boxes of unrelated components.
    pub component_margin: f64,
    /// Distance between consecutive nodes when a component cannot be ranked.
    pub fallback_pitch: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            direction: LayoutDirection::LeftToRight,
            node_width: 200.0,
            node_height: 80.0,
            decision_width: 240.0,
            decision_height: 120.0,
            rank_spacing: 100.0,
            node_spacing: 50.0,
            component_margin: 150.0,
            fallback_pitch: 300.0,
        }
    }
}

impl LayoutConfig {
    /// The (width, height) box reserved for a node of the given role.
    pub fn node_size(&self, role: NodeRole) -> (f64, f64) {
        match role {
            NodeRole::Decision => (self.decision_width, self.decision_height),
            NodeRole::Trigger | NodeRole::Action => (self.node_width, self.node_height),
        }
    }
}
