use super::edge::CanonicalEdge;
use super::node::{CanonicalNode, NodeRole};
use super::platform::Platform;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Estimated minutes of work per node role.
pub const TRIGGER_MINUTES: f64 = 0.5;
pub const DECISION_MINUTES: f64 = 1.0;
pub const ACTION_MINUTES: f64 = 2.0;

/// Descriptive data about a completed import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportMetadata {
    pub platform: Platform,
    pub original_name: String,
    pub import_timestamp: DateTime<Utc>,
    pub node_count: usize,
    pub estimated_duration_minutes: f64,
}

/// The terminal output of an import: a laid-out canonical graph plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub nodes: Vec<CanonicalNode>,
    pub edges: Vec<CanonicalEdge>,
    pub metadata: ImportMetadata,
}

impl ImportResult {
    pub fn node(&self, id: &str) -> Option<&CanonicalNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Number of nodes carrying the given role.
    pub fn count_role(&self, role: NodeRole) -> usize {
        self.nodes.iter().filter(|n| n.role == role).count()
    }
}

/// Coarse duration estimate: a weighted sum over node roles, rounded to one decimal.
pub fn estimate_duration_minutes(nodes: &[CanonicalNode]) -> f64 {
    let total: f64 = nodes
        .iter()
        .map(|n| match n.role {
            NodeRole::Trigger => TRIGGER_MINUTES,
            NodeRole::Decision => DECISION_MINUTES,
            NodeRole::Action => ACTION_MINUTES,
        })
        .sum();
    (total * 10.0).round() / 10.0
}
