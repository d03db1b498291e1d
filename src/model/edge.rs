use super::node::NodeId;
use serde::{Deserialize, Serialize};

/// Unique identifier for a canonical edge within one import.
pub type EdgeId = String;

/// A directed connection between two canonical nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalEdge {
    pub id: EdgeId,
    pub source_id: NodeId,
    pub target_id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}
