use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a canonical node within one import.
pub type NodeId = String;

/// The canonical role of a node, independent of the source platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    /// Starts the workflow (webhooks, schedules, watchers).
    Trigger,
    /// Performs work against an app or service.
    Action,
    /// Routes or filters execution (routers, filters, switches).
    Decision,
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRole::Trigger => write!(f, "trigger"),
            NodeRole::Action => write!(f, "action"),
            NodeRole::Decision => write!(f, "decision"),
        }
    }
}

/// A point in 2D layout space. Coordinates are the top-left corner of the node box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite (not NaN or infinite).
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A single node of the normalized workflow graph.
///
/// Everything except `position` is fixed at normalization time. `position` is
/// `None` until the layout engine assigns it, unless the export carried
/// design-time coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalNode {
    pub id: NodeId,
    pub role: NodeRole,
    pub label: String,
    pub app_name: String,
    pub action_name: String,
    /// The source platform's node payload, kept verbatim.
    pub platform_metadata: serde_json::Value,
    pub position: Option<Position>,
}

impl CanonicalNode {
    pub fn has_position(&self) -> bool {
        self.position.is_some()
    }
}
