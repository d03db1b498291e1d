use crate::config::ImportConfig;
use crate::error::ImportError;
use crate::model::{CanonicalEdge, CanonicalNode, EdgeId, NodeId, Platform};
use ahash::AHashSet;
use uuid::Uuid;

/// The normalized graph produced from one export, before layout.
#[derive(Debug, Clone, Default)]
pub struct CanonicalGraph {
    /// The workflow name as found in the export.
    pub name: String,
    pub nodes: Vec<CanonicalNode>,
    pub edges: Vec<CanonicalEdge>,
}

impl CanonicalGraph {
    /// Checks that node ids are unique and that every edge endpoint exists.
    pub fn verify(&self) -> Result<(), ImportError> {
        let mut ids: AHashSet<&str> = AHashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !ids.insert(node.id.as_str()) {
                return Err(ImportError::DuplicateNodeId {
                    id: node.id.clone(),
                });
            }
        }
        for edge in &self.edges {
            for endpoint in [&edge.source_id, &edge.target_id] {
                if !ids.contains(endpoint.as_str()) {
                    return Err(ImportError::UnknownEdgeEndpoint {
                        edge_id: edge.id.clone(),
                        node_id: endpoint.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Accumulates canonical nodes and edges for one normalization pass.
///
/// Enforces the node cap and id uniqueness as nodes are added, so a
/// normalizer can bail out with `?` the moment either is violated.
pub(crate) struct GraphBuilder {
    platform: Platform,
    max_nodes: usize,
    keep_positions: bool,
    ids: AHashSet<NodeId>,
    nodes: Vec<CanonicalNode>,
    edges: Vec<CanonicalEdge>,
}

impl GraphBuilder {
    pub(crate) fn new(platform: Platform, config: &ImportConfig) -> Self {
        Self {
            platform,
            max_nodes: config.max_nodes,
            keep_positions: !config.discard_source_positions,
            ids: AHashSet::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// A globally unique id, never derived from source identifiers.
    pub(crate) fn fresh_id(&self) -> NodeId {
        format!("{}-{}", self.platform.as_str(), Uuid::new_v4())
    }

    pub(crate) fn add_node(&mut self, mut node: CanonicalNode) -> Result<NodeId, ImportError> {
        if self.nodes.len() >= self.max_nodes {
            return Err(ImportError::NodeLimitExceeded {
                count: self.nodes.len() + 1,
                max: self.max_nodes,
            });
        }
        if !self.ids.insert(node.id.clone()) {
            return Err(ImportError::DuplicateNodeId { id: node.id });
        }
        if !self.keep_positions || !node.position.is_some_and(|p| p.is_finite()) {
            node.position = None;
        }
        let id = node.id.clone();
        self.nodes.push(node);
        Ok(id)
    }

    pub(crate) fn connect(&mut self, source: &str, target: &str, label: Option<String>) -> EdgeId {
        let id = format!("edge-{}", self.edges.len() + 1);
        self.edges.push(CanonicalEdge {
            id: id.clone(),
            source_id: source.to_string(),
            target_id: target.to_string(),
            label,
        });
        id
    }

    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn finish(self, name: String) -> CanonicalGraph {
        CanonicalGraph {
            name,
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}
