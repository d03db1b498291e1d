//! n8n workflow exports: a flat `nodes` list plus a `connections` map keyed by node name.

use super::schema::{self, Violations};
use super::{GraphBuilder, PlatformParser, SchemaViolation, WorkflowIr};
use crate::classify::classify;
use crate::config::ImportConfig;
use crate::error::ImportError;
use crate::model::{CanonicalNode, NodeId, NodeRole, Platform, Position};
use ahash::{AHashMap, AHashSet};
use serde::Deserialize;
use serde_json::Value;

const DEFAULT_NAME: &str = "Untitled workflow";
/// Type prefixes used by n8n's first-party and community node packages.
pub const VENDOR_PREFIXES: &[&str] = &["n8n-nodes-", "@n8n/"];
const MAIN_PORT: &str = "main";

/// A validated n8n workflow.
#[derive(Debug, Clone)]
pub struct N8nWorkflow {
    pub name: String,
    pub nodes: Vec<N8nNode>,
    pub connections: Vec<N8nConnection>,
}

#[derive(Debug, Clone)]
pub struct N8nNode {
    pub name: String,
    pub node_type: String,
    pub position: Position,
    pub raw: Value,
}

impl N8nNode {
    /// The package-local part of the type, e.g. `googleSheets` for `n8n-nodes-base.googleSheets`.
    pub fn short_type(&self) -> &str {
        self.node_type
            .rsplit_once('.')
            .map_or(self.node_type.as_str(), |(_, short)| short)
    }

    /// The configured operation, falling back to the resource, then the short type.
    pub fn operation(&self) -> &str {
        let parameters = self.raw.get("parameters");
        ["operation", "resource"]
            .iter()
            .find_map(|key| parameters.and_then(|p| p.get(*key)).and_then(Value::as_str))
            .unwrap_or_else(|| self.short_type())
    }
}

/// One target of one output slot of one port of a source node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct N8nConnection {
    pub source: String,
    pub port: String,
    pub output_index: usize,
    /// How many output slots the source port declares.
    pub output_count: usize,
    pub target: String,
}

#[derive(Deserialize)]
struct RawNode {
    name: String,
    #[serde(rename = "type")]
    node_type: String,
    position: [f64; 2],
}

#[derive(Deserialize)]
struct RawTarget {
    node: String,
}

/// Parser for n8n workflow exports.
pub struct N8nParser;

impl N8nParser {
    fn validate_connections(
        &self,
        connections: &Value,
        violations: &mut Violations,
    ) -> Vec<N8nConnection> {
        let mut parsed = Vec::new();
        let Some(sources) = connections.as_object() else {
            violations.push(
                "connections",
                format!("expected an object, found {}", schema::kind_of(connections)),
            );
            return parsed;
        };

        for (source, ports) in sources {
            let source_path = schema::join("connections", source);
            let Some(ports) = ports.as_object() else {
                violations.push(&source_path, "expected an object of output ports");
                continue;
            };
            for (port, outputs) in ports {
                let port_path = schema::join(&source_path, port);
                let Some(outputs) = outputs.as_array() else {
                    violations.push(&port_path, "expected an array of outputs");
                    continue;
                };
                for (output_index, targets) in outputs.iter().enumerate() {
                    let output_path = schema::index(&port_path, output_index);
                    let targets = match targets {
                        Value::Null => continue,
                        Value::Array(targets) => targets,
                        other => {
                            violations.push(
                                &output_path,
                                format!("expected an array of targets, found {}", schema::kind_of(other)),
                            );
                            continue;
                        }
                    };
                    for (t, target) in targets.iter().enumerate() {
                        let target_path = schema::index(&output_path, t);
                        if let Some(raw) = violations.decode::<RawTarget>(target, &target_path) {
                            parsed.push(N8nConnection {
                                source: source.clone(),
                                port: port.clone(),
                                output_index,
                                output_count: outputs.len(),
                                target: raw.node,
                            });
                        }
                    }
                }
            }
        }
        parsed
    }
}

impl PlatformParser for N8nParser {
    fn platform(&self) -> Platform {
        Platform::N8n
    }

    fn has_signature(&self, root: &Value) -> bool {
        schema::has_array(root, "nodes") && root.get("connections").is_some_and(Value::is_object)
    }

    fn has_loose_signature(&self, root: &Value) -> bool {
        root.get("nodes")
            .and_then(Value::as_array)
            .is_some_and(|nodes| {
                nodes.iter().any(|node| {
                    node.get("type")
                        .and_then(Value::as_str)
                        .is_some_and(has_vendor_prefix)
                })
            })
    }

    fn validate(
        &self,
        root: &Value,
        _config: &ImportConfig,
    ) -> Result<WorkflowIr, Vec<SchemaViolation>> {
        let mut violations = Violations::new();
        let name = root
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_NAME)
            .to_string();

        let mut nodes = Vec::new();
        let mut seen: AHashSet<&str> = AHashSet::new();
        if let Some(items) = violations.require_array(root, "nodes", "") {
            for (i, item) in items.iter().enumerate() {
                let path = schema::index("nodes", i);
                let Some(raw) = violations.decode::<RawNode>(item, &path) else {
                    continue;
                };
                let Some(name) = item.get("name").and_then(Value::as_str) else {
                    continue;
                };
                if !seen.insert(name) {
                    violations.push(
                        schema::join(&path, "name"),
                        format!("duplicate node name '{}'", raw.name),
                    );
                    continue;
                }
                nodes.push(N8nNode {
                    name: raw.name,
                    node_type: raw.node_type,
                    position: Position::new(raw.position[0], raw.position[1]),
                    raw: item.clone(),
                });
            }
        }

        // Missing connections are tolerated: a workflow of disconnected nodes is still valid.
        let connections = match root.get("connections") {
            Some(connections) => self.validate_connections(connections, &mut violations),
            None => Vec::new(),
        };

        violations.finish(WorkflowIr::N8n(N8nWorkflow {
            name,
            nodes,
            connections,
        }))
    }
}

pub fn has_vendor_prefix(node_type: &str) -> bool {
    VENDOR_PREFIXES.iter().any(|p| node_type.starts_with(p))
}

/// One canonical node per n8n node; connections resolved by name to the generated ids.
pub(super) fn normalize(
    workflow: N8nWorkflow,
    graph: &mut GraphBuilder,
) -> Result<String, ImportError> {
    let mut by_name: AHashMap<String, (NodeId, NodeRole, bool)> = AHashMap::new();

    for node in workflow.nodes {
        let role = classify(Platform::N8n, &node.node_type);
        let is_if = node.short_type().eq_ignore_ascii_case("if");
        let canonical = CanonicalNode {
            id: graph.fresh_id(),
            role,
            label: node.name.clone(),
            app_name: node.short_type().to_string(),
            action_name: node.operation().to_string(),
            position: Some(node.position),
            platform_metadata: node.raw,
        };
        let id = graph.add_node(canonical)?;
        by_name.insert(node.name, (id, role, is_if));
    }

    for connection in workflow.connections {
        let Some((source_id, source_role, source_is_if)) = by_name.get(&connection.source) else {
            return Err(ImportError::DanglingConnection {
                source_node: connection.source.clone(),
                missing_node: connection.source,
            });
        };
        let Some((target_id, _, _)) = by_name.get(&connection.target) else {
            return Err(ImportError::DanglingConnection {
                source_node: connection.source,
                missing_node: connection.target,
            });
        };
        let label = edge_label(&connection, *source_role, *source_is_if);
        graph.connect(source_id, target_id, label);
    }

    log::debug!(
        "Normalized n8n workflow '{}' into {} node(s)",
        workflow.name,
        graph.node_count()
    );
    Ok(workflow.name)
}

fn edge_label(connection: &N8nConnection, source_role: NodeRole, source_is_if: bool) -> Option<String> {
    if connection.port != MAIN_PORT {
        return Some(connection.port.clone());
    }
    if source_role != NodeRole::Decision || connection.output_count < 2 {
        return None;
    }
    if source_is_if {
        return Some(if connection.output_index == 0 { "true" } else { "false" }.to_string());
    }
    Some(format!("Output {}", connection.output_index + 1))
}
