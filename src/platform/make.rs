//! Make scenario blueprints.
//!
//! A blueprint is a `flow` of modules. Router modules carry `routes`, each
//! with its own nested `flow` of modules of the same shape.

use super::schema::{self, Violations};
use super::{GraphBuilder, PlatformParser, SchemaViolation, WorkflowIr};
use crate::classify::classify;
use crate::config::ImportConfig;
use crate::error::ImportError;
use crate::model::{CanonicalNode, NodeId, NodeRole, Platform, Position};
use serde::Deserialize;
use serde_json::{Map, Value};

const DEFAULT_NAME: &str = "Untitled scenario";

/// A validated Make blueprint.
#[derive(Debug, Clone)]
pub struct MakeBlueprint {
    pub name: String,
    pub flow: Vec<MakeModule>,
}

impl MakeBlueprint {
    pub fn node_count(&self) -> usize {
        self.flow.iter().map(MakeModule::node_count).sum()
    }
}

/// One module of a blueprint, with any routes nested beneath it.
#[derive(Debug, Clone)]
pub struct MakeModule {
    pub id: u64,
    /// `app:action` identifier, e.g. `google-sheets:addRow`.
    pub module: String,
    pub label: Option<String>,
    pub position: Option<Position>,
    /// `true` if the module carried a `routes` array, even an empty one.
    pub is_router: bool,
    pub routes: Vec<MakeRoute>,
    /// The module object without its `routes`.
    pub raw: Value,
}

impl MakeModule {
    fn node_count(&self) -> usize {
        1 + self
            .routes
            .iter()
            .flat_map(|r| r.flow.iter())
            .map(MakeModule::node_count)
            .sum::<usize>()
    }

    /// Splits the module identifier into (app, action).
    pub fn app_and_action(&self) -> (&str, &str) {
        self.module
            .split_once(':')
            .unwrap_or((self.module.as_str(), self.module.as_str()))
    }
}

#[derive(Debug, Clone)]
pub struct MakeRoute {
    pub flow: Vec<MakeModule>,
}

// --- Raw shapes decoded with serde ---

#[derive(Deserialize)]
struct RawModule {
    id: u64,
    module: String,
    #[serde(default)]
    metadata: Option<RawModuleMetadata>,
}

#[derive(Deserialize)]
struct RawModuleMetadata {
    #[serde(default)]
    designer: Option<RawDesigner>,
}

#[derive(Deserialize)]
struct RawDesigner {
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    name: Option<String>,
}

/// Parser for Make blueprints.
pub struct MakeParser;

impl MakeParser {
    /// The object holding `flow`: the root, or a nested `blueprint` wrapper.
    fn blueprint_root(root: &Value) -> &Value {
        match root.get("blueprint") {
            Some(inner) if inner.is_object() => inner,
            _ => root,
        }
    }

    fn validate_flow(
        &self,
        items: &[Value],
        path: &str,
        depth: usize,
        config: &ImportConfig,
        violations: &mut Violations,
    ) -> Vec<MakeModule> {
        items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| {
                let item_path = schema::index(path, i);
                self.validate_module(item, &item_path, depth, config, violations)
            })
            .collect()
    }

    fn validate_module(
        &self,
        item: &Value,
        path: &str,
        depth: usize,
        config: &ImportConfig,
        violations: &mut Violations,
    ) -> Option<MakeModule> {
        let Some(object) = item.as_object() else {
            violations.push(
                path,
                format!("expected a module object, found {}", schema::kind_of(item)),
            );
            return None;
        };
        let raw: RawModule = violations.decode(item, path)?;

        let mut routes = Vec::new();
        let is_router = object.contains_key("routes");
        if is_router {
            let routes_path = schema::join(path, "routes");
            if depth >= config.max_nesting_depth {
                violations.push(
                    routes_path,
                    format!(
                        "routes are nested deeper than the limit of {} levels",
                        config.max_nesting_depth
                    ),
                );
                return None;
            }
            let route_items = violations.require_array(item, "routes", path)?;
            for (r, route) in route_items.iter().enumerate() {
                let route_path = schema::index(&routes_path, r);
                if let Some(flow) = violations.require_array(route, "flow", &route_path) {
                    let flow_path = schema::join(&route_path, "flow");
                    routes.push(MakeRoute {
                        flow: self.validate_flow(flow, &flow_path, depth + 1, config, violations),
                    });
                }
            }
        }

        let designer = raw.metadata.and_then(|m| m.designer);
        let position = designer.as_ref().and_then(|d| match (d.x, d.y) {
            (Some(x), Some(y)) => Some(Position::new(x, y)),
            _ => None,
        });
        let label = designer.and_then(|d| d.name).filter(|n| !n.trim().is_empty());
        let raw_object: Map<String, Value> = object
            .iter()
            .filter(|(key, _)| key.as_str() != "routes")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Some(MakeModule {
            id: raw.id,
            module: raw.module,
            label,
            position,
            is_router,
            routes,
            raw: Value::Object(raw_object),
        })
    }
}

impl PlatformParser for MakeParser {
    fn platform(&self) -> Platform {
        Platform::Make
    }

    fn has_signature(&self, root: &Value) -> bool {
        schema::has_array(Self::blueprint_root(root), "flow")
    }

    fn has_loose_signature(&self, root: &Value) -> bool {
        schema::has_array(Self::blueprint_root(root), "modules")
    }

    fn validate(
        &self,
        root: &Value,
        config: &ImportConfig,
    ) -> Result<WorkflowIr, Vec<SchemaViolation>> {
        let mut violations = Violations::new();
        if !root.is_object() {
            violations.push("$", "expected a blueprint object");
            return violations.finish(WorkflowIr::Make(MakeBlueprint {
                name: String::new(),
                flow: Vec::new(),
            }));
        }

        let blueprint = Self::blueprint_root(root);
        let base = if std::ptr::eq(blueprint, root) {
            ""
        } else {
            "blueprint"
        };
        let key = if schema::has_array(blueprint, "flow") || blueprint.get("modules").is_none() {
            "flow"
        } else {
            "modules"
        };

        let name = blueprint
            .get("name")
            .or_else(|| root.get("name"))
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_NAME)
            .to_string();

        let flow = match violations.require_array(blueprint, key, base) {
            Some(items) => {
                let path = schema::join(base, key);
                self.validate_flow(items, &path, 0, config, &mut violations)
            }
            None => Vec::new(),
        };

        violations.finish(WorkflowIr::Make(MakeBlueprint { name, flow }))
    }
}

/// Chains top-level modules in order and expands router routes beneath them.
pub(super) fn normalize(
    blueprint: MakeBlueprint,
    graph: &mut GraphBuilder,
) -> Result<String, ImportError> {
    let mut previous: Option<NodeId> = None;
    for module in blueprint.flow {
        let id = format!("make-{}", module.id);
        let current = add_module(module, id, graph)?;
        if let Some(prev) = &previous {
            graph.connect(prev, &current, None);
        }
        previous = Some(current);
    }
    log::debug!(
        "Normalized Make blueprint '{}' into {} node(s)",
        blueprint.name,
        graph.node_count()
    );
    Ok(blueprint.name)
}

fn add_module(
    module: MakeModule,
    id: NodeId,
    graph: &mut GraphBuilder,
) -> Result<NodeId, ImportError> {
    let role = if module.is_router {
        NodeRole::Decision
    } else {
        classify(Platform::Make, &module.module)
    };
    let (app, action) = module.app_and_action();
    let (app_name, action_name) = (app.to_string(), action.to_string());
    let node = CanonicalNode {
        id,
        role,
        label: module.label.clone().unwrap_or_else(|| module.module.clone()),
        app_name,
        action_name,
        platform_metadata: module.raw,
        position: module.position,
    };
    let router_id = graph.add_node(node)?;

    for (index, route) in module.routes.into_iter().enumerate() {
        let mut previous: Option<NodeId> = None;
        for nested in route.flow {
            let nested_id = graph.fresh_id();
            let current = add_module(nested, nested_id, graph)?;
            match &previous {
                None => graph.connect(&router_id, &current, Some(format!("Route {}", index + 1))),
                Some(prev) => graph.connect(prev, &current, None),
            };
            previous = Some(current);
        }
    }
    Ok(router_id)
}
