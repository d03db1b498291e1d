//! Zapier exports: a list of zaps, each an ordered list of steps.

use super::schema::{self, Violations};
use super::{GraphBuilder, PlatformParser, SchemaViolation, WorkflowIr};
use crate::classify::classify;
use crate::config::ImportConfig;
use crate::error::ImportError;
use crate::model::{CanonicalNode, NodeId, NodeRole, Platform};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

const DEFAULT_NAME: &str = "Untitled zap";
const DEFAULT_APP: &str = "Zapier";
const CONDITION_LABEL: &str = "Condition met";
/// Step types the loose detector accepts as evidence of a Zapier export.
pub const KNOWN_STEP_TYPES: &[&str] = &["trigger", "action", "filter"];

/// A validated Zapier export.
#[derive(Debug, Clone)]
pub struct ZapierExport {
    pub zaps: Vec<ZapierZap>,
}

impl ZapierExport {
    /// The zap names joined, or a placeholder if none are named.
    pub fn name(&self) -> String {
        let names: Vec<&str> = self.zaps.iter().filter_map(|z| z.name.as_deref()).collect();
        if names.is_empty() {
            DEFAULT_NAME.to_string()
        } else {
            names.join(", ")
        }
    }
}

#[derive(Debug, Clone)]
pub struct ZapierZap {
    pub name: Option<String>,
    pub steps: Vec<ZapierStep>,
}

#[derive(Debug, Clone)]
pub struct ZapierStep {
    pub id: StepId,
    pub step_type: String,
    pub position: f64,
    pub title: Option<String>,
    pub app: Option<String>,
    pub action: Option<String>,
    pub raw: Value,
}

/// Zapier step ids appear both as strings and as numbers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StepId {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepId::Text(s) => f.write_str(s),
            StepId::Number(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Deserialize)]
struct RawZap {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Deserialize)]
struct RawStep {
    id: StepId,
    #[serde(rename = "type")]
    step_type: String,
    position: f64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    app: Option<String>,
    #[serde(default)]
    action: Option<String>,
}

/// Parser for Zapier exports.
pub struct ZapierParser;

impl ZapierParser {
    fn validate_steps(&self, items: &[Value], path: &str, violations: &mut Violations) -> Vec<ZapierStep> {
        let mut seen: AHashSet<String> = AHashSet::new();
        items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| {
                let step_path = schema::index(path, i);
                let raw: RawStep = violations.decode(item, &step_path)?;
                if !seen.insert(raw.id.to_string()) {
                    violations.push(
                        schema::join(&step_path, "id"),
                        format!("duplicate step id '{}' within one zap", raw.id),
                    );
                    return None;
                }
                Some(ZapierStep {
                    id: raw.id,
                    step_type: raw.step_type,
                    position: raw.position,
                    title: raw.title,
                    app: raw.app,
                    action: raw.action,
                    raw: item.clone(),
                })
            })
            .collect()
    }

    /// All step arrays in the export, wherever they sit.
    fn step_arrays(root: &Value) -> impl Iterator<Item = &Vec<Value>> {
        let root_steps = root.get("steps").and_then(Value::as_array);
        let zap_steps = root
            .get("zaps")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|zap| zap.get("steps").and_then(Value::as_array));
        root_steps.into_iter().chain(zap_steps)
    }
}

impl PlatformParser for ZapierParser {
    fn platform(&self) -> Platform {
        Platform::Zapier
    }

    fn has_signature(&self, root: &Value) -> bool {
        schema::has_array(root, "zaps")
    }

    fn has_loose_signature(&self, root: &Value) -> bool {
        Self::step_arrays(root).flatten().any(|step| {
            step.get("type")
                .and_then(Value::as_str)
                .is_some_and(|t| KNOWN_STEP_TYPES.contains(&t))
        })
    }

    fn validate(
        &self,
        root: &Value,
        _config: &ImportConfig,
    ) -> Result<WorkflowIr, Vec<SchemaViolation>> {
        let mut violations = Violations::new();
        let mut zaps = Vec::new();

        if root.get("zaps").is_none() && schema::has_array(root, "steps") {
            // A single zap exported on its own.
            let name = violations
                .decode::<RawZap>(root, "$")
                .and_then(|z| z.name.or(z.title));
            if let Some(items) = violations.require_array(root, "steps", "") {
                let steps = self.validate_steps(items, "steps", &mut violations);
                zaps.push(ZapierZap { name, steps });
            }
        } else if let Some(items) = violations.require_array(root, "zaps", "") {
            for (i, zap) in items.iter().enumerate() {
                let zap_path = schema::index("zaps", i);
                let Some(raw) = violations.decode::<RawZap>(zap, &zap_path) else {
                    continue;
                };
                if let Some(steps) = violations.require_array(zap, "steps", &zap_path) {
                    let steps_path = schema::join(&zap_path, "steps");
                    zaps.push(ZapierZap {
                        name: raw.name.or(raw.title),
                        steps: self.validate_steps(steps, &steps_path, &mut violations),
                    });
                }
            }
        }

        violations.finish(WorkflowIr::Zapier(ZapierExport { zaps }))
    }
}

/// Orders each zap's steps by position and chains them; edges leaving a
/// branching step carry a condition label.
///
/// Step ids become node ids. An id used by more than one zap is scoped by
/// its zap number, e.g. `zapier-2-s1`.
pub(super) fn normalize(
    export: ZapierExport,
    graph: &mut GraphBuilder,
) -> Result<String, ImportError> {
    let name = export.name();
    let mut zaps_using: AHashMap<String, usize> = AHashMap::new();
    for zap in &export.zaps {
        for step in &zap.steps {
            *zaps_using.entry(step.id.to_string()).or_insert(0) += 1;
        }
    }

    for (zap_index, zap) in export.zaps.into_iter().enumerate() {
        let mut previous: Option<(NodeId, Option<String>)> = None;
        let ordered = zap
            .steps
            .into_iter()
            .sorted_by(|a, b| a.position.total_cmp(&b.position));
        for step in ordered {
            let role = classify(Platform::Zapier, &step.step_type);
            let label = step
                .title
                .clone()
                .or_else(|| match (&step.app, &step.action) {
                    (Some(app), Some(action)) => Some(format!("{}: {}", app, action)),
                    _ => None,
                })
                .unwrap_or_else(|| step.id.to_string());
            let condition = (role == NodeRole::Decision)
                .then(|| step.title.clone().unwrap_or_else(|| CONDITION_LABEL.to_string()));
            let node = CanonicalNode {
                id: node_id(&step.id, zap_index, &zaps_using),
                role,
                label,
                app_name: step.app.unwrap_or_else(|| DEFAULT_APP.to_string()),
                action_name: step.action.unwrap_or(step.step_type),
                platform_metadata: step.raw,
                position: None,
            };
            let current = graph.add_node(node)?;
            if let Some((prev, prev_condition)) = previous {
                graph.connect(&prev, &current, prev_condition);
            }
            previous = Some((current, condition));
        }
    }
    log::debug!(
        "Normalized Zapier export '{}' into {} node(s)",
        name,
        graph.node_count()
    );
    Ok(name)
}

fn node_id(step_id: &StepId, zap_index: usize, zaps_using: &AHashMap<String, usize>) -> NodeId {
    let id = step_id.to_string();
    if zaps_using.get(&id).is_some_and(|&count| count > 1) {
        format!("zapier-{}-{}", zap_index + 1, id)
    } else {
        id
    }
}
