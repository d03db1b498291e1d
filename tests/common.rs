//! Common test utilities: export fixtures for each platform and graph builders.
use flowport::prelude::*;
use serde_json::{Value, json};

/// The smallest Zapier export: one zap, a trigger followed by an action.
pub const ZAPIER_TWO_STEP_JSON: &str = r#"{"zaps":[{"id":"1","name":"Test","steps":[{"id":"s1","type":"trigger","position":0},{"id":"s2","type":"action","position":1}]}]}"#;

/// A Make blueprint whose only module is a router with two one-module routes.
#[allow(dead_code)]
pub fn make_router_blueprint() -> Value {
    json!({
        "name": "Router scenario",
        "flow": [
            {
                "id": 1,
                "module": "builtin:BasicRouter",
                "metadata": { "designer": { "x": 0, "y": 0 } },
                "routes": [
                    { "flow": [ { "id": 2, "module": "slack:CreateMessage" } ] },
                    { "flow": [ { "id": 3, "module": "google-sheets:addRow" } ] }
                ]
            }
        ]
    })
}

/// A linear Make scenario: webhook, JSON parse, HTTP call. No designer coordinates.
#[allow(dead_code)]
pub fn make_linear_blueprint() -> Value {
    json!({
        "name": "Linear scenario",
        "flow": [
            { "id": 1, "module": "gateway:CustomWebHook", "version": 1, "parameters": { "hook": 42 } },
            { "id": 2, "module": "json:ParseJSON", "version": 1 },
            { "id": 3, "module": "http:ActionSendData", "version": 3 }
        ],
        "metadata": { "version": 1 }
    })
}

/// An n8n workflow: manual trigger, IF with a true and a false branch.
#[allow(dead_code)]
pub fn n8n_if_workflow() -> Value {
    json!({
        "name": "Branching workflow",
        "nodes": [
            { "name": "Start", "type": "n8n-nodes-base.manualTrigger", "position": [0, 0], "parameters": {} },
            { "name": "Check", "type": "n8n-nodes-base.if", "position": [250, 0], "parameters": {} },
            { "name": "Notify", "type": "n8n-nodes-base.slack", "position": [500, -100],
              "parameters": { "resource": "message", "operation": "post" } },
            { "name": "Log", "type": "n8n-nodes-base.set", "position": [500, 100], "parameters": {} }
        ],
        "connections": {
            "Start": { "main": [[ { "node": "Check", "type": "main", "index": 0 } ]] },
            "Check": { "main": [
                [ { "node": "Notify", "type": "main", "index": 0 } ],
                [ { "node": "Log", "type": "main", "index": 0 } ]
            ] }
        }
    })
}

/// An n8n workflow whose connections reference a node that does not exist.
#[allow(dead_code)]
pub fn n8n_dangling_workflow() -> Value {
    json!({
        "name": "Dangling",
        "nodes": [
            { "name": "Start", "type": "n8n-nodes-base.manualTrigger", "position": [0, 0] }
        ],
        "connections": {
            "Start": { "main": [[ { "node": "Ghost", "type": "main", "index": 0 } ]] }
        }
    })
}

/// A Make blueprint with `count` top-level modules.
#[allow(dead_code)]
pub fn make_chain(count: usize) -> Value {
    let flow: Vec<Value> = (1..=count)
        .map(|id| json!({ "id": id, "module": "util:SetVariable2" }))
        .collect();
    json!({ "name": "Long chain", "flow": flow })
}

/// A Zapier export with `count` steps in a single zap.
#[allow(dead_code)]
pub fn zapier_steps(count: usize) -> Value {
    let steps: Vec<Value> = (0..count)
        .map(|i| {
            let step_type = if i == 0 { "trigger" } else { "action" };
            json!({ "id": format!("step-{}", i), "type": step_type, "position": i })
        })
        .collect();
    json!({ "zaps": [ { "name": "Big zap", "steps": steps } ] })
}

/// A Make blueprint nesting `depth` routers, one inside the first route of the other.
#[allow(dead_code)]
pub fn make_nested_routers(depth: usize) -> Value {
    let mut module = json!({ "id": depth + 1, "module": "slack:CreateMessage" });
    for level in (1..=depth).rev() {
        module = json!({
            "id": level,
            "module": "builtin:BasicRouter",
            "routes": [ { "flow": [ module ] } ]
        });
    }
    json!({ "name": "Nested", "flow": [ module ] })
}

/// Text of at least `bytes` bytes that would be valid JSON if it were parsed.
#[allow(dead_code)]
pub fn oversized_payload(bytes: usize) -> String {
    let mut text = String::with_capacity(bytes + 16);
    text.push_str("{\"padding\":\"");
    text.push_str(&"x".repeat(bytes));
    text.push_str("\"}");
    text
}

/// A canonical node with no position.
#[allow(dead_code)]
pub fn node(id: &str, role: NodeRole) -> CanonicalNode {
    CanonicalNode {
        id: id.to_string(),
        role,
        label: id.to_string(),
        app_name: "Test".to_string(),
        action_name: "test".to_string(),
        platform_metadata: Value::Null,
        position: None,
    }
}

/// A canonical node at a fixed position.
#[allow(dead_code)]
pub fn positioned(id: &str, role: NodeRole, x: f64, y: f64) -> CanonicalNode {
    CanonicalNode {
        position: Some(Position::new(x, y)),
        ..node(id, role)
    }
}

#[allow(dead_code)]
pub fn edge(source: &str, target: &str) -> CanonicalEdge {
    CanonicalEdge {
        id: format!("{}->{}", source, target),
        source_id: source.to_string(),
        target_id: target.to_string(),
        label: None,
    }
}

/// Asserts both endpoints of every edge are node ids of the result.
#[allow(dead_code)]
pub fn assert_edges_resolve(result: &ImportResult) {
    for edge in &result.edges {
        assert!(
            result.node(&edge.source_id).is_some(),
            "edge {} has unknown source {}",
            edge.id,
            edge.source_id
        );
        assert!(
            result.node(&edge.target_id).is_some(),
            "edge {} has unknown target {}",
            edge.id,
            edge.target_id
        );
    }
}
