//! Maps platform-specific type identifiers onto canonical node roles.
//!
//! Resolution order: exact lookup in the platform's table of well-known
//! identifiers, then keyword heuristics, then `Action`.

use crate::model::{NodeRole, Platform};

const MAKE_TYPES: &[(&str, NodeRole)] = &[
    ("gateway:CustomWebHook", NodeRole::Trigger),
    ("gateway:CustomMailHook", NodeRole::Trigger),
    ("builtin:BasicScheduler", NodeRole::Trigger),
    ("email:TriggerNewEmail", NodeRole::Trigger),
    ("google-sheets:watchUpdatedCells", NodeRole::Trigger),
    ("google-sheets:watchRows", NodeRole::Trigger),
    ("builtin:BasicRouter", NodeRole::Decision),
    ("builtin:BasicFilter", NodeRole::Decision),
    ("gateway:WebhookRespond", NodeRole::Action),
    ("builtin:BasicFeeder", NodeRole::Action),
    ("builtin:BasicAggregator", NodeRole::Action),
    ("util:SetVariable2", NodeRole::Action),
    ("http:ActionSendData", NodeRole::Action),
    ("json:ParseJSON", NodeRole::Action),
];

const N8N_TYPES: &[(&str, NodeRole)] = &[
    ("n8n-nodes-base.webhook", NodeRole::Trigger),
    ("n8n-nodes-base.manualTrigger", NodeRole::Trigger),
    ("n8n-nodes-base.scheduleTrigger", NodeRole::Trigger),
    ("n8n-nodes-base.cron", NodeRole::Trigger),
    ("n8n-nodes-base.start", NodeRole::Trigger),
    ("n8n-nodes-base.emailReadImap", NodeRole::Trigger),
    ("n8n-nodes-base.if", NodeRole::Decision),
    ("n8n-nodes-base.switch", NodeRole::Decision),
    ("n8n-nodes-base.filter", NodeRole::Decision),
    ("n8n-nodes-base.merge", NodeRole::Action),
    ("n8n-nodes-base.set", NodeRole::Action),
    ("n8n-nodes-base.code", NodeRole::Action),
    ("n8n-nodes-base.function", NodeRole::Action),
    ("n8n-nodes-base.httpRequest", NodeRole::Action),
    ("n8n-nodes-base.respondToWebhook", NodeRole::Action),
];

const ZAPIER_TYPES: &[(&str, NodeRole)] = &[
    ("trigger", NodeRole::Trigger),
    ("action", NodeRole::Action),
    ("search", NodeRole::Action),
    ("filter", NodeRole::Decision),
    ("path", NodeRole::Decision),
    ("paths", NodeRole::Decision),
    ("branch", NodeRole::Decision),
];

const TRIGGER_KEYWORDS: &[&str] = &["webhook", "watch", "trigger", "cron"];
const DECISION_KEYWORDS: &[&str] = &["router", "filter", "switch", "if"];

/// Classifies a type identifier for the given platform. Always returns a role.
pub fn classify(platform: Platform, type_id: &str) -> NodeRole {
    lookup(platform, type_id)
        .or_else(|| classify_by_keyword(type_id))
        .unwrap_or(NodeRole::Action)
}

/// Exact-match lookup in the platform's table of well-known identifiers.
pub fn lookup(platform: Platform, type_id: &str) -> Option<NodeRole> {
    let table = match platform {
        Platform::Make => MAKE_TYPES,
        Platform::N8n => N8N_TYPES,
        Platform::Zapier => ZAPIER_TYPES,
    };
    table
        .iter()
        .find(|(known, _)| *known == type_id)
        .map(|(_, role)| *role)
}

/// Keyword heuristics shared by all platforms.
pub fn classify_by_keyword(type_id: &str) -> Option<NodeRole> {
    let lowered = type_id.to_lowercase();
    if TRIGGER_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        return Some(NodeRole::Trigger);
    }
    if DECISION_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        return Some(NodeRole::Decision);
    }
    None
}
