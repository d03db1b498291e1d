use crate::model::Platform;
use crate::platform::schema::SchemaViolation;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use thiserror::Error;

/// The four error codes surfaced to callers. Every `ImportError` maps to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImportErrorCode {
    InvalidFormat,
    UnsupportedPlatform,
    ParseError,
    FileTooLarge,
}

impl fmt::Display for ImportErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            ImportErrorCode::InvalidFormat => "InvalidFormat",
            ImportErrorCode::UnsupportedPlatform => "UnsupportedPlatform",
            ImportErrorCode::ParseError => "ParseError",
            ImportErrorCode::FileTooLarge => "FileTooLarge",
        };
        f.write_str(code)
    }
}

/// Errors that can occur while importing a workflow export.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImportError {
    #[error("File is too large: {size} bytes exceeds the maximum of {max} bytes")]
    FileTooLarge { size: usize, max: usize },

    #[error("Failed to parse workflow JSON at line {line}, column {column}: {message}")]
    InvalidJson {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("{platform} export failed schema validation: {}", summarize(.violations))]
    SchemaValidation {
        platform: Platform,
        violations: Vec<SchemaViolation>,
    },

    #[error("The export does not match any supported platform (Make, n8n, Zapier)")]
    UnsupportedPlatform,

    #[error("Workflow has {count} nodes, which exceeds the limit of {max}")]
    NodeLimitExceeded { count: usize, max: usize },

    #[error(
        "Node '{missing_node}' not found, which is required by a connection from node '{source_node}'"
    )]
    DanglingConnection {
        source_node: String,
        missing_node: String,
    },

    #[error("Node id '{id}' is used by more than one node")]
    DuplicateNodeId { id: String },

    #[error("Edge '{edge_id}' references node '{node_id}', which does not exist")]
    UnknownEdgeEndpoint { edge_id: String, node_id: String },
}

impl ImportError {
    /// The public error code for this failure.
    pub fn code(&self) -> ImportErrorCode {
        match self {
            ImportError::FileTooLarge { .. } => ImportErrorCode::FileTooLarge,
            ImportError::InvalidJson { .. } | ImportError::SchemaValidation { .. } => {
                ImportErrorCode::InvalidFormat
            }
            ImportError::UnsupportedPlatform => ImportErrorCode::UnsupportedPlatform,
            ImportError::NodeLimitExceeded { .. }
            | ImportError::DanglingConnection { .. }
            | ImportError::DuplicateNodeId { .. }
            | ImportError::UnknownEdgeEndpoint { .. } => ImportErrorCode::ParseError,
        }
    }

    /// Structured detail for display next to the message, if the error carries any.
    pub fn detail(&self) -> Option<serde_json::Value> {
        match self {
            ImportError::FileTooLarge { size, max } => Some(json!({ "size": size, "max": max })),
            ImportError::InvalidJson { line, column, .. } => {
                Some(json!({ "line": line, "column": column }))
            }
            ImportError::SchemaValidation {
                platform,
                violations,
            } => Some(json!({ "platform": platform, "violations": violations })),
            ImportError::UnsupportedPlatform => None,
            ImportError::NodeLimitExceeded { count, max } => {
                Some(json!({ "count": count, "max": max }))
            }
            ImportError::DanglingConnection {
                source_node,
                missing_node,
            } => Some(json!({ "sourceNode": source_node, "missingNode": missing_node })),
            ImportError::DuplicateNodeId { id } => Some(json!({ "id": id })),
            ImportError::UnknownEdgeEndpoint { edge_id, node_id } => {
                Some(json!({ "edgeId": edge_id, "nodeId": node_id }))
            }
        }
    }

    /// A serializable summary of this error for CLI output and bindings.
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code(),
            message: self.to_string(),
            detail: self.detail(),
        }
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::InvalidJson {
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
        }
    }
}

/// Error code, message and optional detail, as handed to user-facing surfaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: ImportErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

fn summarize(violations: &[SchemaViolation]) -> String {
    match violations {
        [] => "no details".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{} (and {} more)", first, rest.len()),
    }
}
