//! Per-platform parsing: signature checks, schema validation and normalization.
//!
//! Each supported platform implements [`PlatformParser`]. The importer picks one
//! parser per export (see [`crate::detect`]) and never branches on the platform
//! again: validation yields a [`WorkflowIr`] that knows how to normalize itself.

use crate::config::ImportConfig;
use crate::error::ImportError;
use crate::model::Platform;
use serde_json::Value;

mod graph;
pub mod make;
pub mod n8n;
pub mod schema;
pub mod zapier;

pub use graph::CanonicalGraph;
pub(crate) use graph::GraphBuilder;
pub use make::{MakeBlueprint, MakeModule, MakeParser, MakeRoute};
pub use n8n::{N8nConnection, N8nNode, N8nParser, N8nWorkflow};
pub use schema::SchemaViolation;
pub use zapier::{ZapierExport, ZapierParser, ZapierStep, ZapierZap};

/// The contract every platform implements.
pub trait PlatformParser: Send + Sync {
    fn platform(&self) -> Platform;

    /// The canonical top-level shape of this platform's exports.
    fn has_signature(&self, root: &Value) -> bool;

    /// Weaker hints for exports that deviate from the canonical shape.
    fn has_loose_signature(&self, root: &Value) -> bool;

    /// Structurally validates `root` into the platform's intermediate representation.
    ///
    /// Returns every violation found, not just the first.
    fn validate(
        &self,
        root: &Value,
        config: &ImportConfig,
    ) -> Result<WorkflowIr, Vec<SchemaViolation>>;
}

impl Platform {
    /// The parser responsible for this platform.
    pub fn parser(self) -> &'static dyn PlatformParser {
        match self {
            Platform::Make => &MakeParser,
            Platform::N8n => &N8nParser,
            Platform::Zapier => &ZapierParser,
        }
    }
}

/// A validated, platform-specific workflow tree.
#[derive(Debug, Clone)]
pub enum WorkflowIr {
    Make(MakeBlueprint),
    N8n(N8nWorkflow),
    Zapier(ZapierExport),
}

impl WorkflowIr {
    pub fn platform(&self) -> Platform {
        match self {
            WorkflowIr::Make(_) => Platform::Make,
            WorkflowIr::N8n(_) => Platform::N8n,
            WorkflowIr::Zapier(_) => Platform::Zapier,
        }
    }

    /// Number of canonical nodes this tree will produce, counting every nesting level.
    pub fn node_count(&self) -> usize {
        match self {
            WorkflowIr::Make(blueprint) => blueprint.node_count(),
            WorkflowIr::N8n(workflow) => workflow.nodes.len(),
            WorkflowIr::Zapier(export) => export.zaps.iter().map(|z| z.steps.len()).sum(),
        }
    }

    /// Converts the tree into canonical nodes and edges.
    ///
    /// Aborts without a partial graph if the node cap would be exceeded or a
    /// reference cannot be resolved.
    pub fn normalize(self, config: &ImportConfig) -> Result<CanonicalGraph, ImportError> {
        let count = self.node_count();
        if count > config.max_nodes {
            return Err(ImportError::NodeLimitExceeded {
                count,
                max: config.max_nodes,
            });
        }

        let mut builder = GraphBuilder::new(self.platform(), config);
        let name = match self {
            WorkflowIr::Make(blueprint) => make::normalize(blueprint, &mut builder)?,
            WorkflowIr::N8n(workflow) => n8n::normalize(workflow, &mut builder)?,
            WorkflowIr::Zapier(export) => zapier::normalize(export, &mut builder)?,
        };
        Ok(builder.finish(name))
    }
}
