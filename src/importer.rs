use crate::config::{ImportConfig, LayoutConfig};
use crate::detect;
use crate::error::ImportError;
use crate::guard;
use crate::layout::{LayoutEngine, LayoutSummary};
use crate::model::{ImportMetadata, ImportResult, Platform, estimate_duration_minutes};
use chrono::Utc;
use serde_json::Value;

/// Runs the full import pipeline: guard, detect, validate, normalize, lay out.
///
/// An `Importer` holds only configuration, so one instance can be shared
/// across threads and reused for any number of imports.
#[derive(Debug, Clone, Default)]
pub struct Importer {
    config: ImportConfig,
    layout: LayoutEngine,
}

/// Builder for an `Importer`, starting from the default limits.
#[derive(Debug, Clone, Default)]
pub struct ImporterBuilder {
    config: ImportConfig,
}

impl ImporterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration, e.g. one loaded from a file.
    pub fn with_config(mut self, config: ImportConfig) -> Self {
        self.config = config;
        self
    }

    pub fn max_payload_bytes(mut self, bytes: usize) -> Self {
        self.config.max_payload_bytes = bytes;
        self
    }

    pub fn max_nodes(mut self, max: usize) -> Self {
        self.config.max_nodes = max;
        self
    }

    pub fn max_nesting_depth(mut self, depth: usize) -> Self {
        self.config.max_nesting_depth = depth;
        self
    }

    pub fn discard_source_positions(mut self, discard: bool) -> Self {
        self.config.discard_source_positions = discard;
        self
    }

    pub fn layout(mut self, layout: LayoutConfig) -> Self {
        self.config.layout = layout;
        self
    }

    pub fn build(self) -> Importer {
        Importer::new(self.config)
    }
}

impl Importer {
    pub fn new(config: ImportConfig) -> Self {
        let layout = LayoutEngine::new(config.layout);
        Self { config, layout }
    }

    pub fn builder() -> ImporterBuilder {
        ImporterBuilder::new()
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Imports an export given as text.
    pub fn import_str(&self, text: &str) -> Result<ImportResult, ImportError> {
        let root = guard::parse_text(text, self.config.max_payload_bytes)?;
        self.import_value(&root)
    }

    /// Imports an export given as raw bytes.
    pub fn import_bytes(&self, bytes: &[u8]) -> Result<ImportResult, ImportError> {
        let root = guard::parse_bytes(bytes, self.config.max_payload_bytes)?;
        self.import_value(&root)
    }

    /// Imports an already-parsed export. The size guard is the caller's concern here.
    pub fn import_value(&self, root: &Value) -> Result<ImportResult, ImportError> {
        self.run(root).map(|(result, _)| result)
    }

    /// Like [`Importer::import_value`], also returning what the layout pass did.
    pub fn import_with_summary(
        &self,
        root: &Value,
    ) -> Result<(ImportResult, LayoutSummary), ImportError> {
        self.run(root)
    }

    /// Guards, parses and detects without validating further.
    pub fn detect_str(&self, text: &str) -> Result<Option<Platform>, ImportError> {
        let root = guard::parse_text(text, self.config.max_payload_bytes)?;
        Ok(detect::detect(&root, &self.config))
    }

    fn run(&self, root: &Value) -> Result<(ImportResult, LayoutSummary), ImportError> {
        let detection =
            detect::resolve(root, &self.config).ok_or(ImportError::UnsupportedPlatform)?;
        let platform = detection.platform;

        let ir = match detection.ir {
            Some(ir) => ir,
            None => platform
                .parser()
                .validate(root, &self.config)
                .map_err(|violations| ImportError::SchemaValidation {
                    platform,
                    violations,
                })?,
        };

        let mut graph = ir.normalize(&self.config)?;
        graph.verify()?;
        log::debug!(
            "Normalized {} export into {} node(s) and {} edge(s)",
            platform,
            graph.nodes.len(),
            graph.edges.len()
        );

        let summary = self.layout.apply(&mut graph.nodes, &graph.edges);

        let metadata = ImportMetadata {
            platform,
            original_name: graph.name,
            import_timestamp: Utc::now(),
            node_count: graph.nodes.len(),
            estimated_duration_minutes: estimate_duration_minutes(&graph.nodes),
        };
        log::info!(
            "Imported {} workflow '{}': {} node(s), {} edge(s), {} component(s)",
            platform,
            metadata.original_name,
            metadata.node_count,
            graph.edges.len(),
            summary.components
        );

        Ok((
            ImportResult {
                nodes: graph.nodes,
                edges: graph.edges,
                metadata,
            },
            summary,
        ))
    }
}

/// Imports `text` with the default configuration.
pub fn import_workflow(text: &str) -> Result<ImportResult, ImportError> {
    Importer::default().import_str(text)
}
