//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from the
//! flowport crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use flowport::prelude::*;
//!
//! # fn run_example() -> Result<(), ImportError> {
//! let text = std::fs::read_to_string("path/to/export.json").expect("readable export");
//! let result = Importer::default().import_str(&text)?;
//! println!("{} nodes, {} edges", result.nodes.len(), result.edges.len());
//! # Ok(())
//! # }
//! ```

// Pipeline
pub use crate::detect::detect;
pub use crate::importer::{Importer, ImporterBuilder, import_workflow};
pub use crate::layout::{LayoutEngine, LayoutSummary, Rect};

// Configuration
pub use crate::config::{ImportConfig, LayoutConfig, LayoutDirection};

// Canonical model
pub use crate::model::{
    CanonicalEdge, CanonicalNode, ImportMetadata, ImportResult, NodeRole, Platform, Position,
};

// Errors
pub use crate::error::{ErrorReport, ImportError, ImportErrorCode};
