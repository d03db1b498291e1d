//! # Flowport - Workflow Import & Graph Normalization Engine
//!
//! **Flowport** takes a workflow export from Make, n8n or Zapier, works out which
//! platform produced it, validates it, and turns it into one canonical directed
//! graph of nodes and edges with a 2D position for every node.
//!
//! ## Core Workflow
//!
//! Each import is a single synchronous pass over an immutable input:
//!
//! 1.  **Guard**: Payloads larger than the configured limit (10 MiB by default) are rejected before parsing.
//! 2.  **Detect**: The parsed JSON is matched against each platform's export shape, most specific first.
//! 3.  **Validate**: The matching platform's validator turns the raw JSON into a typed intermediate tree, reporting every structural violation.
//! 4.  **Normalize**: The tree becomes canonical nodes and edges. Make routers are expanded recursively and n8n connections are resolved by name.
//! 5.  **Lay out**: Nodes without an author-supplied position get one from a layered layout, with each connected component kept apart from the others.
//!
//! An import either fully succeeds or fails with an [`ImportError`](error::ImportError)
//! carrying one of four codes: `InvalidFormat`, `UnsupportedPlatform`, `ParseError`
//! or `FileTooLarge`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flowport::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let export = r#"{"zaps":[{"id":"1","name":"Test","steps":[
//!         {"id":"s1","type":"trigger","position":0},
//!         {"id":"s2","type":"action","position":1}
//!     ]}]}"#;
//!
//!     let importer = Importer::builder().max_nodes(500).build();
//!     let result = importer.import_str(export)?;
//!
//!     println!("Imported {} from {}", result.metadata.original_name, result.metadata.platform);
//!     for node in &result.nodes {
//!         let position = node.position.expect("layout assigns every position");
//!         println!("  {} ({}) at ({}, {})", node.label, node.role, position.x, position.y);
//!     }
//!     Ok(())
//! }
//! ```

pub mod classify;
pub mod config;
pub mod detect;
pub mod error;
pub mod guard;
pub mod importer;
pub mod layout;
pub mod model;
pub mod platform;
pub mod prelude;

pub use importer::{Importer, ImporterBuilder, import_workflow};

#[cfg(feature = "python-bindings")]
mod python;
