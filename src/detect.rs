//! Platform detection.
//!
//! Checks run most-specific first and stop at the first hit:
//!
//! 1. each platform's canonical top-level shape, confirmed by schema validation;
//! 2. the same shapes without confirmation, so a recognisable but malformed
//!    export is reported by its own validator;
//! 3. looser per-platform hints for exports that deviate from the canonical shape.

use crate::config::ImportConfig;
use crate::model::Platform;
use crate::platform::WorkflowIr;
use serde_json::Value;

/// The outcome of detection. `ir` is set when validation already confirmed the match.
#[derive(Debug)]
pub(crate) struct Detection {
    pub(crate) platform: Platform,
    pub(crate) ir: Option<WorkflowIr>,
}

/// Classifies a parsed export. Returns `None` if it matches no supported platform.
pub fn detect(root: &Value, config: &ImportConfig) -> Option<Platform> {
    resolve(root, config).map(|d| d.platform)
}

pub(crate) fn resolve(root: &Value, config: &ImportConfig) -> Option<Detection> {
    if !root.is_object() {
        log::debug!("Export root is not a JSON object; no platform matches");
        return None;
    }

    for platform in Platform::ALL {
        let parser = platform.parser();
        if !parser.has_signature(root) {
            continue;
        }
        match parser.validate(root, config) {
            Ok(ir) => {
                log::debug!("Detected {} export", platform);
                return Some(Detection {
                    platform,
                    ir: Some(ir),
                });
            }
            Err(violations) => log::debug!(
                "Export has the {} shape but failed validation with {} violation(s)",
                platform,
                violations.len()
            ),
        }
    }

    let unconfirmed = Platform::ALL
        .into_iter()
        .find(|p| p.parser().has_signature(root))
        .or_else(|| {
            Platform::ALL
                .into_iter()
                .find(|p| p.parser().has_loose_signature(root))
        });

    if let Some(platform) = unconfirmed {
        log::warn!("Detected {} export from a partial match", platform);
    }
    unconfirmed.map(|platform| Detection { platform, ir: None })
}
