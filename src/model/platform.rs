use serde::{Deserialize, Serialize};
use std::fmt;

/// The automation platforms whose exports can be imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Make (formerly Integromat) scenario blueprints.
    Make,
    /// n8n workflow exports.
    N8n,
    /// Zapier zap exports.
    Zapier,
}

impl Platform {
    /// All platforms in detection order, most specific first.
    pub const ALL: [Platform; 3] = [Platform::Make, Platform::N8n, Platform::Zapier];

    /// Lowercase identifier used in serialized output and CLI arguments.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Make => "make",
            Platform::N8n => "n8n",
            Platform::Zapier => "zapier",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Make => write!(f, "Make"),
            Platform::N8n => write!(f, "n8n"),
            Platform::Zapier => write!(f, "Zapier"),
        }
    }
}
