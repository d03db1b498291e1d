//! Size and format checks applied before any platform-specific work.

use crate::error::ImportError;
use serde_json::Value;

/// Rejects payloads larger than `max` bytes. Call this before reading or parsing.
pub fn check_size(size: usize, max: usize) -> Result<(), ImportError> {
    if size > max {
        return Err(ImportError::FileTooLarge { size, max });
    }
    Ok(())
}

/// Checks the size of `text` and parses it as JSON.
pub fn parse_text(text: &str, max: usize) -> Result<Value, ImportError> {
    check_size(text.len(), max)?;
    Ok(serde_json::from_str(text)?)
}

/// Checks the size of `bytes` and parses them as JSON.
///
/// Invalid UTF-8 surfaces as a JSON parse failure.
pub fn parse_bytes(bytes: &[u8], max: usize) -> Result<Value, ImportError> {
    check_size(bytes.len(), max)?;
    Ok(serde_json::from_slice(bytes)?)
}
