use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

/// Parse JSON Lines content; blank lines are skipped. Content that is not
/// UTF-8 is rejected rather than repaired.
pub fn from_json_lines<T: DeserializeOwned>(content: &[u8]) -> Result<Vec<T>> {
    let text = std::str::from_utf8(content)
        .map_err(|e| Error::Storage(format!("index content is not valid UTF-8: {}", e)))?;
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(Into::into))
        .collect()
}

/// Serialize one record as a single JSON line, newline included.
pub fn to_json_line<T: Serialize>(record: &T) -> Result<String> {
    let mut line = serde_json::to_string(record)?;
    line.push('\n');
    Ok(line)
}
