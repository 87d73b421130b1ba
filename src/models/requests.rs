//! Request DTOs for the admin API
//!
//! Defines the structure of incoming query parameters.

use serde::Deserialize;

/// Query string for GET /cache/entry
#[derive(Debug, Clone, Deserialize)]
pub struct EntryQuery {
    /// Canonical URI, e.g. `http://example.com:80/index.html`
    #[serde(default)]
    pub uri: Option<String>,
}

impl EntryQuery {
    /// Returns the requested URI, or an error message if it is missing or blank.
    pub fn validate(&self) -> Result<&str, String> {
        match self.uri.as_deref().map(str::trim) {
            Some(uri) if !uri.is_empty() => Ok(uri),
            _ => Err("Query parameter 'uri' is required".to_string()),
        }
    }
}
