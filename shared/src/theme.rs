//! Theme metadata

use serde::{Deserialize, Serialize};

/// A named collection of assets on the remote store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// Remote theme id, absent until the store assigns one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
    /// Source URL a new theme is built from
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,
    /// "main" for the published theme, "unpublished" otherwise
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role: String,
    /// Whether the store has finished processing the theme
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previewable: Option<bool>,
}

impl Theme {
    /// A theme creation payload; new themes always start unpublished.
    pub fn unpublished(name: &str, source: &str) -> Theme {
        Theme {
            name: name.to_string(),
            source: source.to_string(),
            role: "unpublished".to_string(),
            ..Theme::default()
        }
    }
}
