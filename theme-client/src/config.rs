//! Client configuration

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Theme the client operates on: a numbered theme or the published one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ThemeId {
    /// The store's published theme; the theme-id URL segment is omitted
    #[default]
    Live,
    /// A specific theme by numeric id
    Numbered(u64),
}

impl ThemeId {
    /// The numeric id, when this is not the live sentinel.
    pub fn number(&self) -> Option<u64> {
        match self {
            ThemeId::Live => None,
            ThemeId::Numbered(id) => Some(*id),
        }
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeId::Live => write!(f, "live"),
            ThemeId::Numbered(id) => write!(f, "{id}"),
        }
    }
}

impl From<String> for ThemeId {
    fn from(raw: String) -> Self {
        match raw.parse::<u64>() {
            Ok(id) => ThemeId::Numbered(id),
            Err(_) => ThemeId::Live,
        }
    }
}

impl From<ThemeId> for String {
    fn from(id: ThemeId) -> Self {
        id.to_string()
    }
}

/// Configuration for connecting to a store's admin API
///
/// Immutable after construction; shared read-only by the transport and
/// the sync engine.
#[derive(Debug, Clone)]
pub struct Config {
    /// Store domain (e.g., "example.myshopify.com")
    pub domain: String,

    /// Theme to operate on
    pub theme_id: ThemeId,

    /// Pre-obtained admin access token
    pub access_token: String,

    /// Optional outbound proxy URL
    pub proxy: Option<String>,

    /// Uniform timeout applied to every request
    pub timeout: Duration,

    /// Accept invalid certificates; test-only transport override
    pub insecure: bool,
}

impl Config {
    /// Create a new configuration targeting the live theme
    pub fn new(domain: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            theme_id: ThemeId::Live,
            access_token: access_token.into(),
            proxy: None,
            timeout: Duration::from_secs(30),
            insecure: false,
        }
    }

    /// Target a specific theme by numeric id
    pub fn with_theme_id(mut self, id: u64) -> Self {
        self.theme_id = ThemeId::Numbered(id);
        self
    }

    /// Set the outbound proxy URL
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Accept invalid certificates (test only)
    pub fn with_insecure(mut self) -> Self {
        self.insecure = true;
        self
    }
}
