//! Admin API response classification
//!
//! Every response is classified by the request that produced it; the
//! discriminant decides which payload field is meaningful.

use serde::Deserialize;
use shared::{Asset, Theme};

/// What kind of payload a response carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    /// A single asset
    Asset,
    /// All assets of the theme
    AssetList,
    /// Theme metadata
    Theme,
}

/// Raw wire form of an admin API response body
#[derive(Debug, Default, Deserialize)]
struct ResponseBody {
    #[serde(default)]
    asset: Option<Asset>,
    #[serde(default)]
    assets: Option<Vec<Asset>>,
    #[serde(default)]
    theme: Option<Theme>,
}

/// A classified admin API response
///
/// Exactly one payload field is populated, matching `request_type`.
#[derive(Debug, Clone)]
pub struct ThemeResponse {
    pub request_type: ResponseType,
    pub asset: Option<Asset>,
    pub assets: Vec<Asset>,
    pub theme: Option<Theme>,
}

impl ThemeResponse {
    /// Decode a response body under the given discriminant.
    pub fn from_body(request_type: ResponseType, body: &str) -> serde_json::Result<ThemeResponse> {
        let wire: ResponseBody = if body.trim().is_empty() {
            ResponseBody::default()
        } else {
            serde_json::from_str(body)?
        };
        Ok(ThemeResponse {
            request_type,
            asset: wire.asset,
            assets: wire.assets.unwrap_or_default(),
            theme: wire.theme,
        })
    }
}
