//! Shared domain types for theme synchronization
//!
//! Contains the asset model and codec, theme metadata, project path
//! resolution, and the event types flowing from the sync engine to
//! reporting.

pub mod asset;
pub mod error;
pub mod event;
pub mod path;
pub mod theme;

pub use asset::Asset;
pub use error::{AssetError, AssetResult};
pub use event::ThemeEvent;
pub use theme::Theme;
