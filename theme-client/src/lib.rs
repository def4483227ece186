//! Theme Client - sync engine for a remote theme's asset store
//!
//! Provides the authenticated HTTP transport against the store admin
//! API, the event fabric carrying progress/error notifications, and
//! the download/upload orchestration with per-item failure isolation.

pub mod config;
pub mod error;
pub mod events;
pub mod http;
pub mod response;
pub mod store;
pub mod sync;

pub use config::{Config, ThemeId};
pub use error::{ClientError, ClientResult};
pub use events::{EventLog, drain_errors, event_log, log_event, merge_events};
pub use http::{HttpClient, Verb};
pub use response::{ResponseType, ThemeResponse};
pub use store::AssetStore;

// Re-export shared types for convenience
pub use shared::{Asset, Theme, ThemeEvent};
