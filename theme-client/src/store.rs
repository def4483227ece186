//! Transport seam for the sync engine
//!
//! The orchestrator talks to the remote store through this trait so
//! tests can drive it with a stub instead of a live transport.

use async_trait::async_trait;
use shared::Asset;
use tokio::sync::mpsc;

use crate::error::{ClientError, ClientResult};
use crate::http::{HttpClient, Verb};

/// Remote asset store operations the sync engine needs
#[async_trait]
pub trait AssetStore: Send + Sync + 'static {
    /// Retrieve one asset by key.
    async fn asset(&self, key: &str) -> ClientResult<Asset>;

    /// Stream the full listing, in server order, plus an error channel
    /// that closes once the listing request has finished.
    fn asset_list(&self) -> (mpsc::Receiver<Asset>, mpsc::Receiver<ClientError>);

    /// Create or replace one asset on the remote theme.
    async fn update_asset(&self, asset: &Asset) -> ClientResult<()>;
}

#[async_trait]
impl AssetStore for HttpClient {
    async fn asset(&self, key: &str) -> ClientResult<Asset> {
        HttpClient::asset(self, key).await
    }

    fn asset_list(&self) -> (mpsc::Receiver<Asset>, mpsc::Receiver<ClientError>) {
        HttpClient::asset_list(self)
    }

    async fn update_asset(&self, asset: &Asset) -> ClientResult<()> {
        self.asset_action(Verb::Update, asset).await.map(|_| ())
    }
}
