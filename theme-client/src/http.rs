//! HTTP transport against the store's admin API

use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method};
use shared::{Asset, Theme};
use tokio::sync::mpsc;

use crate::config::{Config, ThemeId};
use crate::error::{ClientError, ClientResult};
use crate::response::{ResponseType, ThemeResponse};

/// Hand-off depth between the listing producer and its consumer
const ASSET_QUEUE_DEPTH: usize = 16;

/// What an admin API request does to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Retrieve,
    Create,
    Update,
    Remove,
}

impl Verb {
    fn method(self) -> Method {
        match self {
            Verb::Retrieve => Method::GET,
            Verb::Create => Method::POST,
            Verb::Update => Method::PUT,
            Verb::Remove => Method::DELETE,
        }
    }
}

/// Authenticated HTTP client for one store/theme pair
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: Config,
}

impl HttpClient {
    /// Build a client from configuration.
    ///
    /// A present proxy URL is validated here; a malformed one fails
    /// construction before any request is attempted.
    pub fn new(config: &Config) -> ClientResult<Self> {
        let mut builder = Client::builder().timeout(config.timeout);

        if let Some(proxy_url) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|err| ClientError::InvalidProxy(format!("{proxy_url}: {err}")))?;
            builder = builder.proxy(proxy);
        }
        if config.insecure {
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(Self {
            client: builder.build()?,
            config: config.clone(),
        })
    }

    /// The configuration this client was built from
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Admin base URL for the configured theme.
    ///
    /// The live theme omits the theme-id path segment and targets the
    /// store's published theme.
    pub fn admin_url(&self) -> String {
        let domain = &self.config.domain;
        let base = if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.clone()
        } else {
            format!("https://{domain}")
        };
        match self.config.theme_id {
            ThemeId::Live => format!("{base}/admin"),
            ThemeId::Numbered(id) => format!("{base}/admin/themes/{id}"),
        }
    }

    /// Endpoint for asset queries and actions
    pub fn asset_path(&self) -> String {
        format!("{}/assets.json", self.admin_url())
    }

    /// Endpoint for theme creation
    pub fn themes_path(&self) -> String {
        format!("{}/themes.json", self.admin_url())
    }

    /// Endpoint for a specific theme
    pub fn theme_path(&self, theme_id: u64) -> String {
        format!("{}/themes/{theme_id}.json", self.admin_url())
    }

    fn user_agent() -> String {
        format!(
            "rust/themesync ({}; {}; {})",
            std::env::consts::OS,
            std::env::consts::ARCH,
            env!("CARGO_PKG_VERSION"),
        )
    }

    /// Send one request and classify the response.
    async fn send(
        &self,
        request_type: ResponseType,
        verb: Verb,
        url: &str,
        body: Option<serde_json::Value>,
    ) -> ClientResult<ThemeResponse> {
        let target = reqwest::Url::parse(url)
            .map_err(|err| ClientError::InvalidUrl(format!("{url}: {err}")))?;

        let mut request = self
            .client
            .request(verb.method(), target)
            .header("X-Shopify-Access-Token", &self.config.access_token)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, Self::user_agent());

        if let Some(body) = body {
            request = request.body(serde_json::to_vec(&body)?);
        }

        tracing::debug!(%url, ?verb, "sending admin API request");
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::BadStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        ThemeResponse::from_body(request_type, &text).map_err(Into::into)
    }

    /// Query assets.
    ///
    /// The response always carries key/value/attachment fields only.
    /// An `asset[key]` filter parameter narrows the query to a single
    /// asset; without it the full listing is returned.
    pub async fn asset_query(
        &self,
        verb: Verb,
        params: &[(&str, &str)],
    ) -> ClientResult<ThemeResponse> {
        let mut query = String::from("fields=key,attachment,value");
        let mut request_type = ResponseType::AssetList;
        for (name, value) in params {
            if *name == "asset[key]" {
                request_type = ResponseType::Asset;
            }
            query.push_str(&format!("&{name}={value}"));
        }

        let url = format!("{}?{}", self.asset_path(), query);
        self.send(request_type, verb, &url, None).await
    }

    /// Retrieve a single asset by key.
    pub async fn asset(&self, key: &str) -> ClientResult<Asset> {
        let response = self
            .asset_query(Verb::Retrieve, &[("asset[key]", key)])
            .await?;
        response
            .asset
            .ok_or_else(|| ClientError::InvalidResponse(format!("no asset returned for {key}")))
    }

    /// Write or delete one asset on the remote theme.
    pub async fn asset_action(&self, verb: Verb, asset: &Asset) -> ClientResult<ThemeResponse> {
        let body = serde_json::json!({ "asset": asset });
        self.send(ResponseType::Asset, verb, &self.asset_path(), Some(body))
            .await
    }

    /// Create a new, unpublished theme on the store.
    pub async fn new_theme(&self, name: &str, source: &str) -> ClientResult<ThemeResponse> {
        let body = serde_json::json!({ "theme": Theme::unpublished(name, source) });
        self.send(ResponseType::Theme, Verb::Create, &self.themes_path(), Some(body))
            .await
    }

    /// Retrieve a theme by id.
    pub async fn get_theme(&self, theme_id: u64) -> ClientResult<ThemeResponse> {
        self.send(
            ResponseType::Theme,
            Verb::Retrieve,
            &self.theme_path(theme_id),
            None,
        )
        .await
    }

    /// Stream the full asset listing.
    ///
    /// A producer task issues one listing query and feeds assets into
    /// a bounded queue in server listing order. Failures go to the
    /// error channel; both channels close when the producer finishes.
    pub fn asset_list(&self) -> (mpsc::Receiver<Asset>, mpsc::Receiver<ClientError>) {
        let (asset_tx, asset_rx) = mpsc::channel(ASSET_QUEUE_DEPTH);
        let (err_tx, err_rx) = mpsc::channel(1);
        let client = self.clone();

        tokio::spawn(async move {
            match client.asset_query(Verb::Retrieve, &[]).await {
                Ok(response) => {
                    for asset in response.assets {
                        if asset_tx.send(asset).await.is_err() {
                            break;
                        }
                    }
                }
                Err(err) => {
                    let _ = err_tx.send(err).await;
                }
            }
        });

        (asset_rx, err_rx)
    }
}
