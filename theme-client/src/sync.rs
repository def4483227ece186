//! Sync orchestration
//!
//! Drives bulk or targeted downloads (and their upload mirror) with
//! per-item failure isolation: a failing asset becomes a notification
//! event and the rest of the batch continues. A oneshot completion
//! marker fires once every item has been attempted.

use std::path::{Path, PathBuf};

use shared::asset::{Asset, load_assets_from_directory};
use shared::event::ThemeEvent;
use shared::path::ASSET_LOCATIONS;
use tokio::sync::{mpsc, oneshot};

use crate::events::{EventLog, drain_errors, log_event};
use crate::store::AssetStore;

/// Hand-off depth between the local loader and the remote uploader
const UPLOAD_QUEUE_DEPTH: usize = 16;

/// Download assets into the current working directory.
///
/// An empty `filenames` list selects bulk mode; otherwise each named
/// asset is retrieved individually, in input order.
pub fn download<S: AssetStore>(
    store: S,
    filenames: Vec<String>,
    event_log: EventLog,
) -> oneshot::Receiver<bool> {
    match std::env::current_dir() {
        Ok(dir) => download_to(store, filenames, dir, event_log),
        Err(err) => {
            let (done_tx, done_rx) = oneshot::channel();
            log_event(ThemeEvent::error(err), &event_log);
            let _ = done_tx.send(true);
            done_rx
        }
    }
}

/// Download assets into an explicit destination directory.
pub fn download_to<S: AssetStore>(
    store: S,
    filenames: Vec<String>,
    directory: PathBuf,
    event_log: EventLog,
) -> oneshot::Receiver<bool> {
    let (done_tx, done_rx) = oneshot::channel();

    if filenames.is_empty() {
        // Bulk mode: one listing query feeds a bounded queue; the
        // error channel is drained separately so a slow consumer can
        // never block the listing producer.
        let (assets, errs) = store.asset_list();
        drain_errors(errs, event_log.clone());
        tokio::spawn(download_all(assets, directory, done_tx, event_log));
    } else {
        tokio::spawn(download_files(
            store, filenames, directory, done_tx, event_log,
        ));
    }

    done_rx
}

/// Bulk-mode consumer: drain the listing queue in server order.
async fn download_all(
    mut assets: mpsc::Receiver<Asset>,
    directory: PathBuf,
    done: oneshot::Sender<bool>,
    event_log: EventLog,
) {
    tracing::info!(directory = %directory.display(), "starting bulk download");
    let mut written = 0usize;
    while let Some(asset) = assets.recv().await {
        if write_to_disk(&asset, &directory, &event_log) {
            written += 1;
        }
    }
    tracing::info!(written, "bulk download finished");
    let _ = done.send(true);
}

/// Targeted-mode worker: retrieve each named asset in input order.
async fn download_files<S: AssetStore>(
    store: S,
    filenames: Vec<String>,
    directory: PathBuf,
    done: oneshot::Sender<bool>,
    event_log: EventLog,
) {
    tracing::info!(count = filenames.len(), "starting targeted download");
    for filename in &filenames {
        match store.asset(filename).await {
            Ok(asset) => {
                write_to_disk(&asset, &directory, &event_log);
            }
            Err(err) => {
                tracing::warn!(filename = %filename, error = %err, "asset retrieval failed");
                log_event(ThemeEvent::error(err), &event_log);
            }
        }
    }
    let _ = done.send(true);
}

/// Write one asset under `directory`, emitting a write event on
/// success and a notification on failure. Returns success.
fn write_to_disk(asset: &Asset, directory: &Path, event_log: &EventLog) -> bool {
    match asset.write(directory) {
        Ok(()) => {
            let target = directory.join(&asset.key);
            log_event(ThemeEvent::fs_write(target.display().to_string()), event_log);
            true
        }
        Err(err) => {
            tracing::warn!(key = %asset.key, error = %err, "write to disk failed");
            log_event(ThemeEvent::error(err), event_log);
            false
        }
    }
}

/// Upload local assets from `root` to the remote theme.
///
/// The structural mirror of download: an empty `filenames` list walks
/// every recognized project directory; otherwise each named file is
/// loaded and pushed individually. Per-item failures become
/// notifications and never abort the batch.
pub fn upload<S: AssetStore>(
    store: S,
    filenames: Vec<String>,
    root: PathBuf,
    event_log: EventLog,
) -> oneshot::Receiver<bool> {
    let (done_tx, done_rx) = oneshot::channel();

    if filenames.is_empty() {
        let assets = load_project_assets(&root, &event_log);
        tokio::spawn(upload_all(store, assets, done_tx, event_log));
    } else {
        tokio::spawn(upload_files(store, filenames, root, done_tx, event_log));
    }

    done_rx
}

/// Collect every asset under the recognized project directories.
fn load_project_assets(root: &Path, event_log: &EventLog) -> mpsc::Receiver<Asset> {
    let (tx, rx) = mpsc::channel(UPLOAD_QUEUE_DEPTH);
    let root = root.to_string_lossy().into_owned();
    let event_log = event_log.clone();

    tokio::spawn(async move {
        let keep_all = |_: &str| false;
        for dir in ASSET_LOCATIONS {
            // templates/customers is walked through its parent
            if dir.contains('/') || !Path::new(&root).join(dir).is_dir() {
                continue;
            }
            match load_assets_from_directory(&root, dir, &keep_all) {
                Ok(assets) => {
                    for asset in assets {
                        if tx.send(asset).await.is_err() {
                            return;
                        }
                    }
                }
                Err(err) => {
                    tracing::warn!(dir = %dir, error = %err, "project directory walk failed");
                    log_event(ThemeEvent::error(err), &event_log);
                }
            }
        }
    });

    rx
}

/// Bulk-mode uploader: drain the loader queue, one remote write each.
async fn upload_all<S: AssetStore>(
    store: S,
    mut assets: mpsc::Receiver<Asset>,
    done: oneshot::Sender<bool>,
    event_log: EventLog,
) {
    tracing::info!("starting bulk upload");
    while let Some(asset) = assets.recv().await {
        push_asset(&store, asset, &event_log).await;
    }
    let _ = done.send(true);
}

/// Targeted-mode uploader: load and push each named file in order.
async fn upload_files<S: AssetStore>(
    store: S,
    filenames: Vec<String>,
    root: PathBuf,
    done: oneshot::Sender<bool>,
    event_log: EventLog,
) {
    tracing::info!(count = filenames.len(), "starting targeted upload");
    let root = root.to_string_lossy().into_owned();
    for filename in &filenames {
        match Asset::load(&root, filename) {
            Ok(asset) => push_asset(&store, asset, &event_log).await,
            Err(err) => {
                tracing::warn!(filename = %filename, error = %err, "asset load failed");
                log_event(ThemeEvent::error(err), &event_log);
            }
        }
    }
    let _ = done.send(true);
}

/// Push one asset to the remote store, reporting the outcome.
async fn push_asset<S: AssetStore>(store: &S, asset: Asset, event_log: &EventLog) {
    let key = asset.key.clone();
    match store.update_asset(&asset).await {
        Ok(()) => log_event(
            ThemeEvent::notice(format!("Updated {key} on the remote theme")),
            event_log,
        ),
        Err(err) => {
            tracing::warn!(key = %key, error = %err, "remote update failed");
            log_event(ThemeEvent::error(err), event_log);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::events::event_log;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Stub store serving canned assets and injectable failures.
    #[derive(Clone, Default)]
    struct StubStore {
        assets: HashMap<String, Asset>,
        listing: Vec<Asset>,
        listing_error: Option<String>,
        updates: Arc<AtomicUsize>,
        failing_updates: Vec<String>,
    }

    fn text_asset(key: &str, value: &str) -> Asset {
        Asset {
            key: key.to_string(),
            value: value.to_string(),
            ..Asset::default()
        }
    }

    #[async_trait]
    impl AssetStore for StubStore {
        async fn asset(&self, key: &str) -> Result<Asset, ClientError> {
            self.assets.get(key).cloned().ok_or(ClientError::BadStatus {
                status: 404,
                body: format!("{key} not found"),
            })
        }

        fn asset_list(&self) -> (mpsc::Receiver<Asset>, mpsc::Receiver<ClientError>) {
            let (asset_tx, asset_rx) = mpsc::channel(4);
            let (err_tx, err_rx) = mpsc::channel(1);
            let listing = self.listing.clone();
            let listing_error = self.listing_error.clone();
            tokio::spawn(async move {
                if let Some(message) = listing_error {
                    let _ = err_tx
                        .send(ClientError::BadStatus {
                            status: 500,
                            body: message,
                        })
                        .await;
                    return;
                }
                for asset in listing {
                    if asset_tx.send(asset).await.is_err() {
                        break;
                    }
                }
            });
            (asset_rx, err_rx)
        }

        async fn update_asset(&self, asset: &Asset) -> Result<(), ClientError> {
            if self.failing_updates.contains(&asset.key) {
                return Err(ClientError::BadStatus {
                    status: 422,
                    body: format!("{} rejected", asset.key),
                });
            }
            self.updates.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    async fn collect_events(
        mut rx: mpsc::UnboundedReceiver<ThemeEvent>,
    ) -> Vec<ThemeEvent> {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_bulk_download_writes_every_listed_asset_in_order() {
        let dir = TempDir::new().unwrap();
        let store = StubStore {
            listing: vec![
                text_asset("assets/a.js", "a"),
                text_asset("assets/b.js", "b"),
                text_asset("layout/theme.liquid", "layout"),
            ],
            ..StubStore::default()
        };
        let (log, rx) = event_log();

        let done = download_to(store, vec![], dir.path().to_path_buf(), log);
        assert!(done.await.unwrap());

        let events = collect_events(rx).await;
        let writes: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, ThemeEvent::FsWrite { .. }))
            .map(ThemeEvent::message)
            .collect();
        assert_eq!(writes.len(), 3);
        assert!(writes[0].contains("assets/a.js"));
        assert!(writes[1].contains("assets/b.js"));
        assert!(writes[2].contains("layout/theme.liquid"));

        let written = std::fs::read_to_string(dir.path().join("assets/a.js")).unwrap();
        assert_eq!(written, "a");
    }

    #[tokio::test]
    async fn test_bulk_download_listing_failure_becomes_notification() {
        let dir = TempDir::new().unwrap();
        let store = StubStore {
            listing_error: Some("store is down".to_string()),
            ..StubStore::default()
        };
        let (log, rx) = event_log();

        let done = download_to(store, vec![], dir.path().to_path_buf(), log);
        assert!(done.await.unwrap());

        let events = collect_events(rx).await;
        assert_eq!(events.len(), 1);
        assert!(!events[0].successful());
        assert!(events[0].message().contains("store is down"));
    }

    #[tokio::test]
    async fn test_targeted_download_isolates_failures() {
        let dir = TempDir::new().unwrap();
        let mut assets = HashMap::new();
        assets.insert("assets/ok1.js".to_string(), text_asset("assets/ok1.js", "1"));
        assets.insert("assets/ok2.js".to_string(), text_asset("assets/ok2.js", "2"));
        let store = StubStore {
            assets,
            ..StubStore::default()
        };
        let (log, rx) = event_log();

        let filenames = vec![
            "assets/ok1.js".to_string(),
            "assets/missing.js".to_string(),
            "assets/ok2.js".to_string(),
        ];
        let done = download_to(store, filenames, dir.path().to_path_buf(), log);
        assert!(done.await.unwrap());

        let events = collect_events(rx).await;
        let writes = events.iter().filter(|e| e.successful()).count();
        let failures = events.iter().filter(|e| !e.successful()).count();
        assert_eq!(writes, 2);
        assert_eq!(failures, 1);

        // Input order is preserved for the successful writes.
        let messages: Vec<_> = events
            .iter()
            .filter(|e| e.successful())
            .map(ThemeEvent::message)
            .collect();
        assert!(messages[0].contains("ok1"));
        assert!(messages[1].contains("ok2"));
    }

    #[tokio::test]
    async fn test_targeted_download_bad_asset_does_not_abort_batch() {
        let dir = TempDir::new().unwrap();
        let mut assets = HashMap::new();
        assets.insert(
            "assets/broken.bin".to_string(),
            Asset {
                key: "assets/broken.bin".to_string(),
                attachment: "this is bad content".to_string(),
                ..Asset::default()
            },
        );
        assets.insert("assets/ok.js".to_string(), text_asset("assets/ok.js", "ok"));
        let store = StubStore {
            assets,
            ..StubStore::default()
        };
        let (log, rx) = event_log();

        let filenames = vec!["assets/broken.bin".to_string(), "assets/ok.js".to_string()];
        let done = download_to(store, filenames, dir.path().to_path_buf(), log);
        assert!(done.await.unwrap());

        let events = collect_events(rx).await;
        assert!(events.iter().any(|e| !e.successful()
            && e.message().contains("Could not decode")));
        assert!(dir.path().join("assets/ok.js").exists());
    }

    #[tokio::test]
    async fn test_targeted_upload_pushes_and_isolates() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("assets")).unwrap();
        std::fs::write(dir.path().join("assets/app.js"), "content").unwrap();

        let store = StubStore::default();
        let updates = store.updates.clone();
        let (log, rx) = event_log();

        let filenames = vec!["assets/app.js".to_string(), "assets/nope.js".to_string()];
        let done = upload(store, filenames, dir.path().to_path_buf(), log);
        assert!(done.await.unwrap());

        let events = collect_events(rx).await;
        assert_eq!(updates.load(Ordering::SeqCst), 1);
        assert_eq!(events.iter().filter(|e| e.successful()).count(), 1);
        assert_eq!(events.iter().filter(|e| !e.successful()).count(), 1);
    }

    #[tokio::test]
    async fn test_bulk_upload_walks_project_directories() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("assets")).unwrap();
        std::fs::create_dir_all(dir.path().join("templates/customers")).unwrap();
        std::fs::write(dir.path().join("assets/app.js"), "js").unwrap();
        std::fs::write(dir.path().join("templates/index.liquid"), "index").unwrap();
        std::fs::write(
            dir.path().join("templates/customers/login.liquid"),
            "login",
        )
        .unwrap();

        let store = StubStore::default();
        let updates = store.updates.clone();
        let (log, rx) = event_log();

        let done = upload(store, vec![], dir.path().to_path_buf(), log);
        assert!(done.await.unwrap());

        let events = collect_events(rx).await;
        assert_eq!(updates.load(Ordering::SeqCst), 3);
        assert!(events.iter().all(|e| e.successful()));

        // Customers templates keep their specific key.
        assert!(events
            .iter()
            .any(|e| e.message().contains("templates/customers/login.liquid")));
    }

    #[tokio::test]
    async fn test_bulk_upload_remote_rejection_is_isolated() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("config")).unwrap();
        std::fs::write(dir.path().join("config/settings.json"), "{}").unwrap();
        std::fs::write(dir.path().join("config/locked.json"), "{}").unwrap();

        let store = StubStore {
            failing_updates: vec!["config/locked.json".to_string()],
            ..StubStore::default()
        };
        let updates = store.updates.clone();
        let (log, rx) = event_log();

        let done = upload(store, vec![], dir.path().to_path_buf(), log);
        assert!(done.await.unwrap());

        let events = collect_events(rx).await;
        assert_eq!(updates.load(Ordering::SeqCst), 1);
        assert_eq!(events.iter().filter(|e| !e.successful()).count(), 1);
    }
}
