//! Asset model and codec
//!
//! An asset is one theme file addressed by a root-relative,
//! forward-slash key. Text content lives in `value` verbatim; binary
//! content is base64-encoded into `attachment`. At most one of the two
//! is populated at a time.

use std::fs;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::error::{AssetError, AssetResult};
use crate::path;

/// A single theme asset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Root-relative forward-slash path on the remote store
    #[serde(default)]
    pub key: String,
    /// Text content, verbatim
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    /// Binary content, base64-encoded
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub attachment: String,
}

impl Asset {
    /// An asset is valid iff it carries any content at all.
    pub fn is_valid(&self) -> bool {
        !self.value.is_empty() || !self.attachment.is_empty()
    }

    /// Load a file relative to `root` into an asset.
    ///
    /// Directories are rejected. An empty file loads without error but
    /// produces an invalid asset. Content that is valid UTF-8 is kept
    /// as text; anything else is base64-encoded into the attachment.
    pub fn load(root: &str, filename: &str) -> AssetResult<Asset> {
        let full = Path::new(root).join(filename);
        let metadata = fs::metadata(&full)?;
        if metadata.is_dir() {
            return Err(AssetError::IsDirectory);
        }

        let key = match path::path_to_project(root, full.to_string_lossy().as_ref()) {
            key if key.is_empty() => filename.replace('\\', "/"),
            key => key,
        };

        let bytes = fs::read(&full)?;
        let mut asset = Asset {
            key,
            ..Asset::default()
        };

        match String::from_utf8(bytes) {
            Ok(text) => asset.value = text,
            Err(err) => asset.attachment = BASE64.encode(err.into_bytes()),
        }

        tracing::debug!(key = %asset.key, valid = asset.is_valid(), "loaded asset");
        Ok(asset)
    }

    /// Decode this asset's content to raw bytes.
    pub fn contents(&self) -> AssetResult<Vec<u8>> {
        if !self.attachment.is_empty() {
            return BASE64
                .decode(self.attachment.as_bytes())
                .map_err(|source| AssetError::Decode {
                    key: self.key.clone(),
                    source,
                });
        }
        Ok(self.value.clone().into_bytes())
    }

    /// Write this asset under `outdir`, creating missing parent
    /// directories with `outdir`'s permission bits.
    pub fn write(&self, outdir: &Path) -> AssetResult<()> {
        let dir_metadata = fs::metadata(outdir)?;
        let target = outdir.join(&self.key);
        if let Some(parent) = target.parent() {
            create_dirs_with_permissions(parent, &dir_metadata.permissions())?;
        }
        let data = self.contents()?;
        fs::write(&target, data)?;
        tracing::debug!(key = %self.key, target = %target.display(), "wrote asset");
        Ok(())
    }
}

/// Create every missing directory up to `dir`, then stamp the newly
/// created ones with the given permission bits.
fn create_dirs_with_permissions(
    dir: &Path,
    permissions: &fs::Permissions,
) -> std::io::Result<()> {
    let mut missing = Vec::new();
    let mut current = dir.to_path_buf();
    while !current.exists() {
        missing.push(current.clone());
        if !current.pop() {
            break;
        }
    }
    fs::create_dir_all(dir)?;

    #[cfg(unix)]
    for created in missing {
        fs::set_permissions(&created, permissions.clone())?;
    }
    #[cfg(not(unix))]
    let _ = (missing, permissions);

    Ok(())
}

/// Recursively load assets under `root/subdir`, skipping any relative
/// path the `ignore` predicate accepts.
pub fn load_assets_from_directory<F>(
    root: &str,
    subdir: &str,
    ignore: &F,
) -> AssetResult<Vec<Asset>>
where
    F: Fn(&str) -> bool,
{
    let dir = Path::new(root).join(subdir);
    let mut assets = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let relative = if subdir.is_empty() {
            name
        } else {
            format!("{subdir}/{name}")
        };
        if ignore(&relative) {
            continue;
        }
        if entry.file_type()?.is_dir() {
            assets.extend(load_assets_from_directory(root, &relative, ignore)?);
        } else {
            assets.push(Asset::load(root, &relative)?);
        }
    }
    Ok(assets)
}
