//! Project path resolution
//!
//! Maps filesystem paths to canonical remote asset keys. A path is an
//! addressable asset iff it sits under one of the recognized top-level
//! project directories.

use std::path::{Component, Path};

/// Recognized project directories, most specific first.
///
/// Ordering is load-bearing: `templates/customers` must be matched
/// before `templates`, which is itself a prefix of it.
pub const ASSET_LOCATIONS: [&str; 8] = [
    "templates/customers",
    "assets",
    "config",
    "layout",
    "snippets",
    "templates",
    "locales",
    "sections",
];

/// Normalize a path to a cleaned, forward-slash string.
fn clean(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for component in Path::new(path).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.last().is_some_and(|p| *p != "..") {
                    parts.pop();
                } else {
                    parts.push("..");
                }
            }
            Component::Normal(part) => parts.push(part.to_str().unwrap_or_default()),
            Component::RootDir | Component::Prefix(_) => {}
        }
    }
    let joined = parts.join("/");
    if path.starts_with('/') {
        format!("/{joined}")
    } else {
        joined
    }
}

/// Relativize `path` against `root`, normalized to forward slashes.
fn relative_to_root(root: &str, path: &str) -> String {
    let cleaned = clean(path);
    let prefix = format!("{}/", clean(root));
    cleaned
        .strip_prefix(&prefix)
        .map(str::to_string)
        .unwrap_or(cleaned)
}

/// True iff `path` is exactly one of the recognized project directories.
pub fn is_project_directory(root: &str, path: &str) -> bool {
    let relative = relative_to_root(root, path);
    ASSET_LOCATIONS.iter().any(|dir| *dir == relative)
}

/// Map `path` to its canonical asset key, or an empty string when the
/// path lives outside every recognized directory.
pub fn path_to_project(root: &str, path: &str) -> String {
    let relative = relative_to_root(root, path);
    for dir in ASSET_LOCATIONS {
        let prefix = format!("{dir}/");
        if let Some(remainder) = relative.strip_prefix(&prefix) {
            return format!("{dir}/{remainder}");
        }
    }
    String::new()
}

/// True iff `path` addresses an asset or a project directory itself.
pub fn path_in_project(root: &str, path: &str) -> bool {
    !path_to_project(root, path).is_empty() || is_project_directory(root, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_to_project_under_recognized_directory() {
        assert_eq!(
            path_to_project("/store", "/store/assets/application.js"),
            "assets/application.js"
        );
        assert_eq!(
            path_to_project("/store", "/store/config/settings.json"),
            "config/settings.json"
        );
        assert_eq!(
            path_to_project("/store", "/store/locales/en.default.json"),
            "locales/en.default.json"
        );
    }

    #[test]
    fn test_customers_templates_win_over_templates() {
        // templates/customers is more specific and must be tried first
        assert_eq!(
            path_to_project("/store", "/store/templates/customers/login.liquid"),
            "templates/customers/login.liquid"
        );
        assert_eq!(
            path_to_project("/store", "/store/templates/index.liquid"),
            "templates/index.liquid"
        );
    }

    #[test]
    fn test_path_outside_project_yields_empty() {
        assert_eq!(path_to_project("/store", "/store/node_modules/x.js"), "");
        assert_eq!(path_to_project("/store", "/elsewhere/assets/x.js"), "");
    }

    #[test]
    fn test_nested_asset_keeps_forward_slashes() {
        assert_eq!(
            path_to_project("/store", "/store/assets/fonts/icon.woff"),
            "assets/fonts/icon.woff"
        );
    }

    #[test]
    fn test_relative_paths_are_cleaned() {
        assert_eq!(
            path_to_project("store", "store/./assets/app.js"),
            "assets/app.js"
        );
    }

    #[test]
    fn test_is_project_directory() {
        assert!(is_project_directory("/store", "/store/assets"));
        assert!(is_project_directory("/store", "/store/templates/customers"));
        assert!(!is_project_directory("/store", "/store/assets/app.js"));
        assert!(!is_project_directory("/store", "/store/vendor"));
    }

    #[test]
    fn test_path_in_project() {
        assert!(path_in_project("/store", "/store/assets"));
        assert!(path_in_project("/store", "/store/assets/app.js"));
        assert!(!path_in_project("/store", "/store/README.md"));
    }
}
