//! Settings module.
//!
//! Loads `sized-image.toml`: the ordered list of installed apps that
//! discovery walks, where those apps live on disk, and the base URL that
//! derived paths are resolved against.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! installed_apps = []   # Apps to search for sizedimage plugins, in order
//! apps_dir = "."        # Directory holding the apps (relative to this file)
//! media_url = ""        # Base URL for derived paths ("" = plain relative paths)
//! ```
//!
//! User values are merged over stock defaults, so a file only needs the keys
//! it changes. Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default settings filename looked up by the CLI.
pub const CONFIG_FILENAME: &str = "sized-image.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// App identifiers, searched for plugins in this order. Dotted names
    /// (`shop.catalog`) denote nested apps.
    pub installed_apps: Vec<String>,
    /// Directory holding the apps. Relative paths are resolved against the
    /// directory containing the settings file.
    pub apps_dir: PathBuf,
    /// Base URL for derived paths. Empty means derived paths stay relative.
    pub media_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            installed_apps: Vec::new(),
            apps_dir: PathBuf::from("."),
            media_url: String::new(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for app in &self.installed_apps {
            if app.is_empty() || app.split('.').any(str::is_empty) {
                return Err(ConfigError::Validation(format!(
                    "installed_apps: '{app}' is not a valid app name"
                )));
            }
            if app.contains(['/', '\\']) {
                return Err(ConfigError::Validation(format!(
                    "installed_apps: '{app}' must use dots, not path separators"
                )));
            }
            if !seen.insert(app.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "installed_apps: '{app}' is listed more than once"
                )));
            }
        }
        Ok(())
    }

    /// `media_url` as an optional base URL.
    pub fn base_url(&self) -> Option<&str> {
        Some(self.media_url.as_str()).filter(|url| !url.is_empty())
    }

    /// `apps_dir` resolved against `base` when relative.
    pub fn resolve_apps_dir(&self, base: &Path) -> PathBuf {
        if self.apps_dir.is_absolute() {
            self.apps_dir.clone()
        } else {
            base.join(&self.apps_dir)
        }
    }
}

// =============================================================================
// Loading, merging, and validation
// =============================================================================

/// Returns the stock default settings as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Settings::default()).expect("default settings must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a settings file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<Settings, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let settings: Settings = merged.try_into()?;
    settings.validate()?;
    Ok(settings)
}

/// Load settings from `path`, falling back to defaults when it is missing.
pub fn load_config(path: &Path) -> Result<Settings, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock settings file.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# sized-image settings
# ====================
# Every key is optional. Values below are the defaults.

# Apps searched for a sizedimage plugin, in order. An app named
# "shop.catalog" lives in <apps_dir>/shop/catalog/ and its plugin is
# <apps_dir>/shop/catalog/sizedimage.toml. Apps without a plugin are
# skipped; a plugin that fails to load stops discovery.
installed_apps = []

# Directory holding the apps, relative to this file.
apps_dir = "."

# Base URL that derived paths are resolved against, e.g. "/media/" or
# "https://cdn.example.com/media/". Leave empty for relative paths like
# "__sized/images/photo-thumb-100x100.jpg".
media_url = ""
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(content: &str) -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        fs::write(&path, content).unwrap();
        (tmp, path)
    }

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert!(settings.installed_apps.is_empty());
        assert_eq!(settings.apps_dir, PathBuf::from("."));
        assert_eq!(settings.base_url(), None);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let settings = load_config(&tmp.path().join(CONFIG_FILENAME)).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn load_full_config() {
        let (_tmp, path) = write_config(
            r#"
installed_apps = ["auth", "blog", "shop.catalog"]
apps_dir = "apps"
media_url = "/media/"
"#,
        );
        let settings = load_config(&path).unwrap();
        assert_eq!(settings.installed_apps, ["auth", "blog", "shop.catalog"]);
        assert_eq!(settings.apps_dir, PathBuf::from("apps"));
        assert_eq!(settings.base_url(), Some("/media/"));
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let (_tmp, path) = write_config("media_url = \"https://cdn.test/\"\n");
        let settings = load_config(&path).unwrap();
        assert!(settings.installed_apps.is_empty());
        assert_eq!(settings.apps_dir, PathBuf::from("."));
    }

    #[test]
    fn invalid_toml_is_error() {
        let (_tmp, path) = write_config("installed_apps = [");
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let (_tmp, path) = write_config("installed_app = [\"blog\"]\n");
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn duplicate_app_rejected() {
        let settings = Settings {
            installed_apps: vec!["blog".into(), "blog".into()],
            ..Settings::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn empty_app_segment_rejected() {
        for name in ["", "shop.", ".shop", "shop..catalog"] {
            let settings = Settings {
                installed_apps: vec![name.into()],
                ..Settings::default()
            };
            assert!(settings.validate().is_err(), "{name:?} should be rejected");
        }
    }

    #[test]
    fn path_separator_in_app_rejected() {
        let settings = Settings {
            installed_apps: vec!["shop/catalog".into()],
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validation_runs_on_load() {
        let (_tmp, path) = write_config("installed_apps = [\"a\", \"a\"]\n");
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn resolve_apps_dir_relative_and_absolute() {
        let mut settings = Settings::default();
        settings.apps_dir = PathBuf::from("apps");
        assert_eq!(
            settings.resolve_apps_dir(Path::new("/srv/site")),
            PathBuf::from("/srv/site/apps")
        );
        settings.apps_dir = PathBuf::from("/opt/apps");
        assert_eq!(
            settings.resolve_apps_dir(Path::new("/srv/site")),
            PathBuf::from("/opt/apps")
        );
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("media_url = \"\"").unwrap();
        let overlay: toml::Value = toml::from_str("media_url = \"/m/\"").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("media_url").unwrap().as_str(), Some("/m/"));
    }

    #[test]
    fn merge_toml_arrays_replace() {
        let base: toml::Value = toml::from_str("installed_apps = [\"a\", \"b\"]").unwrap();
        let overlay: toml::Value = toml::from_str("installed_apps = [\"c\"]").unwrap();
        let merged = merge_toml(base, overlay);
        let apps = merged.get("installed_apps").unwrap().as_array().unwrap();
        assert_eq!(apps.len(), 1);
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let value: toml::Value = toml::from_str(stock_config_toml()).unwrap();
        let settings = resolve_config(stock_defaults_value(), Some(value)).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn stock_defaults_value_is_table() {
        let value = stock_defaults_value();
        assert!(value.is_table());
        assert!(value.get("installed_apps").is_some());
    }
}
