//! Shared test utilities.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = apps_root(&[
//!     ("auth", None),
//!     ("blog", Some("[[variant]]\nkey = \"thumb\"\nwidth = 100\nheight = 100\n")),
//! ]);
//! let importer = DirImporter::new(tmp.path());
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::discover::{PLUGIN_FILE_EXTENSION, PLUGIN_MODULE};

/// Build an apps directory in a temp dir.
///
/// Each entry is `(relative app dir, plugin file contents)`. `None` creates
/// the app directory without a plugin.
pub fn apps_root(apps: &[(&str, Option<&str>)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (dir, plugin) in apps {
        write_app(tmp.path(), dir, *plugin);
    }
    tmp
}

fn write_app(root: &Path, dir: &str, plugin: Option<&str>) {
    let app_dir = root.join(dir);
    fs::create_dir_all(&app_dir).unwrap();
    if let Some(content) = plugin {
        let file = app_dir.join(format!("{PLUGIN_MODULE}.{PLUGIN_FILE_EXTENSION}"));
        fs::write(file, content).unwrap();
    }
}
