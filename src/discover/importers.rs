//! Concrete [`Importer`]s.
//!
//! - [`StaticImporter`]: apps and plugins compiled into the binary.
//! - [`DirImporter`]: apps are directories, plugins are `sizedimage.toml`
//!   declaration files inside them.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::{ImportError, Importer, PluginError};
use crate::registry::{Registry, SizedImageRegistry, Variant};

/// Extension of plugin declaration files read by [`DirImporter`].
pub const PLUGIN_FILE_EXTENSION: &str = "toml";

type PluginFn<R> = Box<dyn Fn(&mut R) -> Result<(), PluginError>>;

fn module_name(app: &str, submodule: &str) -> String {
    format!("{app}.{submodule}")
}

// =============================================================================
// Compiled-in apps
// =============================================================================

/// Table of apps known at compile time, each with an optional plugin.
///
/// ```
/// use sized_image::discover::{StaticImporter, autodiscover};
/// use sized_image::registry::{SizedImageRegistry, Variant};
///
/// let importer = StaticImporter::new()
///     .app("auth")
///     .app_with_plugin("blog", |registry: &mut SizedImageRegistry| {
///         registry.register(Variant::new("thumb", 100, 100))?;
///         Ok(())
///     });
///
/// let mut registry = SizedImageRegistry::new();
/// autodiscover(&["auth", "blog"], &importer, &mut registry).unwrap();
/// assert!(registry.contains("thumb"));
/// ```
pub struct StaticImporter<R> {
    apps: HashMap<String, Option<PluginFn<R>>>,
}

impl<R> Default for StaticImporter<R> {
    fn default() -> Self {
        Self {
            apps: HashMap::new(),
        }
    }
}

impl<R> StaticImporter<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an app that has no plugin.
    pub fn app(mut self, name: impl Into<String>) -> Self {
        self.apps.insert(name.into(), None);
        self
    }

    /// Add an app whose plugin runs `plugin` when imported.
    pub fn app_with_plugin(
        mut self,
        name: impl Into<String>,
        plugin: impl Fn(&mut R) -> Result<(), PluginError> + 'static,
    ) -> Self {
        self.apps.insert(name.into(), Some(Box::new(plugin)));
        self
    }
}

impl<R: Registry> Importer<R> for StaticImporter<R> {
    fn import_app(&self, app: &str) -> Result<(), ImportError> {
        if self.apps.contains_key(app) {
            Ok(())
        } else {
            Err(ImportError::NotFound {
                module: app.to_string(),
            })
        }
    }

    fn has_submodule(&self, app: &str, submodule: &str) -> bool {
        submodule == super::PLUGIN_MODULE && matches!(self.apps.get(app), Some(Some(_)))
    }

    fn import_submodule(
        &self,
        app: &str,
        submodule: &str,
        registry: &mut R,
    ) -> Result<(), ImportError> {
        let module = module_name(app, submodule);
        let plugin = match self.apps.get(app) {
            Some(Some(plugin)) if submodule == super::PLUGIN_MODULE => plugin,
            _ => return Err(ImportError::NotFound { module }),
        };
        plugin(registry).map_err(|source| ImportError::Failed { module, source })
    }
}

// =============================================================================
// Apps on disk
// =============================================================================

/// Contents of a plugin declaration file.
///
/// ```toml
/// [[variant]]
/// key = "thumb"
/// width = 100
/// height = 100
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginFile {
    #[serde(default, rename = "variant")]
    pub variants: Vec<Variant>,
}

impl PluginFile {
    pub fn load(path: &Path) -> Result<Self, PluginError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

/// Resolves dotted app names to directories under a root.
///
/// App `shop.catalog` is the directory `<root>/shop/catalog/`; its plugin is
/// `<root>/shop/catalog/sizedimage.toml`.
#[derive(Debug, Clone)]
pub struct DirImporter {
    root: PathBuf,
}

impl DirImporter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn app_dir(&self, app: &str) -> PathBuf {
        app.split('.')
            .fold(self.root.clone(), |dir, segment| dir.join(segment))
    }

    pub fn plugin_path(&self, app: &str, submodule: &str) -> PathBuf {
        self.app_dir(app)
            .join(format!("{submodule}.{PLUGIN_FILE_EXTENSION}"))
    }
}

impl Importer<SizedImageRegistry> for DirImporter {
    fn import_app(&self, app: &str) -> Result<(), ImportError> {
        if self.app_dir(app).is_dir() {
            Ok(())
        } else {
            Err(ImportError::NotFound {
                module: app.to_string(),
            })
        }
    }

    fn has_submodule(&self, app: &str, submodule: &str) -> bool {
        self.plugin_path(app, submodule).is_file()
    }

    fn import_submodule(
        &self,
        app: &str,
        submodule: &str,
        registry: &mut SizedImageRegistry,
    ) -> Result<(), ImportError> {
        let module = module_name(app, submodule);
        let path = self.plugin_path(app, submodule);
        if !path.is_file() {
            return Err(ImportError::NotFound { module });
        }

        let register = |registry: &mut SizedImageRegistry| -> Result<(), PluginError> {
            for variant in PluginFile::load(&path)?.variants {
                registry.register(variant)?;
            }
            Ok(())
        };
        register(registry).map_err(|source| ImportError::Failed { module, source })
    }
}
