//! Plugin auto-discovery across installed apps.
//!
//! Each installed app may ship an optional `sizedimage` plugin whose only job
//! is to register variants in the shared registry when it is imported.
//! [`autodiscover`] walks the app list in order and imports every plugin that
//! exists.
//!
//! ## Missing vs. broken plugins
//!
//! - An app without a plugin is skipped. Plugins are optional, so this is
//!   never an error.
//! - An app whose plugin exists but fails to import aborts discovery. The
//!   error is returned unchanged, wrapped with the app name.
//!
//! Whether a plugin exists is asked of the [`Importer`] *before* importing,
//! so a plugin that fails because something it depends on is missing is
//! reported as a failure rather than mistaken for an absent plugin.
//!
//! ## Rollback
//!
//! Each plugin import runs inside a [`Transaction`]. If the import fails,
//! the registry goes back to the state it had before that app was tried, so
//! variants registered by the broken plugin before it failed do not linger.
//! Apps loaded earlier keep their registrations.

mod importers;

pub use importers::{DirImporter, PLUGIN_FILE_EXTENSION, PluginFile, StaticImporter};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::registry::{Registry, RegistryError, Transaction};

/// Name of the plugin submodule looked up in every app.
pub const PLUGIN_MODULE: &str = "sizedimage";

/// Failure raised by plugin code while it is being imported.
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("{0}")]
    Custom(String),
}

/// Failure to resolve or load a module.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("no module named '{module}'")]
    NotFound { module: String },
    #[error("error while importing '{module}': {source}")]
    Failed {
        module: String,
        #[source]
        source: PluginError,
    },
}

#[derive(Error, Debug)]
pub enum DiscoverError {
    /// The app itself could not be imported.
    #[error(transparent)]
    App(ImportError),
    /// The app's plugin exists but failed to import.
    #[error("sizedimage plugin of app '{app}' failed: {source}")]
    Plugin {
        app: String,
        #[source]
        source: ImportError,
    },
}

/// Resolves apps and their plugin submodules.
///
/// Implementations decide what an "app" and a "module" are: compiled-in
/// tables ([`StaticImporter`]), declaration files on disk ([`DirImporter`]),
/// or anything else that can register into `R`.
pub trait Importer<R: Registry> {
    /// Resolve the app itself.
    fn import_app(&self, app: &str) -> Result<(), ImportError>;

    /// Whether `app` ships a submodule called `submodule`.
    fn has_submodule(&self, app: &str, submodule: &str) -> bool;

    /// Import `app.submodule`, letting it register into `registry`.
    fn import_submodule(
        &self,
        app: &str,
        submodule: &str,
        registry: &mut R,
    ) -> Result<(), ImportError>;
}

/// Which apps had a plugin loaded and which had none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub loaded: Vec<String>,
    pub skipped: Vec<String>,
}

/// Import the plugin of every app in `installed_apps`, in order.
///
/// Stops at the first app that cannot be imported or whose plugin fails.
/// The registry then holds exactly what the apps before it registered.
pub fn autodiscover<S, R, I>(
    installed_apps: &[S],
    importer: &I,
    registry: &mut R,
) -> Result<Report, DiscoverError>
where
    S: AsRef<str>,
    R: Registry,
    I: Importer<R> + ?Sized,
{
    let mut report = Report::default();

    for app in installed_apps {
        let app: &str = app.as_ref();
        importer.import_app(app).map_err(DiscoverError::App)?;

        if !importer.has_submodule(app, PLUGIN_MODULE) {
            debug!(app, "no {PLUGIN_MODULE} plugin, skipping");
            report.skipped.push(app.to_string());
            continue;
        }

        let mut tx = Transaction::begin(&mut *registry);
        match importer.import_submodule(app, PLUGIN_MODULE, &mut tx) {
            Ok(()) => {
                tx.commit();
                info!(app, "loaded {PLUGIN_MODULE} plugin");
                report.loaded.push(app.to_string());
            }
            Err(source) => {
                drop(tx);
                warn!(app, error = %source, "{PLUGIN_MODULE} plugin failed, registry rolled back");
                return Err(DiscoverError::Plugin {
                    app: app.to_string(),
                    source,
                });
            }
        }
    }

    Ok(report)
}
