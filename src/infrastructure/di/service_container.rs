//! Service container for dependency injection
//!
//! Wires snapshot loading and settings into application services.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::services::NavigationService;
use crate::config::Settings;
use crate::infrastructure::snapshot::load_tree;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraResult;
use crate::util::path::resolve_snapshot_path;

/// Container holding settings and I/O dependencies.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
        }
    }

    /// Bare names fall back to `settings.snapshot_dir`.
    pub fn snapshot_path(&self, arg: &Path) -> PathBuf {
        resolve_snapshot_path(arg, &self.settings.snapshot_dir, |p| self.fs.is_file(p))
    }

    /// Loads a snapshot and returns a navigation service over it.
    #[instrument(level = "debug", skip(self))]
    pub fn navigation(&self, snapshot: &Path) -> InfraResult<NavigationService> {
        let path = self.snapshot_path(snapshot);
        debug!("snapshot resolved to {}", path.display());
        let tree = load_tree(self.fs.as_ref(), &path)?;
        Ok(NavigationService::new(tree, Arc::clone(&self.settings)))
    }
}
