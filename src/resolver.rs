//! Local Maven repository lookups
//!
//! A dependency "exists" when `<root>/<group path>/<artifact path>/<version>` is a
//! directory holding at least one `.jar` or `.pom`. The root is asked for once, on
//! first use, and kept for the rest of the run.

use crate::fs::{FileSystem, FileType};
use crate::pom::Dependency;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tracing::{debug, info};

const ARTIFACT_EXTENSIONS: &[&str] = &["jar", "pom"];

#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("Could not determine the local Maven repository: {0}")]
    Query(String),
}

/// Source of the local repository root
pub trait LocalRepositoryLocator: Send + Sync {
    fn locate(&self) -> Result<PathBuf, ResolveError>;
}

/// A root known up front
pub struct FixedLocation(pub PathBuf);

impl LocalRepositoryLocator for FixedLocation {
    fn locate(&self) -> Result<PathBuf, ResolveError> {
        Ok(self.0.clone())
    }
}

pub struct DependencyResolver {
    fs: Arc<dyn FileSystem>,
    locator: Box<dyn LocalRepositoryLocator>,
    root: OnceLock<Result<PathBuf, ResolveError>>,
}

impl DependencyResolver {
    pub fn new(fs: Arc<dyn FileSystem>, locator: Box<dyn LocalRepositoryLocator>) -> Self {
        Self {
            fs,
            locator,
            root: OnceLock::new(),
        }
    }

    pub fn with_root(fs: Arc<dyn FileSystem>, root: PathBuf) -> Self {
        Self::new(fs, Box::new(FixedLocation(root)))
    }

    /// The repository root; the locator runs at most once, even when it fails
    pub fn local_repository(&self) -> Result<&Path, ResolveError> {
        self.root
            .get_or_init(|| {
                let located = self.locator.locate();
                match &located {
                    Ok(path) => info!(path = %path.display(), "Using local Maven repository"),
                    Err(e) => debug!(error = %e, "Local repository lookup failed"),
                }
                located
            })
            .as_ref()
            .map(PathBuf::as_path)
            .map_err(|e| e.clone())
    }

    pub fn artifact_dir(&self, dependency: &Dependency) -> Result<PathBuf, ResolveError> {
        Ok(self
            .local_repository()?
            .join(dependency.group_id.replace('.', "/"))
            .join(dependency.artifact_id.replace('.', "/"))
            .join(&dependency.version))
    }

    pub fn exists(&self, dependency: &Dependency) -> Result<bool, ResolveError> {
        let dir = self.artifact_dir(dependency)?;
        if !self.fs.is_dir(&dir) {
            return Ok(false);
        }

        let entries = match self.fs.read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(path = %dir.display(), error = %e, "Unreadable artifact directory");
                return Ok(false);
            }
        };

        Ok(entries.iter().any(|entry| {
            entry.file_type() == FileType::File
                && entry
                    .extension()
                    .is_some_and(|ext| ARTIFACT_EXTENSIONS.contains(&ext))
        }))
    }
}
