//! The synthetic benchmark project written next to the source project

pub mod template;

pub use template::{is_reserved_property, render, UBERJAR_NAME};

use crate::reconcile::ReconciledDescriptor;
use crate::util::walk::SYNTHETIC_DIR_NAME;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Layout of `<project>/art-jmh-env`
#[derive(Debug, Clone)]
pub struct SyntheticProject {
    dir: PathBuf,
}

impl SyntheticProject {
    pub fn new(project_root: &Path) -> Self {
        Self {
            dir: project_root.join(SYNTHETIC_DIR_NAME),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn descriptor_path(&self) -> PathBuf {
        self.dir.join("pom.xml")
    }

    /// `src/<name>`, e.g. `src/main` or `src/test`
    pub fn source_set(&self, name: &str) -> PathBuf {
        self.dir.join("src").join(name)
    }

    pub fn java_sources(&self) -> PathBuf {
        self.source_set("main").join("java")
    }

    pub fn target_dir(&self) -> PathBuf {
        self.dir.join("target")
    }

    /// Shaded benchmark jars left by a build; `benchmarks.jar` first, the rest by name
    pub fn artifacts(&self) -> Result<Vec<PathBuf>> {
        let target = self.target_dir();
        if !target.is_dir() {
            return Ok(Vec::new());
        }

        let mut jars = Vec::new();
        for entry in fs::read_dir(&target).context(format!("Failed to read {:?}", target))? {
            let path = entry.context("Failed to read directory entry")?.path();
            let is_runner = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(UBERJAR_NAME) && n.ends_with(".jar"));
            if is_runner && path.is_file() {
                jars.push(path);
            }
        }
        let primary = format!("{}.jar", UBERJAR_NAME);
        jars.sort_by_key(|p| (p.file_name().and_then(|n| n.to_str()) != Some(primary.as_str()), p.clone()));
        Ok(jars)
    }

    pub fn write(&self, descriptor: &ReconciledDescriptor) -> Result<PathBuf> {
        let path = self.descriptor_path();
        fs::create_dir_all(&self.dir).context(format!("Failed to create {:?}", self.dir))?;
        fs::write(&path, render(descriptor)).context(format!("Failed to write {:?}", path))?;
        info!(path = %path.display(), "Synthetic descriptor written");
        Ok(path)
    }
}
