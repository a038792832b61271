//! Build descriptor discovery

use super::document::ParsedDescriptor;
use crate::util::walk::project_files;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

pub const DESCRIPTOR_FILE_NAME: &str = "pom.xml";

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Failed to walk {root:?}: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to read descriptor {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed descriptor {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },
}

/// Finds and parses every `pom.xml` below a project root
///
/// Each call to [`scan`](Self::scan) walks the filesystem again; parsing happens
/// lazily as the iterator is consumed.
pub struct DescriptorScanner {
    root: PathBuf,
}

impl DescriptorScanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn descriptor_paths(&self) -> impl Iterator<Item = Result<PathBuf, ScanError>> + '_ {
        project_files(&self.root).filter_map(move |entry| match entry {
            Ok(entry) if entry.file_name() == DESCRIPTOR_FILE_NAME => {
                Some(Ok(entry.into_path()))
            }
            Ok(_) => None,
            Err(source) => Some(Err(ScanError::Walk {
                root: self.root.clone(),
                source,
            })),
        })
    }

    pub fn scan(&self) -> impl Iterator<Item = Result<ParsedDescriptor, ScanError>> + '_ {
        self.descriptor_paths().map(|path| {
            let path = path?;
            let content = fs::read_to_string(&path).map_err(|source| ScanError::Read {
                path: path.clone(),
                source,
            })?;
            debug!(path = %path.display(), "Parsing descriptor");
            ParsedDescriptor::parse(&path, &content)
                .map_err(|source| ScanError::Parse { path, source })
        })
    }

    /// Materializes the scan, stopping at the first unreadable or malformed file
    pub fn collect_all(&self) -> Result<Vec<ParsedDescriptor>, ScanError> {
        let descriptors = self.scan().collect::<Result<Vec<_>, _>>()?;
        info!(
            root = %self.root.display(),
            descriptors = descriptors.len(),
            "Descriptor scan completed"
        );
        Ok(descriptors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::walk::SYNTHETIC_DIR_NAME;
    use tempfile::TempDir;

    fn write(dir: &TempDir, rel: &str, content: &str) {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_scan_finds_nested_descriptors() {
        let dir = TempDir::new().unwrap();
        write(&dir, "pom.xml", "<project><artifactId>root</artifactId></project>");
        write(&dir, "core/pom.xml", "<project><artifactId>core</artifactId></project>");
        write(&dir, "core/src/main/java/App.java", "class App {}");

        let scanner = DescriptorScanner::new(dir.path());
        let mut artifacts: Vec<String> = scanner
            .collect_all()
            .unwrap()
            .iter()
            .map(|d| d.artifact_id().to_string())
            .collect();
        artifacts.sort();

        assert_eq!(artifacts, vec!["core", "root"]);
    }

    #[test]
    fn test_scan_skips_synthetic_project() {
        let dir = TempDir::new().unwrap();
        write(&dir, "pom.xml", "<project><artifactId>root</artifactId></project>");
        write(
            &dir,
            &format!("{}/pom.xml", SYNTHETIC_DIR_NAME),
            "<project><artifactId>jmh-generic-runner</artifactId></project>",
        );

        let descriptors = DescriptorScanner::new(dir.path()).collect_all().unwrap();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].artifact_id(), "root");
    }

    #[test]
    fn test_malformed_descriptor_fails_the_scan() {
        let dir = TempDir::new().unwrap();
        write(&dir, "pom.xml", "<project><artifactId>root</artifactId></project>");
        write(&dir, "broken/pom.xml", "<project><artifactId>broken</project>");

        let err = DescriptorScanner::new(dir.path()).collect_all().unwrap_err();
        match err {
            ScanError::Parse { path, .. } => assert!(path.ends_with("broken/pom.xml")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_scan_is_rerunnable() {
        let dir = TempDir::new().unwrap();
        write(&dir, "pom.xml", "<project/>");

        let scanner = DescriptorScanner::new(dir.path());
        assert_eq!(scanner.scan().count(), 1);

        write(&dir, "late/pom.xml", "<project/>");
        assert_eq!(scanner.scan().count(), 2);
    }
}
