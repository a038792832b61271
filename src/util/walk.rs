//! Directory walking shared by descriptor and benchmark discovery

use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Folder that holds the synthesized benchmark project inside the target project
pub const SYNTHETIC_DIR_NAME: &str = "art-jmh-env";

/// Regular files below `root` in name order.
///
/// Hidden directories and the synthetic project folder are pruned.
pub fn project_files(root: &Path) -> impl Iterator<Item = walkdir::Result<DirEntry>> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_pruned(e))
        .filter(|e| e.as_ref().map(|e| e.file_type().is_file()).unwrap_or(true))
}

fn is_pruned(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name == SYNTHETIC_DIR_NAME || name.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_prunes_hidden_and_synthetic_dirs() {
        let dir = TempDir::new().unwrap();
        let base = dir.path();
        fs::create_dir_all(base.join(".git")).unwrap();
        fs::create_dir_all(base.join(SYNTHETIC_DIR_NAME).join("src")).unwrap();
        fs::create_dir_all(base.join("module")).unwrap();
        fs::write(base.join(".git/pom.xml"), "").unwrap();
        fs::write(base.join(SYNTHETIC_DIR_NAME).join("src/pom.xml"), "").unwrap();
        fs::write(base.join("module/pom.xml"), "").unwrap();
        fs::write(base.join(".hidden-file"), "").unwrap();

        let files: Vec<_> = project_files(base)
            .map(|e| e.unwrap().path().strip_prefix(base).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            files,
            vec![Path::new(".hidden-file").to_path_buf(), Path::new("module/pom.xml").to_path_buf()]
        );
    }

    #[test]
    fn test_missing_root_yields_error() {
        let mut entries = project_files(Path::new("/definitely/not/here"));
        assert!(entries.next().unwrap().is_err());
    }
}
