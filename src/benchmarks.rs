//! JMH benchmark source discovery
//!
//! Detection is textual: any Java file mentioning the `@Benchmark` annotation
//! counts, including false positives in comments or strings.

use crate::util::walk::project_files;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, warn};

const BENCHMARK_MARKERS: &[&str] = &[
    "@Benchmark",
    "import org.openjdk.jmh.annotations.Benchmark;",
    "@org.openjdk.jmh.annotations.Benchmark",
];

fn package_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?m)^\s*package\s+([\w.]+)\s*;").expect("valid regex"))
}

pub fn is_benchmark_source(content: &str) -> bool {
    BENCHMARK_MARKERS.iter().any(|marker| content.contains(marker))
}

/// Declared package of a Java compilation unit
pub fn declared_package(content: &str) -> Option<&str> {
    package_pattern()
        .captures(content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// The directory holding `java/<package path>/<file>`.
///
/// For `mod/src/test/java/org/example/FooBench.java` in package `org.example`
/// this is `mod/src/test`. A path that does not follow that layout falls back to
/// the file's parent directory.
pub fn source_root(file: &Path, content: &str) -> PathBuf {
    let mut suffix = PathBuf::from("java");
    if let Some(package) = declared_package(content) {
        suffix.extend(package.split('.'));
    }
    if let Some(name) = file.file_name() {
        suffix.push(name);
    }

    let depth = suffix.components().count();
    if file.ends_with(&suffix) {
        let mut root = file.to_path_buf();
        for _ in 0..depth {
            root.pop();
        }
        return root;
    }

    let fallback = file.parent().map(Path::to_path_buf).unwrap_or_default();
    warn!(
        file = %file.display(),
        expected_suffix = %suffix.display(),
        fallback = %fallback.display(),
        "Benchmark source does not follow the java/<package>/<File> layout"
    );
    fallback
}

/// A located benchmark file and the text it was detected from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkSource {
    pub path: PathBuf,
    pub content: String,
}

impl BenchmarkSource {
    pub fn root(&self) -> PathBuf {
        source_root(&self.path, &self.content)
    }
}

pub struct BenchmarkLocator {
    root: PathBuf,
}

impl BenchmarkLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Java files that look like JMH benchmarks, in path order; each is read once
    pub fn locate(&self) -> impl Iterator<Item = BenchmarkSource> + '_ {
        project_files(&self.root)
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry.into_path()),
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable entry");
                    None
                }
            })
            .filter(|path| path.extension().is_some_and(|ext| ext == "java"))
            .filter_map(|path| match fs::read_to_string(&path) {
                Ok(content) => Some(BenchmarkSource { path, content }),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to read Java source");
                    None
                }
            })
            .filter(|source| is_benchmark_source(&source.content))
    }

    /// Distinct source roots of every located benchmark
    pub fn source_roots(&self) -> BTreeSet<PathBuf> {
        let mut roots = BTreeSet::new();
        for source in self.locate() {
            let root = source.root();
            debug!(file = %source.path.display(), root = %root.display(), "Benchmark source found");
            roots.insert(root);
        }
        roots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const BENCH: &str = "package org.example.bench;\n\n\
        import org.openjdk.jmh.annotations.Benchmark;\n\n\
        public class FooBench {\n    @Benchmark\n    public void run() {}\n}\n";

    #[test]
    fn test_markers() {
        assert!(is_benchmark_source("@Benchmark public void x() {}"));
        assert!(is_benchmark_source("import org.openjdk.jmh.annotations.Benchmark;"));
        assert!(is_benchmark_source("@org.openjdk.jmh.annotations.Benchmark void x() {}"));
        assert!(!is_benchmark_source("import org.junit.Test;"));
    }

    #[test]
    fn test_declared_package() {
        assert_eq!(declared_package(BENCH), Some("org.example.bench"));
        assert_eq!(declared_package("// package fake;\nclass A {}"), None);
        assert_eq!(declared_package("class A {}"), None);
    }

    #[test]
    fn test_source_root_conventional_layout() {
        let file = Path::new("/work/app/core/src/test/java/org/example/bench/FooBench.java");
        assert_eq!(source_root(file, BENCH), PathBuf::from("/work/app/core/src/test"));
    }

    #[test]
    fn test_source_root_default_package() {
        let file = Path::new("/work/app/src/main/java/FooBench.java");
        assert_eq!(
            source_root(file, "public class FooBench {}"),
            PathBuf::from("/work/app/src/main")
        );
    }

    #[test]
    fn test_source_root_unconventional_layout_falls_back() {
        let file = Path::new("/work/app/bench/FooBench.java");
        assert_eq!(source_root(file, BENCH), PathBuf::from("/work/app/bench"));
    }

    #[test]
    fn test_locate_and_roots() {
        let dir = TempDir::new().unwrap();
        let base = dir.path();
        let bench_dir = base.join("core/src/test/java/org/example/bench");
        fs::create_dir_all(&bench_dir).unwrap();
        fs::write(bench_dir.join("FooBench.java"), BENCH).unwrap();
        fs::write(bench_dir.join("Helper.java"), "package org.example.bench;\nclass Helper {}").unwrap();
        fs::write(bench_dir.join("notes.txt"), "@Benchmark").unwrap();

        let synthetic = base.join("art-jmh-env/src/main/java/org/example/bench");
        fs::create_dir_all(&synthetic).unwrap();
        fs::write(synthetic.join("FooBench.java"), BENCH).unwrap();

        let locator = BenchmarkLocator::new(base);
        let found: Vec<BenchmarkSource> = locator.locate().collect();
        assert_eq!(
            found,
            vec![BenchmarkSource {
                path: bench_dir.join("FooBench.java"),
                content: BENCH.to_string(),
            }]
        );

        let roots: Vec<PathBuf> = locator.source_roots().into_iter().collect();
        assert_eq!(roots, vec![base.join("core/src/test")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_sources_are_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let bench_dir = dir.path().join("app/src/test/java/org/example/bench");
        fs::create_dir_all(&bench_dir).unwrap();
        let locked = bench_dir.join("Locked.java");
        fs::write(&locked, BENCH).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        fs::write(bench_dir.join("FooBench.java"), BENCH).unwrap();

        // Still readable when running as root
        let readable = fs::read_to_string(&locked).is_ok();
        let found: Vec<PathBuf> = BenchmarkLocator::new(dir.path())
            .locate()
            .map(|source| source.path)
            .collect();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

        assert!(found.contains(&bench_dir.join("FooBench.java")));
        assert_eq!(found.contains(&locked), readable);
    }
}
