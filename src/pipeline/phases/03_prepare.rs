use crate::benchmarks::BenchmarkLocator;
use crate::pipeline::context::PipelineContext;
use crate::pipeline::phase_trait::WorkflowPhase;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Stages every benchmark source root into the synthetic project
///
/// The whole root (usually `src/test`) is copied into `src/main`; a sibling
/// `resources` folder is copied again under the configured resources set.
pub struct PreparePhase;

impl WorkflowPhase for PreparePhase {
    fn execute(&self, context: &mut PipelineContext) -> Result<()> {
        let roots = BenchmarkLocator::new(&context.config.target_dir).source_roots();
        if roots.is_empty() {
            warn!("No benchmark sources found");
        }
        info!(count = roots.len(), "Source directories: {:?}", roots);

        let main = context.project.source_set("main");
        for root in &roots {
            let copied = copy_dir_contents(root, &main)?;
            debug!(from = %root.display(), files = copied, "Staged benchmark sources");

            let resources = root.join("resources");
            if resources.is_dir() {
                let dst = context
                    .project
                    .source_set(&context.config.resources_name)
                    .join("resources");
                let copied = copy_dir_contents(&resources, &dst)?;
                debug!(from = %resources.display(), files = copied, "Staged benchmark resources");
            }
        }
        Ok(())
    }
}

/// Copies everything below `src` into `dst`, overwriting files that already exist
fn copy_dir_contents(src: &Path, dst: &Path) -> Result<usize> {
    let mut copied = 0;
    for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
        let entry = entry.context(format!("Failed to walk {:?}", src))?;
        let relative = entry.path().strip_prefix(src)?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).context(format!("Failed to create {:?}", target))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).context(format!("Failed to create {:?}", parent))?;
            }
            fs::copy(entry.path(), &target)
                .context(format!("Failed to copy {:?} to {:?}", entry.path(), target))?;
            copied += 1;
        }
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::context_for;
    use tempfile::TempDir;

    const BENCH: &str = "package org.example.bench;\n\
                         import org.openjdk.jmh.annotations.Benchmark;\n\
                         public class FooBench { @Benchmark public void run() {} }\n";

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_copy_dir_contents() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        write(src.path(), "a/b/One.java", "one");
        write(src.path(), "Two.java", "two");

        let copied = copy_dir_contents(src.path(), &dst.path().join("out")).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(fs::read_to_string(dst.path().join("out/a/b/One.java")).unwrap(), "one");
        assert_eq!(fs::read_to_string(dst.path().join("out/Two.java")).unwrap(), "two");
    }

    #[test]
    fn test_stages_sources_and_resources() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "core/src/test/java/org/example/bench/FooBench.java", BENCH);
        write(root, "core/src/test/java/org/example/bench/Helper.java", "class Helper {}");
        write(root, "core/src/test/resources/data.csv", "1,2,3");
        write(root, "core/src/main/java/org/example/App.java", "class App {}");

        let mut context = context_for(root);
        PreparePhase.execute(&mut context).unwrap();

        let env = root.join("art-jmh-env/src");
        assert!(env.join("main/java/org/example/bench/FooBench.java").is_file());
        assert!(env.join("main/java/org/example/bench/Helper.java").is_file());
        assert!(env.join("main/resources/data.csv").is_file());
        assert!(env.join("test/resources/data.csv").is_file());
        assert!(!env.join("main/java/org/example/App.java").exists());
    }

    #[test]
    fn test_custom_resources_set() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "src/test/java/org/example/bench/FooBench.java", BENCH);
        write(root, "src/test/resources/conf.properties", "a=b");

        let mut context = context_for(root);
        context.config.resources_name = "main".to_string();
        PreparePhase.execute(&mut context).unwrap();

        assert!(root
            .join("art-jmh-env/src/main/resources/conf.properties")
            .is_file());
        assert!(!root.join("art-jmh-env/src/test").exists());
    }

    #[test]
    fn test_no_benchmarks_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/main/java/org/example/App.java", "package org.example;");

        let mut context = context_for(dir.path());
        assert!(PreparePhase.execute(&mut context).is_ok());
        assert!(!dir.path().join("art-jmh-env").exists());
    }
}
