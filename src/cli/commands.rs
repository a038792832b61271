use crate::config::{
    AutobenchConfig, ConfigError, Toolchain, DEFAULT_JAVA_VERSION, DEFAULT_RESOURCES_SET,
};
use clap::Parser;
use std::path::PathBuf;

/// Builds a multi-module Maven project and runs its JMH benchmarks
#[derive(Parser, Debug)]
#[command(
    name = "autobench",
    about = "Builds a multi-module Maven project and runs its JMH benchmarks",
    version,
    long_about = "autobench builds the target project, collects every JMH benchmark it \
                  contains into a standalone project under art-jmh-env, reconciles the \
                  dependencies, properties and repositories of all modules into one \
                  descriptor, then builds and runs the benchmarks.\n\n\
                  MVN_BIN and JAVA_HOME must be set.\n\n\
                  Examples:\n  \
                  autobench /path/to/project\n  \
                  autobench -o results -j 17 /path/to/project\n  \
                  autobench -d javax.annotation:javax.annotation-api:1.3.1 -p skipTests=true /path/to/project"
)]
pub struct CliArgs {
    #[arg(value_name = "DIRECTORY", help = "Root of the project to benchmark")]
    pub directory: Option<PathBuf>,

    #[arg(
        short = 'o',
        long = "jmh-folder",
        value_name = "FOLDER",
        default_value = ".",
        help = "Folder for the log and the JSON results"
    )]
    pub jmh_folder: PathBuf,

    #[arg(
        short = 'j',
        long,
        value_name = "VERSION",
        default_value = DEFAULT_JAVA_VERSION,
        help = "Java version to use when no module specifies one"
    )]
    pub java: String,

    #[arg(
        long,
        value_name = "VERSION",
        help = "JMH version to use when no module depends on jmh-core"
    )]
    pub jmh_version: Option<String>,

    #[arg(
        short = 'r',
        long = "rm",
        value_name = "FILES",
        value_delimiter = ',',
        help = "Comma-separated files to remove before building, relative to the source folder (e.g., 'it/unimol/TestClass.java')"
    )]
    pub files_to_remove: Vec<String>,

    #[arg(
        short = 'd',
        long = "dep",
        value_name = "DEPENDENCIES",
        value_delimiter = ',',
        help = "Comma-separated additional dependencies as group:artifact:version[:type]"
    )]
    pub dependencies: Vec<String>,

    #[arg(
        short = 'p',
        long = "prop",
        value_name = "PROPERTIES",
        value_delimiter = ',',
        help = "Comma-separated additional properties as name=value"
    )]
    pub properties: Vec<String>,

    #[arg(
        short = 'R',
        long,
        value_name = "FOLDER",
        default_value = DEFAULT_RESOURCES_SET,
        help = "Source set that receives the benchmark resources"
    )]
    pub resources: String,

    #[arg(short = 'T', long = "test", help = "Testing mode: stage the benchmarks but do not build or run them")]
    pub testing: bool,

    #[arg(
        long,
        conflicts_with = "testing",
        help = "Run the jars left in art-jmh-env/target by a previous run"
    )]
    pub reuse_artifacts: bool,

    #[arg(long, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, help = "Verbose output (debug level)")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

impl CliArgs {
    pub fn into_config(self, toolchain: Toolchain) -> Result<AutobenchConfig, ConfigError> {
        let target_dir = self.directory.ok_or(ConfigError::MissingTarget)?;
        let mut config = AutobenchConfig::new(toolchain, target_dir);
        config.output_dir = self.jmh_folder;
        config.default_java_version = self.java;
        config.jmh_version_override = self.jmh_version;
        config.files_to_remove = self.files_to_remove;
        config.extra_dependencies = self.dependencies;
        config.extra_properties = self.properties;
        config.resources_name = self.resources;
        config.testing_mode = self.testing;
        config.reuse_artifacts = self.reuse_artifacts;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toolchain() -> Toolchain {
        Toolchain {
            maven_bin: PathBuf::from("mvn"),
            java_home: PathBuf::from("/jdk"),
        }
    }

    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from(["autobench", "/work/app"]).unwrap();
        let config = args.into_config(toolchain()).unwrap();

        assert_eq!(config.target_dir, PathBuf::from("/work/app"));
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.default_java_version, "11");
        assert_eq!(config.resources_name, "test");
        assert!(config.jmh_version_override.is_none());
        assert!(config.files_to_remove.is_empty());
        assert!(!config.testing_mode);
    }

    #[test]
    fn test_comma_separated_lists() {
        let args = CliArgs::try_parse_from([
            "autobench",
            "-r",
            "a/A.java,b/B.java",
            "-d",
            "g:a:1,g:b:2:pom",
            "-p",
            "x=1,y=2",
            "/work/app",
        ])
        .unwrap();

        assert_eq!(args.files_to_remove, vec!["a/A.java", "b/B.java"]);
        assert_eq!(args.dependencies, vec!["g:a:1", "g:b:2:pom"]);
        assert_eq!(args.properties, vec!["x=1", "y=2"]);
    }

    #[test]
    fn test_all_options() {
        let args = CliArgs::try_parse_from([
            "autobench",
            "--jmh-folder",
            "out",
            "--java",
            "17",
            "--jmh-version",
            "1.37",
            "-R",
            "main",
            "-T",
            "/work/app",
        ])
        .unwrap();
        let config = args.into_config(toolchain()).unwrap();

        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.default_java_version, "17");
        assert_eq!(config.jmh_version_override.as_deref(), Some("1.37"));
        assert_eq!(config.resources_name, "main");
        assert!(config.testing_mode);
    }

    #[test]
    fn test_missing_directory() {
        let args = CliArgs::try_parse_from(["autobench"]).unwrap();
        assert_eq!(
            args.into_config(toolchain()).unwrap_err(),
            ConfigError::MissingTarget
        );
    }

    #[test]
    fn test_conflicting_flags() {
        assert!(CliArgs::try_parse_from(["autobench", "-v", "-q", "/work/app"]).is_err());
        assert!(CliArgs::try_parse_from(["autobench", "-T", "--reuse-artifacts", "/work/app"]).is_err());
    }
}
