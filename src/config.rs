//! Run configuration
//!
//! Two paths come from the environment and are required before any work starts:
//!
//! - `MVN_BIN`: the Maven executable
//! - `JAVA_HOME`: the JDK used to run the benchmarks
//!
//! Everything else comes from the command line. `AUTOBENCH_LOG_LEVEL` sets the
//! default log level when neither `--log-level` nor `RUST_LOG` is given.

use crate::pom::{Dependency, Property};
use crate::reconcile::AggregatorOptions;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MAVEN_BIN_ENV: &str = "MVN_BIN";
pub const JAVA_HOME_ENV: &str = "JAVA_HOME";

pub const DEFAULT_JAVA_VERSION: &str = "11";
pub const DEFAULT_RESOURCES_SET: &str = "test";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("You need to set the {0} environment variable to run autobench")]
    MissingEnv(&'static str),

    #[error("Please specify the project directory")]
    MissingTarget,

    #[error("Project directory does not exist or is not a directory: {0:?}")]
    InvalidTarget(PathBuf),

    #[error("Invalid dependency '{0}'; expected group:artifact:version[:type]")]
    InvalidDependency(String),

    #[error("Invalid property '{0}'; expected name=value with an XML element name")]
    InvalidProperty(String),
}

/// The two paths the environment must provide
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub maven_bin: PathBuf,
    pub java_home: PathBuf,
}

impl Toolchain {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var_os(name).map(PathBuf::from))
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<PathBuf>) -> Result<Self, ConfigError> {
        let get = |name: &'static str| {
            lookup(name)
                .filter(|p| !p.as_os_str().is_empty())
                .ok_or(ConfigError::MissingEnv(name))
        };

        Ok(Self {
            maven_bin: get(MAVEN_BIN_ENV)?,
            java_home: get(JAVA_HOME_ENV)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AutobenchConfig {
    pub toolchain: Toolchain,

    /// Root of the multi-module project
    pub target_dir: PathBuf,

    /// Where the log and JSON results go
    pub output_dir: PathBuf,

    /// Java target when no compiler plugin declares one
    pub default_java_version: String,

    /// JMH version when no module depends on jmh-core
    pub jmh_version_override: Option<String>,

    /// Paths relative to the synthetic `src/main/java`, deleted before the build
    pub files_to_remove: Vec<String>,

    /// Raw `group:artifact:version[:type]` tokens
    pub extra_dependencies: Vec<String>,

    /// Raw `name=value` tokens
    pub extra_properties: Vec<String>,

    /// Source set under the synthetic `src/` that receives benchmark resources
    pub resources_name: String,

    /// Stop after staging the benchmark sources
    pub testing_mode: bool,

    /// Run the jars already in `art-jmh-env/target` instead of building
    pub reuse_artifacts: bool,
}

impl AutobenchConfig {
    pub fn new(toolchain: Toolchain, target_dir: PathBuf) -> Self {
        Self {
            toolchain,
            target_dir,
            output_dir: PathBuf::from("."),
            default_java_version: DEFAULT_JAVA_VERSION.to_string(),
            jmh_version_override: None,
            files_to_remove: Vec::new(),
            extra_dependencies: Vec::new(),
            extra_properties: Vec::new(),
            resources_name: DEFAULT_RESOURCES_SET.to_string(),
            testing_mode: false,
            reuse_artifacts: false,
        }
    }

    /// Checks the target directory and every command-line token
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.target_dir.is_dir() {
            return Err(ConfigError::InvalidTarget(self.target_dir.clone()));
        }
        self.parsed_dependencies()?;
        self.parsed_properties()?;
        Ok(())
    }

    /// Last component of the target path, used to name the log and result files
    pub fn project_name(&self) -> String {
        project_name(&self.target_dir)
    }

    pub fn log_file(&self) -> PathBuf {
        self.output_dir.join(format!("{}.log", self.project_name()))
    }

    pub fn parsed_dependencies(&self) -> Result<Vec<Dependency>, ConfigError> {
        self.extra_dependencies
            .iter()
            .map(|token| {
                Dependency::from_coordinates(token)
                    .ok_or_else(|| ConfigError::InvalidDependency(token.clone()))
            })
            .collect()
    }

    pub fn parsed_properties(&self) -> Result<Vec<Property>, ConfigError> {
        self.extra_properties
            .iter()
            .map(|token| {
                Property::from_assignment(token)
                    .ok_or_else(|| ConfigError::InvalidProperty(token.clone()))
            })
            .collect()
    }

    pub fn aggregator_options(&self) -> Result<AggregatorOptions, ConfigError> {
        Ok(AggregatorOptions {
            default_java_version: self.default_java_version.clone(),
            jmh_version_override: self.jmh_version_override.clone(),
            extra_dependencies: self.parsed_dependencies()?,
            extra_properties: self.parsed_properties()?,
        })
    }
}

fn project_name(path: &Path) -> String {
    let named = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .filter(|n| !n.is_empty());
    named
        .or_else(|| {
            path.canonicalize()
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
        })
        .unwrap_or_else(|| "project".to_string())
}
