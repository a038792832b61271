//! autobench - standalone JMH benchmark projects from multi-module Maven builds
//!
//! The tool builds a Maven project, collects every JMH benchmark source it
//! contains, and synthesizes a single benchmark project next to it. The
//! synthetic descriptor is reconciled from all of the project's `pom.xml`
//! files: dependencies, properties, repositories, the project coordinates,
//! the Java target and the JMH version.
//!
//! # Core Concepts
//!
//! - **Scanning**: every `pom.xml` under the project, parsed on demand
//! - **Reconciliation**: one value (or one set) per field, chosen by explicit
//!   rules, with every ambiguity logged
//! - **Resolution**: project modules are only depended on when the local
//!   Maven repository holds them
//!
//! # Example Usage
//!
//! ```no_run
//! use autobench::fs::RealFileSystem;
//! use autobench::pom::DescriptorScanner;
//! use autobench::reconcile::{AggregatorOptions, DescriptorAggregator};
//! use autobench::resolver::DependencyResolver;
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let descriptors = DescriptorScanner::new("/work/project").collect_all()?;
//! let resolver = DependencyResolver::with_root(
//!     Arc::new(RealFileSystem),
//!     PathBuf::from("/home/dev/.m2/repository"),
//! );
//! let reconciled = DescriptorAggregator::new(&descriptors, &resolver)
//!     .reconcile(&AggregatorOptions::default())?;
//! println!("{}", autobench::synth::render(&reconciled));
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`pom`]: descriptor model, parsing and scanning
//! - [`reconcile`]: the descriptor aggregator
//! - [`resolver`]: local repository lookups
//! - [`synth`]: the synthetic project and its descriptor template
//! - [`pipeline`]: the phases of a run

pub mod benchmarks;
pub mod cli;
pub mod config;
pub mod fs;
pub mod jmh;
pub mod maven;
pub mod pipeline;
pub mod pom;
pub mod process;
pub mod reconcile;
pub mod resolver;
pub mod synth;
pub mod util;

// Re-export key types for convenient access
pub use config::{AutobenchConfig, ConfigError, Toolchain};
pub use pom::{Dependency, DependencyType, DescriptorScanner, ParsedDescriptor, Property, Repository};
pub use reconcile::{AggregatorOptions, DescriptorAggregator, ReconcileError, ReconciledDescriptor};
pub use resolver::{DependencyResolver, LocalRepositoryLocator, ResolveError};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
