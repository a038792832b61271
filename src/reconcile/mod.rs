//! Reconciliation of many module descriptors into one synthetic descriptor

mod aggregator;
mod policy;

pub use aggregator::{AggregatorOptions, DescriptorAggregator, DEFAULT_PROJECT_VERSION};
pub use policy::{reconcile, MultiPolicy, ZeroPolicy};

use crate::pom::{Dependency, Property, Repository, ScanError};
use crate::resolver::ResolveError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("No {0} found in any descriptor and no override was given")]
    NoValue(&'static str),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Everything the synthetic descriptor needs, fixed once per run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciledDescriptor {
    pub group_id: String,
    pub version: String,
    pub java_version: String,
    pub jmh_version: String,
    pub dependencies: Vec<Dependency>,
    pub properties: Vec<Property>,
    pub repositories: Vec<Repository>,
}
