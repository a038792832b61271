use super::policy::{reconcile, MultiPolicy, ZeroPolicy};
use super::{ReconcileError, ReconciledDescriptor};
use crate::pom::{Dependency, DependencyKey, ParsedDescriptor, Property, Repository, RepositoryKey};
use crate::resolver::DependencyResolver;
use crate::synth::is_reserved_property;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

/// Project version used when no descriptor declares one
pub const DEFAULT_PROJECT_VERSION: &str = "1.0";

/// Command-line input to reconciliation
#[derive(Debug, Clone, Default)]
pub struct AggregatorOptions {
    /// Java target used when no compiler plugin declares one
    pub default_java_version: String,
    /// JMH version used when no descriptor depends on jmh-core
    pub jmh_version_override: Option<String>,
    /// Appended to the imported dependencies without validation
    pub extra_dependencies: Vec<Dependency>,
    /// Appended to the imported properties, replacing same-named ones
    pub extra_properties: Vec<Property>,
}

/// Reduces a set of scanned descriptors to one [`ReconciledDescriptor`]
///
/// The reductions are independent of each other; [`reconcile`](Self::reconcile)
/// runs all of them and fails before anything is written when the group id or
/// the JMH version cannot be determined.
pub struct DescriptorAggregator<'a> {
    descriptors: &'a [ParsedDescriptor],
    resolver: &'a DependencyResolver,
}

impl<'a> DescriptorAggregator<'a> {
    pub fn new(descriptors: &'a [ParsedDescriptor], resolver: &'a DependencyResolver) -> Self {
        Self {
            descriptors,
            resolver,
        }
    }

    pub fn group_id(&self) -> Result<String, ReconcileError> {
        let candidates = self.descriptors.iter().map(|d| d.effective_group_id());
        reconcile(
            "group id",
            candidates,
            ZeroPolicy::Fail,
            MultiPolicy::LexicographicMax,
        )
    }

    pub fn project_version(&self) -> Result<String, ReconcileError> {
        let candidates = self.descriptors.iter().map(|d| d.effective_version());
        reconcile(
            "project version",
            candidates,
            ZeroPolicy::Fallback(DEFAULT_PROJECT_VERSION.to_string()),
            MultiPolicy::LexicographicMax,
        )
    }

    pub fn java_version(&self, default: &str) -> Result<String, ReconcileError> {
        let candidates = self.descriptors.iter().filter_map(|d| d.compiler_source());
        reconcile(
            "java version",
            candidates,
            ZeroPolicy::Fallback(default.to_string()),
            MultiPolicy::LexicographicMax,
        )
    }

    pub fn jmh_version(&self, fallback: Option<&str>) -> Result<String, ReconcileError> {
        let candidates = self.descriptors.iter().flat_map(|d| d.jmh_versions());
        let zero = match fallback {
            Some(version) => ZeroPolicy::Fallback(version.to_string()),
            None => ZeroPolicy::Fail,
        };
        reconcile("JMH version", candidates, zero, MultiPolicy::LexicographicMax)
    }

    /// Properties every declaring descriptor agrees on.
    ///
    /// A name declared with two different values is dropped altogether.
    pub fn properties(&self) -> Vec<Property> {
        let mut values: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for descriptor in self.descriptors {
            for property in descriptor.literal_properties() {
                if is_reserved_property(property.key()) {
                    debug!(name = %property.name, "Skipping property reserved by the synthetic descriptor");
                    continue;
                }
                values
                    .entry(property.name)
                    .or_default()
                    .insert(property.value);
            }
        }

        values
            .into_iter()
            .filter_map(|(name, values)| {
                if values.len() == 1 {
                    let value = values.into_iter().next()?;
                    info!(%name, %value, "Importing property");
                    Some(Property::new(name, value))
                } else {
                    let all = values.into_iter().collect::<Vec<_>>().join(", ");
                    warn!(%name, values = %all, "Conflicting property values; property dropped");
                    None
                }
            })
            .collect()
    }

    pub fn repositories(&self) -> Vec<Repository> {
        let mut merged: BTreeMap<RepositoryKey, Repository> = BTreeMap::new();

        for repository in self.descriptors.iter().flat_map(|d| d.repositories()) {
            merged.entry(repository.key()).or_insert_with(|| {
                info!(repository = %repository, "Importing repository");
                repository
            });
        }

        merged.into_values().collect()
    }

    /// Test dependencies of every module plus the modules already installed locally
    pub fn dependencies(&self) -> Result<Vec<Dependency>, ReconcileError> {
        let mut merged: BTreeMap<DependencyKey, Dependency> = BTreeMap::new();

        for descriptor in self.descriptors {
            for dependency in descriptor.test_dependencies() {
                merged.entry(dependency.key()).or_insert_with(|| {
                    info!(dependency = %dependency, "Importing test dependency");
                    dependency
                });
            }

            let Some(identity) = descriptor.identity() else {
                continue;
            };
            if merged.contains_key(&identity.key()) {
                continue;
            }
            if self.resolver.exists(&identity)? {
                info!(dependency = %identity, "Importing project dependency");
                merged.insert(identity.key(), identity);
            } else {
                debug!(
                    dependency = %identity,
                    path = %descriptor.path().display(),
                    "Module is not installed in the local repository; skipping"
                );
            }
        }

        Ok(merged.into_values().collect())
    }

    /// Runs every reduction and folds in the command-line additions
    pub fn reconcile(&self, options: &AggregatorOptions) -> Result<ReconciledDescriptor, ReconcileError> {
        let group_id = self.group_id()?;
        let version = self.project_version()?;
        let java_version = self.java_version(&options.default_java_version)?;
        let jmh_version = self.jmh_version(options.jmh_version_override.as_deref())?;

        let mut dependencies = self.dependencies()?;
        let mut known: BTreeSet<DependencyKey> = dependencies.iter().map(Dependency::key).collect();
        for extra in &options.extra_dependencies {
            if known.insert(extra.key()) {
                info!(dependency = %extra, "Importing additional dependency");
                dependencies.push(extra.clone());
            } else {
                debug!(dependency = %extra, "Additional dependency already imported");
            }
        }

        let mut properties: BTreeMap<String, Property> = self
            .properties()
            .into_iter()
            .map(|p| (p.name.clone(), p))
            .collect();
        for extra in &options.extra_properties {
            if let Some(previous) = properties.insert(extra.name.clone(), extra.clone()) {
                info!(name = %extra.name, previous = %previous.value, value = %extra.value, "Overriding imported property");
            } else {
                info!(property = %extra, "Importing additional property");
            }
        }

        let repositories = self.repositories();

        info!(
            %group_id,
            %version,
            %java_version,
            %jmh_version,
            dependencies = dependencies.len(),
            properties = properties.len(),
            repositories = repositories.len(),
            "Descriptor reconciled"
        );

        Ok(ReconciledDescriptor {
            group_id,
            version,
            java_version,
            jmh_version,
            dependencies,
            properties: properties.into_values().collect(),
            repositories,
        })
    }
}
