//! Maven build descriptors: value types, parsed trees and discovery

pub mod document;
pub mod model;
pub mod scanner;

pub use document::{ParsedDescriptor, PomNode};
pub use model::{
    Dependency, DependencyKey, DependencyType, Property, Repository, RepositoryKey,
    JMH_CORE_ARTIFACT_ID, JMH_GROUP_ID,
};
pub use scanner::{DescriptorScanner, ScanError, DESCRIPTOR_FILE_NAME};
