//! Descriptor value types
//!
//! Each type exposes a `key()` narrower than its full structure. Merging code keys
//! its maps by that value, so "same entry" and "conflicting field" stay separate
//! concerns instead of hiding inside an equality override.

use serde::Serialize;
use std::fmt;

/// Group id of every JMH artifact; never imported from a scanned descriptor
pub const JMH_GROUP_ID: &str = "org.openjdk.jmh";

/// Artifact id of the JMH runtime whose version drives the synthetic build
pub const JMH_CORE_ARTIFACT_ID: &str = "jmh-core";

/// Dependency packaging type as written in the synthetic descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyType {
    #[default]
    None,
    Jar,
    Pom,
}

impl DependencyType {
    /// Maps a `<packaging>`/`<type>` value; anything else is not importable
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "" => Some(Self::None),
            "jar" => Some(Self::Jar),
            "pom" => Some(Self::Pom),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Jar => Some("jar"),
            Self::Pom => Some("pom"),
        }
    }
}

/// (groupId, artifactId, version)
pub type DependencyKey = (String, String, String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub kind: DependencyType,
}

impl Dependency {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
        kind: DependencyType,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            kind,
        }
    }

    /// Parses a `group:artifact:version[:type]` token.
    ///
    /// Returns `None` when the token has the wrong arity, an unsupported type, or an
    /// empty coordinate.
    pub fn from_coordinates(token: &str) -> Option<Self> {
        let parts: Vec<&str> = token.trim().split(':').collect();
        let (group_id, artifact_id, version, kind) = match parts.as_slice() {
            [g, a, v] => (*g, *a, *v, DependencyType::None),
            [g, a, v, t] => (*g, *a, *v, DependencyType::parse(t)?),
            _ => return None,
        };

        let dependency = Self::new(group_id.trim(), artifact_id.trim(), version.trim(), kind);
        dependency.is_valid().then_some(dependency)
    }

    pub fn key(&self) -> DependencyKey {
        (
            self.group_id.clone(),
            self.artifact_id.clone(),
            self.version.clone(),
        )
    }

    pub fn is_valid(&self) -> bool {
        !self.group_id.is_empty() && !self.artifact_id.is_empty() && !self.version.is_empty()
    }

    pub fn is_jmh(&self) -> bool {
        self.group_id == JMH_GROUP_ID
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)?;
        if let Some(kind) = self.kind.as_str() {
            write!(f, ":{}", kind)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    pub name: String,
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Parses a `name=value` token; the value may itself contain `=`.
    ///
    /// The name becomes an element of the synthetic descriptor, so it must be a
    /// valid XML element name without a namespace prefix.
    pub fn from_assignment(token: &str) -> Option<Self> {
        let (name, value) = token.split_once('=')?;
        let name = name.trim();
        if !Self::is_valid_name(name) {
            return None;
        }
        Some(Self::new(name, value.trim()))
    }

    fn is_valid_name(name: &str) -> bool {
        let mut chars = name.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        (first.is_alphabetic() || first == '_')
            && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
    }

    pub fn key(&self) -> &str {
        &self.name
    }

    /// Values such as `${project.version}` only make sense inside their own module
    pub fn is_reference(value: &str) -> bool {
        value.starts_with("${")
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// (id, url)
pub type RepositoryKey = (String, String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    pub id: String,
    pub url: String,
    pub layout: Option<String>,
}

impl Repository {
    pub fn new(id: impl Into<String>, url: impl Into<String>, layout: Option<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            layout,
        }
    }

    pub fn key(&self) -> RepositoryKey {
        (self.id.clone(), self.url.clone())
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.url)
    }
}
