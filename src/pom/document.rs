//! Namespace-stripped `pom.xml` trees
//!
//! roxmltree borrows from the source text, so each descriptor is converted into an
//! owned [`PomNode`] tree right after parsing. Element names are local names only:
//! `<project xmlns="http://maven.apache.org/POM/4.0.0">` and `<project>` read the same.

use super::model::{
    Dependency, DependencyType, Property, Repository, JMH_CORE_ARTIFACT_ID, JMH_GROUP_ID,
};
use roxmltree::Document;
use std::path::{Path, PathBuf};

const COMPILER_PLUGIN_ARTIFACT_ID: &str = "maven-compiler-plugin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PomNode {
    name: String,
    text: String,
    children: Vec<PomNode>,
}

impl PomNode {
    fn from_element(node: roxmltree::Node<'_, '_>) -> Self {
        let mut text = String::new();
        let mut children = Vec::new();

        for child in node.children() {
            if child.is_element() {
                children.push(Self::from_element(child));
            } else if child.is_text() {
                text.push_str(child.text().unwrap_or(""));
            }
        }

        Self {
            name: node.tag_name().name().to_string(),
            text: text.trim().to_string(),
            children,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct text content, trimmed; empty when the element only has children
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> impl Iterator<Item = &PomNode> {
        self.children.iter()
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a PomNode> {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub fn child(&self, name: &str) -> Option<&PomNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Follows the first matching child at every step
    pub fn path(&self, steps: &[&str]) -> Option<&PomNode> {
        steps.iter().try_fold(self, |node, step| node.child(step))
    }

    /// Text at `steps`, or `""` when any step is missing
    pub fn text_at(&self, steps: &[&str]) -> &str {
        self.path(steps).map(PomNode::text).unwrap_or("")
    }

    /// Every element below this one, depth first
    pub fn descendants(&self) -> Vec<&PomNode> {
        let mut out = Vec::new();
        let mut stack: Vec<&PomNode> = self.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children.iter().rev());
        }
        out
    }
}

/// One parsed build descriptor
#[derive(Debug, Clone)]
pub struct ParsedDescriptor {
    path: PathBuf,
    root: PomNode,
}

impl ParsedDescriptor {
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Self, roxmltree::Error> {
        let doc = Document::parse(content)?;
        Ok(Self {
            path: path.into(),
            root: PomNode::from_element(doc.root_element()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn root(&self) -> &PomNode {
        &self.root
    }

    /// The `<project>` element, if this is a Maven descriptor at all
    fn project(&self) -> Option<&PomNode> {
        (self.root.name() == "project").then_some(&self.root)
    }

    fn project_text(&self, steps: &[&str]) -> &str {
        self.project().map(|p| p.text_at(steps)).unwrap_or("")
    }

    pub fn group_id(&self) -> &str {
        self.project_text(&["groupId"])
    }

    /// Own groupId, else the one inherited from `<parent>`
    pub fn effective_group_id(&self) -> &str {
        match self.group_id() {
            "" => self.project_text(&["parent", "groupId"]),
            own => own,
        }
    }

    pub fn artifact_id(&self) -> &str {
        self.project_text(&["artifactId"])
    }

    pub fn version(&self) -> &str {
        self.project_text(&["version"])
    }

    /// Own version, else the one inherited from `<parent>`
    pub fn effective_version(&self) -> &str {
        match self.version() {
            "" => self.project_text(&["parent", "version"]),
            own => own,
        }
    }

    pub fn packaging(&self) -> &str {
        self.project_text(&["packaging"])
    }

    /// `(name, value)` for every child of `/project/properties`, in document order
    pub fn properties(&self) -> Vec<(&str, &str)> {
        self.project()
            .and_then(|p| p.child("properties"))
            .map(|props| props.children().map(|c| (c.name(), c.text())).collect())
            .unwrap_or_default()
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    /// Resolves a whole-value `${name}` against this descriptor's own properties.
    ///
    /// Only one level is followed; anything unresolvable comes back unchanged.
    pub fn interpolate(&self, value: &str) -> String {
        value
            .strip_prefix("${")
            .and_then(|rest| rest.strip_suffix('}'))
            .and_then(|name| self.property(name))
            .filter(|resolved| !resolved.is_empty())
            .unwrap_or(value)
            .to_string()
    }

    /// Every `<dependency>` directly inside any `<dependencies>` element
    ///
    /// This covers the project's own list as well as dependencyManagement, profiles
    /// and plugin dependencies.
    fn dependency_nodes(&self) -> Vec<&PomNode> {
        let Some(project) = self.project() else {
            return Vec::new();
        };

        project
            .descendants()
            .into_iter()
            .filter(|n| n.name() == "dependencies")
            .flat_map(|n| n.children_named("dependency"))
            .collect()
    }

    /// Valid `scope=test` dependencies, excluding JMH itself
    pub fn test_dependencies(&self) -> Vec<Dependency> {
        self.dependency_nodes()
            .into_iter()
            .filter(|n| n.text_at(&["scope"]) == "test")
            .map(|n| {
                Dependency::new(
                    n.text_at(&["groupId"]),
                    n.text_at(&["artifactId"]),
                    n.text_at(&["version"]),
                    DependencyType::None,
                )
            })
            .filter(|d| d.is_valid() && !d.is_jmh())
            .collect()
    }

    /// The artifact this descriptor itself produces, when it is importable
    pub fn identity(&self) -> Option<Dependency> {
        let kind = DependencyType::parse(self.packaging())?;
        let dependency = Dependency::new(
            self.effective_group_id(),
            self.artifact_id(),
            self.effective_version(),
            kind,
        );
        (dependency.is_valid() && !dependency.is_jmh()).then_some(dependency)
    }

    /// Declared `jmh-core` versions, property references resolved where possible
    pub fn jmh_versions(&self) -> Vec<String> {
        self.dependency_nodes()
            .into_iter()
            .filter(|n| {
                n.text_at(&["groupId"]) == JMH_GROUP_ID
                    && n.text_at(&["artifactId"]) == JMH_CORE_ARTIFACT_ID
            })
            .filter_map(|n| n.child("version"))
            .map(|v| self.interpolate(v.text()))
            .filter(|v| !v.is_empty())
            .collect()
    }

    /// `configuration/source` of the first maven-compiler-plugin in `build/plugins`
    pub fn compiler_source(&self) -> Option<String> {
        let plugins = self.project()?.path(&["build", "plugins"])?;
        let plugin = plugins
            .children_named("plugin")
            .find(|p| p.text_at(&["artifactId"]) == COMPILER_PLUGIN_ARTIFACT_ID)?;
        let source = plugin.path(&["configuration", "source"])?;

        Some(self.interpolate(source.text())).filter(|s| !s.is_empty())
    }

    /// Properties whose values are not themselves references
    pub fn literal_properties(&self) -> Vec<Property> {
        self.properties()
            .into_iter()
            .filter(|(_, value)| !Property::is_reference(value))
            .map(|(name, value)| Property::new(name, value))
            .collect()
    }

    pub fn repositories(&self) -> Vec<Repository> {
        let Some(repos) = self.project().and_then(|p| p.child("repositories")) else {
            return Vec::new();
        };

        repos
            .children_named("repository")
            .filter_map(|r| {
                let id = r.text_at(&["id"]);
                let url = r.text_at(&["url"]);
                if id.is_empty() || url.is_empty() {
                    return None;
                }
                let layout = Some(r.text_at(&["layout"]))
                    .filter(|l| !l.is_empty())
                    .map(str::to_string);
                Some(Repository::new(id, url, layout))
            })
            .collect()
    }
}
