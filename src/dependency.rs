//! Dependency and dependency group model.
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Display,
    path::{Path, PathBuf},
};

/// Name of the group holding a project's runtime dependencies.
pub const MAIN_GROUP: &str = "main";

/// Where a dependency is fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencySource {
    /// Registry requirement such as `^1.2` or `>=2,<3`.
    Constraint(String),
    /// A local project directory.
    Directory(PathBuf),
    /// A local sdist or wheel.
    File(PathBuf),
    Git { url: String, reference: Option<String> },
    Url(String),
}

/// A named requirement belonging to one or more dependency groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    name: String,
    source: DependencySource,
    groups: BTreeSet<String>,
}

impl Dependency {
    pub fn new(
        name: impl Into<String>,
        source: DependencySource,
        groups: BTreeSet<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source,
            groups,
        }
    }

    /// Version constrained dependency carrying `groups` forward.
    pub fn constrained(
        name: impl Into<String>,
        constraint: impl Into<String>,
        groups: BTreeSet<String>,
    ) -> Self {
        Self::new(name, DependencySource::Constraint(constraint.into()), groups)
    }

    /// Dependency on the project living in `path`.
    pub fn directory(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        groups: BTreeSet<String>,
    ) -> Self {
        Self::new(name, DependencySource::Directory(path.into()), groups)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// PEP 503 normalised name used as the group key.
    pub fn canonical_name(&self) -> String {
        canonicalize_name(&self.name)
    }

    pub fn source(&self) -> &DependencySource {
        &self.source
    }

    pub fn groups(&self) -> &BTreeSet<String> {
        &self.groups
    }

    /// Directory of a path dependency, `None` for every other source.
    pub fn directory_path(&self) -> Option<&Path> {
        match &self.source {
            DependencySource::Directory(path) => Some(path),
            _ => None,
        }
    }

    pub fn is_directory(&self) -> bool {
        self.directory_path().is_some()
    }

    /// Constraint expression of a registry dependency.
    pub fn constraint(&self) -> Option<&str> {
        match &self.source {
            DependencySource::Constraint(constraint) => Some(constraint),
            _ => None,
        }
    }
}

impl Display for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.source {
            DependencySource::Constraint(c) => write!(f, "{} ({c})", self.name),
            DependencySource::Directory(p) | DependencySource::File(p) => {
                write!(f, "{} @ {}", self.name, p.display())
            }
            DependencySource::Git { url, reference } => match reference {
                Some(r) => write!(f, "{} @ git+{url}@{r}", self.name),
                None => write!(f, "{} @ git+{url}", self.name),
            },
            DependencySource::Url(url) => write!(f, "{} @ {url}", self.name),
        }
    }
}

/// Normalises a distribution name per PEP 503: lowercase with runs of `-`,
/// `_` and `.` collapsed into a single `-`.
pub fn canonicalize_name(name: &str) -> String {
    let mut canonical = String::with_capacity(name.len());
    let mut in_separator = false;

    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                canonical.push('-');
            }
            in_separator = true;
        } else {
            in_separator = false;
            canonical.extend(c.to_lowercase());
        }
    }

    canonical
}

/// Dependencies of one usage category, unique by canonical name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyGroup {
    name: String,
    dependencies: BTreeMap<String, Dependency>,
}

impl DependencyGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dependencies: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds `dependency`, replacing any entry with the same name.
    pub fn add_dependency(&mut self, dependency: Dependency) {
        self.dependencies
            .insert(dependency.canonical_name(), dependency);
    }

    /// Removes the entry called `name`, returning it when present.
    pub fn remove_dependency(&mut self, name: &str) -> Option<Dependency> {
        self.dependencies.remove(&canonicalize_name(name))
    }

    pub fn get(&self, name: &str) -> Option<&Dependency> {
        self.dependencies.get(&canonicalize_name(name))
    }

    /// Owned snapshot of the current entries, safe to hold while mutating
    /// the group.
    pub fn dependencies(&self) -> Vec<Dependency> {
        self.dependencies.values().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dependency> {
        self.dependencies.values()
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn main_groups() -> BTreeSet<String> {
        BTreeSet::from([MAIN_GROUP.to_string()])
    }

    #[test]
    fn canonicalizes_names() {
        assert_eq!(canonicalize_name("Foo_Bar"), "foo-bar");
        assert_eq!(canonicalize_name("foo.bar--baz"), "foo-bar-baz");
        assert_eq!(canonicalize_name("requests"), "requests");
        assert_eq!(canonicalize_name("_private"), "-private");
    }

    #[test]
    fn add_replaces_entry_with_same_canonical_name() {
        let mut group = DependencyGroup::new(MAIN_GROUP);
        group.add_dependency(Dependency::constrained(
            "My_Pkg",
            "^1.0",
            main_groups(),
        ));
        group.add_dependency(Dependency::constrained(
            "my-pkg",
            "^2.0",
            main_groups(),
        ));

        assert_eq!(group.len(), 1);
        assert_eq!(group.get("MY.PKG").unwrap().constraint(), Some("^2.0"));
    }

    #[test]
    fn remove_returns_removed_dependency() {
        let mut group = DependencyGroup::new(MAIN_GROUP);
        group.add_dependency(Dependency::directory(
            "sibling",
            "../sibling",
            main_groups(),
        ));

        let removed = group.remove_dependency("Sibling").unwrap();

        assert!(removed.is_directory());
        assert!(group.is_empty());
        assert!(group.remove_dependency("sibling").is_none());
    }

    #[test]
    fn snapshot_is_detached_from_group() {
        let mut group = DependencyGroup::new(MAIN_GROUP);
        group.add_dependency(Dependency::constrained("a", "1", main_groups()));
        group.add_dependency(Dependency::constrained("b", "2", main_groups()));

        let snapshot = group.dependencies();
        for dependency in &snapshot {
            group.remove_dependency(dependency.name());
        }

        assert_eq!(snapshot.len(), 2);
        assert!(group.is_empty());
    }

    #[test]
    fn directory_path_only_for_directory_sources() {
        let dir = Dependency::directory("a", "../a", main_groups());
        let file = Dependency::new(
            "b",
            DependencySource::File(PathBuf::from("dist/b.whl")),
            main_groups(),
        );

        assert_eq!(dir.directory_path(), Some(Path::new("../a")));
        assert!(file.directory_path().is_none());
        assert!(file.constraint().is_none());
    }

    #[test]
    fn displays_dependencies() {
        let dep = Dependency::constrained("pkg", ">=2.3.1", main_groups());
        assert_eq!(dep.to_string(), "pkg (>=2.3.1)");

        let dep = Dependency::new(
            "tool",
            DependencySource::Git {
                url: "https://example.com/tool.git".into(),
                reference: Some("v1".into()),
            },
            main_groups(),
        );
        assert_eq!(
            dep.to_string(),
            "tool @ git+https://example.com/tool.git@v1"
        );
    }
}
