//! Project package model built from a `pyproject.toml`.
//!
//! Dependencies are read from `[tool.poetry.dependencies]` (the `main`
//! group), `[tool.poetry.group.<name>.dependencies]` and the legacy
//! `[tool.poetry.dev-dependencies]` table, which lands in the `dev` group.
use log::*;
use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
};
use toml_edit::{Item, TableLike};

use crate::{
    dependency::{Dependency, DependencyGroup, DependencySource, MAIN_GROUP},
    error::StickyWheelError,
    pyproject::PyProject,
    result::Result,
};

const DEV_GROUP: &str = "dev";

// Interpreter requirement, not a distribution.
const PYTHON_REQUIREMENT: &str = "python";

/// A project and its dependency groups.
#[derive(Debug, Clone)]
pub struct Package {
    name: String,
    version: String,
    root: PathBuf,
    groups: BTreeMap<String, DependencyGroup>,
}

impl Package {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            root: root.into(),
            groups: BTreeMap::new(),
        }
    }

    /// Builds the package model for a poetry project descriptor.
    pub fn from_pyproject(pyproject: &PyProject) -> Result<Self> {
        let poetry = pyproject.poetry_config();

        if !pyproject.is_poetry_project() {
            return Err(StickyWheelError::NotAPoetryProject(
                pyproject.path().to_path_buf(),
            )
            .into());
        }

        let mut package = Self::new(
            pyproject.name()?,
            pyproject.version()?,
            pyproject.root(),
        );

        let Some(poetry) = poetry else {
            return Ok(package);
        };

        if let Some(table) = dependency_table(poetry.get("dependencies")) {
            package.load_group(MAIN_GROUP, table);
        }

        if let Some(table) = dependency_table(poetry.get("dev-dependencies")) {
            package.load_group(DEV_GROUP, table);
        }

        if let Some(groups) = poetry.get("group").and_then(Item::as_table_like)
        {
            for (group_name, group) in groups.iter() {
                let table = group
                    .as_table_like()
                    .and_then(|g| dependency_table(g.get("dependencies")));

                if let Some(table) = table {
                    package.load_group(group_name, table);
                }
            }
        }

        Ok(package)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dependency_group(&self, name: &str) -> Option<&DependencyGroup> {
        self.groups.get(name)
    }

    pub fn dependency_group_mut(
        &mut self,
        name: &str,
    ) -> Option<&mut DependencyGroup> {
        self.groups.get_mut(name)
    }

    /// Adds `group`, replacing any group with the same name.
    pub fn add_dependency_group(&mut self, group: DependencyGroup) {
        self.groups.insert(group.name().to_string(), group);
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    fn load_group(&mut self, group_name: &str, table: &dyn TableLike) {
        let root = self.root.clone();
        let group = self
            .groups
            .entry(group_name.to_string())
            .or_insert_with(|| DependencyGroup::new(group_name));

        for (name, item) in table.iter() {
            if name == PYTHON_REQUIREMENT {
                continue;
            }

            match parse_source(&root, item) {
                Some(source) => {
                    let groups = BTreeSet::from([group_name.to_string()]);
                    group.add_dependency(Dependency::new(name, source, groups));
                }
                None => warn!(
                    "skipping unsupported declaration for {name} in group {group_name}"
                ),
            }
        }
    }
}

fn dependency_table(item: Option<&Item>) -> Option<&dyn TableLike> {
    item.and_then(Item::as_table_like)
}

/// Interprets one dependency declaration. Relative paths resolve against
/// the declaring project's root.
fn parse_source(root: &Path, item: &Item) -> Option<DependencySource> {
    if let Some(constraint) = item.as_str() {
        return Some(DependencySource::Constraint(constraint.to_string()));
    }

    let table = item.as_table_like()?;
    let field = |key: &str| {
        table
            .get(key)
            .and_then(Item::as_str)
            .map(|s| s.to_string())
    };

    if let Some(path) = field("path") {
        let resolved = root.join(path);

        if resolved.is_file() {
            return Some(DependencySource::File(resolved));
        }

        return Some(DependencySource::Directory(resolved));
    }

    if let Some(url) = field("git") {
        let reference = field("rev")
            .or_else(|| field("tag"))
            .or_else(|| field("branch"));
        return Some(DependencySource::Git { url, reference });
    }

    if let Some(url) = field("url") {
        return Some(DependencySource::Url(url));
    }

    field("version").map(DependencySource::Constraint)
}
