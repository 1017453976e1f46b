//! Read-only access to `pyproject.toml` build descriptors.
use log::*;
use std::{
    fs::OpenOptions,
    io::Read,
    path::{Path, PathBuf},
};
use toml_edit::{DocumentMut, Item, TableLike};

use crate::{error::StickyWheelError, result::Result};

/// File name of the build descriptor looked up inside project directories.
pub const PYPROJECT_FILE: &str = "pyproject.toml";

const POETRY_BACKEND_PREFIX: &str = "poetry.core";

/// A parsed `pyproject.toml`.
#[derive(Debug, Clone)]
pub struct PyProject {
    path: PathBuf,
    content: String,
    doc: DocumentMut,
}

impl PyProject {
    /// Looks for a descriptor directly inside `dir`. Returns `Ok(None)` when
    /// the directory holds no `pyproject.toml`.
    pub fn find(dir: &Path) -> Result<Option<Self>> {
        let file_path = dir.join(PYPROJECT_FILE);

        if !file_path.is_file() {
            debug!("no {PYPROJECT_FILE} found in {}", dir.display());
            return Ok(None);
        }

        Ok(Some(Self::load(&file_path)?))
    }

    /// Loads and parses the descriptor at `file_path`.
    pub fn load(file_path: &Path) -> Result<Self> {
        let mut file = OpenOptions::new()
            .read(true)
            .open(file_path)
            .map_err(StickyWheelError::from)?;
        let mut content = String::from("");
        file.read_to_string(&mut content)
            .map_err(StickyWheelError::from)?;
        Self::parse(file_path, content)
    }

    /// Parses descriptor `content` that was read from `file_path`.
    pub fn parse(
        file_path: impl Into<PathBuf>,
        content: impl Into<String>,
    ) -> Result<Self> {
        let content = content.into();
        let doc = content
            .parse::<DocumentMut>()
            .map_err(StickyWheelError::from)?;

        Ok(Self {
            path: file_path.into(),
            content,
            doc,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory containing the descriptor.
    pub fn root(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Raw descriptor text as read from disk.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// True when the descriptor declares a `[tool.poetry]` table, or a
    /// PEP 621 `[project]` built by the poetry-core backend.
    pub fn is_poetry_project(&self) -> bool {
        if self.poetry_config().is_some() {
            return true;
        }

        let has_project_name = self
            .project_table()
            .and_then(|p| p.get("name"))
            .and_then(Item::as_str)
            .is_some();

        let poetry_backend = self
            .doc
            .get("build-system")
            .and_then(Item::as_table_like)
            .and_then(|b| b.get("build-backend"))
            .and_then(Item::as_str)
            .map(|b| b.starts_with(POETRY_BACKEND_PREFIX))
            .unwrap_or(false);

        has_project_name && poetry_backend
    }

    /// The `[tool.poetry]` table.
    pub fn poetry_config(&self) -> Option<&dyn TableLike> {
        self.tool_table("poetry")
    }

    /// A `[tool.<name>]` table.
    pub fn tool_table(&self, name: &str) -> Option<&dyn TableLike> {
        self.doc
            .get("tool")
            .and_then(Item::as_table_like)
            .and_then(|t| t.get(name))
            .and_then(Item::as_table_like)
    }

    /// Declared project name, required once a project is recognised.
    pub fn name(&self) -> Result<String> {
        self.required_field("name")
    }

    /// Declared project version, required once a project is recognised.
    pub fn version(&self) -> Result<String> {
        self.required_field("version")
    }

    fn project_table(&self) -> Option<&dyn TableLike> {
        self.doc.get("project").and_then(Item::as_table_like)
    }

    // tool.poetry wins over [project] the way poetry itself reads metadata
    fn required_field(&self, field: &str) -> Result<String> {
        [self.poetry_config(), self.project_table()]
            .into_iter()
            .flatten()
            .find_map(|table| table.get(field).and_then(Item::as_str))
            .map(|value| value.to_string())
            .ok_or_else(|| {
                StickyWheelError::missing_field(field, &self.path).into()
            })
    }
}
