//! CLI argument parsing and the dry-run command driver.
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use toml_edit::{DocumentMut, InlineTable, Item, Table, value};

use crate::{
    application::{Application, CommandKind},
    dependency::{DependencyGroup, DependencySource, MAIN_GROUP},
    io::LogIo,
    plugin::StickyWheelPlugin,
    result::Result,
};

/// Preview how path dependencies on sibling poetry projects are pinned at
/// build and publish time. Nothing is written to disk.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value = ".", global = true)]
    /// Project directory containing pyproject.toml.
    pub project: PathBuf,

    #[arg(long, default_value_t = false, global = true)]
    /// Enable debug logging, including every pinned dependency.
    pub debug: bool,

    /// Command whose pre-run hook is simulated.
    #[command(subcommand)]
    pub command: Command,
}

/// Commands the plugin hooks into.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Simulate `poetry build`.
    Build,

    /// Simulate `poetry publish`.
    Publish,
}

impl From<Command> for CommandKind {
    fn from(command: Command) -> Self {
        match command {
            Command::Build => CommandKind::Build,
            Command::Publish => CommandKind::Publish,
        }
    }
}

/// Loads the project, runs the plugin for the selected command and renders
/// the resulting main dependency table.
pub fn execute(args: &Args) -> Result<String> {
    let mut app = Application::load(&args.project)?;
    app.add_plugin(StickyWheelPlugin::default())?;

    let io = LogIo::new();
    app.run(args.command.into(), &io)?;

    let package = app.package();
    let main = package
        .dependency_group(MAIN_GROUP)
        .cloned()
        .unwrap_or_else(|| DependencyGroup::new(MAIN_GROUP));

    Ok(render_dependencies(&main, package.root()).to_string())
}

/// Renders `group` as a `[tool.poetry.dependencies]` table. Paths are shown
/// relative to `root` when possible.
pub fn render_dependencies(group: &DependencyGroup, root: &Path) -> DocumentMut {
    let mut dependencies = Table::new();

    for dependency in group.iter() {
        let item = match dependency.source() {
            DependencySource::Constraint(constraint) => value(constraint),
            DependencySource::Directory(path)
            | DependencySource::File(path) => {
                let shown = path.strip_prefix(root).unwrap_or(path);
                let mut table = InlineTable::new();
                table.insert("path", shown.display().to_string().into());
                value(table)
            }
            DependencySource::Git { url, reference } => {
                let mut table = InlineTable::new();
                table.insert("git", url.as_str().into());
                if let Some(reference) = reference {
                    table.insert("rev", reference.as_str().into());
                }
                value(table)
            }
            DependencySource::Url(url) => {
                let mut table = InlineTable::new();
                table.insert("url", url.as_str().into());
                value(table)
            }
        };

        dependencies.insert(dependency.name(), item);
    }

    let mut poetry = Table::new();
    poetry.set_implicit(true);
    poetry.insert("dependencies", Item::Table(dependencies));

    let mut tool = Table::new();
    tool.set_implicit(true);
    tool.insert("poetry", Item::Table(poetry));

    let mut doc = DocumentMut::new();
    doc.insert("tool", Item::Table(tool));
    doc
}
