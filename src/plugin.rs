//! Rewrites directory dependencies on sibling poetry projects into version
//! constraints before `build` and `publish` run.
//!
//! During development a workspace can reference sibling projects by path:
//!
//! ```toml
//! [tool.poetry.dependencies]
//! core = { path = "../core", develop = true }
//! ```
//!
//! Published artifacts cannot carry such paths, so the plugin reads the
//! sibling's own `pyproject.toml` and replaces the entry with a constraint
//! on its declared version, shaped by the configured [`Strategy`]:
//! `^1.0.0` (semver), `>=1.0.0` (minimum) or `1.0.0` (exact).
//!
//! Paths holding no descriptor, or a descriptor for something other than a
//! poetry project, are left untouched. A recognised descriptor lacking a
//! `name` or `version` aborts the command.
//!
//! [`Strategy`]: crate::config::Strategy
use color_eyre::eyre::WrapErr;
use log::*;

use crate::{
    application::{
        Application, ApplicationPlugin, CommandKind, CommandListener,
        ConsoleCommandEvent,
    },
    config::Config,
    dependency::{Dependency, DependencyGroup, MAIN_GROUP},
    io::{Io, Verbosity},
    package::Package,
    pyproject::PyProject,
    result::Result,
};

/// Outcome of pinning a single dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pin {
    /// Nothing to rewrite.
    Unchanged,
    /// Replacement carrying the same group memberships as the original.
    Replaced(Dependency),
}

/// Plugin pinning sibling path dependencies of the `main` group.
#[derive(Debug, Default, Clone)]
pub struct StickyWheelPlugin {
    config: Config,
}

impl StickyWheelPlugin {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Only commands that produce or upload artifacts need pinned
    /// constraints.
    pub fn handles(command: &CommandKind) -> bool {
        matches!(command, CommandKind::Build | CommandKind::Publish)
    }

    /// Replaces every pinnable directory dependency in `group`. Entries are
    /// rewritten one at a time, so an error leaves earlier replacements in
    /// place.
    pub fn update_dependency_group(
        &self,
        io: &dyn Io,
        group: &mut DependencyGroup,
    ) -> Result<()> {
        io.write_line("Updating dependency constraints...", Verbosity::Debug);

        for dependency in group.dependencies() {
            if !dependency.is_directory() {
                continue;
            }

            let pinned = match self.pin_dependency(&dependency)? {
                Pin::Unchanged => continue,
                Pin::Replaced(pinned) => pinned,
            };

            io.write_line(
                &format!(
                    "  • Pinning {} ({})",
                    pinned.name(),
                    pinned.constraint().unwrap_or_default()
                ),
                Verbosity::Debug,
            );

            group.remove_dependency(dependency.name());
            group.add_dependency(pinned);
        }

        Ok(())
    }

    /// Computes the replacement for a directory dependency.
    pub fn pin_dependency(&self, dependency: &Dependency) -> Result<Pin> {
        let Some(path) = dependency.directory_path() else {
            return Ok(Pin::Unchanged);
        };

        let Some(pyproject) = PyProject::find(path).wrap_err_with(|| {
            format!("failed to read project for {}", dependency.name())
        })?
        else {
            debug!(
                "skipping {}: {} holds no project descriptor",
                dependency.name(),
                path.display()
            );
            return Ok(Pin::Unchanged);
        };

        if !pyproject.is_poetry_project() {
            debug!(
                "skipping {}: {} is not a poetry project",
                dependency.name(),
                pyproject.path().display()
            );
            return Ok(Pin::Unchanged);
        }

        let name = pyproject.name()?;
        let version = pyproject.version()?;
        let constraint = self.config.strategy.constraint(&version);

        Ok(Pin::Replaced(Dependency::constrained(
            name,
            constraint,
            dependency.groups().clone(),
        )))
    }
}

impl ApplicationPlugin for StickyWheelPlugin {
    fn activate(mut self, application: &mut Application) -> Result<()> {
        self.config = Config::resolve(application.pyproject());

        debug!("activating with {} strategy", self.config.strategy);

        application
            .event_dispatcher_mut()
            .add_listener(Box::new(self));

        Ok(())
    }
}

impl CommandListener for StickyWheelPlugin {
    fn on_command(
        &self,
        event: &ConsoleCommandEvent<'_>,
        package: &mut Package,
    ) -> Result<()> {
        if !Self::handles(event.command()) {
            return Ok(());
        }

        match package.dependency_group_mut(MAIN_GROUP) {
            Some(group) => self.update_dependency_group(event.io(), group),
            None => {
                debug!("{} has no {MAIN_GROUP} dependency group", package.name());
                Ok(())
            }
        }
    }
}
