//! Host application: project loading, plugin activation and command event
//! dispatch.
use log::*;
use std::{convert::Infallible, fmt::Display, path::Path, str::FromStr};

use crate::{
    error::StickyWheelError, io::Io, package::Package, pyproject::PyProject,
    result::Result,
};

/// Commands a listener may be notified about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    Build,
    Publish,
    Other(String),
}

impl Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandKind::Build => f.write_str("build"),
            CommandKind::Publish => f.write_str("publish"),
            CommandKind::Other(name) => f.write_str(name),
        }
    }
}

impl FromStr for CommandKind {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "build" => CommandKind::Build,
            "publish" => CommandKind::Publish,
            other => CommandKind::Other(other.to_string()),
        })
    }
}

/// Fired before a command executes.
pub struct ConsoleCommandEvent<'a> {
    command: CommandKind,
    io: &'a dyn Io,
}

impl<'a> ConsoleCommandEvent<'a> {
    pub fn new(command: CommandKind, io: &'a dyn Io) -> Self {
        Self { command, io }
    }

    pub fn command(&self) -> &CommandKind {
        &self.command
    }

    pub fn io(&self) -> &dyn Io {
        self.io
    }
}

/// Receives command events along with the project's package model.
pub trait CommandListener {
    fn on_command(
        &self,
        event: &ConsoleCommandEvent<'_>,
        package: &mut Package,
    ) -> Result<()>;
}

/// Ordered set of command listeners.
#[derive(Default)]
pub struct EventDispatcher {
    listeners: Vec<Box<dyn CommandListener>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&mut self, listener: Box<dyn CommandListener>) {
        self.listeners.push(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Notifies listeners in registration order, stopping at the first
    /// error.
    pub fn dispatch(
        &self,
        event: &ConsoleCommandEvent<'_>,
        package: &mut Package,
    ) -> Result<()> {
        for listener in self.listeners.iter() {
            listener.on_command(event, package)?;
        }
        Ok(())
    }
}

/// Extension activated once when the application starts.
pub trait ApplicationPlugin {
    fn activate(self, application: &mut Application) -> Result<()>;
}

/// A loaded project plus the event plumbing plugins hook into.
pub struct Application {
    pyproject: PyProject,
    package: Package,
    event_dispatcher: EventDispatcher,
}

impl Application {
    /// Loads the poetry project rooted at `project_dir`.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let pyproject = PyProject::find(project_dir)?.ok_or_else(|| {
            StickyWheelError::DescriptorNotFound(project_dir.to_path_buf())
        })?;

        Self::from_pyproject(pyproject)
    }

    pub fn from_pyproject(pyproject: PyProject) -> Result<Self> {
        let package = Package::from_pyproject(&pyproject)?;

        info!(
            "loaded project {} {} from {}",
            package.name(),
            package.version(),
            pyproject.path().display()
        );

        Ok(Self {
            pyproject,
            package,
            event_dispatcher: EventDispatcher::new(),
        })
    }

    pub fn pyproject(&self) -> &PyProject {
        &self.pyproject
    }

    pub fn package(&self) -> &Package {
        &self.package
    }

    pub fn event_dispatcher(&self) -> &EventDispatcher {
        &self.event_dispatcher
    }

    pub fn event_dispatcher_mut(&mut self) -> &mut EventDispatcher {
        &mut self.event_dispatcher
    }

    pub fn add_plugin<P: ApplicationPlugin>(&mut self, plugin: P) -> Result<()> {
        plugin.activate(self)
    }

    /// Announces `command` to every registered listener. Any listener error
    /// aborts the command.
    pub fn run(&mut self, command: CommandKind, io: &dyn Io) -> Result<()> {
        debug!("dispatching {command} command event");
        let event = ConsoleCommandEvent::new(command, io);
        self.event_dispatcher.dispatch(&event, &mut self.package)
    }
}
