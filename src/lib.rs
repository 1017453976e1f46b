//! Pins path dependencies on sibling poetry projects to version constraints
//! when a project is built or published.
pub mod application;
pub mod cli;
pub mod config;
pub mod dependency;
pub mod error;
pub mod io;
pub mod package;
pub mod plugin;
pub mod pyproject;
pub mod result;

pub use config::{Config, Strategy};
pub use plugin::{Pin, StickyWheelPlugin};
pub use result::Result;
