//! Plugin configuration read from `[tool.stickywheel]` in `pyproject.toml`.
//!
//! Resolution is lenient: a missing table, a missing `strategy` key or a
//! value naming no known strategy all resolve to [`Strategy::Semver`].
use log::*;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::{error::StickyWheelError, pyproject::PyProject, result::Result};

/// Name of the `[tool.*]` table holding plugin configuration.
pub const CONFIG_TABLE: &str = "stickywheel";

/// How a sibling project's version becomes a constraint.
#[derive(
    Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// `^<version>`
    #[default]
    Semver,
    /// `>=<version>`
    Minimum,
    /// `<version>`
    Exact,
}

impl Strategy {
    /// Builds the constraint expression for `version`.
    pub fn constraint(&self, version: &str) -> String {
        match self {
            Strategy::Semver => format!("^{version}"),
            Strategy::Minimum => format!(">={version}"),
            Strategy::Exact => version.to_string(),
        }
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Semver => f.write_str("semver"),
            Strategy::Minimum => f.write_str("minimum"),
            Strategy::Exact => f.write_str("exact"),
        }
    }
}

impl FromStr for Strategy {
    type Err = StickyWheelError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "semver" => Ok(Strategy::Semver),
            "minimum" => Ok(Strategy::Minimum),
            "exact" => Ok(Strategy::Exact),
            other => Err(StickyWheelError::unknown_strategy(other)),
        }
    }
}

/// Applies the strategy called `strategy` to `version`. Unlike
/// [`Config::resolve`], unknown names fail here.
pub fn prepare_constraint(strategy: &str, version: &str) -> Result<String> {
    let strategy = strategy.parse::<Strategy>()?;
    Ok(strategy.constraint(version))
}

// Only the shape needed to reach our table; everything else is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Document {
    tool: Tools,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Tools {
    stickywheel: Option<toml::Value>,
}

/// Resolved plugin configuration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub strategy: Strategy,
}

impl Config {
    /// Resolves configuration from the project's descriptor, never failing.
    pub fn resolve(pyproject: &PyProject) -> Self {
        let document = match toml::from_str::<Document>(pyproject.content()) {
            Ok(document) => document,
            Err(err) => {
                warn!(
                    "unable to read [tool.{CONFIG_TABLE}] from {}: {err}: using defaults",
                    pyproject.path().display()
                );
                return Self::default();
            }
        };

        let Some(table) = document.tool.stickywheel else {
            debug!("no [tool.{CONFIG_TABLE}] table found: using defaults");
            return Self::default();
        };

        let Some(raw) = table.get("strategy").and_then(toml::Value::as_str)
        else {
            return Self::default();
        };

        match raw.parse::<Strategy>() {
            Ok(strategy) => Self { strategy },
            Err(err) => {
                warn!("{err}: falling back to {}", Strategy::default());
                Self::default()
            }
        }
    }
}
