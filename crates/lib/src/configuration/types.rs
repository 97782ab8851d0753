use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::WiringError;
use crate::unit::UnitPath;

/// External module coordinate in `group:name:version` form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModuleCoordinate {
  pub group: String,
  pub name: String,
  pub version: String,
}

impl ModuleCoordinate {
  pub fn new(group: &str, name: &str, version: &str) -> Self {
    Self {
      group: group.to_string(),
      name: name.to_string(),
      version: version.to_string(),
    }
  }
}

impl fmt::Display for ModuleCoordinate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}:{}", self.group, self.name, self.version)
  }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid module coordinate '{0}': expected group:name:version")]
pub struct InvalidCoordinate(pub String);

impl FromStr for ModuleCoordinate {
  type Err = InvalidCoordinate;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let parts: Vec<&str> = s.split(':').collect();
    match parts.as_slice() {
      [group, name, version] if !group.is_empty() && !name.is_empty() && !version.is_empty() => {
        Ok(Self::new(group, name, version))
      }
      _ => Err(InvalidCoordinate(s.to_string())),
    }
  }
}

/// A resolvable item on a classpath.
///
/// Artifacts compare by identity, so classpaths built from them behave as
/// sets: the same jar reached through two configurations appears once.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Artifact {
  /// A module fetched from a repository.
  Module(ModuleCoordinate),
  /// A local file or directory.
  File(PathBuf),
}

impl fmt::Display for Artifact {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Artifact::Module(coordinate) => write!(f, "{}", coordinate),
      Artifact::File(path) => write!(f, "{}", path.display()),
    }
  }
}

/// A single dependency declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Dependency {
  External(ModuleCoordinate),
  File(PathBuf),
  /// Another unit's configuration: its outgoing artifacts plus its content.
  Project { path: UnitPath, configuration: String },
}

impl Dependency {
  pub fn project(path: UnitPath, configuration: &str) -> Self {
    Dependency::Project {
      path,
      configuration: configuration.to_string(),
    }
  }

  /// True if this declaration points at `configuration` of the unit at `path`.
  pub fn targets(&self, path: &UnitPath, configuration: &str) -> bool {
    matches!(self, Dependency::Project { path: p, configuration: c } if p == path && c == configuration)
  }
}

impl From<ModuleCoordinate> for Dependency {
  fn from(coordinate: ModuleCoordinate) -> Self {
    Dependency::External(coordinate)
  }
}

/// A named set of dependency declarations owned by one unit.
#[derive(Debug, Clone)]
pub struct Configuration {
  owner: UnitPath,
  name: String,
  extends_from: Vec<String>,
  dependencies: Vec<Dependency>,
  artifacts: BTreeSet<Artifact>,
  resolved: bool,
}

impl Configuration {
  pub(crate) fn new(owner: UnitPath, name: &str) -> Self {
    Self {
      owner,
      name: name.to_string(),
      extends_from: Vec::new(),
      dependencies: Vec::new(),
      artifacts: BTreeSet::new(),
      resolved: false,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn owner(&self) -> &UnitPath {
    &self.owner
  }

  /// Inherit every declaration of the sibling configuration `parent`.
  pub fn extends_from(&mut self, parent: &str) -> &mut Self {
    if !self.extends_from.iter().any(|p| p == parent) {
      self.extends_from.push(parent.to_string());
    }
    self
  }

  pub fn extended(&self) -> &[String] {
    &self.extends_from
  }

  pub fn dependencies(&self) -> &[Dependency] {
    &self.dependencies
  }

  pub fn add_dependency(&mut self, dependency: impl Into<Dependency>) -> Result<&mut Self, WiringError> {
    if self.resolved {
      return Err(WiringError::ConfigurationResolved {
        unit: self.owner.clone(),
        name: self.name.clone(),
      });
    }
    self.dependencies.push(dependency.into());
    Ok(self)
  }

  /// Artifacts this configuration publishes to units that depend on it.
  pub fn artifacts(&self) -> &BTreeSet<Artifact> {
    &self.artifacts
  }

  pub fn add_artifact(&mut self, artifact: Artifact) -> &mut Self {
    self.artifacts.insert(artifact);
    self
  }

  pub fn is_resolved(&self) -> bool {
    self.resolved
  }

  pub(crate) fn mark_resolved(&mut self) {
    self.resolved = true;
  }
}
