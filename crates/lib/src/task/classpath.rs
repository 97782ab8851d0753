//! Lazy file collections used as task inputs.
//!
//! A [`FileCollection`] records *where* its files come from rather than the
//! files themselves. Subtracting a configuration therefore also removes
//! anything declared on that configuration after the subtraction was set up.

use std::collections::BTreeSet;

use crate::configuration::{Artifact, declared_content};
use crate::error::WiringError;
use crate::graph::BuildGraph;
use crate::unit::UnitId;

/// One contributor to a file collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
  /// The declared content of a configuration.
  Configuration { unit: UnitId, name: String },
  /// A fixed set of artifacts.
  Artifacts(BTreeSet<Artifact>),
}

impl FileSource {
  pub fn configuration(unit: UnitId, name: &str) -> Self {
    FileSource::Configuration {
      unit,
      name: name.to_string(),
    }
  }

  fn resolve(&self, graph: &BuildGraph) -> Result<BTreeSet<Artifact>, WiringError> {
    match self {
      FileSource::Configuration { unit, name } => declared_content(graph, *unit, name),
      FileSource::Artifacts(artifacts) => Ok(artifacts.clone()),
    }
  }
}

/// `union(includes) - union(excludes)`, evaluated on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileCollection {
  includes: Vec<FileSource>,
  excludes: Vec<FileSource>,
}

impl FileCollection {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn plus(mut self, source: FileSource) -> Self {
    self.includes.push(source);
    self
  }

  pub fn minus(mut self, source: FileSource) -> Self {
    self.excludes.push(source);
    self
  }

  pub fn includes(&self) -> &[FileSource] {
    &self.includes
  }

  pub fn excludes(&self) -> &[FileSource] {
    &self.excludes
  }

  /// True if `source` is subtracted from this collection.
  pub fn is_excluded(&self, source: &FileSource) -> bool {
    self.excludes.contains(source)
  }

  /// Compute the current members of the collection.
  pub fn resolve(&self, graph: &BuildGraph) -> Result<BTreeSet<Artifact>, WiringError> {
    let mut files = BTreeSet::new();
    for source in &self.includes {
      files.extend(source.resolve(graph)?);
    }
    for source in &self.excludes {
      for artifact in source.resolve(graph)? {
        files.remove(&artifact);
      }
    }
    Ok(files)
  }
}
