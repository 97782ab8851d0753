//! Archive tasks and the classpath rewriter.
//!
//! An [`ArchiveTask`] packs a classpath into one output file. Its output name
//! is computed lazily from the owning unit, so a version assigned late in
//! configuration still shows up in the file name.

mod classpath;

pub use classpath::{FileCollection, FileSource};

use tracing::{debug, info};

use crate::error::WiringError;
use crate::graph::BuildGraph;
use crate::unit::{BuildUnit, UnitId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveTask {
  name: String,
  classpath: FileCollection,
  base_name: Option<String>,
  version: Option<String>,
  classifier: Option<String>,
  extension: String,
}

impl ArchiveTask {
  pub fn new(name: &str, extension: &str) -> Self {
    Self {
      name: name.to_string(),
      classpath: FileCollection::new(),
      base_name: None,
      version: None,
      classifier: None,
      extension: extension.to_string(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn classpath(&self) -> &FileCollection {
    &self.classpath
  }

  pub fn set_classpath(&mut self, classpath: FileCollection) {
    self.classpath = classpath;
  }

  pub fn extension(&self) -> &str {
    &self.extension
  }

  pub fn set_base_name(&mut self, base_name: impl Into<String>) {
    self.base_name = Some(base_name.into());
  }

  pub fn set_version(&mut self, version: impl Into<String>) {
    self.version = Some(version.into());
  }

  pub fn set_classifier(&mut self, classifier: impl Into<String>) {
    self.classifier = Some(classifier.into());
  }

  /// `base[-version][-classifier].extension`.
  ///
  /// The base name falls back to the unit name and the version to the
  /// unit's version, both read at call time.
  pub fn archive_file_name(&self, unit: &BuildUnit) -> String {
    let mut file_name = self.base_name.as_deref().unwrap_or(unit.name()).to_string();
    if let Some(version) = self.version.as_deref().or(unit.version()) {
      file_name.push('-');
      file_name.push_str(version);
    }
    if let Some(classifier) = self.classifier.as_deref() {
      file_name.push('-');
      file_name.push_str(classifier);
    }
    if !self.extension.is_empty() {
      file_name.push('.');
      file_name.push_str(&self.extension);
    }
    file_name
  }
}

/// Replace the classpath of `task` on `unit` with itself minus the content of
/// `configuration`.
///
/// The subtraction is lazy and membership-based: anything declared on the
/// configuration, now or later, is left out of the archive.
///
/// # Errors
///
/// - `ConfigurationNotFound` if `unit` has no `configuration`
/// - `TaskNotFound` if `unit` has no `task`
/// - `TaskInputsFinalized` if `unit` has settled
pub fn remove_configuration_from_classpath(
  graph: &mut BuildGraph,
  unit: UnitId,
  task: &str,
  configuration: &str,
) -> Result<(), WiringError> {
  let owner = graph.unit_mut(unit);
  owner.configuration(configuration)?;
  let path = owner.path().clone();
  let archive = owner.configurable_task_mut(task)?;

  let source = FileSource::configuration(unit, configuration);
  if archive.classpath().is_excluded(&source) {
    debug!(unit = %path, task, configuration, "configuration already excluded from classpath");
    return Ok(());
  }
  let classpath = archive.classpath().clone().minus(source);
  archive.set_classpath(classpath);

  info!(unit = %path, task, configuration, "removed configuration from archive classpath");
  Ok(())
}
