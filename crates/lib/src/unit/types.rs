use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::capability::{CapabilityHandle, CapabilityId, CapabilityRegistry};
use crate::configuration::Configuration;
use crate::consts::{EAR_CAPABILITY, ROOT_PATH, WAR_CAPABILITY};
use crate::error::WiringError;
use crate::lifecycle::SettleQueue;
use crate::plugin::ear::EarConvention;
use crate::plugin::war::WebModule;
use crate::task::ArchiveTask;

/// Index of a unit inside its [`BuildGraph`](crate::graph::BuildGraph).
///
/// Ids are only handed out by the graph that owns the unit and stay valid for
/// the whole build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitId(pub(crate) usize);

/// Colon-separated unit path: `:` for the root, `:billing` for a child,
/// `:apps:billing` for a nested child.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitPath(String);

impl UnitPath {
  pub fn root() -> Self {
    Self(ROOT_PATH.to_string())
  }

  /// Parse an absolute unit path.
  pub fn parse(path: &str) -> Result<Self, WiringError> {
    if path == ROOT_PATH {
      return Ok(Self::root());
    }
    let Some(rest) = path.strip_prefix(':') else {
      return Err(WiringError::InvalidUnitPath {
        path: path.to_string(),
        reason: "unit paths are absolute and start with ':'",
      });
    };
    for segment in rest.split(':') {
      validate_segment(path, segment)?;
    }
    Ok(Self(path.to_string()))
  }

  /// Path of a direct child named `name`.
  pub fn child(&self, name: &str) -> Result<Self, WiringError> {
    validate_segment(name, name)?;
    if self.is_root() {
      Ok(Self(format!(":{}", name)))
    } else {
      Ok(Self(format!("{}:{}", self.0, name)))
    }
  }

  pub fn is_root(&self) -> bool {
    self.0 == ROOT_PATH
  }

  /// Last path segment. Empty for the root.
  pub fn name(&self) -> &str {
    self.0.rsplit(':').next().unwrap_or_default()
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for UnitPath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

fn validate_segment(path: &str, segment: &str) -> Result<(), WiringError> {
  let reason = if segment.is_empty() {
    "empty path segment"
  } else if segment.contains(':') {
    "unit names cannot contain ':'"
  } else if segment.chars().any(char::is_whitespace) {
    "unit names cannot contain whitespace"
  } else {
    return Ok(());
  };
  Err(WiringError::InvalidUnitPath {
    path: path.to_string(),
    reason,
  })
}

/// Lifecycle phase of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
  Created,
  Evaluating,
  Evaluated,
  Settled,
}

/// A named, mutable configuration scope.
pub struct BuildUnit {
  pub(crate) id: UnitId,
  pub(crate) parent: Option<UnitId>,
  pub(crate) name: String,
  pub(crate) path: UnitPath,
  pub(crate) project_dir: PathBuf,
  pub(crate) version: Option<String>,
  pub(crate) phase: Phase,
  pub(crate) configurations: BTreeMap<String, Configuration>,
  pub(crate) tasks: BTreeMap<String, ArchiveTask>,
  pub(crate) capabilities: CapabilityRegistry,
  pub(crate) settle_queue: SettleQueue,
  pub(crate) web: Option<WebModule>,
  pub(crate) ear: Option<EarConvention>,
}

impl BuildUnit {
  pub(crate) fn new(id: UnitId, parent: Option<UnitId>, path: UnitPath, name: &str, project_dir: PathBuf) -> Self {
    Self {
      id,
      parent,
      name: name.to_string(),
      path,
      project_dir,
      version: None,
      phase: Phase::Created,
      configurations: BTreeMap::new(),
      tasks: BTreeMap::new(),
      capabilities: CapabilityRegistry::default(),
      settle_queue: SettleQueue::default(),
      web: None,
      ear: None,
    }
  }

  pub fn id(&self) -> UnitId {
    self.id
  }

  /// Enclosing unit. `None` for the root.
  pub fn parent(&self) -> Option<UnitId> {
    self.parent
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn path(&self) -> &UnitPath {
    &self.path
  }

  pub fn project_dir(&self) -> &Path {
    &self.project_dir
  }

  pub fn phase(&self) -> Phase {
    self.phase
  }

  pub fn is_settled(&self) -> bool {
    self.phase == Phase::Settled
  }

  pub fn version(&self) -> Option<&str> {
    self.version.as_deref()
  }

  /// Set the unit version. Archive names read it lazily, so this may happen
  /// any time before the unit settles.
  pub fn set_version(&mut self, version: impl Into<String>) -> Result<(), WiringError> {
    self.ensure_configurable("version")?;
    self.version = Some(version.into());
    Ok(())
  }

  pub(crate) fn ensure_configurable(&self, property: &'static str) -> Result<(), WiringError> {
    if self.is_settled() {
      return Err(WiringError::LateConfiguration {
        unit: self.path.clone(),
        property,
      });
    }
    Ok(())
  }

  // ============ Configurations ============

  pub fn has_configuration(&self, name: &str) -> bool {
    self.configurations.contains_key(name)
  }

  pub fn configuration(&self, name: &str) -> Result<&Configuration, WiringError> {
    self
      .configurations
      .get(name)
      .ok_or_else(|| WiringError::ConfigurationNotFound {
        unit: self.path.clone(),
        name: name.to_string(),
      })
  }

  pub fn configuration_mut(&mut self, name: &str) -> Result<&mut Configuration, WiringError> {
    let unit = &self.path;
    self
      .configurations
      .get_mut(name)
      .ok_or_else(|| WiringError::ConfigurationNotFound {
        unit: unit.clone(),
        name: name.to_string(),
      })
  }

  /// Return the named configuration, creating an empty one if absent.
  pub fn maybe_create_configuration(&mut self, name: &str) -> &mut Configuration {
    let owner = self.path.clone();
    self
      .configurations
      .entry(name.to_string())
      .or_insert_with(|| Configuration::new(owner, name))
  }

  pub fn configurations(&self) -> impl Iterator<Item = &Configuration> {
    self.configurations.values()
  }

  /// Remove a configuration. Later lookups by name fail with
  /// `ConfigurationNotFound`.
  pub fn remove_configuration(&mut self, name: &str) -> Option<Configuration> {
    self.configurations.remove(name)
  }

  // ============ Tasks ============

  pub fn task(&self, name: &str) -> Result<&ArchiveTask, WiringError> {
    self.tasks.get(name).ok_or_else(|| WiringError::TaskNotFound {
      unit: self.path.clone(),
      name: name.to_string(),
    })
  }

  /// Mutable access to a task whose inputs may still change.
  ///
  /// Fails with `TaskInputsFinalized` once the unit has settled.
  pub fn configurable_task_mut(&mut self, name: &str) -> Result<&mut ArchiveTask, WiringError> {
    if self.is_settled() {
      return Err(WiringError::TaskInputsFinalized {
        unit: self.path.clone(),
        task: name.to_string(),
      });
    }
    let unit = &self.path;
    self.tasks.get_mut(name).ok_or_else(|| WiringError::TaskNotFound {
      unit: unit.clone(),
      name: name.to_string(),
    })
  }

  pub(crate) fn add_task(&mut self, task: ArchiveTask) {
    self.tasks.insert(task.name().to_string(), task);
  }

  /// Output file name of an archive task, computed from the unit's current
  /// state.
  pub fn archive_file_name(&self, task: &str) -> Result<String, WiringError> {
    Ok(self.task(task)?.archive_file_name(self))
  }

  // ============ Capabilities ============

  pub fn has_capability(&self, id: &CapabilityId) -> bool {
    self.capabilities.is_attached(id)
  }

  pub fn capability(&self, id: &CapabilityId) -> Result<&CapabilityHandle, WiringError> {
    self
      .capabilities
      .handle(id)
      .ok_or_else(|| WiringError::CapabilityNotFound {
        unit: self.path.clone(),
        capability: id.to_string(),
      })
  }

  // ============ Web module settings ============

  pub fn web_module(&self) -> Result<&WebModule, WiringError> {
    self.web.as_ref().ok_or_else(|| self.missing(WAR_CAPABILITY))
  }

  pub(crate) fn web_module_mut(&mut self) -> Result<&mut WebModule, WiringError> {
    match self.web.as_mut() {
      Some(web) => Ok(web),
      None => Err(WiringError::CapabilityNotFound {
        unit: self.path.clone(),
        capability: WAR_CAPABILITY.to_string(),
      }),
    }
  }

  /// Context root the module is served under. Defaults to the unit name.
  pub fn context_root(&self) -> Result<String, WiringError> {
    Ok(self.web_module()?.context_root(&self.name))
  }

  /// Override the context root. Must happen before the unit settles; later
  /// writes fail with `LateConfiguration`.
  pub fn set_context_root(&mut self, context_root: impl Into<String>) -> Result<(), WiringError> {
    self.ensure_configurable("context_root")?;
    self.web_module_mut()?.set_context_root(context_root.into());
    Ok(())
  }

  // ============ Enterprise archive model ============

  pub fn ear(&self) -> Result<&EarConvention, WiringError> {
    self.ear.as_ref().ok_or_else(|| self.missing(EAR_CAPABILITY))
  }

  pub fn ear_mut(&mut self) -> Result<&mut EarConvention, WiringError> {
    match self.ear.as_mut() {
      Some(ear) => Ok(ear),
      None => Err(WiringError::CapabilityNotFound {
        unit: self.path.clone(),
        capability: EAR_CAPABILITY.to_string(),
      }),
    }
  }

  fn missing(&self, capability: &str) -> WiringError {
    WiringError::CapabilityNotFound {
      unit: self.path.clone(),
      capability: capability.to_string(),
    }
  }
}

impl fmt::Debug for BuildUnit {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("BuildUnit")
      .field("path", &self.path)
      .field("version", &self.version)
      .field("phase", &self.phase)
      .field("configurations", &self.configurations.keys().collect::<Vec<_>>())
      .field("tasks", &self.tasks.keys().collect::<Vec<_>>())
      .field("capabilities", &self.capabilities)
      .field("pending_settle_actions", &self.settle_queue.len())
      .finish()
  }
}
