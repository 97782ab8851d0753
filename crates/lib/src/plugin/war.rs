//! The war plugin: turns a unit into a web module.
//!
//! Applying it always sets up the module itself: `compile` and `runtime`
//! configurations, a `war` task packing the compiled classes plus `runtime`,
//! and the module's web settings. It then watches the root unit for the ear
//! capability; if that ever shows up the module is wired into the package.

use std::collections::BTreeSet;

use tracing::info;

use super::Plugin;
use super::wiring::wire_into_package;
use crate::capability::{CapabilityId, on_capability_attached};
use crate::configuration::Artifact;
use crate::error::WiringError;
use crate::graph::BuildGraph;
use crate::settings::PluginSettings;
use crate::task::{ArchiveTask, FileCollection, FileSource};
use crate::unit::{BuildUnit, UnitId};

/// Where a module stands in being wired into its package.
///
/// ```text
/// CapabilityUnseen -> Wired -> DescriptorBound
/// ```
///
/// No state is revisited. A module whose root never gains the ear capability
/// stays in `CapabilityUnseen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WiringState {
  /// The package capability has not been seen yet.
  CapabilityUnseen,
  /// Classpath rewritten, dependency edge added, descriptor binding queued.
  Wired,
  /// The module's context root is recorded in the package descriptor.
  DescriptorBound,
}

/// Web settings of a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebModule {
  context_root: Option<String>,
  archive_task: String,
  state: WiringState,
}

impl WebModule {
  pub(crate) fn new(archive_task: &str) -> Self {
    Self {
      context_root: None,
      archive_task: archive_task.to_string(),
      state: WiringState::CapabilityUnseen,
    }
  }

  /// The configured context root, or `default` if none was set.
  pub fn context_root(&self, default: &str) -> String {
    self.context_root.clone().unwrap_or_else(|| default.to_string())
  }

  pub(crate) fn set_context_root(&mut self, context_root: String) {
    self.context_root = Some(context_root);
  }

  pub fn archive_task(&self) -> &str {
    &self.archive_task
  }

  pub fn wiring_state(&self) -> WiringState {
    self.state
  }

  pub(crate) fn advance(&mut self, state: WiringState) {
    self.state = state;
  }
}

#[derive(Debug, Clone, Default)]
pub struct WarPlugin {
  settings: PluginSettings,
}

impl WarPlugin {
  pub fn new(settings: PluginSettings) -> Self {
    Self { settings }
  }
}

impl Plugin for WarPlugin {
  fn capability(&self) -> CapabilityId {
    self.settings.war_capability.clone()
  }

  fn is_applied(&self, unit: &BuildUnit) -> bool {
    unit.web_module().is_ok()
  }

  fn apply(&self, graph: &mut BuildGraph, unit: UnitId) -> Result<(), WiringError> {
    let settings = &self.settings;
    let module = graph.unit_mut(unit);

    module.maybe_create_configuration(&settings.compile_configuration);
    module
      .maybe_create_configuration(&settings.runtime_configuration)
      .extends_from(&settings.compile_configuration);

    let classes = Artifact::File(module.project_dir().join("build").join("classes").join("main"));
    let mut war = ArchiveTask::new(&settings.war_task, &settings.war_extension);
    war.set_classpath(
      FileCollection::new()
        .plus(FileSource::Artifacts(BTreeSet::from([classes])))
        .plus(FileSource::configuration(unit, &settings.runtime_configuration)),
    );
    module.add_task(war);
    module.web = Some(WebModule::new(&settings.war_task));

    info!(unit = %module.path(), task = %settings.war_task, "configured web module");

    let root = graph.root();
    let wiring_settings = settings.clone();
    on_capability_attached(graph, root, &settings.ear_capability, move |graph, package| {
      wire_into_package(graph, unit, package, &wiring_settings)
    })
  }
}
