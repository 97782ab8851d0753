//! Wiring a web module into the enclosing package.
//!
//! Runs once the root unit gains the ear capability:
//!
//! 1. the module's `runtime` content is subtracted from its war classpath,
//! 2. the package's `earlib` gains a project dependency on the module's
//!    `runtime`, so those libraries ship in the ear instead,
//! 3. a post-settle action records `war file name -> context root` in the
//!    package descriptor, reading both values once the module has settled.
//!
//! Preconditions for all three steps are checked before the first mutation,
//! so a failure never leaves a module half wired.

use tracing::{info, warn};

use super::war::WiringState;
use crate::capability::CapabilityHandle;
use crate::configuration::add_module_as_library_dependency;
use crate::error::WiringError;
use crate::graph::BuildGraph;
use crate::lifecycle::after_unit_settles;
use crate::settings::PluginSettings;
use crate::task::remove_configuration_from_classpath;
use crate::unit::UnitId;

pub(crate) fn wire_into_package(
  graph: &mut BuildGraph,
  module: UnitId,
  package: &CapabilityHandle,
  settings: &PluginSettings,
) -> Result<(), WiringError> {
  let unit = graph.unit(module);
  let web = unit.web_module()?;
  if web.wiring_state() != WiringState::CapabilityUnseen {
    warn!(
      unit = %unit.path(),
      state = ?web.wiring_state(),
      "module already wired, ignoring repeated package notification"
    );
    return Ok(());
  }
  let module_path = unit.path().clone();
  let task = web.archive_task().to_string();

  if unit.is_settled() {
    return Err(WiringError::UnitAlreadySettled(module_path));
  }
  unit.configuration(&settings.runtime_configuration)?;
  unit.task(&task)?;

  let parent = graph.unit(package.unit);
  parent.ear()?;
  let library = parent.configuration(&settings.library_configuration)?;
  if library.is_resolved() {
    return Err(WiringError::ConfigurationResolved {
      unit: package.unit_path.clone(),
      name: library.name().to_string(),
    });
  }

  info!(module = %module_path, package = %package.unit_path, "wiring module into package");

  remove_configuration_from_classpath(graph, module, &task, &settings.runtime_configuration)?;
  add_module_as_library_dependency(
    graph,
    package.unit,
    &settings.library_configuration,
    &module_path,
    &settings.runtime_configuration,
  )?;

  let package_unit = package.unit;
  after_unit_settles(graph, module, move |graph| bind_descriptor(graph, module, package_unit, &task))?;

  graph.unit_mut(module).web_module_mut()?.advance(WiringState::Wired);
  Ok(())
}

/// Record the settled module in the package descriptor.
fn bind_descriptor(graph: &mut BuildGraph, module: UnitId, package: UnitId, task: &str) -> Result<(), WiringError> {
  let unit = graph.unit(module);
  let context_root = unit.context_root()?;
  let file_name = unit.archive_file_name(task)?;
  let module_path = unit.path().clone();

  let descriptor = graph.unit_mut(package).ear_mut()?.descriptor_mut();
  // Each module binds once, so an existing entry was written for another module.
  if let Some(previous) = descriptor.web_module(&file_name, &context_root) {
    warn!(
      module = %module_path,
      file = %file_name,
      previous = %previous,
      context_root = %context_root,
      "archive file name already registered in deployment descriptor, replacing its context root"
    );
  }

  info!(
    module = %module_path,
    file = %file_name,
    context_root = %context_root,
    "bound web module in deployment descriptor"
  );
  graph.unit_mut(module).web_module_mut()?.advance(WiringState::DescriptorBound);
  Ok(())
}
