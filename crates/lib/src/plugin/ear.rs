//! The ear plugin: turns a unit into an enterprise archive package.

use tracing::info;

use super::Plugin;
use crate::capability::CapabilityId;
use crate::descriptor::DeploymentDescriptor;
use crate::error::WiringError;
use crate::graph::BuildGraph;
use crate::settings::PluginSettings;
use crate::task::{ArchiveTask, FileCollection, FileSource};
use crate::unit::{BuildUnit, UnitId};

/// Package-side model owned by the ear capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EarConvention {
  descriptor: DeploymentDescriptor,
  library_configuration: String,
}

impl EarConvention {
  pub fn descriptor(&self) -> &DeploymentDescriptor {
    &self.descriptor
  }

  pub fn descriptor_mut(&mut self) -> &mut DeploymentDescriptor {
    &mut self.descriptor
  }

  /// Configuration whose content is packed into the library directory.
  pub fn library_configuration(&self) -> &str {
    &self.library_configuration
  }
}

#[derive(Debug, Clone, Default)]
pub struct EarPlugin {
  settings: PluginSettings,
}

impl EarPlugin {
  pub fn new(settings: PluginSettings) -> Self {
    Self { settings }
  }
}

impl Plugin for EarPlugin {
  fn capability(&self) -> CapabilityId {
    self.settings.ear_capability.clone()
  }

  fn is_applied(&self, unit: &BuildUnit) -> bool {
    unit.ear().is_ok()
  }

  fn apply(&self, graph: &mut BuildGraph, unit: UnitId) -> Result<(), WiringError> {
    let settings = &self.settings;
    let package = graph.unit_mut(unit);

    package.maybe_create_configuration(&settings.deploy_configuration);
    package.maybe_create_configuration(&settings.library_configuration);

    let mut ear = ArchiveTask::new(&settings.ear_task, &settings.ear_extension);
    ear.set_classpath(
      FileCollection::new()
        .plus(FileSource::configuration(unit, &settings.deploy_configuration))
        .plus(FileSource::configuration(unit, &settings.library_configuration)),
    );
    package.add_task(ear);

    let mut descriptor = DeploymentDescriptor::new(&settings.descriptor_version);
    descriptor.display_name = Some(package.name().to_string());
    descriptor.library_directory = Some(settings.library_directory.clone());
    package.ear = Some(EarConvention {
      descriptor,
      library_configuration: settings.library_configuration.clone(),
    });

    info!(unit = %package.path(), task = %settings.ear_task, "configured enterprise archive");
    Ok(())
  }
}
