//! Plugin settings.
//!
//! Names of the capabilities, configurations and tasks the war and ear
//! plugins create and look for. Every field has a default, so hosts only
//! spell out what they rename.
//!
//! # Example
//!
//! ```json
//! {
//!   "library_configuration": "packagedLibs",
//!   "library_directory": "APP-INF/lib"
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::capability::CapabilityId;
use crate::consts::{
  COMPILE_CONFIGURATION, DEFAULT_DESCRIPTOR_VERSION, DEFAULT_LIBRARY_DIRECTORY, DEPLOY_CONFIGURATION, EAR_CAPABILITY,
  EAR_EXTENSION, EAR_TASK, EARLIB_CONFIGURATION, RUNTIME_CONFIGURATION, WAR_CAPABILITY, WAR_EXTENSION, WAR_TASK,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PluginSettings {
  /// Capability the war plugin attaches to each module.
  pub war_capability: CapabilityId,
  /// Capability whose presence on the root triggers module wiring.
  pub ear_capability: CapabilityId,
  pub compile_configuration: String,
  /// Module configuration moved out of the war and into the package.
  pub runtime_configuration: String,
  /// Package configuration that receives module runtime dependencies.
  pub library_configuration: String,
  pub deploy_configuration: String,
  pub war_task: String,
  pub ear_task: String,
  pub war_extension: String,
  pub ear_extension: String,
  /// Directory inside the ear holding shared libraries.
  pub library_directory: String,
  pub descriptor_version: String,
}

impl Default for PluginSettings {
  fn default() -> Self {
    Self {
      war_capability: CapabilityId::new(WAR_CAPABILITY),
      ear_capability: CapabilityId::new(EAR_CAPABILITY),
      compile_configuration: COMPILE_CONFIGURATION.to_string(),
      runtime_configuration: RUNTIME_CONFIGURATION.to_string(),
      library_configuration: EARLIB_CONFIGURATION.to_string(),
      deploy_configuration: DEPLOY_CONFIGURATION.to_string(),
      war_task: WAR_TASK.to_string(),
      ear_task: EAR_TASK.to_string(),
      war_extension: WAR_EXTENSION.to_string(),
      ear_extension: EAR_EXTENSION.to_string(),
      library_directory: DEFAULT_LIBRARY_DIRECTORY.to_string(),
      descriptor_version: DEFAULT_DESCRIPTOR_VERSION.to_string(),
    }
  }
}

impl PluginSettings {
  /// Parse settings from JSON. Missing fields keep their defaults.
  pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
    serde_json::from_str(json)
  }
}
