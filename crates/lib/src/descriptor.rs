//! Deployment descriptor model of an enterprise archive.
//!
//! Mirrors the parts of `application.xml` that module wiring touches: web
//! modules keyed by archive file name, each with its context root. Rendering
//! the XML itself is left to the archive writer.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentDescriptor {
  /// Schema version of the descriptor.
  pub version: String,
  pub display_name: Option<String>,
  /// Directory inside the ear holding shared libraries.
  pub library_directory: Option<String>,
  /// Archive file name -> context root. Keys are unique.
  web_modules: BTreeMap<String, String>,
  /// Non-web modules, by archive file name.
  modules: BTreeSet<String>,
}

impl DeploymentDescriptor {
  pub fn new(version: &str) -> Self {
    Self {
      version: version.to_string(),
      ..Self::default()
    }
  }

  /// Register a web module. A second registration under the same file name
  /// replaces the first; the replaced context root is returned.
  pub fn web_module(&mut self, file_name: &str, context_root: &str) -> Option<String> {
    self.modules.remove(file_name);
    self
      .web_modules
      .insert(file_name.to_string(), context_root.to_string())
  }

  /// Register a plain module, such as an ejb jar.
  pub fn module(&mut self, file_name: &str) {
    if !self.web_modules.contains_key(file_name) {
      self.modules.insert(file_name.to_string());
    }
  }

  pub fn context_root(&self, file_name: &str) -> Option<&str> {
    self.web_modules.get(file_name).map(String::as_str)
  }

  pub fn web_modules(&self) -> &BTreeMap<String, String> {
    &self.web_modules
  }

  pub fn modules(&self) -> &BTreeSet<String> {
    &self.modules
  }

  pub fn is_empty(&self) -> bool {
    self.web_modules.is_empty() && self.modules.is_empty()
  }

  pub fn to_json(&self) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(self)
  }
}
