//! Configurations: named, resolvable sets of dependency declarations.
//!
//! A configuration belongs to one unit. Its declared content may change
//! until it is resolved; after [`resolve_configuration`] it is frozen and
//! further declarations fail with `ConfigurationResolved`.
//!
//! # Submodules
//!
//! - [`resolve`] - Minimal resolver turning declarations into artifacts

pub mod resolve;
mod types;

pub use resolve::{declared_content, resolve_configuration};
pub use types::*;

use tracing::info;

use crate::error::WiringError;
use crate::graph::BuildGraph;
use crate::unit::{UnitId, UnitPath};

/// Declare on `parent`'s `parent_configuration` a project dependency on the
/// unit at `module_path`, selecting its `module_configuration`.
///
/// Callers are responsible for calling this at most once per module; the
/// configuration keeps every declaration it is given, duplicates included.
///
/// # Errors
///
/// - `UnitNotFound` if `module_path` does not resolve to a unit
/// - `ConfigurationNotFound` if the parent lacks `parent_configuration`
/// - `ConfigurationResolved` if the parent configuration was already resolved
pub fn add_module_as_library_dependency(
  graph: &mut BuildGraph,
  parent: UnitId,
  parent_configuration: &str,
  module_path: &UnitPath,
  module_configuration: &str,
) -> Result<(), WiringError> {
  graph.find(module_path)?;

  let parent_unit = graph.unit_mut(parent);
  let parent_path = parent_unit.path().clone();
  parent_unit
    .configuration_mut(parent_configuration)?
    .add_dependency(Dependency::project(module_path.clone(), module_configuration))?;

  info!(
    parent = %parent_path,
    configuration = parent_configuration,
    module = %module_path,
    module_configuration,
    "added module dependency edge"
  );
  Ok(())
}
