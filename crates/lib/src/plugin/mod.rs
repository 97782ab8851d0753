//! Plugins: units gain capabilities by having a plugin applied.
//!
//! - [`war`] - Web module setup and wiring into an enclosing package
//! - [`ear`] - Enterprise archive package with its deployment descriptor

pub mod ear;
pub mod war;
mod wiring;

pub use ear::{EarConvention, EarPlugin};
pub use war::{WarPlugin, WebModule, WiringState};

use tracing::debug;

use crate::capability::{CapabilityHandle, CapabilityId, attach_capability};
use crate::error::WiringError;
use crate::graph::BuildGraph;
use crate::unit::{BuildUnit, UnitId};

pub trait Plugin {
  /// Capability attached to the unit once the plugin has been applied.
  fn capability(&self) -> CapabilityId;

  /// Whether the unit already carries the state this plugin sets up.
  fn is_applied(&self, unit: &BuildUnit) -> bool;

  /// Set up the unit. Runs before the capability is attached, so anything
  /// created here is visible to callbacks waiting for the capability.
  fn apply(&self, graph: &mut BuildGraph, unit: UnitId) -> Result<(), WiringError>;
}

/// Apply `plugin` to `unit` and attach its capability.
///
/// Applying a plugin a second time does nothing. Capabilities are only ever
/// attached here, so a capability on the unit always comes with the state of
/// the plugin that attached it.
///
/// # Errors
///
/// Returns `LateConfiguration` if the unit has settled, `CapabilityConflict`
/// if another plugin already attached the same capability, plus whatever the
/// plugin or the callbacks waiting for its capability return.
pub fn apply_plugin(
  graph: &mut BuildGraph,
  unit: UnitId,
  plugin: &dyn Plugin,
) -> Result<CapabilityHandle, WiringError> {
  let id = plugin.capability();
  let target = graph.unit(unit);
  if plugin.is_applied(target) {
    debug!(unit = %target.path(), capability = %id, "plugin already applied");
    return target.capability(&id).cloned();
  }
  if target.has_capability(&id) {
    return Err(WiringError::CapabilityConflict {
      unit: target.path().clone(),
      capability: id.to_string(),
    });
  }
  target.ensure_configurable("plugins")?;

  plugin.apply(graph, unit)?;
  attach_capability(graph, unit, id)
}
