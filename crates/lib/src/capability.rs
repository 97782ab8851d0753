//! Optional capabilities and the capability probe.
//!
//! A capability is an optional feature attached to a unit when a plugin is
//! applied to it (see [`apply_plugin`](crate::plugin::apply_plugin)). Other
//! units can ask to be told when a capability shows up on a given unit with
//! [`on_capability_attached`], whether it is already there or arrives later.
//!
//! # Guarantees
//!
//! - A callback runs exactly once, with the capability's handle
//! - Callbacks registered before attachment run at attachment, in
//!   registration order
//! - Callbacks registered after attachment run immediately
//! - If the capability never attaches, the callback never runs

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::WiringError;
use crate::graph::BuildGraph;
use crate::unit::{UnitId, UnitPath};

/// Name of a capability, such as `ear`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityId(String);

impl CapabilityId {
  pub fn new(id: &str) -> Self {
    Self(id.to_string())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for CapabilityId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for CapabilityId {
  fn from(id: &str) -> Self {
    Self::new(id)
  }
}

/// Proof that a capability is attached to a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityHandle {
  pub id: CapabilityId,
  pub unit: UnitId,
  pub unit_path: UnitPath,
}

/// Invoked once a capability is present on the watched unit.
pub type CapabilityCallback = Box<dyn FnOnce(&mut BuildGraph, &CapabilityHandle) -> Result<(), WiringError>>;

/// Attached capabilities and pending watchers of one unit.
#[derive(Default)]
pub struct CapabilityRegistry {
  attached: BTreeMap<CapabilityId, CapabilityHandle>,
  pending: BTreeMap<CapabilityId, Vec<CapabilityCallback>>,
}

impl CapabilityRegistry {
  pub fn is_attached(&self, id: &CapabilityId) -> bool {
    self.attached.contains_key(id)
  }

  pub fn handle(&self, id: &CapabilityId) -> Option<&CapabilityHandle> {
    self.attached.get(id)
  }

  /// Number of callbacks still waiting for `id`.
  pub fn pending_count(&self, id: &CapabilityId) -> usize {
    self.pending.get(id).map_or(0, Vec::len)
  }
}

impl fmt::Debug for CapabilityRegistry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let pending: BTreeMap<&CapabilityId, usize> = self.pending.iter().map(|(id, cbs)| (id, cbs.len())).collect();
    f.debug_struct("CapabilityRegistry")
      .field("attached", &self.attached.keys().collect::<Vec<_>>())
      .field("pending", &pending)
      .finish()
  }
}

/// Run `callback` once `capability` is attached to `target`.
///
/// If the capability is already attached the callback runs before this
/// returns and its error, if any, is returned. Otherwise the callback is
/// queued and its error surfaces when the capability is attached.
pub fn on_capability_attached<F>(
  graph: &mut BuildGraph,
  target: UnitId,
  capability: &CapabilityId,
  callback: F,
) -> Result<(), WiringError>
where
  F: FnOnce(&mut BuildGraph, &CapabilityHandle) -> Result<(), WiringError> + 'static,
{
  let unit = graph.unit_mut(target);
  if let Some(handle) = unit.capabilities.handle(capability).cloned() {
    debug!(unit = %handle.unit_path, capability = %capability, "capability already attached, running callback now");
    return callback(graph, &handle);
  }

  debug!(unit = %unit.path(), capability = %capability, "waiting for capability");
  unit
    .capabilities
    .pending
    .entry(capability.clone())
    .or_default()
    .push(Box::new(callback));
  Ok(())
}

/// Attach `capability` to `target` and run every callback waiting for it.
///
/// Attaching a capability that is already present changes nothing and runs
/// no callbacks.
pub(crate) fn attach_capability(
  graph: &mut BuildGraph,
  target: UnitId,
  capability: CapabilityId,
) -> Result<CapabilityHandle, WiringError> {
  let unit = graph.unit_mut(target);
  if let Some(existing) = unit.capabilities.handle(&capability) {
    debug!(unit = %existing.unit_path, capability = %capability, "capability already attached");
    return Ok(existing.clone());
  }

  let handle = CapabilityHandle {
    id: capability.clone(),
    unit: target,
    unit_path: unit.path().clone(),
  };
  unit.capabilities.attached.insert(capability.clone(), handle.clone());
  let waiting = unit.capabilities.pending.remove(&capability).unwrap_or_default();

  info!(
    unit = %handle.unit_path,
    capability = %capability,
    waiting = waiting.len(),
    "attached capability"
  );

  for callback in waiting {
    callback(graph, &handle)?;
  }
  Ok(handle)
}
