//! Unit lifecycle: evaluation, settling, and post-settle actions.
//!
//! Settling is the two-phase commit point of a unit. Before it, configuration
//! code mutates the unit's own state. After it, queued actions read that
//! final state and publish it to other units.

use std::fmt;

use tracing::{debug, info};

use crate::error::WiringError;
use crate::graph::BuildGraph;
use crate::unit::{Phase, UnitId};

/// Runs once after its unit settles.
pub type SettleAction = Box<dyn FnOnce(&mut BuildGraph) -> Result<(), WiringError>>;

/// Post-settle actions of one unit, in registration order.
#[derive(Default)]
pub struct SettleQueue {
  actions: Vec<SettleAction>,
}

impl SettleQueue {
  pub fn len(&self) -> usize {
    self.actions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.actions.is_empty()
  }

  fn push(&mut self, action: SettleAction) {
    self.actions.push(action);
  }

  fn take(&mut self) -> Vec<SettleAction> {
    std::mem::take(&mut self.actions)
  }
}

impl fmt::Debug for SettleQueue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SettleQueue").field("len", &self.actions.len()).finish()
  }
}

/// Run `script` as the configuration code of `unit`.
///
/// The unit moves from `Created` through `Evaluating` to `Evaluated`. A unit
/// is evaluated at most once.
pub fn evaluate_unit<F>(graph: &mut BuildGraph, unit: UnitId, script: F) -> Result<(), WiringError>
where
  F: FnOnce(&mut BuildGraph, UnitId) -> Result<(), WiringError>,
{
  let target = graph.unit_mut(unit);
  if target.phase != Phase::Created {
    return Err(WiringError::UnexpectedPhase {
      unit: target.path.clone(),
      phase: target.phase,
    });
  }
  target.phase = Phase::Evaluating;
  debug!(unit = %target.path, "evaluating unit");

  script(graph, unit)?;

  let target = graph.unit_mut(unit);
  target.phase = Phase::Evaluated;
  debug!(unit = %target.path, "evaluated unit");
  Ok(())
}

/// Schedule `action` to run once `unit` has settled.
///
/// Actions run in registration order. The action should read the unit's
/// state when it runs, not capture it at scheduling time.
///
/// # Errors
///
/// Returns `UnitAlreadySettled` if the unit has already settled.
pub fn after_unit_settles<F>(graph: &mut BuildGraph, unit: UnitId, action: F) -> Result<(), WiringError>
where
  F: FnOnce(&mut BuildGraph) -> Result<(), WiringError> + 'static,
{
  let target = graph.unit_mut(unit);
  if target.is_settled() {
    return Err(WiringError::UnitAlreadySettled(target.path.clone()));
  }
  target.settle_queue.push(Box::new(action));
  debug!(unit = %target.path, queued = target.settle_queue.len(), "scheduled post-settle action");
  Ok(())
}

/// Settle `unit` and run its post-settle actions.
///
/// The unit is marked settled before any action runs, so actions observe
/// final state and cannot modify it. Settling twice is a no-op.
pub fn settle_unit(graph: &mut BuildGraph, unit: UnitId) -> Result<(), WiringError> {
  let target = graph.unit_mut(unit);
  if target.is_settled() {
    debug!(unit = %target.path, "unit already settled");
    return Ok(());
  }
  target.phase = Phase::Settled;
  let actions = target.settle_queue.take();
  info!(unit = %target.path, actions = actions.len(), "settled unit");

  for action in actions {
    action(graph)?;
  }
  Ok(())
}
