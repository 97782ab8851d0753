//! Errors raised while configuring the build graph.
//!
//! Every variant is a configuration-time failure. None of them are retried
//! and none are recoverable locally: the configuration pass aborts on the
//! first one so that no half-wired module reaches the package.

use thiserror::Error;

use crate::unit::{Phase, UnitPath};

#[derive(Debug, Error)]
pub enum WiringError {
  /// A named configuration does not exist on the unit.
  #[error("configuration '{name}' not found in unit '{unit}'")]
  ConfigurationNotFound { unit: UnitPath, name: String },

  /// A unit path does not resolve to a known unit.
  #[error("unit '{0}' not found")]
  UnitNotFound(UnitPath),

  /// A capability model was read before the capability was attached.
  #[error("capability '{capability}' is not attached to unit '{unit}'")]
  CapabilityNotFound { unit: UnitPath, capability: String },

  /// A plugin's capability is already attached by something other than that
  /// plugin.
  #[error("capability '{capability}' of unit '{unit}' is already provided by another plugin")]
  CapabilityConflict { unit: UnitPath, capability: String },

  /// A named task does not exist on the unit.
  #[error("task '{name}' not found in unit '{unit}'")]
  TaskNotFound { unit: UnitPath, name: String },

  /// Task inputs are fixed once the owning unit settles.
  #[error("inputs of task '{task}' in unit '{unit}' are final: the unit has settled")]
  TaskInputsFinalized { unit: UnitPath, task: String },

  /// Dependencies cannot be declared on a configuration that was resolved.
  #[error("cannot add dependencies to configuration '{name}' of unit '{unit}': it has already been resolved")]
  ConfigurationResolved { unit: UnitPath, name: String },

  /// A post-settle action was scheduled on a unit that already settled.
  #[error("unit '{0}' has already settled, post-settle actions can no longer be scheduled")]
  UnitAlreadySettled(UnitPath),

  /// A unit was evaluated twice or out of lifecycle order.
  #[error("unit '{unit}' cannot be evaluated in phase {phase:?}")]
  UnexpectedPhase { unit: UnitPath, phase: Phase },

  /// A user-facing property was written after its deadline.
  #[error("'{property}' of unit '{unit}' was set after the unit settled")]
  LateConfiguration { unit: UnitPath, property: &'static str },

  /// Two units registered under the same path.
  #[error("unit '{0}' already exists")]
  DuplicateUnit(UnitPath),

  /// A unit path or unit name is malformed.
  #[error("invalid unit path '{path}': {reason}")]
  InvalidUnitPath { path: String, reason: &'static str },

  /// Evaluation ordering constraints form a cycle.
  #[error("evaluation order contains a cycle through unit '{0}'")]
  EvaluationCycle(UnitPath),

  /// Project dependencies form a cycle during resolution.
  #[error("dependency cycle while resolving: {chain}")]
  ResolutionCycle { chain: String },
}
