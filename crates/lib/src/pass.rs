//! The configuration pass.
//!
//! Drives every unit of a graph through its lifecycle in two phases:
//!
//! 1. **Evaluate**: run each unit's configuration scripts, in evaluation
//!    order. Plugins are applied and capabilities attached here.
//! 2. **Settle**: settle each unit in the same order, running its post-settle
//!    actions.
//!
//! Because no unit settles before every script has run, a capability attached
//! by any script is seen by every module before that module settles, whatever
//! the evaluation order.

use std::collections::BTreeMap;

use tracing::info;

use crate::error::WiringError;
use crate::graph::BuildGraph;
use crate::lifecycle::{evaluate_unit, settle_unit};
use crate::unit::UnitId;

/// Configuration code for one unit.
pub type UnitScript = Box<dyn FnOnce(&mut BuildGraph, UnitId) -> Result<(), WiringError>>;

#[derive(Default)]
pub struct ConfigurationPass {
  scripts: BTreeMap<UnitId, Vec<UnitScript>>,
}

impl ConfigurationPass {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add configuration code for `unit`. Scripts of one unit run in the order
  /// they were added.
  pub fn configure<F>(&mut self, unit: UnitId, script: F) -> &mut Self
  where
    F: FnOnce(&mut BuildGraph, UnitId) -> Result<(), WiringError> + 'static,
  {
    self.scripts.entry(unit).or_default().push(Box::new(script));
    self
  }

  /// Evaluate then settle every unit of `graph`.
  ///
  /// Stops at the first error; the graph is left as it was at that point and
  /// must not be packaged.
  pub fn run(mut self, graph: &mut BuildGraph) -> Result<(), WiringError> {
    let order = graph.evaluation_order()?;
    info!(units = order.len(), "starting configuration pass");

    for &unit in &order {
      let scripts = self.scripts.remove(&unit).unwrap_or_default();
      evaluate_unit(graph, unit, |graph, unit| {
        for script in scripts {
          script(graph, unit)?;
        }
        Ok(())
      })?;
    }

    for &unit in &order {
      settle_unit(graph, unit)?;
    }

    info!(units = order.len(), "configuration pass complete");
    Ok(())
  }
}
