//! Minimal dependency resolution.
//!
//! Turns a configuration's declarations into a set of artifacts. There are no
//! repositories and no version conflict handling: external coordinates and
//! files map to themselves, project dependencies contribute the target
//! configuration's outgoing artifacts plus its own content.

use std::collections::BTreeSet;

use tracing::{debug, trace};

use super::types::{Artifact, Dependency};
use crate::error::WiringError;
use crate::graph::BuildGraph;
use crate::unit::UnitId;

/// Compute the artifacts a configuration currently declares, without
/// freezing it.
pub fn declared_content(graph: &BuildGraph, unit: UnitId, name: &str) -> Result<BTreeSet<Artifact>, WiringError> {
  let mut out = BTreeSet::new();
  collect(graph, unit, name, &mut Vec::new(), &mut out)?;
  Ok(out)
}

/// Resolve a configuration and freeze it.
///
/// Once resolved, the configuration rejects new declarations.
pub fn resolve_configuration(
  graph: &mut BuildGraph,
  unit: UnitId,
  name: &str,
) -> Result<BTreeSet<Artifact>, WiringError> {
  let artifacts = declared_content(graph, unit, name)?;
  let owner = graph.unit_mut(unit);
  debug!(unit = %owner.path(), configuration = name, count = artifacts.len(), "resolved configuration");
  owner.configuration_mut(name)?.mark_resolved();
  Ok(artifacts)
}

fn collect(
  graph: &BuildGraph,
  unit: UnitId,
  name: &str,
  stack: &mut Vec<(UnitId, String)>,
  out: &mut BTreeSet<Artifact>,
) -> Result<(), WiringError> {
  if let Some(start) = stack.iter().position(|(u, n)| *u == unit && n == name) {
    let chain = stack[start..]
      .iter()
      .map(|(u, n)| format!("{}[{}]", graph.unit(*u).path(), n))
      .chain(std::iter::once(format!("{}[{}]", graph.unit(unit).path(), name)))
      .collect::<Vec<_>>()
      .join(" -> ");
    return Err(WiringError::ResolutionCycle { chain });
  }

  let configuration = graph.unit(unit).configuration(name)?;
  trace!(unit = %configuration.owner(), configuration = name, "collecting declarations");
  stack.push((unit, name.to_string()));

  for parent in configuration.extended() {
    collect(graph, unit, parent, stack, out)?;
  }

  for dependency in configuration.dependencies() {
    match dependency {
      Dependency::External(coordinate) => {
        out.insert(Artifact::Module(coordinate.clone()));
      }
      Dependency::File(path) => {
        out.insert(Artifact::File(path.clone()));
      }
      Dependency::Project {
        path,
        configuration: target,
      } => {
        let target_unit = graph.find(path)?;
        out.extend(graph.unit(target_unit).configuration(target)?.artifacts().iter().cloned());
        collect(graph, target_unit, target, stack, out)?;
      }
    }
  }

  stack.pop();
  Ok(())
}
