//! Shared helpers for integration tests.

use std::collections::BTreeSet;
use std::path::PathBuf;

use earwire_lib::{
  Artifact, BuildGraph, DeploymentDescriptor, EarPlugin, ModuleCoordinate, UnitId, WarPlugin, WiringError,
  apply_plugin,
};

pub fn coordinate(name: &str) -> ModuleCoordinate {
  ModuleCoordinate::new("com.acme", name, "1.0")
}

pub fn jar(name: &str) -> Artifact {
  Artifact::Module(coordinate(name))
}

/// A graph rooted at `shop` (in `/work/shop`) with one child per name.
pub fn shop(modules: &[&str]) -> (BuildGraph, Vec<UnitId>) {
  let mut graph = BuildGraph::with_root_dir("shop", "/work/shop");
  let ids = modules.iter().map(|name| graph.add_unit(name).unwrap()).collect();
  (graph, ids)
}

/// Script body applying the ear plugin.
pub fn apply_ear(graph: &mut BuildGraph, unit: UnitId) -> Result<(), WiringError> {
  apply_plugin(graph, unit, &EarPlugin::default())?;
  Ok(())
}

/// Script body applying the war plugin.
pub fn apply_war(graph: &mut BuildGraph, unit: UnitId) -> Result<(), WiringError> {
  apply_plugin(graph, unit, &WarPlugin::default())?;
  Ok(())
}

/// Compiled classes directory the war plugin puts on the classpath.
pub fn classes(name: &str) -> Artifact {
  Artifact::File(PathBuf::from(format!("/work/shop/{}/build/classes/main", name)))
}

pub fn war_classpath(graph: &BuildGraph, module: UnitId) -> BTreeSet<Artifact> {
  graph
    .unit(module)
    .task("war")
    .unwrap()
    .classpath()
    .resolve(graph)
    .unwrap()
}

/// Number of `earlib` declarations pointing at the module's `runtime`.
pub fn earlib_edges(graph: &BuildGraph, module: UnitId) -> usize {
  let path = graph.unit(module).path();
  match graph.unit(graph.root()).configuration("earlib") {
    Ok(earlib) => earlib
      .dependencies()
      .iter()
      .filter(|dep| dep.targets(path, "runtime"))
      .count(),
    Err(_) => 0,
  }
}

pub fn descriptor(graph: &BuildGraph) -> &DeploymentDescriptor {
  graph.unit(graph.root()).ear().unwrap().descriptor()
}
