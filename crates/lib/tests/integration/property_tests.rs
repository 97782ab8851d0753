use std::collections::BTreeSet;

use earwire_lib::{BuildGraph, ConfigurationPass, EarPlugin, UnitId, apply_plugin, declared_content};
use proptest::prelude::*;

use super::common::{apply_war, classes, coordinate, earlib_edges, war_classpath};

#[derive(Debug, Clone)]
struct ModuleCase {
  runtime: Vec<String>,
  compile: Vec<String>,
  context_root: Option<String>,
  version: Option<String>,
}

fn module_case() -> impl Strategy<Value = ModuleCase> {
  (
    prop::collection::vec("[a-e]", 0..4),
    prop::collection::vec("[a-e]", 0..3),
    prop::option::of("/[a-z]{1,8}"),
    prop::option::of("[0-9]\\.[0-9]"),
  )
    .prop_map(|(runtime, compile, context_root, version)| ModuleCase {
      runtime,
      compile,
      context_root,
      version,
    })
}

/// Run a full pass. `modules_first` evaluates every module before the
/// package; `reattach` applies the ear plugin a second time.
fn run_build(cases: &[ModuleCase], modules_first: bool, reattach: bool) -> (BuildGraph, Vec<UnitId>) {
  let mut graph = BuildGraph::with_root_dir("shop", "/work/shop");
  let root = graph.root();
  let modules: Vec<UnitId> = (0..cases.len())
    .map(|i| graph.add_unit(&format!("m{}", i)).unwrap())
    .collect();
  if modules_first {
    graph.evaluation_depends_on_children(root);
  }

  let mut pass = ConfigurationPass::new();
  pass.configure(root, move |graph, unit| {
    apply_plugin(graph, unit, &EarPlugin::default())?;
    if reattach {
      apply_plugin(graph, unit, &EarPlugin::default())?;
    }
    Ok(())
  });
  for (&module, case) in modules.iter().zip(cases) {
    let case = case.clone();
    pass.configure(module, move |graph, unit| {
      apply_war(graph, unit)?;
      let target = graph.unit_mut(unit);
      for dep in &case.runtime {
        target.configuration_mut("runtime")?.add_dependency(coordinate(dep))?;
      }
      for dep in &case.compile {
        target.configuration_mut("compile")?.add_dependency(coordinate(dep))?;
      }
      if let Some(context_root) = &case.context_root {
        target.set_context_root(context_root.clone())?;
      }
      if let Some(version) = &case.version {
        target.set_version(version.clone())?;
      }
      Ok(())
    });
  }
  pass.run(&mut graph).unwrap();
  (graph, modules)
}

proptest! {
  #[test]
  fn war_never_bundles_runtime_dependencies(
    cases in prop::collection::vec(module_case(), 1..4),
    modules_first in any::<bool>(),
  ) {
    let (graph, modules) = run_build(&cases, modules_first, false);

    for &module in &modules {
      let runtime = declared_content(&graph, module, "runtime").unwrap();
      let classpath = war_classpath(&graph, module);
      prop_assert!(classpath.is_disjoint(&runtime));
      prop_assert_eq!(classpath, BTreeSet::from([classes(graph.unit(module).name())]));
    }
  }

  #[test]
  fn package_holds_exactly_one_edge_per_module(
    cases in prop::collection::vec(module_case(), 1..4),
    modules_first in any::<bool>(),
    reattach in any::<bool>(),
  ) {
    let (graph, modules) = run_build(&cases, modules_first, reattach);

    for &module in &modules {
      prop_assert_eq!(earlib_edges(&graph, module), 1);
    }

    let expected: BTreeSet<_> = modules
      .iter()
      .flat_map(|&module| declared_content(&graph, module, "runtime").unwrap())
      .collect();
    prop_assert_eq!(declared_content(&graph, graph.root(), "earlib").unwrap(), expected);
  }

  #[test]
  fn descriptor_reflects_settled_values(
    cases in prop::collection::vec(module_case(), 1..4),
    modules_first in any::<bool>(),
  ) {
    let (graph, modules) = run_build(&cases, modules_first, false);
    let descriptor = graph.unit(graph.root()).ear().unwrap().descriptor();

    prop_assert_eq!(descriptor.web_modules().len(), modules.len());
    for (&module, case) in modules.iter().zip(&cases) {
      let name = graph.unit(module).name();
      let file_name = match &case.version {
        Some(version) => format!("{}-{}.war", name, version),
        None => format!("{}.war", name),
      };
      let expected = case.context_root.clone().unwrap_or_else(|| name.to_string());
      prop_assert_eq!(descriptor.context_root(&file_name), Some(expected.as_str()));
    }
  }
}
