use std::collections::BTreeSet;

use earwire_lib::{
  BuildGraph, BuildUnit, CapabilityId, ConfigurationPass, Dependency, Phase, Plugin, UnitId, WiringError, WiringState,
  after_unit_settles, apply_plugin, declared_content,
};

use super::common::{apply_ear, apply_war, classes, coordinate, descriptor, earlib_edges, jar, shop, war_classpath};

#[test]
fn default_context_root_is_module_name() {
  let (mut graph, ids) = shop(&["inventory"]);
  let (root, inventory) = (graph.root(), ids[0]);

  let mut pass = ConfigurationPass::new();
  pass.configure(root, apply_ear).configure(inventory, apply_war);
  pass.run(&mut graph).unwrap();

  assert_eq!(descriptor(&graph).context_root("inventory.war"), Some("inventory"));
  assert_eq!(earlib_edges(&graph, inventory), 1);
  assert_eq!(
    graph.unit(inventory).web_module().unwrap().wiring_state(),
    WiringState::DescriptorBound
  );
}

#[test]
fn context_root_set_after_plugin_application_wins() {
  let (mut graph, ids) = shop(&["billing"]);
  let (root, billing) = (graph.root(), ids[0]);

  let mut pass = ConfigurationPass::new();
  pass.configure(root, apply_ear).configure(billing, |graph, unit| {
    apply_war(graph, unit)?;
    graph.unit_mut(unit).set_context_root("/billing-api")
  });
  pass.run(&mut graph).unwrap();

  assert_eq!(descriptor(&graph).context_root("billing.war"), Some("/billing-api"));
  assert_eq!(descriptor(&graph).web_modules().len(), 1);
}

#[test]
fn late_version_changes_descriptor_key() {
  let (mut graph, ids) = shop(&["billing"]);
  let (root, billing) = (graph.root(), ids[0]);

  let mut pass = ConfigurationPass::new();
  pass.configure(root, apply_ear).configure(billing, |graph, unit| {
    apply_war(graph, unit)?;
    graph.unit_mut(unit).set_version("1.2")
  });
  pass.run(&mut graph).unwrap();

  assert_eq!(descriptor(&graph).context_root("billing-1.2.war"), Some("billing"));
  assert_eq!(descriptor(&graph).context_root("billing.war"), None);
}

#[test]
fn no_package_capability_leaves_module_untouched() {
  let (mut graph, ids) = shop(&["inventory"]);
  let inventory = ids[0];

  let mut pass = ConfigurationPass::new();
  pass.configure(inventory, |graph, unit| {
    apply_war(graph, unit)?;
    graph
      .unit_mut(unit)
      .configuration_mut("runtime")?
      .add_dependency(coordinate("money"))?;
    Ok(())
  });
  pass.run(&mut graph).unwrap();

  let root = graph.root();
  assert!(!graph.unit(root).has_capability(&CapabilityId::new("ear")));
  assert!(matches!(
    graph.unit(root).ear(),
    Err(WiringError::CapabilityNotFound { .. })
  ));
  assert_eq!(earlib_edges(&graph, inventory), 0);
  assert!(graph.unit(inventory).task("war").unwrap().classpath().excludes().is_empty());
  assert_eq!(
    war_classpath(&graph, inventory),
    BTreeSet::from([classes("inventory"), jar("money")])
  );
  assert_eq!(
    graph.unit(inventory).web_module().unwrap().wiring_state(),
    WiringState::CapabilityUnseen
  );
}

#[test]
fn missing_runtime_configuration_aborts_without_partial_edge() {
  let (mut graph, ids) = shop(&["inventory"]);
  let (root, inventory) = (graph.root(), ids[0]);
  graph.evaluation_depends_on(root, inventory);

  let mut pass = ConfigurationPass::new();
  pass
    .configure(inventory, |graph, unit| {
      apply_war(graph, unit)?;
      graph.unit_mut(unit).remove_configuration("runtime");
      Ok(())
    })
    .configure(root, apply_ear);
  let err = pass.run(&mut graph).unwrap_err();

  assert!(matches!(err, WiringError::ConfigurationNotFound { ref name, .. } if name == "runtime"));
  assert_eq!(earlib_edges(&graph, inventory), 0);
  assert!(graph.unit(inventory).task("war").unwrap().classpath().excludes().is_empty());
  assert!(descriptor(&graph).is_empty());
  assert!(graph.units().all(|unit| unit.phase() != Phase::Settled));
}

#[test]
fn runtime_dependencies_move_from_war_to_ear() {
  let (mut graph, ids) = shop(&["inventory", "billing"]);
  let (root, inventory, billing) = (graph.root(), ids[0], ids[1]);

  let mut pass = ConfigurationPass::new();
  pass.configure(root, apply_ear);
  for (unit, deps) in [(inventory, vec!["money", "stock"]), (billing, vec!["money", "tax"])] {
    pass.configure(unit, move |graph, unit| {
      apply_war(graph, unit)?;
      let runtime = graph.unit_mut(unit).configuration_mut("runtime")?;
      for dep in deps {
        runtime.add_dependency(coordinate(dep))?;
      }
      Ok(())
    });
  }
  pass.run(&mut graph).unwrap();

  assert_eq!(war_classpath(&graph, inventory), BTreeSet::from([classes("inventory")]));
  assert_eq!(war_classpath(&graph, billing), BTreeSet::from([classes("billing")]));
  assert_eq!(
    declared_content(&graph, root, "earlib").unwrap(),
    BTreeSet::from([jar("money"), jar("stock"), jar("tax")])
  );
  assert_eq!(
    graph.unit(root).configuration("earlib").unwrap().dependencies(),
    [
      Dependency::project(graph.unit(inventory).path().clone(), "runtime"),
      Dependency::project(graph.unit(billing).path().clone(), "runtime"),
    ]
  );
  assert_eq!(descriptor(&graph).web_modules().len(), 2);
}

#[test]
fn context_root_written_after_settle_fails_the_pass() {
  let (mut graph, ids) = shop(&["billing"]);
  let (root, billing) = (graph.root(), ids[0]);
  graph.evaluation_depends_on_children(root);

  let mut pass = ConfigurationPass::new();
  pass.configure(billing, apply_war).configure(root, move |graph, unit| {
    apply_ear(graph, unit)?;
    after_unit_settles(graph, unit, move |graph| {
      graph.unit_mut(billing).set_context_root("/too-late")
    })
  });
  let err = pass.run(&mut graph).unwrap_err();

  assert!(matches!(err, WiringError::LateConfiguration { property: "context_root", .. }));
  assert_eq!(descriptor(&graph).context_root("billing.war"), Some("billing"));
}

/// A plugin that claims the `ear` capability but builds no package.
struct BareEar;

impl Plugin for BareEar {
  fn capability(&self) -> CapabilityId {
    CapabilityId::new("ear")
  }

  fn is_applied(&self, unit: &BuildUnit) -> bool {
    unit.has_capability(&self.capability())
  }

  fn apply(&self, _graph: &mut BuildGraph, _unit: UnitId) -> Result<(), WiringError> {
    Ok(())
  }
}

#[test]
fn ear_plugin_after_foreign_ear_capability_is_rejected() {
  let (mut graph, ids) = shop(&["inventory"]);
  let (root, inventory) = (graph.root(), ids[0]);

  let mut pass = ConfigurationPass::new();
  pass
    .configure(root, |graph, unit| {
      apply_plugin(graph, unit, &BareEar)?;
      apply_ear(graph, unit)
    })
    .configure(inventory, apply_war);
  let err = pass.run(&mut graph).unwrap_err();

  assert!(matches!(err, WiringError::CapabilityConflict { ref capability, .. } if capability == "ear"));
  assert_eq!(earlib_edges(&graph, inventory), 0);
}
