use earwire_lib::{BuildGraph, ConfigurationPass, WiringState};

use super::common::{apply_ear, apply_war, classes, coordinate, descriptor, earlib_edges, shop, war_classpath};

#[test]
fn module_evaluated_before_package_is_still_wired() {
  let (mut graph, ids) = shop(&["inventory"]);
  let (root, inventory) = (graph.root(), ids[0]);
  graph.evaluation_depends_on_children(root);

  let mut pass = ConfigurationPass::new();
  pass
    .configure(inventory, |graph, unit| {
      apply_war(graph, unit)?;
      graph
        .unit_mut(unit)
        .configuration_mut("runtime")?
        .add_dependency(coordinate("stock"))?;
      Ok(())
    })
    .configure(root, apply_ear);
  pass.run(&mut graph).unwrap();

  assert_eq!(descriptor(&graph).context_root("inventory.war"), Some("inventory"));
  assert_eq!(earlib_edges(&graph, inventory), 1);
  assert_eq!(war_classpath(&graph, inventory).into_iter().collect::<Vec<_>>(), vec![classes("inventory")]);
}

#[test]
fn package_can_set_module_context_root_before_module_settles() {
  let (mut graph, ids) = shop(&["billing"]);
  let (root, billing) = (graph.root(), ids[0]);
  graph.evaluation_depends_on_children(root);

  let mut pass = ConfigurationPass::new();
  pass.configure(billing, apply_war).configure(root, move |graph, unit| {
    apply_ear(graph, unit)?;
    graph.unit_mut(billing).set_context_root("/pay")
  });
  pass.run(&mut graph).unwrap();

  assert_eq!(descriptor(&graph).context_root("billing.war"), Some("/pay"));
}

#[test]
fn repeated_attachment_keeps_a_single_edge() {
  let (mut graph, ids) = shop(&["inventory", "billing"]);
  let root = graph.root();

  let mut pass = ConfigurationPass::new();
  pass.configure(root, |graph, unit| {
    apply_ear(graph, unit)?;
    apply_ear(graph, unit)?;
    apply_ear(graph, unit)
  });
  for &module in &ids {
    pass.configure(module, apply_war);
  }
  pass.run(&mut graph).unwrap();

  for &module in &ids {
    assert_eq!(earlib_edges(&graph, module), 1);
  }
  assert_eq!(descriptor(&graph).web_modules().len(), 2);
}

#[test]
fn nested_modules_wire_into_the_root_package() {
  let mut graph = BuildGraph::with_root_dir("shop", "/work/shop");
  let root = graph.root();
  let apps = graph.add_unit("apps").unwrap();
  let billing = graph.add_child(apps, "billing").unwrap();

  let mut pass = ConfigurationPass::new();
  pass.configure(root, apply_ear).configure(billing, apply_war);
  pass.run(&mut graph).unwrap();

  assert_eq!(graph.unit(billing).path().as_str(), ":apps:billing");
  assert_eq!(earlib_edges(&graph, billing), 1);
  assert_eq!(descriptor(&graph).context_root("billing.war"), Some("billing"));
  assert!(graph.unit(apps).ear().is_err());
}

#[test]
fn package_without_modules_has_empty_descriptor() {
  let (mut graph, _) = shop(&[]);
  let root = graph.root();

  let mut pass = ConfigurationPass::new();
  pass.configure(root, apply_ear);
  pass.run(&mut graph).unwrap();

  assert!(descriptor(&graph).is_empty());
  assert!(graph.unit(root).configuration("earlib").unwrap().dependencies().is_empty());
}

#[test]
fn every_module_reaches_descriptor_bound() {
  let (mut graph, ids) = shop(&["a", "b", "c"]);
  let root = graph.root();
  graph.evaluation_depends_on(ids[0], ids[2]);

  let mut pass = ConfigurationPass::new();
  pass.configure(root, apply_ear);
  for &module in &ids {
    pass.configure(module, apply_war);
  }
  pass.run(&mut graph).unwrap();

  for &module in &ids {
    assert_eq!(
      graph.unit(module).web_module().unwrap().wiring_state(),
      WiringState::DescriptorBound
    );
  }
  assert_eq!(
    descriptor(&graph).web_modules().keys().collect::<Vec<_>>(),
    vec!["a.war", "b.war", "c.war"]
  );
}
