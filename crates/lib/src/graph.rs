//! The build graph: every unit of one build, addressed by id or path.
//!
//! The graph is an arena. Units refer to each other through [`UnitId`]s and
//! every cross-unit mutation goes through `&mut BuildGraph`, which keeps the
//! whole configuration pass on one logical thread.
//!
//! Evaluation order defaults to the root first, then every other unit in the
//! order it was added. [`BuildGraph::evaluation_depends_on`] adds explicit
//! ordering constraints on top of that.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::path::{Path, PathBuf};

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::debug;

use crate::error::WiringError;
use crate::unit::{BuildUnit, UnitId, UnitPath};

#[derive(Debug)]
pub struct BuildGraph {
  units: Vec<BuildUnit>,
  by_path: HashMap<UnitPath, UnitId>,
  /// `(before, after)` pairs: `before` is evaluated ahead of `after`.
  evaluation_edges: Vec<(UnitId, UnitId)>,
}

impl BuildGraph {
  /// Create a graph whose root unit is named `root_name` and lives in the
  /// current directory.
  pub fn new(root_name: &str) -> Self {
    Self::with_root_dir(root_name, ".")
  }

  pub fn with_root_dir(root_name: &str, root_dir: impl AsRef<Path>) -> Self {
    let root_id = UnitId(0);
    let root_path = UnitPath::root();
    let root = BuildUnit::new(root_id, None, root_path.clone(), root_name, root_dir.as_ref().to_path_buf());
    Self {
      units: vec![root],
      by_path: HashMap::from([(root_path, root_id)]),
      evaluation_edges: Vec::new(),
    }
  }

  pub fn root(&self) -> UnitId {
    UnitId(0)
  }

  /// Add a direct child of the root.
  pub fn add_unit(&mut self, name: &str) -> Result<UnitId, WiringError> {
    self.add_child(self.root(), name)
  }

  /// Add a unit below `parent`. Its directory is `name` inside the parent's.
  pub fn add_child(&mut self, parent: UnitId, name: &str) -> Result<UnitId, WiringError> {
    let parent_unit = self.unit(parent);
    let path = parent_unit.path().child(name)?;
    if self.by_path.contains_key(&path) {
      return Err(WiringError::DuplicateUnit(path));
    }
    let project_dir: PathBuf = parent_unit.project_dir().join(name);

    let id = UnitId(self.units.len());
    debug!(unit = %path, dir = %project_dir.display(), "registered unit");
    self.units.push(BuildUnit::new(id, Some(parent), path.clone(), name, project_dir));
    self.by_path.insert(path, id);
    Ok(id)
  }

  /// Look up a unit by path.
  pub fn find(&self, path: &UnitPath) -> Result<UnitId, WiringError> {
    self
      .by_path
      .get(path)
      .copied()
      .ok_or_else(|| WiringError::UnitNotFound(path.clone()))
  }

  /// Borrow a unit.
  ///
  /// # Panics
  ///
  /// Panics if `id` was handed out by a different `BuildGraph` with fewer
  /// units. Ids are only meaningful in the graph that created them.
  pub fn unit(&self, id: UnitId) -> &BuildUnit {
    &self.units[id.0]
  }

  /// Mutably borrow a unit.
  ///
  /// # Panics
  ///
  /// Same precondition as [`BuildGraph::unit`].
  pub fn unit_mut(&mut self, id: UnitId) -> &mut BuildUnit {
    &mut self.units[id.0]
  }

  pub fn units(&self) -> impl Iterator<Item = &BuildUnit> {
    self.units.iter()
  }

  pub fn children(&self, parent: UnitId) -> impl Iterator<Item = UnitId> + '_ {
    self
      .units
      .iter()
      .filter(move |unit| unit.parent() == Some(parent))
      .map(BuildUnit::id)
  }

  /// Require `dependency` to be evaluated before `unit`.
  pub fn evaluation_depends_on(&mut self, unit: UnitId, dependency: UnitId) {
    if !self.evaluation_edges.contains(&(dependency, unit)) {
      self.evaluation_edges.push((dependency, unit));
    }
  }

  /// Require every child of `unit` to be evaluated before it.
  pub fn evaluation_depends_on_children(&mut self, unit: UnitId) {
    let children: Vec<UnitId> = self.children(unit).collect();
    for child in children {
      self.evaluation_depends_on(unit, child);
    }
  }

  /// Order in which units are evaluated and settled.
  ///
  /// Among units with no ordering constraint between them, the one added
  /// earlier goes first, so the root leads unless told otherwise.
  ///
  /// # Errors
  ///
  /// Returns `EvaluationCycle` if the constraints form a cycle.
  pub fn evaluation_order(&self) -> Result<Vec<UnitId>, WiringError> {
    let mut graph: DiGraph<UnitId, ()> = DiGraph::with_capacity(self.units.len(), self.evaluation_edges.len());
    for unit in &self.units {
      graph.add_node(unit.id());
    }
    for (before, after) in &self.evaluation_edges {
      graph.add_edge(NodeIndex::new(before.0), NodeIndex::new(after.0), ());
    }

    toposort(&graph, None)
      .map_err(|cycle| WiringError::EvaluationCycle(self.unit(graph[cycle.node_id()]).path().clone()))?;

    // Kahn's algorithm with a min-heap keeps independent units in insertion order.
    let mut in_degree: Vec<usize> = graph
      .node_indices()
      .map(|idx| graph.neighbors_directed(idx, Direction::Incoming).count())
      .collect();
    let mut ready: BinaryHeap<Reverse<usize>> = in_degree
      .iter()
      .enumerate()
      .filter(|(_, degree)| **degree == 0)
      .map(|(idx, _)| Reverse(idx))
      .collect();

    let mut order = Vec::with_capacity(self.units.len());
    while let Some(Reverse(idx)) = ready.pop() {
      let node = NodeIndex::new(idx);
      order.push(graph[node]);
      for next in graph.neighbors_directed(node, Direction::Outgoing) {
        in_degree[next.index()] -= 1;
        if in_degree[next.index()] == 0 {
          ready.push(Reverse(next.index()));
        }
      }
    }

    Ok(order)
  }
}
