//! Dependency graph shared by the registry and the loader.

use super::{AgentId, DependencyCycleError};
use std::collections::{BTreeMap, BTreeSet};

/// Directed graph of `agent -> dependencies` edges.
///
/// The graph keeps a reverse index so dependents can be looked up without
/// scanning. Ordered collections make every traversal reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    dependencies: BTreeMap<AgentId, BTreeSet<AgentId>>,
    dependents: BTreeMap<AgentId, BTreeSet<AgentId>>,
}

impl DependencyGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether `node` is in the graph.
    #[must_use]
    pub fn contains(&self, node: &AgentId) -> bool {
        self.dependencies.contains_key(node)
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    /// Returns whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// Inserts `node` with its dependency edges, replacing any previous
    /// edges of `node`.
    pub fn insert(&mut self, node: AgentId, edges: impl IntoIterator<Item = AgentId>) {
        self.remove_edges(&node);
        let dependencies: BTreeSet<AgentId> = edges.into_iter().collect();
        for dependency in &dependencies {
            self.dependents
                .entry(dependency.clone())
                .or_default()
                .insert(node.clone());
        }
        self.dependencies.insert(node, dependencies);
    }

    /// Removes `node` and its outgoing edges.
    ///
    /// Incoming edges from dependents are left in place; callers remove
    /// dependents first.
    pub fn remove(&mut self, node: &AgentId) {
        self.remove_edges(node);
        self.dependencies.remove(node);
    }

    /// Returns the direct dependencies of `node`.
    #[must_use]
    pub fn dependencies(&self, node: &AgentId) -> BTreeSet<AgentId> {
        self.dependencies.get(node).cloned().unwrap_or_default()
    }

    /// Returns the direct dependents of `node`.
    #[must_use]
    pub fn dependents(&self, node: &AgentId) -> BTreeSet<AgentId> {
        self.dependents.get(node).cloned().unwrap_or_default()
    }

    /// Returns whether giving `node` the edges `dependencies` would close a
    /// cycle.
    ///
    /// A cycle exists when `node` is reachable from any of the proposed
    /// dependencies through the edges already in the graph.
    #[must_use]
    pub fn would_create_cycle<'a>(
        &self,
        node: &AgentId,
        dependencies: impl IntoIterator<Item = &'a AgentId>,
    ) -> bool {
        let mut visited = BTreeSet::new();
        let mut stack: Vec<&AgentId> = dependencies.into_iter().collect();
        while let Some(current) = stack.pop() {
            if current == node {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(next) = self.dependencies.get(current) {
                stack.extend(next.iter().filter(|candidate| !visited.contains(candidate)));
            }
        }
        false
    }

    /// Orders `nodes` so every dependency precedes its dependents.
    ///
    /// Only edges between members of `nodes` are considered; members that
    /// are not in the graph are isolated. Ties are broken by ascending
    /// identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyCycleError`] naming the nodes left unordered when
    /// the edges among `nodes` contain a cycle.
    pub fn topological_order(
        &self,
        nodes: &BTreeSet<AgentId>,
    ) -> Result<Vec<AgentId>, DependencyCycleError> {
        let mut remaining: BTreeMap<&AgentId, usize> = nodes
            .iter()
            .map(|node| {
                let in_set = self
                    .dependencies
                    .get(node)
                    .map_or(0, |deps| deps.iter().filter(|dep| nodes.contains(*dep)).count());
                (node, in_set)
            })
            .collect();

        let mut ready: BTreeSet<&AgentId> = remaining
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(node, _)| *node)
            .collect();
        let mut order = Vec::with_capacity(nodes.len());

        while let Some(node) = ready.pop_first() {
            remaining.remove(node);
            order.push(node.clone());
            let Some(dependents) = self.dependents.get(node) else {
                continue;
            };
            for dependent in dependents {
                if let Some(count) = remaining.get_mut(dependent) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        ready.insert(dependent);
                    }
                }
            }
        }

        if remaining.is_empty() {
            Ok(order)
        } else {
            Err(DependencyCycleError(
                remaining.into_keys().cloned().collect(),
            ))
        }
    }

    /// Returns `nodes` together with everything they transitively depend on.
    #[must_use]
    pub fn dependency_closure<'a>(
        &self,
        nodes: impl IntoIterator<Item = &'a AgentId>,
    ) -> BTreeSet<AgentId> {
        Self::closure(&self.dependencies, nodes)
    }

    /// Returns `nodes` together with everything that transitively depends
    /// on them.
    #[must_use]
    pub fn dependent_closure<'a>(
        &self,
        nodes: impl IntoIterator<Item = &'a AgentId>,
    ) -> BTreeSet<AgentId> {
        Self::closure(&self.dependents, nodes)
    }

    fn closure<'a>(
        edges: &BTreeMap<AgentId, BTreeSet<AgentId>>,
        nodes: impl IntoIterator<Item = &'a AgentId>,
    ) -> BTreeSet<AgentId> {
        let mut closure = BTreeSet::new();
        let mut stack: Vec<&AgentId> = nodes.into_iter().collect();
        while let Some(current) = stack.pop() {
            if !closure.insert(current.clone()) {
                continue;
            }
            if let Some(next) = edges.get(current) {
                stack.extend(next.iter());
            }
        }
        closure
    }

    fn remove_edges(&mut self, node: &AgentId) {
        let Some(previous) = self.dependencies.get(node) else {
            return;
        };
        for dependency in previous {
            if let Some(dependents) = self.dependents.get_mut(dependency) {
                dependents.remove(node);
                if dependents.is_empty() {
                    self.dependents.remove(dependency);
                }
            }
        }
    }
}
