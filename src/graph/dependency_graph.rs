//! Dependency graph over catalog features.
//!
//! The graph is an adjacency structure keyed by [`FeatureId`]: an edge
//! `from -> to` means `from` depends on `to`, so `to` must appear before
//! `from` in a composed Dockerfile. It is built from a snapshot of stored
//! features and provides the traversals the validator and composer need:
//! reachability, transitive closure, deterministic topological ordering and
//! whole-graph cycle detection.

use petgraph::Direction;
use petgraph::algo::has_path_connecting;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::{BTreeSet, HashMap};

use crate::core::{Feature, FeatureId};

/// Color states for cycle detection using DFS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Node has not been visited.
    White,
    /// Node is currently on the DFS stack.
    Gray,
    /// Node and all its dependencies have been visited.
    Black,
}

/// Directed dependency graph over feature identifiers.
#[derive(Debug, Default)]
pub struct FeatureGraph {
    /// The underlying directed graph.
    graph: DiGraph<FeatureId, ()>,
    /// Map from feature ids to their graph indices.
    node_map: HashMap<FeatureId, NodeIndex>,
    /// Feature names, used for ordering ties and messages.
    names: HashMap<FeatureId, String>,
    /// Edges whose target is not a known feature.
    dangling: Vec<(FeatureId, FeatureId)>,
}

impl FeatureGraph {
    /// Create a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from a snapshot of stored features.
    ///
    /// Unsaved features are skipped. Dependency ids that do not match any
    /// feature in the snapshot are recorded as dangling instead of becoming
    /// nodes.
    pub fn from_features<'a, I>(features: I) -> Self
    where
        I: IntoIterator<Item = &'a Feature>,
    {
        let features: Vec<&Feature> = features.into_iter().filter(|f| f.id.is_some()).collect();
        let mut graph = Self::new();

        for feature in &features {
            if let Some(id) = feature.id {
                graph.add_feature(id, &feature.name);
            }
        }

        for feature in &features {
            let Some(id) = feature.id else {
                continue;
            };
            for &dependency in &feature.dependencies {
                if graph.node_map.contains_key(&dependency) {
                    graph.add_dependency(id, dependency);
                } else {
                    graph.dangling.push((id, dependency));
                }
            }
        }

        graph
    }

    /// Add a node for a feature if it doesn't already exist.
    pub fn add_feature(&mut self, id: FeatureId, name: &str) -> NodeIndex {
        self.names.insert(id, name.to_string());
        self.ensure_node(id)
    }

    fn ensure_node(&mut self, id: FeatureId) -> NodeIndex {
        if let Some(&index) = self.node_map.get(&id) {
            index
        } else {
            let index = self.graph.add_node(id);
            self.node_map.insert(id, index);
            index
        }
    }

    /// Add a dependency relationship: `from` depends on `to`.
    pub fn add_dependency(&mut self, from: FeatureId, to: FeatureId) {
        let from_idx = self.ensure_node(from);
        let to_idx = self.ensure_node(to);

        if !self.graph.contains_edge(from_idx, to_idx) {
            self.graph.add_edge(from_idx, to_idx, ());
        }
    }

    /// Name of a feature in the graph, falling back to its id.
    #[must_use]
    pub fn name(&self, id: FeatureId) -> String {
        self.names.get(&id).cloned().unwrap_or_else(|| id.to_string())
    }

    /// Returns `true` if `target` is `from` or reachable from `from`.
    #[must_use]
    pub fn reaches(&self, from: FeatureId, target: FeatureId) -> bool {
        if from == target {
            return true;
        }
        match (self.node_map.get(&from), self.node_map.get(&target)) {
            (Some(&from_idx), Some(&target_idx)) => {
                has_path_connecting(&self.graph, from_idx, target_idx, None)
            }
            _ => false,
        }
    }

    /// All features reachable from `roots`, roots included.
    ///
    /// A single DFS visitor is shared across roots, so every feature is
    /// visited once no matter how many paths lead to it.
    pub fn closure<I>(&self, roots: I) -> BTreeSet<FeatureId>
    where
        I: IntoIterator<Item = FeatureId>,
    {
        let mut visited = BTreeSet::new();
        let mut dfs: Option<Dfs<NodeIndex, _>> = None;

        for root in roots {
            let Some(&start) = self.node_map.get(&root) else {
                continue;
            };
            let walker = dfs.get_or_insert_with(|| Dfs::new(&self.graph, start));
            walker.move_to(start);
            while let Some(index) = walker.next(&self.graph) {
                visited.insert(self.graph[index]);
            }
        }

        visited
    }

    /// Order `subset` so every feature comes after all of its dependencies.
    ///
    /// Dependencies outside `subset` are ignored. Among features that are
    /// ready at the same time the lexicographically smallest name goes first
    /// (then the smallest id), which makes the order independent of how the
    /// subset was requested.
    ///
    /// # Errors
    ///
    /// Returns the features that could not be ordered when `subset` contains
    /// a cycle.
    pub fn topological_order(
        &self,
        subset: &BTreeSet<FeatureId>,
    ) -> Result<Vec<FeatureId>, Vec<FeatureId>> {
        let mut pending: HashMap<FeatureId, usize> = HashMap::new();
        let mut ready: BTreeSet<(String, FeatureId)> = BTreeSet::new();

        for &id in subset {
            let count = self
                .node_map
                .get(&id)
                .map(|&index| {
                    self.graph
                        .neighbors_directed(index, Direction::Outgoing)
                        .filter(|dep| subset.contains(&self.graph[*dep]))
                        .count()
                })
                .unwrap_or(0);
            if count == 0 {
                ready.insert((self.name(id), id));
            } else {
                pending.insert(id, count);
            }
        }

        let mut order = Vec::with_capacity(subset.len());
        while let Some((_, id)) = ready.pop_first() {
            order.push(id);
            let Some(&index) = self.node_map.get(&id) else {
                continue;
            };
            for dependent in self.graph.neighbors_directed(index, Direction::Incoming) {
                let dependent_id = self.graph[dependent];
                if let Some(count) = pending.get_mut(&dependent_id) {
                    *count -= 1;
                    if *count == 0 {
                        pending.remove(&dependent_id);
                        ready.insert((self.name(dependent_id), dependent_id));
                    }
                }
            }
        }

        if pending.is_empty() {
            Ok(order)
        } else {
            let mut stuck: Vec<FeatureId> = pending.into_keys().collect();
            stuck.sort_unstable();
            Err(stuck)
        }
    }

    /// Detect a cycle anywhere in the graph using DFS with colors.
    ///
    /// Returns the names along the first cycle found, with the starting
    /// feature repeated at the end, or `None` if the graph is acyclic.
    #[must_use]
    pub fn detect_cycles(&self) -> Option<Vec<String>> {
        let mut colors: HashMap<NodeIndex, Color> =
            self.graph.node_indices().map(|node| (node, Color::White)).collect();
        let mut path: Vec<NodeIndex> = Vec::new();

        // Visit roots in id order so the reported cycle is stable
        let mut roots: Vec<NodeIndex> = self.graph.node_indices().collect();
        roots.sort_by_key(|index| self.graph[*index]);

        for node in roots {
            if matches!(colors.get(&node), Some(Color::White))
                && let Some(cycle) = self.dfs_visit(node, &mut colors, &mut path)
            {
                return Some(cycle.into_iter().map(|index| self.name(self.graph[index])).collect());
            }
        }

        None
    }

    fn dfs_visit(
        &self,
        node: NodeIndex,
        colors: &mut HashMap<NodeIndex, Color>,
        path: &mut Vec<NodeIndex>,
    ) -> Option<Vec<NodeIndex>> {
        colors.insert(node, Color::Gray);
        path.push(node);

        for neighbor in self.graph.neighbors(node) {
            match colors.get(&neighbor) {
                Some(Color::Gray) => {
                    let start = path.iter().position(|n| *n == neighbor).unwrap_or(0);
                    let mut cycle = path[start..].to_vec();
                    cycle.push(neighbor);
                    return Some(cycle);
                }
                Some(Color::White) => {
                    if let Some(cycle) = self.dfs_visit(neighbor, colors, path) {
                        return Some(cycle);
                    }
                }
                _ => {}
            }
        }

        path.pop();
        colors.insert(node, Color::Black);
        None
    }

    /// Edges pointing at features missing from the snapshot.
    #[must_use]
    pub fn dangling(&self) -> &[(FeatureId, FeatureId)] {
        &self.dangling
    }

    #[cfg(any(test, feature = "test-utils"))]
    /// Get the total number of features in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[cfg(any(test, feature = "test-utils"))]
    /// Get the total number of dependency edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
