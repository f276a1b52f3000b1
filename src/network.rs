use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use petgraph::algo::{connected_components, tarjan_scc};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::loader::EdgeRecord;

/// Undirected simple interaction graph keyed by gene/protein identifier.
///
/// Nodes keep the order in which they first appeared in the edge list, which
/// fixes the iteration order of every later stage.
#[derive(Debug, Clone, Default)]
pub struct InteractionNetwork {
    graph: UnGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
    degrees: Vec<usize>,
}

impl InteractionNetwork {
    pub fn from_edges(edges: &[EdgeRecord]) -> Self {
        let mut graph = UnGraph::<String, ()>::default();
        let mut index: HashMap<String, NodeIndex> = HashMap::new();

        for edge in edges {
            let source = *index
                .entry(edge.source.clone())
                .or_insert_with(|| graph.add_node(edge.source.clone()));
            let target = *index
                .entry(edge.target.clone())
                .or_insert_with(|| graph.add_node(edge.target.clone()));

            if !graph.contains_edge(source, target) {
                graph.add_edge(source, target, ());
            }
        }

        Self::from_graph(graph)
    }

    fn from_graph(graph: UnGraph<String, ()>) -> Self {
        let index = graph
            .node_indices()
            .map(|node| (graph[node].clone(), node))
            .collect();

        // A self-loop touches its node twice.
        let mut degrees = vec![0; graph.node_count()];
        for edge in graph.edge_references() {
            degrees[edge.source().index()] += 1;
            degrees[edge.target().index()] += 1;
        }

        InteractionNetwork {
            graph,
            index,
            degrees,
        }
    }

    /// Restricts the network to its largest connected component. When two
    /// components have the same size the one holding the earliest inserted
    /// node wins.
    pub fn largest_component(&self) -> Self {
        let components: Vec<Vec<NodeIndex>> = tarjan_scc(&self.graph);
        let Some(largest) = components.into_iter().max_by_key(|component| {
            let first = component.iter().min().copied().unwrap_or_default();
            (component.len(), Reverse(first))
        }) else {
            return self.clone();
        };

        let keep: HashSet<NodeIndex> = largest.into_iter().collect();
        let graph = self.graph.filter_map(
            |node, name| keep.contains(&node).then(|| name.clone()),
            |_, _| Some(()),
        );
        Self::from_graph(graph)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// True for the empty graph and for a single component.
    pub fn is_connected(&self) -> bool {
        connected_components(&self.graph) <= 1
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn name(&self, node: NodeIndex) -> &str {
        &self.graph[node]
    }

    #[cfg(test)]
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.graph.node_weights().map(String::as_str)
    }

    pub fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(name).copied()
    }

    #[cfg(test)]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn degree(&self, node: NodeIndex) -> usize {
        self.degrees[node.index()]
    }

    /// Adjacent nodes, excluding the node itself when it carries a self-loop.
    pub fn neighbors(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph
            .neighbors(node)
            .filter(move |&other| other != node)
    }

    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
        self.graph
            .edge_references()
            .map(|edge| (edge.source(), edge.target()))
    }
}
