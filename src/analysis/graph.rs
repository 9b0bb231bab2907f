//! Weighted undirected graph over the surviving correlations

use crate::analysis::prune::PrunedMatrix;
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::HashMap;

/// Correlation graph: nodes are features, edges are surviving correlations.
///
/// Features whose correlations were all pruned do not appear at all; an
/// isolated node can never belong to a cycle.
#[derive(Debug, Clone)]
pub struct CorrGraph {
    /// The underlying petgraph structure
    pub graph: UnGraph<String, f64>,
    /// Mapping from feature name to node index
    node_of: HashMap<String, NodeIndex>,
}

impl CorrGraph {
    /// Build the graph from a pruned correlation matrix.
    ///
    /// Each unordered feature pair is visited once (upper triangle); a
    /// nonzero pruned weight becomes exactly one edge.
    #[must_use]
    pub fn from_pruned(pruned: &PrunedMatrix) -> Self {
        let mut graph = UnGraph::new_undirected();
        let mut node_of: HashMap<String, NodeIndex> = HashMap::new();

        let n = pruned.names.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let weight = pruned.matrix[i][j];
                if weight == 0.0 {
                    continue;
                }

                let a = Self::intern(&mut graph, &mut node_of, &pruned.names[i]);
                let b = Self::intern(&mut graph, &mut node_of, &pruned.names[j]);
                graph.add_edge(a, b, weight);
            }
        }

        Self { graph, node_of }
    }

    fn intern(
        graph: &mut UnGraph<String, f64>,
        node_of: &mut HashMap<String, NodeIndex>,
        name: &str,
    ) -> NodeIndex {
        if let Some(&idx) = node_of.get(name) {
            return idx;
        }
        let idx = graph.add_node(name.to_string());
        node_of.insert(name.to_string(), idx);
        idx
    }

    /// Get the node index for a feature name
    #[must_use]
    pub fn node(&self, name: &str) -> Option<NodeIndex> {
        self.node_of.get(name).copied()
    }

    /// Get the feature name for a node index
    #[must_use]
    pub fn name(&self, idx: NodeIndex) -> &str {
        &self.graph[idx]
    }

    /// Edge weight between two named features, if the edge survived pruning
    #[must_use]
    pub fn edge_weight(&self, a: &str, b: &str) -> Option<f64> {
        let ia = self.node(a)?;
        let ib = self.node(b)?;
        let edge = self.graph.find_edge(ia, ib)?;
        self.graph.edge_weight(edge).copied()
    }

    /// Get the number of nodes
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the number of edges
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of connected components
    #[must_use]
    pub fn components(&self) -> usize {
        petgraph::algo::connected_components(&self.graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pruned_of(names: &[&str], entries: Vec<Vec<f64>>) -> PrunedMatrix {
        PrunedMatrix {
            names: names.iter().map(|s| (*s).to_string()).collect(),
            matrix: entries,
            sigma: 0.5,
        }
    }

    #[test]
    fn test_edges_from_upper_triangle() {
        let pruned = pruned_of(
            &["a", "b", "c"],
            vec![
                vec![1.0, 0.9, 0.0],
                vec![0.9, 1.0, 0.8],
                vec![0.0, 0.8, 1.0],
            ],
        );
        let graph = CorrGraph::from_pruned(&pruned);

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert!((graph.edge_weight("a", "b").expect("edge") - 0.9).abs() < 1e-10);
        assert!((graph.edge_weight("b", "c").expect("edge") - 0.8).abs() < 1e-10);
        assert!(graph.edge_weight("a", "c").is_none());
    }

    #[test]
    fn test_no_self_edges() {
        let pruned = pruned_of(
            &["a", "b"],
            vec![vec![1.0, 0.9], vec![0.9, 1.0]],
        );
        let graph = CorrGraph::from_pruned(&pruned);

        let a = graph.node("a").expect("node");
        assert!(graph.graph.find_edge(a, a).is_none());
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_isolated_features_absent() {
        let pruned = pruned_of(
            &["a", "b", "c"],
            vec![
                vec![1.0, 0.9, 0.0],
                vec![0.9, 1.0, 0.0],
                vec![0.0, 0.0, 1.0],
            ],
        );
        let graph = CorrGraph::from_pruned(&pruned);

        assert_eq!(graph.node_count(), 2);
        assert!(graph.node("c").is_none());
    }

    #[test]
    fn test_components() {
        let pruned = pruned_of(
            &["a", "b", "c", "d"],
            vec![
                vec![1.0, 0.9, 0.0, 0.0],
                vec![0.9, 1.0, 0.0, 0.0],
                vec![0.0, 0.0, 1.0, 0.7],
                vec![0.0, 0.0, 0.7, 1.0],
            ],
        );
        let graph = CorrGraph::from_pruned(&pruned);

        assert_eq!(graph.components(), 2);
    }
}
