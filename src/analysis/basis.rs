//! Cycle basis extraction over the correlation graph

use crate::analysis::graph::CorrGraph;
use petgraph::graph::NodeIndex;
use std::collections::{BTreeMap, HashMap, HashSet};

/// A simple closed walk: consecutive nodes (and last-to-first) are edges
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    pub nodes: Vec<String>,
}

impl Cycle {
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[allow(dead_code)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.iter().any(|n| n == name)
    }

    /// Render as `a -> b -> c`
    #[must_use]
    pub fn display(&self) -> String {
        self.nodes.join(" -> ")
    }
}

/// Cycle basis grouped by cycle size
#[derive(Debug, Clone)]
pub struct CycleBasis {
    /// Cycles of at least `min_cycle_size` nodes, keyed by node count
    pub by_size: BTreeMap<usize, Vec<Cycle>>,
    /// Total number of basis cycles before size filtering
    pub total: usize,
}

impl CycleBasis {
    /// Cycles surviving the size filter, in ascending size order
    pub fn iter(&self) -> impl Iterator<Item = &Cycle> {
        self.by_size.values().flatten()
    }

    /// Number of cycles surviving the size filter
    #[must_use]
    pub fn filtered_count(&self) -> usize {
        self.by_size.values().map(Vec::len).sum()
    }
}

/// Compute a cycle basis of the graph via a spanning-forest construction
/// (Paton's algorithm): every non-tree edge contributes one simple cycle.
///
/// The basis is not canonical, but its size always equals
/// `|E| - |V| + components`. Cycles shorter than `min_cycle_size` are
/// excluded from the grouping yet still counted in `total`. A graph with no
/// cycles yields an empty basis; that is a report, not an error.
#[must_use]
pub fn cycle_basis(corr_graph: &CorrGraph, min_cycle_size: usize) -> CycleBasis {
    let g = &corr_graph.graph;
    let mut cycles: Vec<Vec<NodeIndex>> = Vec::new();
    let mut assigned: HashSet<NodeIndex> = HashSet::new();

    for root in g.node_indices() {
        if assigned.contains(&root) {
            continue;
        }

        // Grow a spanning tree of this component with an explicit DFS stack.
        // `pred` holds tree parents; `used[n]` holds the neighbors of `n`
        // whose connecting edge has already been accounted for.
        let mut pred: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut used: HashMap<NodeIndex, HashSet<NodeIndex>> = HashMap::new();
        pred.insert(root, root);
        used.insert(root, HashSet::new());
        let mut stack = vec![root];

        while let Some(z) = stack.pop() {
            let z_used = used[&z].clone();
            for nbr in g.neighbors(z) {
                if !used.contains_key(&nbr) {
                    // Tree edge: first visit of nbr
                    pred.insert(nbr, z);
                    stack.push(nbr);
                    used.insert(nbr, HashSet::from([z]));
                } else if nbr != z && !z_used.contains(&nbr) {
                    // Non-tree edge: close a cycle through the tree path
                    let nbr_used = used[&nbr].clone();
                    let mut cycle = vec![nbr, z];
                    let mut p = pred[&z];
                    while !nbr_used.contains(&p) {
                        cycle.push(p);
                        p = pred[&p];
                    }
                    cycle.push(p);
                    cycles.push(cycle);
                    if let Some(accounted) = used.get_mut(&nbr) {
                        accounted.insert(z);
                    }
                }
            }
        }

        assigned.extend(pred.keys().copied());
    }

    let total = cycles.len();
    let mut by_size: BTreeMap<usize, Vec<Cycle>> = BTreeMap::new();
    for cycle in cycles {
        if cycle.len() < min_cycle_size {
            continue;
        }
        let named = Cycle {
            nodes: cycle
                .into_iter()
                .map(|idx| corr_graph.name(idx).to_string())
                .collect(),
        };
        by_size.entry(named.len()).or_default().push(named);
    }

    CycleBasis { by_size, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::prune::PrunedMatrix;

    fn graph_of(names: &[&str], edges: &[(usize, usize, f64)]) -> CorrGraph {
        let n = names.len();
        let mut matrix = vec![vec![0.0; n]; n];
        for i in 0..n {
            matrix[i][i] = 1.0;
        }
        for &(i, j, w) in edges {
            matrix[i][j] = w;
            matrix[j][i] = w;
        }
        CorrGraph::from_pruned(&PrunedMatrix {
            names: names.iter().map(|s| (*s).to_string()).collect(),
            matrix,
            sigma: 0.5,
        })
    }

    fn assert_simple_closed_walk(cycle: &Cycle, graph: &CorrGraph) {
        let k = cycle.len();
        let unique: HashSet<&String> = cycle.nodes.iter().collect();
        assert_eq!(unique.len(), k, "repeated node in {:?}", cycle.nodes);
        for i in 0..k {
            let a = &cycle.nodes[i];
            let b = &cycle.nodes[(i + 1) % k];
            assert!(
                graph.edge_weight(a, b).is_some(),
                "missing edge {a}-{b} in {:?}",
                cycle.nodes
            );
        }
    }

    #[test]
    fn test_square_cycle() {
        let graph = graph_of(
            &["a", "b", "c", "d"],
            &[(0, 1, 0.9), (1, 2, 0.8), (2, 3, 0.7), (3, 0, 0.6)],
        );
        let basis = cycle_basis(&graph, 3);

        assert_eq!(basis.total, 1);
        let cycles: Vec<_> = basis.iter().collect();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), 4);
        assert_simple_closed_walk(cycles[0], &graph);
    }

    #[test]
    fn test_acyclic_graph_empty_basis() {
        let graph = graph_of(&["a", "b", "c"], &[(0, 1, 0.9), (1, 2, 0.8)]);
        let basis = cycle_basis(&graph, 3);

        assert_eq!(basis.total, 0);
        assert!(basis.by_size.is_empty());
    }

    #[test]
    fn test_basis_size_formula() {
        // Square with a chord plus a disconnected triangle:
        // |E| - |V| + components = 8 - 7 + 2 = 3
        let graph = graph_of(
            &["a", "b", "c", "d", "x", "y", "z"],
            &[
                (0, 1, 0.9),
                (1, 2, 0.8),
                (2, 3, 0.7),
                (3, 0, 0.6),
                (0, 2, 0.9),
                (4, 5, 0.8),
                (5, 6, 0.7),
                (6, 4, 0.6),
            ],
        );
        let basis = cycle_basis(&graph, 3);

        assert_eq!(
            basis.total,
            graph.edge_count() - graph.node_count() + graph.components()
        );
        assert_eq!(basis.total, 3);
        for cycle in basis.iter() {
            assert_simple_closed_walk(cycle, &graph);
        }
    }

    #[test]
    fn test_min_size_filter_keeps_total() {
        let graph = graph_of(
            &["a", "b", "c", "d", "e"],
            &[
                (0, 1, 0.9),
                (1, 2, 0.8),
                (2, 0, 0.7),
                (1, 3, 0.9),
                (3, 4, 0.8),
                (4, 1, 0.7),
            ],
        );
        let basis = cycle_basis(&graph, 4);

        // Two triangles: both filtered out at min size 4, still counted
        assert_eq!(basis.total, 2);
        assert_eq!(basis.filtered_count(), 0);
    }

    #[test]
    fn test_grouping_by_size() {
        let graph = graph_of(
            &["a", "b", "c", "p", "q", "r", "s"],
            &[
                (0, 1, 0.9),
                (1, 2, 0.8),
                (2, 0, 0.7),
                (3, 4, 0.9),
                (4, 5, 0.8),
                (5, 6, 0.7),
                (6, 3, 0.6),
            ],
        );
        let basis = cycle_basis(&graph, 3);

        assert_eq!(basis.total, 2);
        assert_eq!(basis.by_size[&3].len(), 1);
        assert_eq!(basis.by_size[&4].len(), 1);
    }
}
