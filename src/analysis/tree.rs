//! Cycle deconstruction: fold all IN->OUT simple paths into a directed tree

use crate::analysis::basis::Cycle;
use crate::analysis::graph::CorrGraph;
use crate::analysis::prune::PrunedMatrix;
use crate::error::{KnotError, Result};
use petgraph::algo::{all_simple_paths, has_path_connecting};
use petgraph::graph::{DiGraph, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// Node identity inside a deconstructed tree.
///
/// Each duplicate is a distinct value carrying the canonical feature name,
/// so branches can never collide the way string-mangled aliases can. Every
/// OUT leaf past the first is a duplicate, as is any interior node a branch
/// re-enters against its established orientation. Branch 0's OUT keeps the
/// canonical `Feature` identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TreeNode {
    Feature(String),
    Branch { feature: String, branch: usize },
}

impl TreeNode {
    /// The canonical feature this node represents
    #[must_use]
    pub fn feature(&self) -> &str {
        match self {
            Self::Feature(name) => name,
            Self::Branch { feature, .. } => feature,
        }
    }

    /// Rendering label: canonical name, or a branch-suffixed variant
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Feature(name) => name.clone(),
            Self::Branch { feature, branch } => format!("{feature}#{branch}"),
        }
    }
}

/// Relation from (feature, branch index) to the rendering label of that
/// branch's duplicate of the feature. Used only by renderers to recover the
/// canonical name for display.
pub type NodeMapping = HashMap<(String, usize), String>;

/// Directed tree rooted at the IN feature, with one OUT duplicate per branch
#[derive(Debug, Clone)]
pub struct Tree {
    pub graph: DiGraph<TreeNode, f64>,
    pub root: NodeIndex,
}

impl Tree {
    /// Nodes with no outgoing edges
    #[allow(dead_code)]
    #[must_use]
    pub fn leaves(&self) -> Vec<&TreeNode> {
        self.graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .neighbors_directed(idx, petgraph::Direction::Outgoing)
                    .next()
                    .is_none()
            })
            .map(|idx| &self.graph[idx])
            .collect()
    }

    /// Edges as (source label, target label, weight), for reporting
    #[must_use]
    pub fn edge_list(&self) -> Vec<(String, String, f64)> {
        self.graph
            .edge_references()
            .map(|e| {
                (
                    self.graph[e.source()].label(),
                    self.graph[e.target()].label(),
                    *e.weight(),
                )
            })
            .collect()
    }
}

/// Result of deconstructing one cycle
#[derive(Debug, Clone)]
pub struct Deconstruction {
    pub tree: Tree,
    pub mapping: NodeMapping,
    /// Number of simple IN->OUT paths found (0 means an empty-leaf tree)
    pub path_count: usize,
}

/// Fold every simple IN->OUT path within the cycle's induced subgraph into a
/// directed tree rooted at IN.
///
/// Shared path prefixes coalesce into the same node chain; the edge adjacent
/// to OUT is redirected to a per-branch OUT duplicate. Chord-dense cycles can
/// send two paths over the same interior edge in opposite directions, so a
/// branch that would re-enter a node against its established orientation gets
/// a per-branch duplicate of that node instead, keeping the result acyclic.
/// A nonzero direct IN-OUT weight in the pruned matrix contributes one extra
/// branch carrying that weight, independent of the path-derived edges. Edge
/// weights are copied verbatim from the source graph.
///
/// # Errors
/// Returns `EndpointNotInCycle` when IN or OUT is not a member of the cycle.
/// A cycle with no IN->OUT path is not an error: the result has
/// `path_count == 0` and no OUT leaves, and the caller decides how to flag it.
pub fn deconstruct(
    cycle: &Cycle,
    graph: &CorrGraph,
    input: &str,
    output: &str,
    pruned: &PrunedMatrix,
) -> Result<Deconstruction> {
    if !cycle.contains(input) {
        return Err(KnotError::EndpointNotInCycle(input.to_string()));
    }
    if !cycle.contains(output) {
        return Err(KnotError::EndpointNotInCycle(output.to_string()));
    }

    // Induced subgraph on the cycle's nodes, using only original edges.
    // Chord edges between cycle members are kept, so path enumeration must
    // not assume exactly two paths.
    let mut sub: UnGraph<String, f64> = UnGraph::new_undirected();
    let mut sub_node: HashMap<&str, NodeIndex> = HashMap::new();
    for name in &cycle.nodes {
        let idx = sub.add_node(name.clone());
        sub_node.insert(name.as_str(), idx);
    }
    for (i, a) in cycle.nodes.iter().enumerate() {
        for b in cycle.nodes.iter().skip(i + 1) {
            if let Some(w) = graph.edge_weight(a, b) {
                sub.add_edge(sub_node[a.as_str()], sub_node[b.as_str()], w);
            }
        }
    }

    let from = sub_node[input];
    let to = sub_node[output];
    let paths: Vec<Vec<NodeIndex>> = all_simple_paths(&sub, from, to, 0, None).collect();

    let mut tree: DiGraph<TreeNode, f64> = DiGraph::new();
    let mut ids: HashMap<TreeNode, NodeIndex> = HashMap::new();
    let mut mapping: NodeMapping = HashMap::new();

    let root = intern(&mut tree, &mut ids, TreeNode::Feature(input.to_string()));

    for (branch, path) in paths.iter().enumerate() {
        let terminal = out_identity(output, branch);
        mapping.insert((output.to_string(), branch), terminal.label());

        let mut src = root;
        for pair in path.windows(2) {
            let b = &sub[pair[1]];
            let Some(weight) = sub
                .find_edge(pair[0], pair[1])
                .and_then(|e| sub.edge_weight(e).copied())
            else {
                continue;
            };

            let target = if b.as_str() == output {
                terminal.clone()
            } else {
                TreeNode::Feature(b.clone())
            };

            // Linking to a node that already reaches `src` would close a
            // directed loop; that branch gets its own duplicate instead.
            let dst = match ids.get(&target) {
                Some(&idx) if has_path_connecting(&tree, idx, src, None) => {
                    let dup = TreeNode::Branch {
                        feature: target.feature().to_string(),
                        branch,
                    };
                    mapping.insert((target.feature().to_string(), branch), dup.label());
                    intern(&mut tree, &mut ids, dup)
                }
                Some(&idx) => idx,
                None => intern(&mut tree, &mut ids, target),
            };

            if tree.find_edge(src, dst).is_none() {
                tree.add_edge(src, dst, weight);
            }
            src = dst;
        }
    }

    // The direct pairwise correlation, when it survived pruning, is its own
    // branch even if IN and OUT are not adjacent in the cycle.
    let direct = pruned.weight(input, output).unwrap_or(0.0);
    if direct != 0.0 {
        let branch = paths.len();
        let terminal = out_identity(output, branch);
        mapping.insert((output.to_string(), branch), terminal.label());
        let dst = intern(&mut tree, &mut ids, terminal);
        tree.add_edge(root, dst, direct);
    }

    Ok(Deconstruction {
        tree: Tree { graph: tree, root },
        mapping,
        path_count: paths.len(),
    })
}

fn out_identity(output: &str, branch: usize) -> TreeNode {
    if branch == 0 {
        TreeNode::Feature(output.to_string())
    } else {
        TreeNode::Branch {
            feature: output.to_string(),
            branch,
        }
    }
}

fn intern(
    tree: &mut DiGraph<TreeNode, f64>,
    ids: &mut HashMap<TreeNode, NodeIndex>,
    node: TreeNode,
) -> NodeIndex {
    if let Some(&idx) = ids.get(&node) {
        return idx;
    }
    let idx = tree.add_node(node.clone());
    ids.insert(node, idx);
    idx
}
