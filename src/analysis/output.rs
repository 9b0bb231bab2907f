//! Report writers for the analyze and deconstruct phases

use crate::analysis::batch::{batch_count, partition};
use crate::analysis::graph::CorrGraph;
use crate::analysis::pipeline::{AnalysisConfig, AnalysisResult, CycleOutcome};
use crate::csv_reader::CsvData;
use crate::error::Result;
use petgraph::visit::EdgeRef;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Write `summary.txt` - human-readable overview
///
/// # Errors
/// Returns error if file cannot be written
pub fn write_summary(output_dir: &Path, content: &str) -> Result<()> {
    let path = output_dir.join("summary.txt");
    fs::write(path, content)?;
    Ok(())
}

/// Build the text summary of one analysis run
#[must_use]
pub fn build_summary(
    csv_path: &Path,
    csv: &CsvData,
    result: &AnalysisResult,
    config: &AnalysisConfig,
) -> String {
    use std::fmt::Write as _;

    let mut s = format!(
        "Input: {} ({} rows x {} columns)\n",
        csv_path.display(),
        csv.row_count(),
        csv.col_count()
    );
    let _ = writeln!(s, "Features correlated: {}", result.correlation.names.join(", "));
    if !result.correlation.undefined.is_empty() {
        let pairs: Vec<String> = result
            .correlation
            .undefined
            .iter()
            .map(|(a, b)| format!("{a}-{b}"))
            .collect();
        let _ = writeln!(s, "Undefined correlations (zero variance): {}", pairs.join(", "));
    }
    let _ = writeln!(s, "Sigma threshold: {:.4}", result.pruned.sigma);
    let _ = writeln!(
        s,
        "Graph: {} nodes, {} edges, {} components",
        result.graph.node_count(),
        result.graph.edge_count(),
        result.graph.components()
    );
    let _ = writeln!(s, "Cycle basis size: {}", result.basis.total);

    if result.basis.total == 0 {
        s.push_str("No cycles found\n");
        return s;
    }

    let _ = writeln!(
        s,
        "Cycles of at least {} nodes, batched at {} per figure:",
        config.min_cycle_size, config.max_cycles_per_figure
    );
    for (size, cycles) in &result.basis.by_size {
        let _ = writeln!(
            s,
            "  size {}: {} cycles in {} batches",
            size,
            cycles.len(),
            batch_count(cycles.len(), config.max_cycles_per_figure)
        );
    }

    s
}

/// Write `cycles.csv` - one row per surviving basis cycle
///
/// # Errors
/// Returns error if file cannot be written
pub fn write_cycles_csv(output_dir: &Path, result: &AnalysisResult) -> Result<()> {
    use std::fmt::Write as _;

    let path = output_dir.join("cycles.csv");
    let mut content = String::from("size,nodes\n");

    for cycle in result.basis.iter() {
        let _ = writeln!(content, "{},\"{}\"", cycle.len(), cycle.display());
    }

    fs::write(path, content)?;
    Ok(())
}

/// Write `graph.json` - machine-readable graph and cycle report
///
/// # Errors
/// Returns error if serialization or write fails
pub fn write_graph_json(
    output_dir: &Path,
    result: &AnalysisResult,
    config: &AnalysisConfig,
) -> Result<()> {
    let path = output_dir.join("graph.json");

    let edges = edge_entries(&result.graph);
    let nodes: Vec<String> = result
        .graph
        .graph
        .node_indices()
        .map(|idx| result.graph.name(idx).to_string())
        .collect();

    let groups: Vec<_> = result
        .basis
        .by_size
        .iter()
        .map(|(&size, cycles)| {
            let batches: Vec<Vec<Vec<String>>> =
                partition(cycles, config.max_cycles_per_figure)
                    .into_iter()
                    .map(|batch| batch.iter().map(|c| c.nodes.clone()).collect())
                    .collect();
            CycleGroupEntry {
                size,
                count: cycles.len(),
                batch_count: batches.len(),
                batches,
            }
        })
        .collect();

    let output = GraphOutput {
        sigma: result.pruned.sigma,
        node_count: result.graph.node_count(),
        edge_count: result.graph.edge_count(),
        components: result.graph.components(),
        nodes,
        edges,
        total_cycles: result.basis.total,
        min_cycle_size: config.min_cycle_size,
        max_cycles_per_figure: config.max_cycles_per_figure,
        cycles_by_size: groups,
    };

    let json = serde_json::to_string_pretty(&output)?;
    fs::write(path, json)?;
    Ok(())
}

/// Write `trees.json` - per-cycle deconstruction results
///
/// # Errors
/// Returns error if serialization or write fails
pub fn write_trees_json(
    output_dir: &Path,
    outcomes: &[CycleOutcome],
    input: &str,
    output: &str,
) -> Result<()> {
    let path = output_dir.join("trees.json");

    let entries: Vec<_> = outcomes
        .iter()
        .map(|outcome| {
            let (path_count, edges, node_mapping) = match &outcome.deconstruction {
                Some(d) => {
                    let mut mapping: Vec<MappingEntry> = d
                        .mapping
                        .iter()
                        .map(|((feature, branch), label)| MappingEntry {
                            feature: feature.clone(),
                            branch: *branch,
                            label: label.clone(),
                        })
                        .collect();
                    mapping.sort_by(|x, y| (&x.feature, x.branch).cmp(&(&y.feature, y.branch)));

                    (
                        Some(d.path_count),
                        d.tree
                            .edge_list()
                            .into_iter()
                            .map(|(from, to, weight)| TreeEdgeEntry { from, to, weight })
                            .collect(),
                        mapping,
                    )
                }
                None => (None, Vec::new(), Vec::new()),
            };

            TreeEntry {
                cycle: outcome.cycle.nodes.clone(),
                note: outcome.note.clone(),
                path_count,
                edges,
                node_mapping,
            }
        })
        .collect();

    let report = TreesOutput {
        input: input.to_string(),
        output: output.to_string(),
        trees: entries,
    };

    let json = serde_json::to_string_pretty(&report)?;
    fs::write(path, json)?;
    Ok(())
}

fn edge_entries(graph: &CorrGraph) -> Vec<EdgeEntry> {
    graph
        .graph
        .edge_references()
        .map(|e| EdgeEntry {
            source: graph.name(e.source()).to_string(),
            target: graph.name(e.target()).to_string(),
            weight: *e.weight(),
        })
        .collect()
}

// JSON output structures

#[derive(Serialize)]
struct GraphOutput {
    sigma: f64,
    node_count: usize,
    edge_count: usize,
    components: usize,
    nodes: Vec<String>,
    edges: Vec<EdgeEntry>,
    total_cycles: usize,
    min_cycle_size: usize,
    max_cycles_per_figure: usize,
    cycles_by_size: Vec<CycleGroupEntry>,
}

#[derive(Serialize)]
struct EdgeEntry {
    source: String,
    target: String,
    weight: f64,
}

#[derive(Serialize)]
struct CycleGroupEntry {
    size: usize,
    count: usize,
    batch_count: usize,
    /// Cycle node lists grouped into per-figure batches
    batches: Vec<Vec<Vec<String>>>,
}

#[derive(Serialize)]
struct TreesOutput {
    input: String,
    output: String,
    trees: Vec<TreeEntry>,
}

#[derive(Serialize)]
struct TreeEntry {
    cycle: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path_count: Option<usize>,
    edges: Vec<TreeEdgeEntry>,
    node_mapping: Vec<MappingEntry>,
}

#[derive(Serialize)]
struct TreeEdgeEntry {
    from: String,
    to: String,
    weight: f64,
}

#[derive(Serialize)]
struct MappingEntry {
    feature: String,
    branch: usize,
    label: String,
}
