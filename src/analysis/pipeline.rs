//! Orchestration of the correlation -> graph -> cycles flow

use crate::analysis::basis::{cycle_basis, Cycle, CycleBasis};
use crate::analysis::correlation::{correlation_matrix, CorrelationMatrix};
use crate::analysis::features::FeatureMatrix;
use crate::analysis::graph::CorrGraph;
use crate::analysis::prune::{prune, PrunedMatrix};
use crate::analysis::tree::{deconstruct, Deconstruction};
use crate::error::{KnotError, Result};

/// Configuration for the analysis pipeline
pub struct AnalysisConfig {
    /// Cycles with fewer nodes are dropped from the grouping
    pub min_cycle_size: usize,
    /// Renderer boundary: cycles per figure batch
    pub max_cycles_per_figure: usize,
}

/// Everything derived from one input table
pub struct AnalysisResult {
    pub correlation: CorrelationMatrix,
    pub pruned: PrunedMatrix,
    pub graph: CorrGraph,
    pub basis: CycleBasis,
}

/// Run the correlation -> prune -> graph -> cycle basis pipeline.
///
/// Table-level failures are fatal; zero-variance pairs are logged per pair
/// and treated as absent edges.
///
/// # Errors
/// Returns error if the correlation matrix cannot be computed at all.
pub fn run_pipeline(features: &FeatureMatrix, config: &AnalysisConfig) -> Result<AnalysisResult> {
    let correlation = correlation_matrix(features)?;
    for (a, b) in &correlation.undefined {
        let warn = KnotError::UndefinedCorrelation {
            a: a.clone(),
            b: b.clone(),
        };
        eprintln!("Warning: {warn}");
    }

    let pruned = prune(&correlation);
    let graph = CorrGraph::from_pruned(&pruned);
    let basis = cycle_basis(&graph, config.min_cycle_size);

    if basis.total == 0 {
        eprintln!("No cycles found");
    }

    Ok(AnalysisResult {
        correlation,
        pruned,
        graph,
        basis,
    })
}

/// Per-cycle deconstruction outcome: a failure never aborts sibling cycles
pub struct CycleOutcome {
    pub cycle: Cycle,
    /// `None` when the cycle was skipped (endpoint missing)
    pub deconstruction: Option<Deconstruction>,
    /// Diagnostic note for skipped or empty-leaf cycles
    pub note: Option<String>,
}

/// Deconstruct every surviving cycle toward the given IN/OUT endpoints.
///
/// Cycles missing an endpoint are skipped with a warning naming the endpoint
/// and the cycle contents; cycles with no IN->OUT path keep their empty-leaf
/// tree and are flagged. Processing always continues with the next cycle.
#[must_use]
pub fn deconstruct_all(result: &AnalysisResult, input: &str, output: &str) -> Vec<CycleOutcome> {
    result
        .basis
        .iter()
        .map(|cycle| {
            match deconstruct(cycle, &result.graph, input, output, &result.pruned) {
                Ok(d) => {
                    let note = if d.path_count == 0 {
                        let warn = KnotError::NoPathBetweenEndpoints {
                            input: input.to_string(),
                            output: output.to_string(),
                        };
                        eprintln!("Warning: cycle [{}]: {warn}", cycle.display());
                        Some(warn.to_string())
                    } else {
                        None
                    };
                    CycleOutcome {
                        cycle: cycle.clone(),
                        deconstruction: Some(d),
                        note,
                    }
                }
                Err(e) => {
                    eprintln!("Warning: skipping cycle [{}]: {e}", cycle.display());
                    CycleOutcome {
                        cycle: cycle.clone(),
                        deconstruction: None,
                        note: Some(e.to_string()),
                    }
                }
            }
        })
        .collect()
}
