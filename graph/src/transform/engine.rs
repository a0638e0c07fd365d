use super::rules::transform_node;
use super::validate::{ValidationStage, validate_graph};
use crate::config::TransformConfig;
use crate::error::{FixpointNotReachedSnafu, Result};
use crate::factory::CallFactory;
use crate::merge::MergeGraph;
use crate::reporter::Reporter;

/// Outcome of [`normalize`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformSummary {
    /// Passes run, including the final pass that changed nothing.
    pub passes: usize,
    /// Rewrites applied across all passes.
    pub rewrites: usize,
    /// Nodes freed by garbage collection after the fixpoint.
    pub collected: usize,
    /// Live nodes once normalized.
    pub live_nodes: usize,
}

/// Offer every reachable node one rewrite, children first. Returns the number of rewrites.
///
/// The visiting order is computed up front; nodes freed by an earlier rewrite in the
/// same pass are skipped, and nodes created by it wait for the next pass.
pub fn transform_pass(graph: &mut MergeGraph, factory: &CallFactory, reporter: &mut Reporter) -> Result<usize> {
    let mut rewrites = 0;
    for id in graph.reachable_post_order() {
        if !graph.contains(id) {
            tracing::trace!(node.id = %id, "skipping node freed earlier in pass");
            continue;
        }
        if transform_node(graph, id, factory, reporter)? {
            rewrites += 1;
        }
    }
    Ok(rewrites)
}

/// Run passes until one changes nothing. Returns `(passes, rewrites)`.
pub fn transform_to_fixpoint(
    graph: &mut MergeGraph,
    factory: &CallFactory,
    reporter: &mut Reporter,
    max_passes: usize,
) -> Result<(usize, usize)> {
    let mut total = 0;
    for pass in 1..=max_passes {
        let rewrites = transform_pass(graph, factory, reporter)?;
        tracing::debug!(pass, rewrites, live = graph.len(), "transform pass complete");
        if rewrites == 0 {
            return Ok((pass, total));
        }
        total += rewrites;
    }
    tracing::warn!(max_passes, rewrites = total, "transform did not converge");
    FixpointNotReachedSnafu { max_passes }.fail()
}

/// Validate, rewrite to a fixpoint, validate again and drop unreachable nodes.
#[tracing::instrument(skip_all, fields(roots = graph.roots().len(), nodes = graph.len()))]
pub fn normalize(
    graph: &mut MergeGraph,
    factory: &CallFactory,
    reporter: &mut Reporter,
    config: &TransformConfig,
) -> Result<TransformSummary> {
    if config.validate {
        validate_graph(graph, ValidationStage::PreTransform, reporter)?;
    }

    let (passes, rewrites) = transform_to_fixpoint(graph, factory, reporter, config.max_passes)?;

    if config.validate {
        validate_graph(graph, ValidationStage::PostTransform, reporter)?;
    }
    let collected = if config.collect_garbage { graph.collect_garbage() } else { 0 };

    let summary = TransformSummary { passes, rewrites, collected, live_nodes: graph.len() };
    tracing::debug!(
        passes,
        rewrites,
        collected,
        live = summary.live_nodes,
        diagnostics = reporter.diagnostics().len(),
        "graph normalized"
    );
    Ok(summary)
}
