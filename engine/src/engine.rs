use std::collections::HashMap;
use std::sync::Arc;

use snafu::{OptionExt, ResultExt, ensure};
use tracing::{debug, trace};
use vigil_graph::{EvalContext, MergeGraph, TransformSummary};

use crate::error::*;
use crate::phase::Phase;
use crate::rule::{Rule, RuleOutcome, RuleSet};
use crate::transaction::Transaction;

/// Frozen rule graph with its per-context rule sets.
///
/// The graph is shared read-only by every transaction; all mutable evaluation state lives
/// in the [`Transaction`].
#[derive(Debug, Clone)]
pub struct RuleEngine {
    graph: Arc<MergeGraph>,
    contexts: HashMap<Arc<str>, RuleSet>,
    summary: TransformSummary,
}

impl RuleEngine {
    pub(crate) fn new(graph: Arc<MergeGraph>, contexts: HashMap<Arc<str>, RuleSet>, summary: TransformSummary) -> Self {
        Self { graph, contexts, summary }
    }

    pub fn graph(&self) -> &Arc<MergeGraph> {
        &self.graph
    }

    /// Normalization statistics from the build.
    pub fn summary(&self) -> TransformSummary {
        self.summary
    }

    pub fn context(&self, name: &str) -> Option<&RuleSet> {
        self.contexts.get(name)
    }

    /// Context names, sorted.
    pub fn contexts(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.contexts.keys().map(|name| &**name).collect();
        names.sort_unstable();
        names
    }

    /// Rules of `context` bound to `phase`; empty for unknown contexts.
    pub fn rules(&self, context: &str, phase: Phase) -> &[Rule] {
        self.contexts.get(context).map(|rules| rules.phase(phase)).unwrap_or_default()
    }

    /// Start a transaction with empty fields and fresh evaluation state.
    pub fn transaction(&self) -> Transaction {
        Transaction::new(&self.graph)
    }

    /// Evaluate the rules of `context` bound to `phase` against the fields `tx` holds now.
    ///
    /// Phases run in order and at most once per transaction. Evaluation is incremental:
    /// nodes finished in an earlier phase are not recomputed.
    #[tracing::instrument(skip_all, fields(context = context, phase = %phase))]
    pub fn run_phase(&self, tx: &mut Transaction, context: &str, phase: Phase) -> Result<Vec<RuleOutcome>> {
        if let Some(last) = tx.last_phase {
            ensure!(last != phase, PhaseAlreadyRunSnafu { phase });
            ensure!(last < phase, PhaseOutOfOrderSnafu { phase, last });
        }
        let rules = self.contexts.get(context).context(UnknownContextSnafu { context })?.phase(phase);
        tx.last_phase = Some(phase);

        if rules.is_empty() {
            debug!("no rules for phase");
            return Ok(Vec::new());
        }

        let Transaction { fields, eval, .. } = tx;
        let ctx = EvalContext::new(&*fields);
        let mut outcomes = Vec::with_capacity(rules.len());
        for rule in rules {
            let id = self.graph.root(rule.root).context(GraphSnafu)?;
            let values = eval.eval(&self.graph, id, &ctx).context(GraphSnafu)?.clone();
            let finished = eval.is_finished(id);
            let fired = rule.fires(&values, finished);
            trace!(rule.id = %rule.id, node.id = %id, fired, finished, "rule evaluated");

            outcomes.push(RuleOutcome { rule_id: rule.id.clone(), phase, fired, values, finished });
        }
        debug!(rules = outcomes.len(), fired = outcomes.iter().filter(|o| o.fired).count(), "phase complete");
        Ok(outcomes)
    }
}
