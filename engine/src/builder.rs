use std::collections::HashMap;
use std::sync::Arc;

use snafu::{ResultExt, ensure};
use tracing::debug;
use vigil_graph::{CallFactory, MergeGraph, Node, NodeId, Reporter, RootIndex, Value, normalize};

use crate::config::EngineConfig;
use crate::engine::RuleEngine;
use crate::error::*;
use crate::field::{FIELD_CALL, FieldOperator};
use crate::phase::Phase;
use crate::rule::{Rule, RuleSet};

/// Mutable configuration-time view of the engine.
///
/// Rule conditions are built into the shared graph here; [`EngineBuilder::build`]
/// normalizes the graph once and freezes it for all transactions.
#[derive(Debug)]
pub struct EngineBuilder {
    graph: MergeGraph,
    factory: CallFactory,
    contexts: HashMap<Arc<str>, RuleSet>,
    config: EngineConfig,
}

impl EngineBuilder {
    /// Start from `factory`. The `field` call is registered unless the factory already
    /// provides one.
    pub fn new(mut factory: CallFactory) -> Self {
        if !factory.contains(FIELD_CALL) {
            factory.add_call(FIELD_CALL, FieldOperator);
        }
        Self { graph: MergeGraph::new(), factory, contexts: HashMap::new(), config: EngineConfig::default() }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn graph(&self) -> &MergeGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut MergeGraph {
        &mut self.graph
    }

    pub fn factory(&self) -> &CallFactory {
        &self.factory
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn context(&self, name: &str) -> Option<&RuleSet> {
        self.contexts.get(name)
    }

    pub fn literal(&mut self, value: impl Into<Value>) -> Result<NodeId> {
        self.graph.insert(Node::literal(value)).context(GraphSnafu)
    }

    /// Construct the named call over existing nodes and insert it.
    pub fn call(&mut self, name: &str, children: &[NodeId]) -> Result<NodeId> {
        let node = self.factory.construct_with(&self.graph, name, children).context(GraphSnafu)?;
        self.graph.insert(node).context(GraphSnafu)
    }

    /// `(field 'name')`
    pub fn field(&mut self, name: &str) -> Result<NodeId> {
        let name = self.literal(name)?;
        self.call(FIELD_CALL, &[name])
    }

    /// Register `node` as the condition of rule `id` in `context`.
    pub fn add_rule(
        &mut self,
        context: &str,
        id: &str,
        phase: Phase,
        node: NodeId,
        invert: bool,
    ) -> Result<RootIndex> {
        ensure!(!id.is_empty(), EmptyRuleIdSnafu);
        let duplicate = self.contexts.get(context).is_some_and(|rules| rules.contains(id));
        ensure!(!duplicate, DuplicateRuleSnafu { id, context });

        let root = self.graph.mark_root(node).context(GraphSnafu)?;
        let rules = self.contexts.entry(Arc::from(context)).or_default();
        rules.push(context, Rule { id: Arc::from(id), phase, root, invert })?;
        debug!(rule.id = id, context, %phase, %root, invert, "rule registered");
        Ok(root)
    }

    /// Normalize the graph and freeze it into a [`RuleEngine`].
    ///
    /// Diagnostics go to `reporter`. With `deny_error_diagnostics` set, any error
    /// diagnostic fails the build with [`Error::DiagnosticErrors`].
    #[tracing::instrument(skip_all, fields(contexts = self.contexts.len(), nodes = self.graph.len()))]
    pub fn build(self, reporter: &mut Reporter) -> Result<RuleEngine> {
        let Self { mut graph, factory, contexts, config } = self;

        let summary = normalize(&mut graph, &factory, reporter, &config.transform).context(GraphSnafu)?;
        if config.deny_error_diagnostics {
            let count = reporter.error_count();
            ensure!(count == 0, DiagnosticErrorsSnafu { count });
        }

        debug!(
            passes = summary.passes,
            rewrites = summary.rewrites,
            live_nodes = summary.live_nodes,
            rules = contexts.values().map(RuleSet::len).sum::<usize>(),
            "rule engine built"
        );
        Ok(RuleEngine::new(Arc::new(graph), contexts, summary))
    }
}
