use std::collections::HashSet;

use snafu::{OptionExt, ensure};
use vigil_value::{Value, ValueList};

use super::map;
use super::{EvalContext, EvalStatus, NodeEvalState};
use crate::error::{CycleDetectedSnafu, MissingInputSnafu, Result, UnresolvedAliasSnafu};
use crate::merge::MergeGraph;
use crate::node::{Node, NodeId, NodeKind};

static EMPTY_VALUES: ValueList = ValueList::new();

/// Evaluation state of a whole graph for one transaction.
///
/// Each call to [`eval`](Self::eval) opens a new round. A node is calculated at most once
/// per round however many parents demand it, and never again once finished.
#[derive(Debug, Default)]
pub struct GraphEvalState {
    states: Vec<NodeEvalState>,
    in_progress: HashSet<NodeId>,
    epoch: u64,
}

impl GraphEvalState {
    pub fn new(graph: &MergeGraph) -> Self {
        let mut states = Vec::new();
        states.resize_with(graph.slot_count(), NodeEvalState::default);
        Self { states, in_progress: HashSet::new(), epoch: 0 }
    }

    /// Advance `id` and everything it depends on as far as the context allows.
    pub fn eval(&mut self, graph: &MergeGraph, id: NodeId, ctx: &EvalContext<'_>) -> Result<&ValueList> {
        self.epoch += 1;
        if let Err(err) = self.eval_node(graph, id, ctx) {
            tracing::error!(node.id = %id, error = %err, "evaluation failed");
            self.in_progress.clear();
            return Err(err);
        }
        Ok(self.values(id))
    }

    /// Output so far; empty for nodes never evaluated.
    pub fn values(&self, id: NodeId) -> &ValueList {
        self.states.get(id.index()).map_or(&EMPTY_VALUES, NodeEvalState::values)
    }

    pub fn status(&self, id: NodeId) -> EvalStatus {
        self.states.get(id.index()).map_or(EvalStatus::Uninitialized, NodeEvalState::status)
    }

    pub fn is_finished(&self, id: NodeId) -> bool {
        self.status(id) == EvalStatus::Finished
    }

    pub fn node_state(&self, id: NodeId) -> Option<&NodeEvalState> {
        self.states.get(id.index())
    }

    pub(super) fn eval_node(&mut self, graph: &MergeGraph, id: NodeId, ctx: &EvalContext<'_>) -> Result<()> {
        let node = graph.node(id)?;
        let index = id.index();
        if index >= self.states.len() {
            self.states.resize_with(graph.slot_count().max(index + 1), NodeEvalState::default);
        }

        if self.states[index].is_finished() {
            return Ok(());
        }
        ensure!(!self.in_progress.contains(&id), CycleDetectedSnafu { id, sexpr: node.sexpr() });
        if self.states[index].epoch == self.epoch {
            return Ok(());
        }

        // Taken out while calculating so children can be borrowed alongside it.
        let mut own = std::mem::take(&mut self.states[index]);
        own.epoch = self.epoch;
        if own.status() == EvalStatus::Uninitialized {
            own.initialize(node.kind());
        }

        self.in_progress.insert(id);
        let result = self.calculate(graph, id, node, &mut own, ctx);
        self.in_progress.remove(&id);

        tracing::trace!(
            node.id = %id,
            node.sexpr = %node.sexpr(),
            values = own.values().len(),
            status = %own.status(),
            "evaluated node"
        );
        self.states[index] = own;
        result
    }

    fn calculate(
        &mut self,
        graph: &MergeGraph,
        id: NodeId,
        node: &Node,
        own: &mut NodeEvalState,
        ctx: &EvalContext<'_>,
    ) -> Result<()> {
        match node.kind() {
            NodeKind::Literal(value) => {
                if let Some(value) = value {
                    own.append(id, value.clone())?;
                }
                own.finish();
                Ok(())
            }
            NodeKind::Call(op) | NodeKind::Abelian { op, .. } => {
                if op.eager() {
                    for &child in node.children() {
                        self.eval_node(graph, child, ctx)?;
                    }
                }
                let mut call = CallEval { graph, state: self, ctx, node, id, own };
                op.calculate(&mut call)
            }
            NodeKind::Map(op) => map::calculate(self, graph, id, node, own, ctx, op.as_ref()),
            NodeKind::Alias { .. } => UnresolvedAliasSnafu { name: node.name() }.fail(),
        }
    }
}

/// Handle given to [`Operator::calculate`](crate::Operator::calculate).
///
/// Exposes the node's children and their output, and appends to the node's own output.
pub struct CallEval<'a> {
    graph: &'a MergeGraph,
    state: &'a mut GraphEvalState,
    ctx: &'a EvalContext<'a>,
    node: &'a Node,
    id: NodeId,
    own: &'a mut NodeEvalState,
}

impl<'a> CallEval<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node(&self) -> &'a Node {
        self.node
    }

    pub fn name(&self) -> &'a str {
        self.node.name()
    }

    pub fn arity(&self) -> usize {
        self.node.children().len()
    }

    pub fn children(&self) -> &'a [NodeId] {
        self.node.children()
    }

    pub fn context(&self) -> &'a EvalContext<'a> {
        self.ctx
    }

    /// Evaluate one child on demand. Needed only by operators that are not eager.
    pub fn eval_child(&mut self, index: usize) -> Result<&ValueList> {
        let child = *self.children().get(index).context(MissingInputSnafu { name: self.name(), index })?;
        self.state.eval_node(self.graph, child, self.ctx)?;
        Ok(self.state.values(child))
    }

    /// Output of a child so far; empty when out of range or not yet evaluated.
    pub fn child_values(&self, index: usize) -> &ValueList {
        self.children().get(index).map_or(&EMPTY_VALUES, |&child| self.state.values(child))
    }

    pub fn child_finished(&self, index: usize) -> bool {
        self.children().get(index).is_some_and(|&child| self.state.is_finished(child))
    }

    pub fn children_finished(&self) -> bool {
        self.children().iter().all(|&child| self.state.is_finished(child))
    }

    /// This node's output so far.
    pub fn values(&self) -> &ValueList {
        self.own.values()
    }

    pub fn is_finished(&self) -> bool {
        self.own.is_finished()
    }

    pub fn add_value(&mut self, value: impl Into<Value>) -> Result<()> {
        self.own.append(self.id, value.into())
    }

    pub fn finish(&mut self) {
        self.own.finish();
    }

    /// Finish if every child is finished. Returns whether the node is now finished.
    pub fn finish_if_children_finished(&mut self) -> bool {
        if self.children_finished() {
            self.own.finish();
        }
        self.own.is_finished()
    }
}
