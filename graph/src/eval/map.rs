use smallvec::SmallVec;
use snafu::OptionExt;
use vigil_value::{Value, ValueList};

use super::{EvalContext, GraphEvalState, NodeEvalState};
use crate::error::{MissingInputSnafu, Result};
use crate::merge::MergeGraph;
use crate::node::{MapOperator, Node, NodeId};

/// Non-input arguments of a map call, passed to every [`MapOperator::map_value`].
pub struct MapArgs<'a> {
    args: SmallVec<[&'a ValueList; 2]>,
    context: &'a EvalContext<'a>,
}

impl<'a> MapArgs<'a> {
    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Output so far of the `index`-th non-input child.
    pub fn get(&self, index: usize) -> Option<&'a ValueList> {
        self.args.get(index).copied()
    }

    /// First value of the `index`-th non-input child; the common shape for literal parameters.
    pub fn value(&self, index: usize) -> Option<&'a Value> {
        self.get(index).and_then(ValueList::first)
    }

    pub fn context(&self) -> &'a EvalContext<'a> {
        self.context
    }
}

/// Map every input element not yet consumed, then finish once the input is finished.
///
/// An input that finishes without any element is handed to [`MapOperator::map_empty`]
/// exactly once.
pub(super) fn calculate(
    state: &mut GraphEvalState,
    graph: &MergeGraph,
    id: NodeId,
    node: &Node,
    own: &mut NodeEvalState,
    ctx: &EvalContext<'_>,
    op: &dyn MapOperator,
) -> Result<()> {
    let children = node.children();
    let input_index = op.input_index(children.len());
    let input = *children.get(input_index).context(MissingInputSnafu { name: node.name(), index: input_index })?;

    for (position, &child) in children.iter().enumerate() {
        if position != input_index {
            state.eval_node(graph, child, ctx)?;
        }
    }
    if op.eval_input() {
        state.eval_node(graph, input, ctx)?;
    }

    let state: &GraphEvalState = state;
    let args = MapArgs {
        args: children
            .iter()
            .enumerate()
            .filter(|&(position, _)| position != input_index)
            .map(|(_, &child)| state.values(child))
            .collect(),
        context: ctx,
    };
    let inputs = state.values(input);
    let input_finished = state.is_finished(input);
    let mut cursor = own.cursor(input);

    if inputs.is_empty() {
        if input_finished && !cursor.empty_mapped {
            cursor.empty_mapped = true;
            if let Some(value) = op.map_empty(&args) {
                own.append(id, value)?;
            }
        }
    } else {
        for value in inputs.suffix(cursor.consumed) {
            if let Some(mapped) = op.map_value(value, &args) {
                own.append(id, mapped)?;
            }
        }
        cursor.consumed = inputs.len();
    }
    own.set_cursor(input, cursor);

    if op.auto_finish() && input_finished {
        own.finish();
    }
    Ok(())
}
