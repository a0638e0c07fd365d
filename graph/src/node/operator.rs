use vigil_value::Value;

use super::Node;
use crate::error::Result;
use crate::eval::{CallEval, MapArgs};
use crate::reporter::NodeReporter;

/// Behaviour of [`Call`](super::NodeKind::Call) and [`Abelian`](super::NodeKind::Abelian) nodes.
///
/// One operator instance is shared by every node the factory creates under its name, so
/// per-node state belongs in the evaluation state, never in the operator.
pub trait Operator: Send + Sync {
    /// Evaluate every child before [`calculate`](Self::calculate) runs.
    ///
    /// Lazy operators return `false` and pull children on demand with
    /// [`CallEval::eval_child`].
    fn eager(&self) -> bool {
        true
    }

    /// Append any new output values and finish once no more can appear.
    ///
    /// Called once per evaluation round until the node finishes.
    fn calculate(&self, call: &mut CallEval<'_>) -> Result<()>;

    /// Static checks on a node using this operator, run before and after normalization.
    fn validate(&self, _node: &Node, _reporter: &mut NodeReporter<'_>) {}
}

/// Behaviour of [`Map`](super::NodeKind::Map) nodes.
///
/// The evaluator owns the per-input cursor; an operator only maps single values.
pub trait MapOperator: Send + Sync {
    /// Position of the input child among `arity` children. Defaults to the last child.
    fn input_index(&self, arity: usize) -> usize {
        arity.saturating_sub(1)
    }

    /// Evaluate the input child before mapping.
    fn eval_input(&self) -> bool {
        true
    }

    /// Finish once the input is finished and fully consumed.
    fn auto_finish(&self) -> bool {
        true
    }

    /// Map one input element; `None` drops it.
    fn map_value(&self, value: &Value, args: &MapArgs<'_>) -> Option<Value>;

    /// Output for an input that finished without producing any element. Called at most once.
    fn map_empty(&self, _args: &MapArgs<'_>) -> Option<Value> {
        None
    }

    fn validate(&self, _node: &Node, _reporter: &mut NodeReporter<'_>) {}
}
