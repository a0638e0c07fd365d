//! Per-transaction incremental evaluation.
//!
//! A frozen [`MergeGraph`](crate::MergeGraph) is shared by every transaction; each
//! transaction owns a [`GraphEvalState`] holding one [`NodeEvalState`] per node. Evaluating
//! a node again later in the transaction resumes where it stopped: output lists only grow,
//! and a finished node is never recomputed.

mod context;
mod evaluator;
mod map;
mod state;

pub use context::{EvalContext, Field, FieldSource};
pub use evaluator::{CallEval, GraphEvalState};
pub use map::MapArgs;
pub use state::{EvalStatus, InputCursor, LocalState, NodeEvalState};
