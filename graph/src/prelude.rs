//! Common imports for building and evaluating graphs.
//!
//! ```rust,ignore
//! use vigil_graph::prelude::*;
//! ```

pub use crate::config::TransformConfig;
pub use crate::error::{Error, Result};
pub use crate::eval::{CallEval, EvalContext, Field, FieldSource, GraphEvalState, MapArgs};
pub use crate::factory::CallFactory;
pub use crate::merge::{MergeGraph, RootIndex};
pub use crate::node::{MapOperator, Node, NodeId, NodeKind, Operator};
pub use crate::reporter::{NodeReporter, Reporter, Severity};
pub use crate::transform::normalize;

pub use vigil_value::{Value, ValueList};
