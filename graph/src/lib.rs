//! Expression graph core for the vigil rule engine.
//!
//! Rules are compiled into a directed acyclic graph of calls over literals. The graph is
//! hash-consed on each node's canonical s-expression, so structurally equal
//! subexpressions are stored once and evaluated once per transaction.
//!
//! # Module Organization
//!
//! - [`node`] - Node variants, identifiers and the operator traits calls dispatch to
//! - [`factory`] - Name to node-kind registry used by parsers and rewrites
//! - [`merge`] - The hash-consed [`MergeGraph`] and its atomic `replace`
//! - [`transform`] - Fixpoint normalization (commutative ordering, alias inlining) and validation
//! - [`eval`] - Per-transaction incremental evaluation state
//! - [`reporter`] - Diagnostics collected during validation and transformation
//! - [`config`] - Normalization settings
//! - [`error`] - Error types and result handling

pub mod config;
pub mod error;
pub mod eval;
pub mod factory;
pub mod merge;
pub mod node;
pub mod prelude;
pub mod reporter;
pub mod transform;


pub use config::TransformConfig;
pub use error::{Error, Result};
pub use eval::{CallEval, EvalContext, EvalStatus, Field, FieldSource, GraphEvalState, MapArgs, NodeEvalState};
pub use factory::CallFactory;
pub use merge::{MergeGraph, RootIndex};
pub use node::{MapOperator, Node, NodeId, NodeKind, Operator};
pub use reporter::{Diagnostic, NodeReporter, Reporter, Severity};
pub use transform::{TransformSummary, ValidationStage, normalize, transform_node, transform_pass, validate_graph};

pub use vigil_value::{Value, ValueList};
