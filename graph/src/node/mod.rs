//! Graph nodes.
//!
//! A [`Node`] is either a literal or one of four call variants. Calls dispatch to
//! [`Operator`] or [`MapOperator`] implementations shared between every node created
//! under the same name.

mod core;
mod operator;
pub mod tree;

pub use core::{Node, NodeId, NodeKind};
pub(crate) use core::push_call_name;
pub use operator::{MapOperator, Operator};
