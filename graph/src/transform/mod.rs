//! Normalization of expression graphs.
//!
//! Every node reachable from a root is offered a chance to rewrite itself, children
//! before parents, and passes repeat until one changes nothing. Two rewrites exist:
//! abelian calls sort their children by canonical form, and aliases are replaced by the
//! call they name. Either can expose more sharing to hash-consing, which is why a single
//! pass is not enough.

mod engine;
mod rules;
mod validate;

pub use engine::{TransformSummary, normalize, transform_pass, transform_to_fixpoint};
pub use rules::transform_node;
pub use validate::{ValidationStage, validate_graph};
