use snafu::Snafu;

use crate::node::NodeId;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Structural and evaluation failures.
///
/// A call producing no value is not an error; these variants cover graph misuse and
/// broken invariants only.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Node id refers to a freed slot or was never allocated.
    #[snafu(display("node {id} is not part of the graph"))]
    NodeNotInGraph { id: NodeId },

    /// Call factory has no generator for the name.
    #[snafu(display("no call registered under '{name}'"))]
    UnknownOperator { name: String },

    /// Call factory produced a node of an unexpected lineage.
    #[snafu(display("call factory produced {actual} node for '{name}' where {expected} was required"))]
    UnexpectedVariant { name: String, expected: &'static str, actual: &'static str },

    /// Alias whose target is its own name.
    #[snafu(display("alias '{name}' resolves to itself"))]
    SelfAlias { name: String },

    /// Alias reached evaluation; normalization was skipped or did not finish.
    #[snafu(display("cannot evaluate alias '{name}', graph was not normalized"))]
    UnresolvedAlias { name: String },

    /// Operation would create or has encountered a cycle.
    #[snafu(display("cycle through node {id}: {sexpr}"))]
    CycleDetected { id: NodeId, sexpr: String },

    /// Normalization kept rewriting past the pass limit.
    #[snafu(display("normalization did not reach a fixpoint within {max_passes} passes"))]
    FixpointNotReached { max_passes: usize },

    /// Value appended to a node already marked finished.
    #[snafu(display("node {id} is finished and cannot accept more values"))]
    AppendAfterFinish { id: NodeId },

    /// Map call without a child at its input position.
    #[snafu(display("map call '{name}' has no input at position {index}"))]
    MissingInput { name: String, index: usize },

    /// Children can only be attached to calls.
    #[snafu(display("cannot add children to literal {sexpr}"))]
    NotACall { sexpr: String },

    /// Root handle does not name a registered root.
    #[snafu(display("root index {index} out of range ({count} roots)"))]
    RootOutOfRange { index: usize, count: usize },
}
