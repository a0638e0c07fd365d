use snafu::Snafu;

use crate::phase::Phase;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("graph error: {source}"))]
    Graph { source: vigil_graph::Error },

    /// Phase requested after a later one already ran in this transaction.
    #[snafu(display("phase '{phase}' cannot run after '{last}'"))]
    PhaseOutOfOrder { phase: Phase, last: Phase },

    /// Each phase runs at most once per transaction.
    #[snafu(display("phase '{phase}' already ran in this transaction"))]
    PhaseAlreadyRun { phase: Phase },

    #[snafu(display("no rules registered for context '{context}'"))]
    UnknownContext { context: String },

    /// Normalization reported error diagnostics and the configuration denies them.
    #[snafu(display("rule graph has {count} error diagnostic(s)"))]
    DiagnosticErrors { count: usize },

    #[snafu(display("rule id must not be empty"))]
    EmptyRuleId,

    #[snafu(display("rule '{id}' is already registered in context '{context}'"))]
    DuplicateRule { id: String, context: String },

    /// Host appended to a field it had already closed.
    #[snafu(display("field '{name}' is finished and cannot accept more values"))]
    FieldFinished { name: String },
}
