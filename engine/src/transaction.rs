use vigil_graph::{Field, GraphEvalState, MergeGraph, Value};

use crate::error::Result;
use crate::field::FieldStore;
use crate::phase::Phase;

/// State of one request/response exchange.
///
/// Holds the host's field data and the evaluation state of every graph node for this
/// transaction only. Dropping it aborts the transaction.
#[derive(Debug)]
pub struct Transaction {
    pub(crate) fields: FieldStore,
    pub(crate) eval: GraphEvalState,
    pub(crate) last_phase: Option<Phase>,
}

impl Transaction {
    pub(crate) fn new(graph: &MergeGraph) -> Self {
        Self { fields: FieldStore::new(), eval: GraphEvalState::new(graph), last_phase: None }
    }

    /// Append a value to a host field; visible to the next phase run.
    pub fn append_field(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.fields.append(name, value)
    }

    /// Mark a host field complete.
    pub fn finish_field(&mut self, name: &str) {
        self.fields.finish(name);
    }

    pub fn field(&self, name: &str) -> Option<Field<'_>> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> &FieldStore {
        &self.fields
    }

    /// Most recent phase run, `None` before the first.
    pub fn last_phase(&self) -> Option<Phase> {
        self.last_phase
    }

    pub fn eval_state(&self) -> &GraphEvalState {
        &self.eval
    }
}
