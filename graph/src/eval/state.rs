use std::collections::HashMap;

use vigil_value::{Value, ValueList};

use crate::error::{AppendAfterFinishSnafu, Result};
use crate::node::{NodeId, NodeKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum EvalStatus {
    /// Never evaluated in this transaction.
    #[default]
    Uninitialized,
    /// Evaluated at least once; more values may appear.
    Active,
    /// Output is complete.
    Finished,
}

/// Progress of a map call through one input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputCursor {
    /// Number of input elements already mapped.
    pub consumed: usize,
    /// The finished-empty case has been handled.
    pub empty_mapped: bool,
}

/// Variant-specific evaluation state.
#[derive(Debug, Clone, Default)]
pub enum LocalState {
    #[default]
    Empty,
    /// Cursor per input node; keyed by node because a rewrite may change which node feeds the map.
    Map(HashMap<NodeId, InputCursor>),
}

/// Evaluation state of one node within one transaction.
#[derive(Debug, Clone, Default)]
pub struct NodeEvalState {
    values: ValueList,
    status: EvalStatus,
    local: LocalState,
    pub(super) epoch: u64,
}

impl NodeEvalState {
    pub fn values(&self) -> &ValueList {
        &self.values
    }

    pub fn status(&self) -> EvalStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status == EvalStatus::Finished
    }

    pub fn local(&self) -> &LocalState {
        &self.local
    }

    pub(super) fn initialize(&mut self, kind: &NodeKind) {
        self.status = EvalStatus::Active;
        if let NodeKind::Map(_) = kind {
            self.local = LocalState::Map(HashMap::new());
        }
    }

    pub(crate) fn append(&mut self, id: NodeId, value: Value) -> Result<()> {
        snafu::ensure!(!self.is_finished(), AppendAfterFinishSnafu { id });
        self.values.push(value);
        Ok(())
    }

    pub(crate) fn finish(&mut self) {
        self.status = EvalStatus::Finished;
    }

    pub(super) fn cursor(&self, input: NodeId) -> InputCursor {
        match &self.local {
            LocalState::Map(cursors) => cursors.get(&input).copied().unwrap_or_default(),
            LocalState::Empty => InputCursor::default(),
        }
    }

    pub(super) fn set_cursor(&mut self, input: NodeId, cursor: InputCursor) {
        if let LocalState::Map(cursors) = &mut self.local {
            cursors.insert(input, cursor);
        } else {
            self.local = LocalState::Map(HashMap::from([(input, cursor)]));
        }
    }
}
