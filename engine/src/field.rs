//! Host field binding.
//!
//! The host feeds transaction data into a [`FieldStore`] as it arrives. Rules reach it
//! through the `field` call, whose single literal argument names the field.

use std::collections::HashMap;
use std::sync::Arc;

use snafu::ensure;
use vigil_graph::{CallEval, Field, FieldSource, Node, NodeReporter, Operator, Value};

use crate::error::*;

/// Name the field operator is registered under.
pub const FIELD_CALL: &str = "field";

/// Forwards a host field's values as they are appended.
///
/// Finishes when the host finishes the field. A missing field is not an error: the call
/// stays active with no value until the field appears.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldOperator;

impl Operator for FieldOperator {
    fn calculate(&self, call: &mut CallEval<'_>) -> vigil_graph::Result<()> {
        let name = match call.child_values(0).first() {
            Some(Value::String(name)) => name.clone(),
            Some(_) => {
                call.finish();
                return Ok(());
            }
            None => {
                call.finish_if_children_finished();
                return Ok(());
            }
        };
        let Some(field) = call.context().field(&name) else { return Ok(()) };

        for value in field.values.iter().skip(call.values().len()) {
            call.add_value(value.clone())?;
        }
        if field.finished {
            call.finish();
        }
        Ok(())
    }

    fn validate(&self, node: &Node, reporter: &mut NodeReporter<'_>) {
        if node.children().len() != 1 {
            reporter.error(format!("field takes exactly one name argument, got {}", node.children().len()));
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct FieldEntry {
    values: Vec<Value>,
    finished: bool,
}

/// Per-transaction field data appended by the host.
#[derive(Debug, Clone, Default)]
pub struct FieldStore {
    fields: HashMap<Arc<str>, FieldEntry>,
}

impl FieldStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to the named field, creating it on first use.
    pub fn append(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let entry = self.entry(name);
        ensure!(!entry.finished, FieldFinishedSnafu { name });
        entry.values.push(value.into());
        Ok(())
    }

    /// Close the named field. A field closed before any append is present and empty.
    pub fn finish(&mut self, name: &str) {
        self.entry(name).finished = true;
    }

    pub fn get(&self, name: &str) -> Option<Field<'_>> {
        self.fields.get(name).map(|entry| Field { values: &entry.values, finished: entry.finished })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn entry(&mut self, name: &str) -> &mut FieldEntry {
        self.fields.entry(Arc::from(name)).or_default()
    }
}

impl FieldSource for FieldStore {
    fn field(&self, name: &str) -> Option<Field<'_>> {
        self.get(name)
    }
}
