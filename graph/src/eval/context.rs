use vigil_value::Value;

/// Snapshot of one host-provided field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field<'a> {
    /// Values seen so far, oldest first. Never shrinks between calls.
    pub values: &'a [Value],
    /// No further values will be appended.
    pub finished: bool,
}

/// Host view of transaction data.
pub trait FieldSource {
    /// Current state of the named field, or `None` if it has not appeared yet.
    fn field(&self, name: &str) -> Option<Field<'_>>;
}

struct NoFields;

impl FieldSource for NoFields {
    fn field(&self, _name: &str) -> Option<Field<'_>> {
        None
    }
}

static NO_FIELDS: NoFields = NoFields;

/// Transaction-scoped data passed down through evaluation.
#[derive(Clone, Copy)]
pub struct EvalContext<'a> {
    source: &'a dyn FieldSource,
}

impl<'a> EvalContext<'a> {
    pub fn new(source: &'a dyn FieldSource) -> Self {
        Self { source }
    }

    pub fn field(&self, name: &str) -> Option<Field<'a>> {
        self.source.field(name)
    }
}

impl EvalContext<'static> {
    /// Context without any fields.
    pub fn empty() -> Self {
        Self { source: &NO_FIELDS }
    }
}

impl std::fmt::Debug for EvalContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvalContext").finish_non_exhaustive()
    }
}
