//! Diagnostics raised while validating and normalizing a graph.
//!
//! Diagnostics are advisory: recording one never aborts a pass. Callers decide after the
//! fact whether error-severity diagnostics make the graph unusable.

use crate::node::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum Severity {
    #[display("warning")]
    Warning,
    #[display("error")]
    Error,
}

/// Node-scoped message.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{severity}: {sexpr}: {message}")]
pub struct Diagnostic {
    pub node: NodeId,
    /// Canonical form of the node when the diagnostic was raised.
    pub sexpr: String,
    pub severity: Severity,
    pub message: String,
}

/// Diagnostic sink.
#[derive(Debug, Clone, Default)]
pub struct Reporter {
    diagnostics: Vec<Diagnostic>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, node: NodeId, sexpr: &str, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        match severity {
            Severity::Warning => tracing::warn!(node.id = %node, node.sexpr = %sexpr, "{message}"),
            Severity::Error => tracing::error!(node.id = %node, node.sexpr = %sexpr, "{message}"),
        }
        self.diagnostics.push(Diagnostic { node, sexpr: sexpr.to_owned(), severity, message });
    }

    /// Reporter bound to one node.
    pub fn for_node<'r>(&'r mut self, node: NodeId, sexpr: &'r str) -> NodeReporter<'r> {
        NodeReporter { reporter: self, node, sexpr }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == severity).count()
    }
}

/// [`Reporter`] handle that stamps every message with one node.
pub struct NodeReporter<'r> {
    reporter: &'r mut Reporter,
    node: NodeId,
    sexpr: &'r str,
}

impl NodeReporter<'_> {
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.reporter.report(self.node, self.sexpr, Severity::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.reporter.report(self.node, self.sexpr, Severity::Error, message);
    }
}
