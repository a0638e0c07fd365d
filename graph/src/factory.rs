//! Registry mapping call names to node constructors.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use snafu::OptionExt;

use crate::error::{Result, UnknownOperatorSnafu};
use crate::merge::MergeGraph;
use crate::node::{MapOperator, Node, NodeId, NodeKind, Operator};

type Generator = Arc<dyn Fn() -> NodeKind + Send + Sync>;

/// Builds fresh call nodes by name.
///
/// Parsers use it to turn names into nodes and normalization uses it to manufacture
/// replacements, so the variant registered for a name is the variant every node of
/// that name has.
#[derive(Clone, Default)]
pub struct CallFactory {
    generators: HashMap<String, Generator>,
}

impl CallFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_call(&mut self, name: impl Into<String>, op: impl Operator + 'static) -> &mut Self {
        let op: Arc<dyn Operator> = Arc::new(op);
        self.add_generator(name, move || NodeKind::Call(op.clone()))
    }

    pub fn add_abelian(&mut self, name: impl Into<String>, op: impl Operator + 'static) -> &mut Self {
        let op: Arc<dyn Operator> = Arc::new(op);
        self.add_generator(name, move || NodeKind::Abelian { op: op.clone(), ordered: false })
    }

    pub fn add_map(&mut self, name: impl Into<String>, op: impl MapOperator + 'static) -> &mut Self {
        let op: Arc<dyn MapOperator> = Arc::new(op);
        self.add_generator(name, move || NodeKind::Map(op.clone()))
    }

    /// Register `name` as an alias that normalization rewrites into a call of `into`.
    pub fn add_alias(&mut self, name: impl Into<String>, into: &str) -> &mut Self {
        let into: Arc<str> = into.into();
        self.add_generator(name, move || NodeKind::Alias { into: into.clone() })
    }

    /// Register a custom generator. Later registrations under the same name win.
    pub fn add_generator(
        &mut self,
        name: impl Into<String>,
        generator: impl Fn() -> NodeKind + Send + Sync + 'static,
    ) -> &mut Self {
        let name = name.into();
        if self.generators.insert(name.clone(), Arc::new(generator)).is_some() {
            tracing::debug!(call.name = %name, "call registration replaced");
        }
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.generators.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.generators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Fresh detached node with no children.
    pub fn construct(&self, name: &str) -> Result<Node> {
        let generator = self.generators.get(name).context(UnknownOperatorSnafu { name })?;
        Ok(Node::call(name, generator()))
    }

    /// Fresh detached node with `children` appended in order.
    pub fn construct_with(&self, graph: &MergeGraph, name: &str, children: &[NodeId]) -> Result<Node> {
        self.construct(name)?.with_children(graph, children.iter().copied())
    }
}

impl fmt::Debug for CallFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallFactory").field("names", &self.names()).finish()
    }
}
