use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;
use snafu::ensure;
use vigil_value::Value;

use super::{MapOperator, Operator};
use crate::error::{NotACallSnafu, Result};
use crate::merge::MergeGraph;

/// Stable node identifier.
///
/// Ids are allocated monotonically by [`MergeGraph`] and never reused, so a stale id
/// can be detected instead of silently aliasing a newer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("#{_0}")]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }
}

/// Node variant.
#[derive(Clone, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum NodeKind {
    /// Constant value; `None` is the null literal, which evaluates to an empty finished list.
    Literal(Option<Value>),
    /// Ordinary call.
    Call(Arc<dyn Operator>),
    /// Commutative call; normalization sorts its children.
    Abelian {
        op: Arc<dyn Operator>,
        /// Children are known to be in canonical order.
        ordered: bool,
    },
    /// Call applying a per-element function to one input child.
    Map(Arc<dyn MapOperator>),
    /// Placeholder that normalization replaces with a call named `into`.
    Alias { into: Arc<str> },
}

impl NodeKind {
    pub fn variant_name(&self) -> &'static str {
        self.into()
    }

    pub fn is_call(&self) -> bool {
        !matches!(self, Self::Literal(_))
    }
}

impl fmt::Debug for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Call(_) => f.write_str("Call"),
            Self::Abelian { ordered, .. } => f.debug_struct("Abelian").field("ordered", ordered).finish_non_exhaustive(),
            Self::Map(_) => f.write_str("Map"),
            Self::Alias { into } => f.debug_struct("Alias").field("into", into).finish(),
        }
    }
}

/// Expression node.
///
/// Nodes are built detached (by [`Node::literal`] or a [`CallFactory`](crate::CallFactory)),
/// given children, and then handed to [`MergeGraph::insert`], which computes the canonical
/// s-expression and links parent edges. Once inserted, a node is only modified through
/// graph operations.
#[derive(Debug, Clone)]
pub struct Node {
    name: Arc<str>,
    kind: NodeKind,
    children: SmallVec<[NodeId; 4]>,
    pub(crate) parents: SmallVec<[NodeId; 2]>,
    pub(crate) sexpr: String,
}

impl Node {
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::detached("", NodeKind::Literal(Some(value.into())))
    }

    /// The null literal, rendered as `:`.
    pub fn null() -> Self {
        Self::detached("", NodeKind::Literal(None))
    }

    pub(crate) fn call(name: &str, kind: NodeKind) -> Self {
        Self::detached(name, kind)
    }

    fn detached(name: &str, kind: NodeKind) -> Self {
        Self { name: name.into(), kind, children: SmallVec::new(), parents: SmallVec::new(), sexpr: String::new() }
    }

    /// Call name; empty for literals.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Distinct nodes that list this node as a child.
    pub fn parents(&self) -> &[NodeId] {
        &self.parents
    }

    /// Canonical s-expression. Empty until the node is inserted into a graph.
    pub fn sexpr(&self) -> &str {
        &self.sexpr
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, NodeKind::Literal(_))
    }

    pub fn is_alias(&self) -> bool {
        matches!(self.kind, NodeKind::Alias { .. })
    }

    pub fn literal_value(&self) -> Option<&Value> {
        match &self.kind {
            NodeKind::Literal(value) => value.as_ref(),
            _ => None,
        }
    }

    /// Whether an abelian call is known to have canonically ordered children.
    /// Always false for other variants.
    pub fn is_ordered(&self) -> bool {
        matches!(self.kind, NodeKind::Abelian { ordered: true, .. })
    }

    /// Append a child that is already part of `graph`.
    ///
    /// An ordered abelian call stays ordered only if the new child sorts strictly after
    /// the current last child.
    pub fn add_child(&mut self, graph: &MergeGraph, child: NodeId) -> Result<()> {
        ensure!(self.kind.is_call(), NotACallSnafu { sexpr: self.render_literal() });
        let child_sexpr = graph.sexpr(child)?;

        if let NodeKind::Abelian { ordered, .. } = &mut self.kind
            && *ordered
            && let Some(&last) = self.children.last()
            && graph.sexpr(last)? >= child_sexpr
        {
            *ordered = false;
        }

        self.children.push(child);
        Ok(())
    }

    pub fn add_children(&mut self, graph: &MergeGraph, children: impl IntoIterator<Item = NodeId>) -> Result<()> {
        children.into_iter().try_for_each(|child| self.add_child(graph, child))
    }

    pub fn with_children(mut self, graph: &MergeGraph, children: impl IntoIterator<Item = NodeId>) -> Result<Self> {
        self.add_children(graph, children)?;
        Ok(self)
    }

    pub(crate) fn set_ordered(&mut self, value: bool) {
        if let NodeKind::Abelian { ordered, .. } = &mut self.kind {
            *ordered = value;
        }
    }

    /// Point every occurrence of `old` at `new`. Returns whether anything changed.
    pub(crate) fn replace_child(&mut self, old: NodeId, new: NodeId) -> bool {
        let mut changed = false;
        for child in self.children.iter_mut().filter(|child| **child == old) {
            *child = new;
            changed = true;
        }
        if changed {
            self.set_ordered(false);
        }
        changed
    }

    pub(crate) fn render_literal(&self) -> String {
        match &self.kind {
            NodeKind::Literal(Some(value)) => value.to_string(),
            NodeKind::Literal(None) => ":".to_string(),
            _ => {
                let mut out = String::from("(");
                push_call_name(&mut out, &self.name);
                out.push(')');
                out
            }
        }
    }
}

/// Append a call name to a canonical form.
///
/// Names made only of characters that cannot start or end a child are written as is.
/// Anything else is written between `|` with `|` and `\` escaped, so a name can never
/// read as a name followed by children.
pub(crate) fn push_call_name(out: &mut String, name: &str) {
    let plain = !name.is_empty()
        && !name.chars().any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '\'' | '[' | ']' | ':' | '|' | '\\'));
    if plain {
        out.push_str(name);
        return;
    }
    out.push('|');
    for c in name.chars() {
        if matches!(c, '|' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('|');
}

/// Canonical s-expression.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sexpr)
    }
}
