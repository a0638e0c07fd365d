//! ASCII tree rendering of graph nodes.

use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::HashSet;
use std::io;
use std::rc::Rc;

use ptree::{Style, TreeItem};

use super::{NodeId, NodeKind};
use crate::merge::MergeGraph;

/// Compact renderer: a node reached a second time prints `[#id] → (see above)`.
#[derive(Clone)]
pub struct NodeTreeCompact<'g> {
    graph: &'g MergeGraph,
    id: NodeId,
    visited: Rc<RefCell<HashSet<NodeId>>>,
    is_backref: RefCell<bool>,
}

impl<'g> NodeTreeCompact<'g> {
    pub fn new(graph: &'g MergeGraph, id: NodeId) -> Self {
        Self { graph, id, visited: Rc::default(), is_backref: RefCell::new(false) }
    }
}

impl TreeItem for NodeTreeCompact<'_> {
    type Child = Self;

    fn write_self<W: io::Write>(&self, f: &mut W, _style: &Style) -> io::Result<()> {
        let mut visited = self.visited.borrow_mut();
        if !visited.insert(self.id) {
            *self.is_backref.borrow_mut() = true;
            return write!(f, "[{}] → (see above)", self.id);
        }
        write!(f, "{}", format_node(self.graph, self.id))
    }

    fn children(&self) -> Cow<'_, [Self::Child]> {
        if *self.is_backref.borrow() {
            return Cow::Borrowed(&[]);
        }
        let children = child_ids(self.graph, self.id)
            .map(|id| Self { graph: self.graph, id, visited: self.visited.clone(), is_backref: RefCell::new(false) })
            .collect();
        Cow::Owned(children)
    }
}

/// Full renderer: shared nodes are expanded at every occurrence.
#[derive(Clone)]
pub struct NodeTreeFull<'g> {
    graph: &'g MergeGraph,
    id: NodeId,
}

impl<'g> NodeTreeFull<'g> {
    pub fn new(graph: &'g MergeGraph, id: NodeId) -> Self {
        Self { graph, id }
    }
}

impl TreeItem for NodeTreeFull<'_> {
    type Child = Self;

    fn write_self<W: io::Write>(&self, f: &mut W, _style: &Style) -> io::Result<()> {
        write!(f, "{}", format_node(self.graph, self.id))
    }

    fn children(&self) -> Cow<'_, [Self::Child]> {
        Cow::Owned(child_ids(self.graph, self.id).map(|id| Self { graph: self.graph, id }).collect())
    }
}

fn child_ids(graph: &MergeGraph, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    graph.node(id).map(|node| node.children()).unwrap_or_default().iter().copied()
}

/// Output format: `[#id] name : variant` for calls, `[#id] literal` for literals.
fn format_node(graph: &MergeGraph, id: NodeId) -> String {
    let Ok(node) = graph.node(id) else {
        return format!("[{id}] <freed>");
    };
    match node.kind() {
        NodeKind::Literal(_) => format!("[{id}] {}", node.render_literal()),
        NodeKind::Abelian { ordered, .. } => format!("[{id}] {} : abelian ordered={ordered}", node.name()),
        NodeKind::Alias { into } => format!("[{id}] {} : alias → {into}", node.name()),
        kind => format!("[{id}] {} : {}", node.name(), kind.variant_name()),
    }
}

fn render(tree: &impl TreeItem) -> String {
    let mut buf = Vec::new();
    if let Err(err) = ptree::write_tree(tree, &mut buf) {
        tracing::warn!(error = %err, "tree rendering failed");
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Render the subgraph under `id`, printing shared nodes once.
pub fn render_tree_compact(graph: &MergeGraph, id: NodeId) -> String {
    render(&NodeTreeCompact::new(graph, id))
}

/// Render the subgraph under `id`, expanding shared nodes every time.
pub fn render_tree_full(graph: &MergeGraph, id: NodeId) -> String {
    render(&NodeTreeFull::new(graph, id))
}
