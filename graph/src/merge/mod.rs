//! Hash-consed node storage.
//!
//! Nodes live in an arena addressed by [`NodeId`]. A side index maps every canonical
//! s-expression to the single live node carrying it, which is what makes structurally
//! equal subexpressions share one node.

mod replace;

use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use snafu::OptionExt;

use crate::error::{NodeNotInGraphSnafu, Result, RootOutOfRangeSnafu};
use crate::node::tree::{render_tree_compact, render_tree_full};
use crate::node::{Node, NodeId, push_call_name};

/// Handle to a root slot.
///
/// Root slots follow rewrites, so a handle taken before normalization still names the
/// normalized expression afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("root[{_0}]")]
pub struct RootIndex(pub(crate) usize);

impl RootIndex {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct MergeGraph {
    slots: Vec<Option<Node>>,
    index: HashMap<String, NodeId>,
    roots: Vec<NodeId>,
    live: usize,
}

impl MergeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.slots.get(id.index()).and_then(Option::as_ref).context(NodeNotInGraphSnafu { id })
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut).context(NodeNotInGraphSnafu { id })
    }

    pub fn sexpr(&self, id: NodeId) -> Result<&str> {
        self.node(id).map(Node::sexpr)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_ok()
    }

    /// Live node with the given canonical form.
    pub fn find(&self, sexpr: &str) -> Option<NodeId> {
        self.index.get(sexpr).copied()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Upper bound on node ids handed out so far.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| slot.as_ref().map(|node| (NodeId::from_index(i), node)))
    }

    // =========================================================================
    // Construction
    // =========================================================================

    /// Insert a detached node whose children are already in the graph.
    ///
    /// Returns the id of the live node with the same canonical form when one exists;
    /// callers must use the returned id rather than assume a new node was created.
    pub fn insert(&mut self, mut node: Node) -> Result<NodeId> {
        let sexpr = self.render(&node)?;
        if let Some(existing) = self.find(&sexpr) {
            tracing::trace!(node.id = %existing, node.sexpr = %sexpr, "merged with existing node");
            return Ok(existing);
        }

        let id = NodeId::from_index(self.slots.len());
        for child in node.children().iter().copied().unique() {
            self.node_mut(child)?.parents.push(id);
        }

        tracing::trace!(node.id = %id, node.sexpr = %sexpr, "inserted node");
        node.parents.clear();
        node.sexpr = sexpr.clone();
        self.index.insert(sexpr, id);
        self.slots.push(Some(node));
        self.live += 1;
        Ok(id)
    }

    /// Insert `node` and register it as a root expression.
    pub fn add_root(&mut self, node: Node) -> Result<NodeId> {
        let id = self.insert(node)?;
        self.mark_root(id)?;
        Ok(id)
    }

    /// Register an existing node as a root expression.
    pub fn mark_root(&mut self, id: NodeId) -> Result<RootIndex> {
        self.node(id)?;
        self.roots.push(id);
        Ok(RootIndex(self.roots.len() - 1))
    }

    // =========================================================================
    // Roots and traversal
    // =========================================================================

    /// Current node of a root slot.
    pub fn root(&self, index: RootIndex) -> Result<NodeId> {
        self.roots.get(index.0).copied().context(RootOutOfRangeSnafu { index: index.0, count: self.roots.len() })
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn is_root(&self, id: NodeId) -> bool {
        self.roots.contains(&id)
    }

    /// Every node reachable from a root, children before parents, each once.
    pub fn reachable_post_order(&self) -> Vec<NodeId> {
        self.post_order_from(self.roots.iter().copied())
    }

    pub(crate) fn post_order_from(&self, starts: impl IntoIterator<Item = NodeId>) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        let mut stack: Vec<(NodeId, bool)> = starts.into_iter().map(|id| (id, false)).collect();
        stack.reverse();

        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            if !visited.insert(id) {
                continue;
            }
            let Ok(node) = self.node(id) else { continue };
            stack.push((id, true));
            stack.extend(node.children().iter().rev().map(|&child| (child, false)));
        }
        order
    }

    /// Free every node not reachable from a root. Returns the number of freed nodes.
    pub fn collect_garbage(&mut self) -> usize {
        let reachable: HashSet<NodeId> = self.reachable_post_order().into_iter().collect();
        let dead: Vec<NodeId> = self.iter().map(|(id, _)| id).filter(|id| !reachable.contains(id)).collect();

        for &id in &dead {
            let Some(node) = self.slots[id.index()].take() else { continue };
            self.live -= 1;
            if self.index.get(&node.sexpr) == Some(&id) {
                self.index.remove(&node.sexpr);
            }
            for &child in node.children() {
                if let Some(Some(child_node)) = self.slots.get_mut(child.index()) {
                    child_node.parents.retain(|parent| *parent != id);
                }
            }
        }

        tracing::debug!(collected = dead.len(), live = self.live, "collected unreachable nodes");
        dead.len()
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Canonical s-expression of a detached or live node.
    ///
    /// Literals render as their value (`:` for null); calls as `(name child...)` using
    /// the children's stored canonical forms.
    pub(crate) fn render(&self, node: &Node) -> Result<String> {
        if !node.kind().is_call() {
            return Ok(node.render_literal());
        }
        let mut out = String::from("(");
        push_call_name(&mut out, node.name());
        for &child in node.children() {
            out.push(' ');
            out.push_str(self.sexpr(child)?);
        }
        out.push(')');
        Ok(out)
    }

    /// Compact ASCII tree of the subgraph under `id`.
    pub fn tree(&self, id: NodeId) -> String {
        render_tree_compact(self, id)
    }

    /// ASCII tree of the subgraph under `id` with shared nodes expanded.
    pub fn tree_full(&self, id: NodeId) -> String {
        render_tree_full(self, id)
    }
}
