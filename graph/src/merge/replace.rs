use std::collections::{BTreeSet, HashSet};

use itertools::Itertools;
use smallvec::SmallVec;
use snafu::ensure;

use super::MergeGraph;
use crate::error::{CycleDetectedSnafu, Result};
use crate::node::NodeId;

impl MergeGraph {
    /// Rewire every parent and root slot referencing `old` to `new`, then free `old`.
    ///
    /// `new` may share children with `old` or be one of its descendants. Descendants of
    /// `old` left without parents are freed with it. Ancestors whose canonical form
    /// changes are re-indexed, and an ancestor that becomes structurally equal to an
    /// existing node is merged into it, so no two live nodes share a canonical form
    /// afterwards. Abelian ancestors lose their ordered mark.
    ///
    /// Fails if either node is not live or if `new` reaches `old`.
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> Result<()> {
        let old_sexpr = self.sexpr(old)?.to_owned();
        let new_sexpr = self.sexpr(new)?;
        if old == new {
            return Ok(());
        }
        ensure!(!self.reaches(new, old), CycleDetectedSnafu { id: old, sexpr: old_sexpr });

        tracing::debug!(node.from = %old_sexpr, node.to = %new_sexpr, "replacing node");
        let parents = self.redirect(old, new)?;
        self.refresh(parents)
    }

    fn reaches(&self, from: NodeId, target: NodeId) -> bool {
        let mut stack = vec![from];
        let mut seen = HashSet::new();
        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            if seen.insert(id)
                && let Ok(node) = self.node(id)
            {
                stack.extend_from_slice(node.children());
            }
        }
        false
    }

    /// Move parent edges and root slots from `from` to `to` and free `from`.
    /// Returns the former parents of `from`.
    fn redirect(&mut self, from: NodeId, to: NodeId) -> Result<SmallVec<[NodeId; 2]>> {
        let parents = std::mem::take(&mut self.node_mut(from)?.parents);
        for &parent in &parents {
            self.node_mut(parent)?.replace_child(from, to);
            let target = self.node_mut(to)?;
            if !target.parents.contains(&parent) {
                target.parents.push(parent);
            }
        }
        for root in self.roots.iter_mut().filter(|root| **root == from) {
            *root = to;
        }
        self.free(from, to);
        Ok(parents)
    }

    /// Free `id` and every descendant left with neither parents nor a root slot,
    /// except `keep`, which stays live even when orphaned.
    fn free(&mut self, id: NodeId, keep: NodeId) {
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            let Some(node) = self.slots.get_mut(id.index()).and_then(Option::take) else { continue };
            self.live -= 1;
            if self.index.get(&node.sexpr) == Some(&id) {
                self.index.remove(&node.sexpr);
            }
            tracing::trace!(node.id = %id, node.sexpr = %node.sexpr, "freed node");

            for child in node.children().iter().copied().unique() {
                let Some(Some(child_node)) = self.slots.get_mut(child.index()) else { continue };
                child_node.parents.retain(|parent| *parent != id);
                if child != keep && child_node.parents.is_empty() && !self.roots.contains(&child) {
                    pending.push(child);
                }
            }
        }
    }

    /// Recompute canonical forms of `start` and all their ancestors, children first.
    fn refresh(&mut self, start: impl IntoIterator<Item = NodeId>) -> Result<()> {
        let mut affected = BTreeSet::new();
        let mut stack: Vec<NodeId> = start.into_iter().collect();
        while let Some(id) = stack.pop() {
            if let Ok(node) = self.node(id)
                && affected.insert(id)
            {
                stack.extend_from_slice(node.parents());
            }
        }

        let stale: Vec<String> = affected
            .iter()
            .filter_map(|&id| {
                let node = self.node(id).ok()?;
                (self.index.get(node.sexpr()) == Some(&id)).then(|| node.sexpr().to_owned())
            })
            .collect();
        for key in &stale {
            self.index.remove(key);
        }

        let order: Vec<NodeId> =
            self.post_order_from(affected.iter().copied()).into_iter().filter(|id| affected.contains(id)).collect();

        for id in order {
            let Ok(node) = self.node(id) else { continue };
            let sexpr = self.render(node)?;

            match self.find(&sexpr) {
                Some(existing) if existing != id => {
                    tracing::debug!(node.from = %id, node.to = %existing, node.sexpr = %sexpr, "merging equal node");
                    self.redirect(id, existing)?;
                }
                _ => {
                    let node = self.node_mut(id)?;
                    if node.sexpr != sexpr {
                        node.set_ordered(false);
                        node.sexpr.clone_from(&sexpr);
                    }
                    self.index.insert(sexpr, id);
                }
            }
        }
        Ok(())
    }
}
