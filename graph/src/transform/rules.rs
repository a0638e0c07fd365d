use itertools::Itertools;
use smallvec::SmallVec;
use snafu::ensure;

use crate::error::{Result, SelfAliasSnafu, UnexpectedVariantSnafu};
use crate::factory::CallFactory;
use crate::merge::MergeGraph;
use crate::node::{NodeId, NodeKind};
use crate::reporter::{Reporter, Severity};

/// Apply the node's own rewrite. Returns whether the graph changed.
///
/// Plain calls and literals never rewrite themselves; their children are reached
/// earlier in the same pass.
pub fn transform_node(
    graph: &mut MergeGraph,
    id: NodeId,
    factory: &CallFactory,
    reporter: &mut Reporter,
) -> Result<bool> {
    let node = graph.node(id)?;
    match node.kind() {
        NodeKind::Abelian { ordered: false, .. } => order_abelian(graph, id, factory, reporter),
        NodeKind::Alias { into } => {
            let into = into.clone();
            inline_alias(graph, id, &into, factory)
        }
        _ => Ok(false),
    }
}

fn order_abelian(graph: &mut MergeGraph, id: NodeId, factory: &CallFactory, reporter: &mut Reporter) -> Result<bool> {
    let node = graph.node(id)?;
    let name = node.name().to_owned();
    let children: SmallVec<[NodeId; 4]> = node.children().iter().copied().collect();

    let mut keyed = Vec::with_capacity(children.len());
    for &child in &children {
        keyed.push((graph.sexpr(child)?, child));
    }
    let sorted: SmallVec<[NodeId; 4]> = keyed.into_iter().sorted_by(|a, b| a.0.cmp(b.0)).map(|(_, id)| id).collect();

    if sorted == children {
        if children.len() < 2 {
            let sexpr = graph.sexpr(id)?.to_owned();
            reporter.report(id, &sexpr, Severity::Warning, "commutative call with fewer than two arguments");
        }
        graph.node_mut(id)?.set_ordered(true);
        return Ok(false);
    }

    let mut replacement = factory.construct(&name)?;
    ensure!(
        matches!(replacement.kind(), NodeKind::Abelian { .. }),
        UnexpectedVariantSnafu { name, expected: "abelian", actual: replacement.kind().variant_name() }
    );
    replacement.add_children(graph, sorted)?;
    replacement.set_ordered(true);

    let new = graph.insert(replacement)?;
    tracing::debug!(node.from = %id, node.to = %new, rewrite = "order_abelian", "rewrite applied");
    graph.replace(id, new)?;
    Ok(true)
}

fn inline_alias(graph: &mut MergeGraph, id: NodeId, into: &str, factory: &CallFactory) -> Result<bool> {
    let node = graph.node(id)?;
    let name = node.name().to_owned();
    ensure!(name != into, SelfAliasSnafu { name });
    let children: SmallVec<[NodeId; 4]> = node.children().iter().copied().collect();

    let mut replacement = factory.construct(into)?;
    if let NodeKind::Alias { into: back } = replacement.kind()
        && **back == *name
    {
        return UnexpectedVariantSnafu { name: into, expected: "non-alias call", actual: "alias" }.fail();
    }
    replacement.add_children(graph, children)?;

    let new = graph.insert(replacement)?;
    tracing::debug!(node.from = %id, node.to = %new, rewrite = "inline_alias", alias.into = %into, "rewrite applied");
    graph.replace(id, new)?;
    Ok(true)
}
