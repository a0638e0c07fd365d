use crate::error::Result;
use crate::merge::MergeGraph;
use crate::node::NodeKind;
use crate::reporter::Reporter;

/// When validation runs relative to normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ValidationStage {
    #[display("pre-transform")]
    PreTransform,
    #[display("post-transform")]
    PostTransform,
}

/// Run structural checks and operator validation over every reachable node.
///
/// Findings go to `reporter`; only a broken graph fails. Returns the number of nodes checked.
pub fn validate_graph(graph: &MergeGraph, stage: ValidationStage, reporter: &mut Reporter) -> Result<usize> {
    let order = graph.reachable_post_order();
    for &id in &order {
        let node = graph.node(id)?;
        let mut node_reporter = reporter.for_node(id, node.sexpr());
        match node.kind() {
            NodeKind::Literal(_) => {}
            NodeKind::Call(op) | NodeKind::Abelian { op, .. } => op.validate(node, &mut node_reporter),
            NodeKind::Map(op) => {
                if node.children().is_empty() {
                    node_reporter.error("map call without an input");
                }
                op.validate(node, &mut node_reporter);
            }
            NodeKind::Alias { into } => {
                if stage == ValidationStage::PostTransform {
                    node_reporter.error(format!("alias to '{into}' survived normalization"));
                }
            }
        }
    }
    tracing::debug!(%stage, nodes = order.len(), "graph validated");
    Ok(order.len())
}
