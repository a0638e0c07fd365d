use test_case::test_case;

use crate::merge::RootIndex;
use crate::test::helpers::*;
use crate::*;

#[test]
fn test_insert_hash_conses_literals() {
    let mut graph = MergeGraph::new();
    let a1 = lit(&mut graph, "a");
    let a2 = lit(&mut graph, "a");
    let b = lit(&mut graph, "b");

    assert_eq!(a1, a2);
    assert_ne!(a1, b);
    assert_eq!(graph.len(), 2);
}

#[test]
fn test_insert_hash_conses_calls() {
    let factory = factory();
    let mut graph = MergeGraph::new();
    let a = lit(&mut graph, "a");
    let f1 = call(&mut graph, &factory, "forward", &[a]);
    let f2 = call(&mut graph, &factory, "forward", &[a]);

    assert_eq!(f1, f2);
    assert_eq!(graph.len(), 2);
    assert_eq!(graph.find("(forward 'a')"), Some(f1));
}

#[test]
fn test_child_order_is_significant_before_normalization() {
    let factory = factory();
    let mut graph = MergeGraph::new();
    let a = lit(&mut graph, "a");
    let b = lit(&mut graph, "b");

    assert_ne!(call(&mut graph, &factory, "collect", &[a, b]), call(&mut graph, &factory, "collect", &[b, a]));
    assert_ne!(call(&mut graph, &factory, "and", &[a, b]), call(&mut graph, &factory, "and", &[b, a]));
}

#[test]
fn test_parents_are_distinct() {
    let factory = factory();
    let mut graph = MergeGraph::new();
    let a = lit(&mut graph, "a");
    let twice = call(&mut graph, &factory, "collect", &[a, a]);
    let once = call(&mut graph, &factory, "forward", &[a]);

    assert_eq!(graph.node(a).unwrap().parents(), &[twice, once]);
    assert!(graph.node(twice).unwrap().parents().is_empty());
}

#[test]
fn test_add_root_returns_canonical_node() {
    let factory = factory();
    let mut graph = MergeGraph::new();
    let a = lit(&mut graph, "a");
    let existing = call(&mut graph, &factory, "forward", &[a]);

    let node = factory.construct_with(&graph, "forward", &[a]).unwrap();
    let root = graph.add_root(node).unwrap();

    assert_eq!(root, existing);
    assert_eq!(graph.roots(), &[existing]);
    assert!(graph.is_root(existing));
}

#[test]
fn test_mark_root_handles() {
    let mut graph = MergeGraph::new();
    let a = lit(&mut graph, "a");
    let b = lit(&mut graph, "b");

    let ra = graph.mark_root(a).unwrap();
    let rb = graph.mark_root(b).unwrap();

    assert_eq!(graph.root(ra).unwrap(), a);
    assert_eq!(graph.root(rb).unwrap(), b);
    assert_eq!(rb.index(), 1);
    assert_eq!(graph.root(RootIndex(5)).unwrap_err(), Error::RootOutOfRange { index: 5, count: 2 });
}

#[test]
fn test_mark_root_requires_live_node() {
    let mut graph = MergeGraph::new();
    assert_eq!(graph.mark_root(NodeId(0)).unwrap_err(), Error::NodeNotInGraph { id: NodeId(0) });
}

#[test]
fn test_reachable_post_order_children_first() {
    let factory = factory();
    let mut graph = MergeGraph::new();
    let a = lit(&mut graph, "a");
    let b = lit(&mut graph, "b");
    let fa = call(&mut graph, &factory, "forward", &[a]);
    let root = call(&mut graph, &factory, "collect", &[fa, b, a]);
    let _unrooted = lit(&mut graph, "c");
    graph.mark_root(root).unwrap();

    assert_eq!(graph.reachable_post_order(), vec![a, fa, b, root]);
}

#[test]
fn test_reachable_post_order_shared_across_roots() {
    let factory = factory();
    let mut graph = MergeGraph::new();
    let a = lit(&mut graph, "a");
    let f = call(&mut graph, &factory, "forward", &[a]);
    let g = call(&mut graph, &factory, "collect", &[a]);
    graph.mark_root(f).unwrap();
    graph.mark_root(g).unwrap();

    assert_eq!(graph.reachable_post_order(), vec![a, f, g]);
}

#[test]
fn test_collect_garbage() {
    let factory = factory();
    let mut graph = MergeGraph::new();
    let a = lit(&mut graph, "a");
    let b = lit(&mut graph, "b");
    let kept = call(&mut graph, &factory, "forward", &[a]);
    let dropped = call(&mut graph, &factory, "collect", &[a, b]);
    graph.mark_root(kept).unwrap();

    assert_eq!(graph.collect_garbage(), 2);
    assert!(graph.contains(a));
    assert!(!graph.contains(b));
    assert!(!graph.contains(dropped));
    assert_eq!(graph.node(a).unwrap().parents(), &[kept]);
    assert_eq!(graph.find("'b'"), None);
    assert_eq!(graph.len(), 2);
}

#[test]
fn test_ids_are_never_reused() {
    let mut graph = MergeGraph::new();
    let a = lit(&mut graph, "a");
    assert_eq!(graph.collect_garbage(), 1);
    assert!(graph.is_empty());

    let again = lit(&mut graph, "a");
    assert_ne!(again, a);
    assert_eq!(graph.node(a).unwrap_err(), Error::NodeNotInGraph { id: a });
    assert_eq!(graph.slot_count(), 2);
}

#[test]
fn test_iter_skips_freed_slots() {
    let mut graph = MergeGraph::new();
    let a = lit(&mut graph, "a");
    let b = lit(&mut graph, "b");
    graph.mark_root(b).unwrap();
    graph.collect_garbage();

    let live: Vec<NodeId> = graph.iter().map(|(id, _)| id).collect();
    assert_eq!(live, vec![b]);
    assert!(!graph.contains(a));
}

#[test]
fn test_call_name_cannot_pose_as_children() {
    let mut factory = CallFactory::new();
    factory.add_call("f", All).add_call("f 'x'", AnyOf);
    let mut graph = MergeGraph::new();
    let x = lit(&mut graph, "x");

    let with_child = call(&mut graph, &factory, "f", &[x]);
    let no_child = call(&mut graph, &factory, "f 'x'", &[]);

    assert_ne!(with_child, no_child);
    assert_eq!(graph.sexpr(with_child).unwrap(), "(f 'x')");
    assert_eq!(graph.sexpr(no_child).unwrap(), "(|f 'x'|)");
    assert_eq!(graph.node(no_child).unwrap().name(), "f 'x'");
}

#[test_case("and", "(and)" ; "plain")]
#[test_case("", "(||)" ; "empty")]
#[test_case("a b", "(|a b|)" ; "whitespace")]
#[test_case("a|b", r"(|a\|b|)" ; "bar")]
#[test_case(r"a\b", r"(|a\\b|)" ; "backslash")]
#[test_case("x:", "(|x:|)" ; "colon")]
fn test_call_name_rendering(name: &str, expected: &str) {
    let mut factory = CallFactory::new();
    factory.add_call(name, All);
    let mut graph = MergeGraph::new();
    let id = call(&mut graph, &factory, name, &[]);

    assert_eq!(graph.sexpr(id).unwrap(), expected);
}

#[test]
fn test_graph_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<MergeGraph>();
    assert_send_sync::<CallFactory>();
    fn assert_send<T: Send>() {}
    assert_send::<GraphEvalState>();
}
