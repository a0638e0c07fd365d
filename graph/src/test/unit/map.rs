use crate::eval::{InputCursor, LocalState};
use crate::test::helpers::*;
use crate::*;

fn strings(values: &ValueList) -> Vec<&str> {
    values.iter().filter_map(Value::as_str).collect()
}

#[test]
fn test_map_only_new_elements() {
    let factory = factory();
    let mut graph = MergeGraph::new();
    let header = field(&mut graph, &factory, "header");
    let lower = call(&mut graph, &factory, "lower", &[header]);
    let mut state = GraphEvalState::new(&graph);
    let mut fields = TestFields::new();

    fields.push("header", "A");
    fields.push("header", "B");
    state.eval(&graph, lower, &EvalContext::new(&fields)).unwrap();
    assert_eq!(strings(state.values(lower)), ["a", "b"]);

    fields.push("header", "C");
    state.eval(&graph, lower, &EvalContext::new(&fields)).unwrap();
    assert_eq!(strings(state.values(lower)), ["a", "b", "c"]);
    assert!(!state.is_finished(lower));

    fields.finish("header");
    state.eval(&graph, lower, &EvalContext::new(&fields)).unwrap();
    assert_eq!(state.values(lower).len(), 3);
    assert!(state.is_finished(lower));
}

#[test]
fn test_cursor_tracks_consumed_input() {
    let factory = factory();
    let mut graph = MergeGraph::new();
    let header = field(&mut graph, &factory, "header");
    let lower = call(&mut graph, &factory, "lower", &[header]);
    let mut state = GraphEvalState::new(&graph);
    let mut fields = TestFields::new();
    fields.push("header", "X");
    fields.push("header", "Y");

    state.eval(&graph, lower, &EvalContext::new(&fields)).unwrap();

    let LocalState::Map(cursors) = state.node_state(lower).unwrap().local() else {
        panic!("map call without cursor state");
    };
    assert_eq!(cursors[&header], InputCursor { consumed: 2, empty_mapped: false });
}

#[test]
fn test_unmappable_values_are_dropped() {
    let factory = factory();
    let mut graph = MergeGraph::new();
    let header = field(&mut graph, &factory, "header");
    let lower = call(&mut graph, &factory, "lower", &[header]);
    let mut state = GraphEvalState::new(&graph);
    let mut fields = TestFields::new();
    fields.push("header", 7_i64);
    fields.push("header", "Z");
    fields.finish("header");

    let values = state.eval(&graph, lower, &EvalContext::new(&fields)).unwrap();
    assert_eq!(values.as_slice(), &[Value::from("z")]);
}

#[test]
fn test_map_arguments() {
    let factory = factory();
    let mut graph = MergeGraph::new();
    let prefix = lit(&mut graph, "x-");
    let header = field(&mut graph, &factory, "header");
    let mapped = call(&mut graph, &factory, "prefix", &[prefix, header]);
    let mut state = GraphEvalState::new(&graph);
    let mut fields = TestFields::new();
    fields.push("header", "one");
    fields.push("header", "two");

    let values = state.eval(&graph, mapped, &EvalContext::new(&fields)).unwrap();
    assert_eq!(strings(values), ["x-one", "x-two"]);
}

#[test]
fn test_empty_finished_input_maps_once() {
    let factory = factory();
    let mut graph = MergeGraph::new();
    let header = field(&mut graph, &factory, "header");
    let presence = call(&mut graph, &factory, "presence", &[header]);
    let mut state = GraphEvalState::new(&graph);
    let mut fields = TestFields::new();

    state.eval(&graph, presence, &EvalContext::new(&fields)).unwrap();
    assert!(state.values(presence).is_empty(), "input may still grow");
    assert!(!state.is_finished(presence));

    fields.finish("header");
    for _ in 0..3 {
        state.eval(&graph, presence, &EvalContext::new(&fields)).unwrap();
    }
    assert_eq!(state.values(presence).as_slice(), &[Value::Number(0)]);
    assert!(state.is_finished(presence));
}

#[test]
fn test_empty_input_without_forwarding() {
    let factory = factory();
    let mut graph = MergeGraph::new();
    let null = graph.insert(Node::null()).unwrap();
    let lower = call(&mut graph, &factory, "lower", &[null]);
    let mut state = GraphEvalState::new(&graph);

    let values = state.eval(&graph, lower, &EvalContext::empty()).unwrap();
    assert!(values.is_empty());
    assert!(state.is_finished(lower));
}

#[test]
fn test_non_empty_input_skips_empty_mapping() {
    let factory = factory();
    let mut graph = MergeGraph::new();
    let header = field(&mut graph, &factory, "header");
    let presence = call(&mut graph, &factory, "presence", &[header]);
    let mut state = GraphEvalState::new(&graph);
    let mut fields = TestFields::new();
    fields.push("header", "v");
    fields.finish("header");

    let values = state.eval(&graph, presence, &EvalContext::new(&fields)).unwrap();
    assert_eq!(values.as_slice(), &[Value::Number(1)]);
}

#[test]
fn test_manual_finish_map_stays_active() {
    let factory = factory();
    let mut graph = MergeGraph::new();
    let a = lit(&mut graph, "a");
    let tap = call(&mut graph, &factory, "tap", &[a]);
    let mut state = GraphEvalState::new(&graph);

    state.eval(&graph, tap, &EvalContext::empty()).unwrap();
    state.eval(&graph, tap, &EvalContext::empty()).unwrap();

    assert_eq!(state.values(tap).as_slice(), &[Value::from("a")]);
    assert_eq!(state.status(tap), EvalStatus::Active);
}

#[test]
fn test_map_without_input_fails() {
    let factory = factory();
    let mut graph = MergeGraph::new();
    let lower = call(&mut graph, &factory, "lower", &[]);
    let mut state = GraphEvalState::new(&graph);

    let err = state.eval(&graph, lower, &EvalContext::empty()).unwrap_err();
    assert_eq!(err, Error::MissingInput { name: "lower".into(), index: 0 });
}
