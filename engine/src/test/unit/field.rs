use vigil_graph::test::helpers::{call, lit};
use vigil_graph::{CallFactory, EvalContext, GraphEvalState, MergeGraph, Value};

use crate::*;

fn field_graph(name: impl Into<Value>) -> (MergeGraph, vigil_graph::NodeId) {
    let mut factory = CallFactory::new();
    factory.add_call(FIELD_CALL, FieldOperator);
    let mut graph = MergeGraph::new();
    let name = lit(&mut graph, name);
    let field = call(&mut graph, &factory, FIELD_CALL, &[name]);
    (graph, field)
}

#[test]
fn test_store_append_and_finish() {
    let mut store = FieldStore::new();
    assert!(store.get("host").is_none());

    store.append("host", "example.com").unwrap();
    store.append("host", "example.org").unwrap();
    let field = store.get("host").unwrap();
    assert_eq!(field.values, &[Value::from("example.com"), Value::from("example.org")]);
    assert!(!field.finished);

    store.finish("host");
    assert!(store.get("host").unwrap().finished);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_store_rejects_append_after_finish() {
    let mut store = FieldStore::new();
    store.finish("cookie");

    let err = store.append("cookie", "a=b").unwrap_err();
    assert_eq!(err, Error::FieldFinished { name: "cookie".to_string() });
    assert!(store.get("cookie").unwrap().values.is_empty());
}

#[test]
fn test_field_forwards_values_as_they_arrive() {
    let (graph, field) = field_graph("host");
    let mut store = FieldStore::new();
    let mut state = GraphEvalState::new(&graph);

    assert!(state.eval(&graph, field, &EvalContext::new(&store)).unwrap().is_empty());
    assert!(!state.is_finished(field));

    store.append("host", "a").unwrap();
    assert_eq!(state.eval(&graph, field, &EvalContext::new(&store)).unwrap().as_slice(), &[Value::from("a")]);

    store.append("host", "b").unwrap();
    store.finish("host");
    let values = state.eval(&graph, field, &EvalContext::new(&store)).unwrap();
    assert_eq!(values.as_slice(), &[Value::from("a"), Value::from("b")]);
    assert!(state.is_finished(field));
}

#[test]
fn test_field_with_non_string_name_finishes_empty() {
    let (graph, field) = field_graph(7_i64);
    let store = FieldStore::new();
    let mut state = GraphEvalState::new(&graph);

    assert!(state.eval(&graph, field, &EvalContext::new(&store)).unwrap().is_empty());
    assert!(state.is_finished(field));
}

#[test]
fn test_builder_registers_field_call() {
    let factory = crate::test::factory();
    assert!(!factory.contains(FIELD_CALL));

    let builder = EngineBuilder::new(factory);
    assert!(builder.factory().contains(FIELD_CALL));
}
