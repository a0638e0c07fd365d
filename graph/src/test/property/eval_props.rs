use proptest::prelude::*;

use super::generators::*;
use crate::test::helpers::{TestFields, factory, field};
use crate::*;

fn lowercase_graph() -> (MergeGraph, NodeId) {
    let factory = factory();
    let mut graph = MergeGraph::new();
    let header = field(&mut graph, &factory, "header");
    let map = factory.construct_with(&graph, "lower", &[header]).unwrap();
    let root = graph.add_root(map).unwrap();
    (graph, root)
}

proptest! {
    #[test]
    fn incremental_map_matches_full_evaluation(values in header_values(12), split in 0usize..=12) {
        let split = split.min(values.len());
        let (graph, root) = lowercase_graph();

        let mut fields = TestFields::new();
        let mut incremental = GraphEvalState::new(&graph);
        for value in &values[..split] {
            fields.push("header", value.as_str());
        }
        incremental.eval(&graph, root, &EvalContext::new(&fields)).unwrap();
        for value in &values[split..] {
            fields.push("header", value.as_str());
        }
        fields.finish("header");
        incremental.eval(&graph, root, &EvalContext::new(&fields)).unwrap();

        let mut full = GraphEvalState::new(&graph);
        full.eval(&graph, root, &EvalContext::new(&fields)).unwrap();

        prop_assert_eq!(incremental.values(root), full.values(root));
        prop_assert_eq!(incremental.values(root).len(), values.len());
        prop_assert!(incremental.is_finished(root));
    }

    #[test]
    fn output_only_grows(batches in prop::collection::vec(header_values(3), 1..6)) {
        let (graph, root) = lowercase_graph();
        let mut fields = TestFields::new();
        let mut state = GraphEvalState::new(&graph);
        let mut previous = ValueList::new();

        for batch in &batches {
            for value in batch {
                fields.push("header", value.as_str());
            }
            let current = state.eval(&graph, root, &EvalContext::new(&fields)).unwrap();
            prop_assert!(current.len() >= previous.len());
            prop_assert_eq!(&current.as_slice()[..previous.len()], previous.as_slice());
            prop_assert!(!state.is_finished(root));
            previous = state.values(root).clone();
        }

        fields.finish("header");
        state.eval(&graph, root, &EvalContext::new(&fields)).unwrap();
        prop_assert!(state.is_finished(root));
        prop_assert_eq!(state.values(root).len(), previous.len());
    }
}
