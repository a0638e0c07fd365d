use crate::test::helpers::*;
use crate::*;

#[test]
fn test_operator_validation_reports_errors() {
    let factory = factory();
    let mut graph = MergeGraph::new();
    let x = lit(&mut graph, "x");
    let prefix = call(&mut graph, &factory, "prefix", &[x]);
    graph.mark_root(prefix).unwrap();
    let mut reporter = Reporter::new();

    let checked = validate_graph(&graph, ValidationStage::PreTransform, &mut reporter).unwrap();

    assert_eq!(checked, 2);
    assert_eq!(reporter.error_count(), 1);
    let diagnostic = &reporter.diagnostics()[0];
    assert_eq!(diagnostic.node, prefix);
    assert_eq!(diagnostic.sexpr, "(prefix 'x')");
    assert_eq!(diagnostic.severity, Severity::Error);
}

#[test]
fn test_operator_validation_reports_warnings() {
    let factory = factory();
    let mut graph = MergeGraph::new();
    let a = lit(&mut graph, "a");
    let b = lit(&mut graph, "b");
    let forward = call(&mut graph, &factory, "forward", &[a, b]);
    graph.mark_root(forward).unwrap();
    let mut reporter = Reporter::new();

    validate_graph(&graph, ValidationStage::PreTransform, &mut reporter).unwrap();

    assert_eq!(reporter.warning_count(), 1);
    assert!(!reporter.has_errors());
}

#[test]
fn test_map_without_input() {
    let factory = factory();
    let mut graph = MergeGraph::new();
    let lower = call(&mut graph, &factory, "lower", &[]);
    graph.mark_root(lower).unwrap();
    let mut reporter = Reporter::new();

    validate_graph(&graph, ValidationStage::PreTransform, &mut reporter).unwrap();

    assert_eq!(reporter.error_count(), 1);
    assert_eq!(reporter.diagnostics()[0].message, "map call without an input");
}

#[test]
fn test_alias_is_an_error_only_after_transform() {
    let factory = factory();
    let mut graph = MergeGraph::new();
    let a = lit(&mut graph, "a");
    let alias = call(&mut graph, &factory, "fwd", &[a]);
    graph.mark_root(alias).unwrap();

    let mut reporter = Reporter::new();
    validate_graph(&graph, ValidationStage::PreTransform, &mut reporter).unwrap();
    assert!(reporter.is_empty());

    validate_graph(&graph, ValidationStage::PostTransform, &mut reporter).unwrap();
    assert_eq!(reporter.error_count(), 1);
    assert!(reporter.diagnostics()[0].message.contains("'forward'"));
}

#[test]
fn test_normalize_runs_validation_without_failing() {
    let factory = factory();
    let mut graph = MergeGraph::new();
    let x = lit(&mut graph, "x");
    let prefix = call(&mut graph, &factory, "prefix", &[x]);
    graph.mark_root(prefix).unwrap();

    let mut reporter = Reporter::new();
    normalize(&mut graph, &factory, &mut reporter, &TransformConfig::default()).unwrap();
    assert_eq!(reporter.error_count(), 2, "reported before and after rewriting");

    let mut quiet = Reporter::new();
    let config = TransformConfig::builder().validate(false).build();
    normalize(&mut graph, &factory, &mut quiet, &config).unwrap();
    assert!(quiet.is_empty());
}

#[test]
fn test_stage_display() {
    assert_eq!(ValidationStage::PreTransform.to_string(), "pre-transform");
    assert_eq!(ValidationStage::PostTransform.to_string(), "post-transform");
}
