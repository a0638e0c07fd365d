use std::collections::HashSet;
use std::sync::Arc;

use snafu::ensure;
use strum::EnumCount;
use vigil_graph::{RootIndex, ValueList};

use crate::error::*;
use crate::phase::Phase;

/// A rule bound to one phase, evaluated through a root of the rule graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub id: Arc<str>,
    pub phase: Phase,
    /// Root slot of the rule's condition; survives normalization rewrites.
    pub root: RootIndex,
    /// Fire when the condition finished without producing a value.
    pub invert: bool,
}

impl Rule {
    /// Whether the condition's current output makes this rule fire.
    ///
    /// A plain rule fires as soon as its condition has a value. An inverted rule can only
    /// fire once its condition finished empty, since a later value could still arrive.
    pub fn fires(&self, values: &ValueList, finished: bool) -> bool {
        if self.invert { finished && values.is_empty() } else { !values.is_empty() }
    }
}

/// Rules of one context, grouped by phase in registration order.
#[derive(Debug, Clone)]
pub struct RuleSet {
    phases: [Vec<Rule>; Phase::COUNT],
    ids: HashSet<Arc<str>>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self { phases: std::array::from_fn(|_| Vec::new()), ids: HashSet::new() }
    }
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `rule`; ids are unique across all phases of the set.
    pub(crate) fn push(&mut self, context: &str, rule: Rule) -> Result<()> {
        ensure!(!rule.id.is_empty(), EmptyRuleIdSnafu);
        ensure!(!self.ids.contains(&rule.id), DuplicateRuleSnafu { id: rule.id.as_ref(), context });

        self.ids.insert(rule.id.clone());
        self.phases[rule.phase.index()].push(rule);
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn phase(&self, phase: Phase) -> &[Rule] {
        &self.phases[phase.index()]
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// All rules, phase by phase.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.phases.iter().flatten()
    }
}

/// Result of evaluating one rule during a phase.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutcome {
    pub rule_id: Arc<str>,
    pub phase: Phase,
    pub fired: bool,
    /// Condition output at the end of the phase.
    pub values: ValueList,
    /// Condition will not produce further values in this transaction.
    pub finished: bool,
}
