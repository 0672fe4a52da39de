//! The immutable pattern arena.

use rustc_hash::FxHashMap;

use crate::ids::{LabelId, PatternId, RuleId};
use crate::pattern::PatternNode;

/// A validated grammar: every pattern, every rule body and every label.
///
/// Built by [`GrammarBuilder::build`](crate::GrammarBuilder::build); ids handed
/// out by that builder index directly into it.
#[derive(Clone, Debug)]
pub struct Grammar {
    pub(crate) patterns: Vec<PatternNode>,
    pub(crate) rules: Vec<PatternId>,
    pub(crate) rule_names: Vec<String>,
    pub(crate) rules_by_name: FxHashMap<String, RuleId>,
    pub(crate) labels: Vec<String>,
}

impl Grammar {
    /// The pattern behind `id`.
    ///
    /// # Panics
    /// If `id` was issued by a different builder.
    #[inline]
    pub fn pattern(&self, id: PatternId) -> &PatternNode {
        &self.patterns[id.index()]
    }

    /// Body of the rule a thunk points at.
    #[inline]
    pub fn resolve(&self, rule: RuleId) -> PatternId {
        self.rules[rule.index()]
    }

    /// Body of the rule called `name`.
    pub fn rule(&self, name: &str) -> Option<PatternId> {
        self.rules_by_name.get(name).map(|&rule| self.resolve(rule))
    }

    pub fn rule_name(&self, rule: RuleId) -> &str {
        &self.rule_names[rule.index()]
    }

    /// Rule names in declaration order.
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rule_names.iter().map(String::as_str)
    }

    pub fn label(&self, label: LabelId) -> &str {
        &self.labels[label.index()]
    }

    /// Number of patterns in the arena.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
