//! Grammar construction.
//!
//! [`GrammarBuilder`] owns the id counter for one grammar. Constructors take
//! `&self` so calls nest naturally:
//!
//! ```
//! use gram_ir::GrammarBuilder;
//!
//! let b = GrammarBuilder::new();
//! let list = b.sequence([
//!     b.consume("["),
//!     b.many_separated(b.rule("item"), b.consume(",")),
//!     b.consume("]"),
//! ]);
//! b.define("list", list);
//! b.define("item", b.named(b.consume("number"), "."));
//! let grammar = b.build().unwrap();
//! assert_eq!(grammar.rule("list"), Some(list));
//! ```
//!
//! Attribute setters (`named`, `labeled`, `select`, `default_value`,
//! `parallel`) return the id they were given. Misuse is recorded and reported
//! by [`GrammarBuilder::build`], so grammar declarations stay expression-shaped.

use std::cell::RefCell;

use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::grammar::Grammar;
use crate::ids::{LabelId, PatternId, RuleId};
use crate::pattern::{Layout, LineKind, OrMode, PatternKind, PatternNode};

/// Reasons a grammar fails to build.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    #[error("rule '{0}' is referenced but never defined")]
    UndefinedRule(String),
    #[error("rule '{0}' is defined more than once")]
    DuplicateRule(String),
    #[error("pattern {0} does not belong to this grammar")]
    UnknownPattern(PatternId),
    #[error("'{attribute}' cannot be applied to a {kind} pattern")]
    InvalidAttribute {
        attribute: &'static str,
        kind: &'static str,
    },
    #[error("'indented_many' requires a named many pattern")]
    UnnamedIndentedMany,
}

#[derive(Default)]
struct BuilderState {
    patterns: Vec<PatternNode>,
    rules: Vec<Option<PatternId>>,
    rule_names: Vec<String>,
    rules_by_name: FxHashMap<String, RuleId>,
    labels: Vec<String>,
    labels_by_name: FxHashMap<String, LabelId>,
    errors: Vec<GrammarError>,
}

impl BuilderState {
    fn push(&mut self, kind: PatternKind) -> PatternId {
        let id = PatternId::next(self.patterns.len());
        self.patterns.push(PatternNode::new(id, kind));
        id
    }

    fn rule_id(&mut self, name: &str) -> RuleId {
        if let Some(&rule) = self.rules_by_name.get(name) {
            return rule;
        }
        let rule = RuleId::next(self.rules.len());
        self.rules.push(None);
        self.rule_names.push(name.to_owned());
        self.rules_by_name.insert(name.to_owned(), rule);
        rule
    }

    fn label_id(&mut self, label: &str) -> LabelId {
        if let Some(&id) = self.labels_by_name.get(label) {
            return id;
        }
        let id = LabelId::next(self.labels.len());
        self.labels.push(label.to_owned());
        self.labels_by_name.insert(label.to_owned(), id);
        id
    }

    /// Run `f` on the node behind `id`, recording an error for foreign ids.
    fn with_node(
        &mut self,
        id: PatternId,
        f: impl FnOnce(&mut PatternNode) -> Option<GrammarError>,
    ) {
        let error = match self.patterns.get_mut(id.index()) {
            Some(node) => f(node),
            None => Some(GrammarError::UnknownPattern(id)),
        };
        self.errors.extend(error);
    }
}

/// Issues pattern ids and collects rule bodies for one grammar.
#[derive(Default)]
pub struct GrammarBuilder {
    state: RefCell<BuilderState>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, kind: PatternKind) -> PatternId {
        self.state.borrow_mut().push(kind)
    }

    // Matching patterns

    /// Matches one token of type `terminal`.
    pub fn consume(&self, terminal: impl Into<String>) -> PatternId {
        self.push(PatternKind::Consume {
            terminal: terminal.into(),
        })
    }

    /// `consume` with an extraction name.
    pub fn consume_named(&self, terminal: impl Into<String>, name: impl Into<String>) -> PatternId {
        let id = self.consume(terminal);
        self.named(id, name)
    }

    pub fn sequence(&self, children: impl IntoIterator<Item = PatternId>) -> PatternId {
        self.push(PatternKind::Sequence {
            children: children.into_iter().collect(),
        })
    }

    /// Ordered alternation: the first alternative that succeeds wins.
    pub fn or(&self, alternatives: impl IntoIterator<Item = PatternId>) -> PatternId {
        self.push(PatternKind::Or {
            alternatives: alternatives.into_iter().collect(),
            mode: OrMode::Ordered,
            type_names: None,
        })
    }

    /// Alternation keeping the successes of every alternative.
    pub fn parallel_or(&self, alternatives: impl IntoIterator<Item = PatternId>) -> PatternId {
        let id = self.or(alternatives);
        self.parallel(id)
    }

    /// Ordered alternation whose alternatives are tagged with shape type names.
    pub fn typed_or<S: Into<String>>(
        &self,
        alternatives: impl IntoIterator<Item = (S, PatternId)>,
    ) -> PatternId {
        let (names, alternatives): (Vec<String>, Vec<PatternId>) = alternatives
            .into_iter()
            .map(|(name, id)| (name.into(), id))
            .unzip();
        self.push(PatternKind::Or {
            alternatives,
            mode: OrMode::Ordered,
            type_names: Some(names),
        })
    }

    pub fn many(&self, item: PatternId) -> PatternId {
        self.push(PatternKind::Many {
            item,
            separator: None,
        })
    }

    pub fn many_separated(&self, item: PatternId, separator: PatternId) -> PatternId {
        self.push(PatternKind::Many {
            item,
            separator: Some(separator),
        })
    }

    pub fn option(&self, item: PatternId) -> PatternId {
        self.push(PatternKind::Option { item })
    }

    /// A thunk to the rule called `name`, which may be defined later.
    ///
    /// Every call creates a fresh thunk with its own recognizer identity.
    pub fn rule(&self, name: &str) -> PatternId {
        let mut state = self.state.borrow_mut();
        let rule = state.rule_id(name);
        state.push(PatternKind::Thunk { rule })
    }

    /// Bind `body` as the rule called `name`.
    pub fn define(&self, name: &str, body: PatternId) -> RuleId {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        let rule = state.rule_id(name);
        let slot = &mut state.rules[rule.index()];
        if slot.is_some() {
            state.errors.push(GrammarError::DuplicateRule(name.to_owned()));
        } else {
            *slot = Some(body);
        }
        rule
    }

    // Layout markers

    pub fn literal(&self, text: impl Into<String>) -> PatternId {
        self.push(PatternKind::Literal { text: text.into() })
    }

    pub fn line(&self, kind: LineKind) -> PatternId {
        self.push(PatternKind::Line { kind })
    }

    pub fn indent(&self, child: PatternId) -> PatternId {
        self.push(PatternKind::Indent { child })
    }

    pub fn group(&self, child: PatternId) -> PatternId {
        self.push(PatternKind::Group { child })
    }

    /// Print `before`/`after` around `child` only when the sub-match named
    /// `reference` is non-empty.
    pub fn when(
        &self,
        child: PatternId,
        reference: impl Into<String>,
        before: Option<Layout>,
        after: Option<Layout>,
    ) -> PatternId {
        self.push(PatternKind::If {
            child,
            reference: reference.into(),
            before,
            after,
        })
    }

    /// A named many printed on its own indented lines when non-empty:
    /// `group(if(indent(if(many, before: line)), after: line))`.
    pub fn indented_many(&self, many: PatternId, padding: LineKind) -> PatternId {
        let name = {
            let state = self.state.borrow();
            state.patterns.get(many.index()).and_then(|node| match node.kind {
                PatternKind::Many { .. } => node.name.clone(),
                _ => None,
            })
        };
        let Some(name) = name else {
            self.state
                .borrow_mut()
                .errors
                .push(GrammarError::UnnamedIndentedMany);
            return many;
        };
        let inner = self.when(many, name.clone(), Some(Layout::Line(padding)), None);
        let indented = self.indent(inner);
        let outer = self.when(indented, name, None, Some(Layout::Line(padding)));
        self.group(outer)
    }

    // Attributes

    /// Set the extraction name (`as`). `"."` merges into the parent shape.
    pub fn named(&self, id: PatternId, name: impl Into<String>) -> PatternId {
        let name = name.into();
        self.state.borrow_mut().with_node(id, |node| {
            node.name = Some(name);
            None
        });
        id
    }

    /// Set the recognizer label. Patterns sharing a label share memo entries
    /// and left-recursion bookkeeping.
    pub fn labeled(&self, id: PatternId, label: &str) -> PatternId {
        let mut state = self.state.borrow_mut();
        let label = state.label_id(label);
        state.with_node(id, |node| {
            node.label = Some(label);
            None
        });
        id
    }

    /// Pick one field out of a sequence or option shape.
    pub fn select(&self, id: PatternId, field: impl Into<String>) -> PatternId {
        let field = field.into();
        self.state.borrow_mut().with_node(id, |node| match node.kind {
            PatternKind::Sequence { .. } | PatternKind::Option { .. } => {
                node.select = Some(field);
                None
            }
            ref kind => Some(GrammarError::InvalidAttribute {
                attribute: "select",
                kind: kind.tag(),
            }),
        });
        id
    }

    /// Shape an absent option extracts to, and that injects back as absence.
    pub fn default_value(&self, id: PatternId, value: Value) -> PatternId {
        self.state.borrow_mut().with_node(id, |node| match node.kind {
            PatternKind::Option { .. } => {
                node.default = Some(value);
                None
            }
            ref kind => Some(GrammarError::InvalidAttribute {
                attribute: "default_value",
                kind: kind.tag(),
            }),
        });
        id
    }

    /// Switch an `or` to parallel mode.
    pub fn parallel(&self, id: PatternId) -> PatternId {
        self.state.borrow_mut().with_node(id, |node| match node.kind {
            PatternKind::Or { ref mut mode, .. } => {
                *mode = OrMode::Parallel;
                None
            }
            ref kind => Some(GrammarError::InvalidAttribute {
                attribute: "parallel",
                kind: kind.tag(),
            }),
        });
        id
    }

    /// Validate and freeze the grammar.
    pub fn build(self) -> Result<Grammar, GrammarError> {
        let state = self.state.into_inner();
        if let Some(error) = state.errors.into_iter().next() {
            return Err(error);
        }

        let len = state.patterns.len();
        for node in &state.patterns {
            if let Some(&bad) = children(&node.kind).iter().find(|child| child.index() >= len) {
                return Err(GrammarError::UnknownPattern(bad));
            }
        }

        let mut rules = Vec::with_capacity(state.rules.len());
        for (slot, name) in state.rules.iter().zip(&state.rule_names) {
            match slot {
                Some(body) if body.index() < len => rules.push(*body),
                Some(body) => return Err(GrammarError::UnknownPattern(*body)),
                None => return Err(GrammarError::UndefinedRule(name.clone())),
            }
        }

        Ok(Grammar {
            patterns: state.patterns,
            rules,
            rule_names: state.rule_names,
            rules_by_name: state.rules_by_name,
            labels: state.labels,
        })
    }
}

/// Direct pattern children of a kind (rule targets excluded).
fn children(kind: &PatternKind) -> Vec<PatternId> {
    match kind {
        PatternKind::Sequence { children } => children.clone(),
        PatternKind::Or { alternatives, .. } => alternatives.clone(),
        PatternKind::Many { item, separator } => {
            std::iter::once(*item).chain(*separator).collect()
        }
        PatternKind::Option { item } => vec![*item],
        PatternKind::Indent { child }
        | PatternKind::Group { child }
        | PatternKind::If { child, .. } => vec![*child],
        PatternKind::Consume { .. }
        | PatternKind::Thunk { .. }
        | PatternKind::Literal { .. }
        | PatternKind::Line { .. } => Vec::new(),
    }
}

#[cfg(test)]
mod tests;
