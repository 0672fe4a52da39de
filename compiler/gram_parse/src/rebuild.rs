//! Turning interned match fragments back into `Parse` trees.
//!
//! Fragments carry no pattern. The pattern is walked alongside them, which
//! also checks that every fragment has the shape its pattern calls for.

use gram_ir::{Grammar, Parse, ParseNode, PatternId, PatternKind};
use gram_stack::ensure_sufficient_stack;

use crate::cache::{Caches, MatchId, MatchNode};

pub(crate) struct Rebuilder<'a, 'g, V> {
    grammar: &'g Grammar,
    caches: &'a Caches<V>,
}

impl<'a, 'g, V: Clone + Eq + std::hash::Hash> Rebuilder<'a, 'g, V> {
    pub(crate) fn new(grammar: &'g Grammar, caches: &'a Caches<V>) -> Self {
        Rebuilder { grammar, caches }
    }

    pub(crate) fn rebuild(&self, pattern: PatternId, matched: MatchId) -> Result<Parse<'g, V>, String> {
        ensure_sufficient_stack(|| self.rebuild_inner(pattern, matched))
    }

    fn boxed(&self, pattern: PatternId, matched: MatchId) -> Result<Box<Parse<'g, V>>, String> {
        self.rebuild(pattern, matched).map(Box::new)
    }

    fn rebuild_inner(&self, pattern: PatternId, matched: MatchId) -> Result<Parse<'g, V>, String> {
        let grammar = self.grammar;
        let node = grammar.pattern(pattern);
        let parsed = match (node.kind(), self.caches.matches.get(matched)) {
            (PatternKind::Consume { .. }, MatchNode::Consume(value)) => {
                ParseNode::Consume(self.caches.values.get(*value).clone())
            }
            (PatternKind::Sequence { children }, MatchNode::Sequence(items))
                if children.len() == items.len() =>
            {
                let items = children
                    .iter()
                    .zip(items)
                    .map(|(&child, &item)| self.rebuild(child, item))
                    .collect::<Result<_, _>>()?;
                ParseNode::Sequence(items)
            }
            (PatternKind::Or { alternatives, .. }, MatchNode::Or { index, choice }) => {
                let Some(&alternative) = alternatives.get(*index) else {
                    return Err(format!("{pattern}: no alternative {index}"));
                };
                ParseNode::Or {
                    index: *index,
                    choice: self.boxed(alternative, *choice)?,
                }
            }
            (PatternKind::Many { item, separator }, MatchNode::Many { items, separators }) => {
                let items = items
                    .iter()
                    .map(|&matched| self.rebuild(*item, matched))
                    .collect::<Result<_, _>>()?;
                let separators = match separator {
                    Some(separator) => separators
                        .iter()
                        .map(|&matched| self.rebuild(*separator, matched))
                        .collect::<Result<_, _>>()?,
                    None if separators.is_empty() => Vec::new(),
                    None => return Err(format!("{pattern}: separators without a separator pattern")),
                };
                ParseNode::Many { items, separators }
            }
            (PatternKind::Option { item }, MatchNode::Option(present)) => ParseNode::Option(
                present
                    .map(|matched| self.boxed(*item, matched))
                    .transpose()?,
            ),
            (PatternKind::Thunk { rule }, MatchNode::Thunk(inner)) => {
                ParseNode::Thunk(self.boxed(grammar.resolve(*rule), *inner)?)
            }
            (PatternKind::Indent { child }, MatchNode::Indent(inner)) => {
                ParseNode::Indent(self.boxed(*child, *inner)?)
            }
            (PatternKind::Group { child }, MatchNode::Group(inner)) => {
                ParseNode::Group(self.boxed(*child, *inner)?)
            }
            (PatternKind::If { child, .. }, MatchNode::If(inner)) => {
                ParseNode::If(self.boxed(*child, *inner)?)
            }
            (PatternKind::Literal { .. }, MatchNode::Literal) => ParseNode::Literal,
            (PatternKind::Line { .. }, MatchNode::Line) => ParseNode::Line,
            (kind, fragment) => {
                return Err(format!(
                    "{pattern}: {} pattern cannot hold {fragment:?}",
                    kind.tag()
                ));
            }
        };
        Ok(Parse::new(node, parsed))
    }
}
