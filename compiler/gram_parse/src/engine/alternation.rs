//! `or`: alternatives in declaration order.
//!
//! Ordered choice stops at the first alternative that produced any success
//! and returns only that alternative's successes. Parallel choice keeps every
//! alternative's results.

use gram_ir::{OrMode, PatternId, Token};

use super::{Continuation, Engine};
use crate::cache::{MatchNode, Outcome, ResultSet, Results};
use crate::failure::FailureKind;
use crate::left_rec::RecursionContext;

pub(super) fn start<'p, T: Token>(
    engine: &mut Engine<'p, T>,
    alternatives: &'p [PatternId],
    mode: OrMode,
    label: Option<&'p str>,
    index: usize,
    context: RecursionContext,
    next: Continuation<'p, T>,
) {
    Box::new(Alternation {
        alternatives,
        mode,
        label,
        index,
        context,
        choice: 0,
        found: ResultSet::default(),
        matched: false,
        next,
    })
    .resume(engine);
}

struct Alternation<'p, T: Token> {
    alternatives: &'p [PatternId],
    mode: OrMode,
    label: Option<&'p str>,
    index: usize,
    context: RecursionContext,
    /// Alternative to try next.
    choice: usize,
    found: ResultSet,
    /// Some alternative has succeeded.
    matched: bool,
    next: Continuation<'p, T>,
}

impl<'p, T: Token> Alternation<'p, T> {
    fn resume(self: Box<Self>, engine: &mut Engine<'p, T>) {
        let Some(&alternative) = self.alternatives.get(self.choice) else {
            (*self).finish(engine);
            return;
        };
        let index = self.index;
        let context = self.context.clone();
        engine.call(
            alternative,
            index,
            context,
            Box::new(move |engine, results| self.collect(engine, &results)),
        );
    }

    fn collect(mut self: Box<Self>, engine: &mut Engine<'p, T>, results: &Results) {
        let choice = self.choice;
        self.choice += 1;

        let mut successes = ResultSet::default();
        let mut failures = ResultSet::default();
        for &id in results {
            let result = engine.caches.result(id);
            match result.outcome {
                Outcome::Success(matched) => {
                    let node = MatchNode::Or {
                        index: choice,
                        choice: matched,
                    };
                    successes.insert(engine.caches.success(node, result.end, result.rec_map));
                }
                Outcome::Failure(_) => {
                    failures.insert(id);
                }
            }
        }

        if !successes.is_empty() {
            self.matched = true;
            if self.mode == OrMode::Ordered {
                let Alternation { next, .. } = *self;
                next(engine, successes.into_results());
                return;
            }
        }
        self.found.extend(successes.into_results());
        self.found.extend(failures.into_results());
        self.resume(engine);
    }

    fn finish(self, engine: &mut Engine<'p, T>) {
        let Alternation {
            label,
            index,
            mut found,
            matched,
            next,
            ..
        } = self;
        if let (false, Some(label)) = (matched, label) {
            let empty = engine.caches.empty_rec_map();
            found.insert(engine.caches.failure(
                FailureKind::AlternativeFailed {
                    label: label.to_owned(),
                },
                index,
                empty,
            ));
        }
        next(engine, found.into_results());
    }
}
