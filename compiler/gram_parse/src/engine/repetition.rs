//! `many`: every repetition count the input allows.
//!
//! Each state is a partial repetition. Item states are emitted as results;
//! separator states only lead to further items. An item that ends where the
//! previous item ended made no progress and is dropped, which keeps
//! repetitions of possibly-empty items finite.

use std::collections::VecDeque;

use gram_ir::{PatternId, Token};

use super::{Continuation, Engine};
use crate::cache::{MatchNode, ResultId, ResultSet, Results};
use crate::left_rec::RecursionContext;

pub(super) fn start<'p, T: Token>(
    engine: &mut Engine<'p, T>,
    item: PatternId,
    separator: Option<PatternId>,
    index: usize,
    context: RecursionContext,
    next: Continuation<'p, T>,
) {
    let empty = engine.caches.empty_rec_map();
    let initial = engine.caches.success(
        MatchNode::Many {
            items: Vec::new(),
            separators: Vec::new(),
        },
        index,
        empty,
    );
    let mut emitted = ResultSet::default();
    emitted.insert(initial);
    Box::new(Repetition {
        item,
        separator,
        context,
        queue: VecDeque::from([State {
            result: initial,
            mark: index,
            after_item: false,
        }]),
        emitted,
        separated: ResultSet::default(),
        next,
    })
    .resume(engine);
}

#[derive(Copy, Clone)]
struct State {
    result: ResultId,
    /// Where the last accepted item ended.
    mark: usize,
    /// The next slot is a separator.
    after_item: bool,
}

struct Repetition<'p, T: Token> {
    item: PatternId,
    separator: Option<PatternId>,
    context: RecursionContext,
    queue: VecDeque<State>,
    emitted: ResultSet,
    /// Separator states already queued.
    separated: ResultSet,
    next: Continuation<'p, T>,
}

impl<'p, T: Token> Repetition<'p, T> {
    fn resume(mut self: Box<Self>, engine: &mut Engine<'p, T>) {
        let Some(state) = self.queue.pop_front() else {
            let Repetition { emitted, next, .. } = *self;
            let mut results = emitted.into_results();
            results.reverse();
            next(engine, results);
            return;
        };

        let (pattern, is_separator) = match self.separator {
            Some(separator) if state.after_item => (separator, true),
            _ => (self.item, false),
        };
        let end = engine.caches.result(state.result).end;
        let context = self.context.clone();
        engine.call(
            pattern,
            end,
            context,
            Box::new(move |engine, results| {
                self.advance(engine, state, is_separator, &results);
                self.resume(engine);
            }),
        );
    }

    fn advance(
        &mut self,
        engine: &mut Engine<'p, T>,
        state: State,
        is_separator: bool,
        results: &Results,
    ) {
        let parent = engine.caches.result(state.result);
        for &id in results {
            let result = engine.caches.result(id);
            let Some(matched) = result.success() else {
                continue;
            };
            if !is_separator && result.end == state.mark {
                continue;
            }
            let Some(partial) = parent.success() else {
                unreachable!("repetition states are successes");
            };
            let MatchNode::Many { items, separators } = engine.caches.matches.get(partial) else {
                unreachable!("repetition state must be a many match");
            };
            let (mut items, mut separators) = (items.clone(), separators.clone());
            if is_separator {
                separators.push(matched);
            } else {
                items.push(matched);
            }
            let rec_map = engine.caches.merge_rec_maps(parent.rec_map, result.rec_map);
            let extended =
                engine
                    .caches
                    .success(MatchNode::Many { items, separators }, result.end, rec_map);

            if is_separator {
                if self.separated.insert(extended) {
                    self.queue.push_back(State {
                        result: extended,
                        mark: state.mark,
                        after_item: false,
                    });
                }
            } else if self.emitted.insert(extended) {
                self.queue.push_back(State {
                    result: extended,
                    mark: result.end,
                    after_item: self.separator.is_some(),
                });
            }
        }
    }
}
