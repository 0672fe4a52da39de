//! `sequence`: children in order, round by round.
//!
//! Round `k` extends every partial derivation that survived round `k - 1`
//! with each result of child `k` at that derivation's end. Failed extensions
//! are set aside and returned alongside the complete derivations.

use gram_ir::{PatternId, Token};
use smallvec::smallvec;

use super::{Continuation, Engine};
use crate::cache::{MatchId, MatchNode, ParseResult, ResultSet, Results};
use crate::left_rec::RecursionContext;

pub(super) fn start<'p, T: Token>(
    engine: &mut Engine<'p, T>,
    children: &'p [PatternId],
    index: usize,
    context: RecursionContext,
    next: Continuation<'p, T>,
) {
    let empty = engine.caches.empty_rec_map();
    let initial = engine
        .caches
        .success(MatchNode::Sequence(Vec::new()), index, empty);
    Box::new(Sequence {
        children,
        context,
        step: 0,
        pending: smallvec![initial],
        cursor: 0,
        following: ResultSet::default(),
        finished: ResultSet::default(),
        next,
    })
    .resume(engine);
}

struct Sequence<'p, T: Token> {
    children: &'p [PatternId],
    context: RecursionContext,
    /// Child being matched this round.
    step: usize,
    /// Results of the previous round.
    pending: Results,
    cursor: usize,
    /// Results of this round.
    following: ResultSet,
    /// Failures from earlier rounds.
    finished: ResultSet,
    next: Continuation<'p, T>,
}

impl<'p, T: Token> Sequence<'p, T> {
    fn resume(mut self: Box<Self>, engine: &mut Engine<'p, T>) {
        while self.step < self.children.len() {
            while let Some(&id) = self.pending.get(self.cursor) {
                self.cursor += 1;
                let result = engine.caches.result(id);
                let Some(prefix) = result.success() else {
                    self.finished.insert(id);
                    continue;
                };
                let child = self.children[self.step];
                let context = self.context.clone();
                engine.call(
                    child,
                    result.end,
                    context,
                    Box::new(move |engine, results| {
                        self.extend(engine, result, prefix, &results);
                        self.resume(engine);
                    }),
                );
                return;
            }
            self.pending = std::mem::take(&mut self.following).into_results();
            self.cursor = 0;
            self.step += 1;
        }

        let Sequence {
            pending,
            finished,
            next,
            ..
        } = *self;
        let mut out = ResultSet::default();
        out.extend(pending);
        out.extend(finished.into_results());
        next(engine, out.into_results());
    }

    fn extend(
        &mut self,
        engine: &mut Engine<'p, T>,
        prefix_result: ParseResult,
        prefix: MatchId,
        results: &Results,
    ) {
        for &id in results {
            let result = engine.caches.result(id);
            let Some(matched) = result.success() else {
                self.following.insert(id);
                continue;
            };
            let MatchNode::Sequence(items) = engine.caches.matches.get(prefix) else {
                unreachable!("sequence prefix must be a sequence match");
            };
            let mut items = items.clone();
            items.push(matched);
            let rec_map = engine
                .caches
                .merge_rec_maps(prefix_result.rec_map, result.rec_map);
            let extended = engine
                .caches
                .success(MatchNode::Sequence(items), result.end, rec_map);
            self.following.insert(extended);
        }
    }
}
