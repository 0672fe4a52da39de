//! The continuation-driven evaluator.
//!
//! Every recognizer invocation goes through [`Engine::call`], which defers it
//! onto the work stack. [`Engine::drain`] pops and runs deferred work until
//! none is left. A running task either finishes synchronously by handing a
//! result list to its continuation, or calls exactly one child and returns;
//! the child's continuation picks the work up again later. Completed
//! evaluations resume their caller through the work stack as well, so the
//! native stack depth stays constant whatever the grammar or input.
//!
//! Memoization and left-recursion bookkeeping live in [`Engine::invoke`]:
//! results are memoized per `(tokenIndex, recognizer)`, re-entering a
//! recognizer at the same position is allowed up to `remaining tokens + 1`
//! times, and a memoized success is replayed only when the caller's
//! left-recursion context is at least as constrained as the one it was
//! computed under.

mod alternation;
mod repetition;
mod sequence;

use gram_ir::{Grammar, PatternId, PatternKind, Token};
use rustc_hash::FxHashMap;
use smallvec::smallvec;
use tracing::trace;

use crate::cache::{Caches, MatchId, MatchNode, MemoKey, Outcome, RecMapId, ResultSet, Results};
use crate::failure::FailureKind;
use crate::left_rec::{is_more_constrained, RecursionContext};

/// What to do with the result list of a sub-parse. Called exactly once.
pub(crate) type Continuation<'p, T> = Box<dyn FnOnce(&mut Engine<'p, T>, Results) + 'p>;

type Task<'p, T> = Box<dyn FnOnce(&mut Engine<'p, T>) + 'p>;

/// Counters reported once the parse is over.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct Stats {
    pub tasks: usize,
    pub evaluations: usize,
    pub memo_hits: usize,
    pub cutoffs: usize,
}

pub(crate) struct Engine<'p, T: Token> {
    grammar: &'p Grammar,
    tokens: &'p [T],
    pub(crate) caches: Caches<T::Value>,
    /// Successes recorded per key, in discovery order.
    memo: FxHashMap<MemoKey, Results>,
    /// Evaluations started per key.
    left_rec_count: FxHashMap<MemoKey, u32>,
    /// Recursion map of the last infinite-recursion cut-off seen in a key's results.
    left_rec_of_result: FxHashMap<MemoKey, RecMapId>,
    work: Vec<Task<'p, T>>,
    outcome: Option<Results>,
    fault: Option<String>,
    pub(crate) stats: Stats,
}

impl<'p, T: Token> Engine<'p, T> {
    pub(crate) fn new(grammar: &'p Grammar, tokens: &'p [T]) -> Self {
        Engine {
            grammar,
            tokens,
            caches: Caches::new(),
            memo: FxHashMap::default(),
            left_rec_count: FxHashMap::default(),
            left_rec_of_result: FxHashMap::default(),
            work: Vec::new(),
            outcome: None,
            fault: None,
            stats: Stats::default(),
        }
    }

    /// Evaluate `pattern` at token 0 and return its full result list.
    pub(crate) fn run(&mut self, pattern: PatternId) -> Result<Results, String> {
        self.call(
            pattern,
            0,
            RecursionContext::new(),
            Box::new(|engine, results| engine.outcome = Some(results)),
        );
        self.drain();
        if let Some(fault) = self.fault.take() {
            return Err(fault);
        }
        self.outcome
            .take()
            .ok_or_else(|| "the top-level continuation never ran".to_owned())
    }

    fn drain(&mut self) {
        while let Some(task) = self.work.pop() {
            self.stats.tasks += 1;
            task(self);
        }
    }

    #[inline]
    fn defer(&mut self, task: impl FnOnce(&mut Engine<'p, T>) + 'p) {
        self.work.push(Box::new(task));
    }

    /// Schedule `pattern` at `index`; `next` receives its results.
    pub(crate) fn call(
        &mut self,
        pattern: PatternId,
        index: usize,
        context: RecursionContext,
        next: Continuation<'p, T>,
    ) {
        self.defer(move |engine| engine.invoke(pattern, index, context, next));
    }

    fn invoke(
        &mut self,
        pattern: PatternId,
        index: usize,
        context: RecursionContext,
        next: Continuation<'p, T>,
    ) {
        let grammar = self.grammar;
        let node = grammar.pattern(pattern);
        let key = MemoKey {
            index,
            recognizer: node.recognizer(),
        };

        if let Some(replay) = self.memo.get(&key).filter(|memo| !memo.is_empty()).cloned() {
            if self.is_reusable(key, &context) {
                self.stats.memo_hits += 1;
                trace!(?key, results = replay.len(), "memo hit");
                next(self, replay);
                return;
            }
        }

        let count = self.left_rec_count.get(&key).copied().unwrap_or(0);
        let bounded = !matches!(
            node.kind(),
            PatternKind::Thunk { .. } | PatternKind::Consume { .. }
        );
        if bounded && count as usize > self.tokens.len().saturating_sub(index) + 1 {
            let Some(active) = context.at(index) else {
                self.abort(format!(
                    "no left-recursion context at token {index} for {:?}",
                    key.recognizer
                ));
                return;
            };
            self.stats.cutoffs += 1;
            trace!(?key, count, "left recursion cut off");
            let failure = self
                .caches
                .failure(FailureKind::InfiniteRecursion, index, active);
            next(self, smallvec![failure]);
            return;
        }

        self.left_rec_count.insert(key, count + 1);
        self.stats.evaluations += 1;
        let empty = self.caches.empty_rec_map();
        let inner = context.enter(&mut self.caches.rec_maps, empty, key, count + 1);
        self.evaluate(
            pattern,
            index,
            inner,
            Box::new(move |engine, results| engine.complete(key, results, next)),
        );
    }

    fn is_reusable(&self, key: MemoKey, context: &RecursionContext) -> bool {
        let empty = self.caches.empty_rec_map();
        let current = context.at(key.index).unwrap_or(empty);
        let recorded = self.left_rec_of_result.get(&key).copied().unwrap_or(empty);
        is_more_constrained(
            self.caches.rec_maps.get(current),
            self.caches.rec_maps.get(recorded),
        )
    }

    /// Record a finished evaluation, then resume the caller from the work stack.
    fn complete(&mut self, key: MemoKey, results: Results, next: Continuation<'p, T>) {
        for &id in &results {
            let result = self.caches.result(id);
            if self.caches.is_infinite_recursion(result) {
                self.left_rec_of_result.insert(key, result.rec_map);
            }
        }

        let memo = self.memo.entry(key).or_default();
        for &id in &results {
            if self.caches.result(id).success().is_some() && !memo.contains(&id) {
                memo.push(id);
            }
        }

        self.defer(move |engine| next(engine, results));
    }

    fn abort(&mut self, fault: String) {
        self.fault = Some(fault);
        self.work.clear();
    }

    fn evaluate(
        &mut self,
        pattern: PatternId,
        index: usize,
        context: RecursionContext,
        next: Continuation<'p, T>,
    ) {
        let grammar = self.grammar;
        let node = grammar.pattern(pattern);
        match node.kind() {
            PatternKind::Consume { terminal } => self.consume(terminal, index, next),
            PatternKind::Sequence { children } => {
                sequence::start(self, children, index, context, next);
            }
            PatternKind::Or {
                alternatives, mode, ..
            } => {
                let label = node.label().map(|label| grammar.label(label));
                alternation::start(self, alternatives, *mode, label, index, context, next);
            }
            PatternKind::Many { item, separator } => {
                repetition::start(self, *item, *separator, index, context, next);
            }
            PatternKind::Option { item } => self.option(*item, index, context, next),
            PatternKind::Thunk { rule } => {
                self.wrap(grammar.resolve(*rule), index, context, MatchNode::Thunk, next);
            }
            PatternKind::Indent { child } => {
                self.wrap(*child, index, context, MatchNode::Indent, next);
            }
            PatternKind::Group { child } => {
                self.wrap(*child, index, context, MatchNode::Group, next);
            }
            PatternKind::If { child, .. } => self.wrap(*child, index, context, MatchNode::If, next),
            PatternKind::Literal { .. } => self.trivial(MatchNode::Literal, index, next),
            PatternKind::Line { .. } => self.trivial(MatchNode::Line, index, next),
        }
    }

    fn consume(&mut self, terminal: &str, index: usize, next: Continuation<'p, T>) {
        let empty = self.caches.empty_rec_map();
        let result = match self.tokens.get(index) {
            Some(token) if token.is(terminal) => {
                let value = self.caches.values.intern(token.value());
                self.caches.success(MatchNode::Consume(value), index + 1, empty)
            }
            Some(_) => self.caches.failure(
                FailureKind::UnexpectedToken {
                    expected: terminal.to_owned(),
                    found: index,
                },
                index,
                empty,
            ),
            None => self.caches.failure(
                FailureKind::TokensExhausted {
                    expected: terminal.to_owned(),
                },
                index,
                empty,
            ),
        };
        next(self, smallvec![result]);
    }

    /// Layout markers: one success, nothing consumed.
    fn trivial(&mut self, node: MatchNode, index: usize, next: Continuation<'p, T>) {
        let empty = self.caches.empty_rec_map();
        let result = self.caches.success(node, index, empty);
        next(self, smallvec![result]);
    }

    /// Single-child constructs: wrap every success, pass failures through.
    fn wrap(
        &mut self,
        child: PatternId,
        index: usize,
        context: RecursionContext,
        wrap: fn(MatchId) -> MatchNode,
        next: Continuation<'p, T>,
    ) {
        self.call(
            child,
            index,
            context,
            Box::new(move |engine, results| {
                let wrapped = results
                    .iter()
                    .map(|&id| {
                        let result = engine.caches.result(id);
                        match result.outcome {
                            Outcome::Success(matched) => {
                                engine.caches.success(wrap(matched), result.end, result.rec_map)
                            }
                            Outcome::Failure(_) => id,
                        }
                    })
                    .collect();
                next(engine, wrapped);
            }),
        );
    }

    /// Every present success, then the absent result at `index`.
    fn option(
        &mut self,
        item: PatternId,
        index: usize,
        context: RecursionContext,
        next: Continuation<'p, T>,
    ) {
        self.call(
            item,
            index,
            context,
            Box::new(move |engine, results| {
                let mut out = ResultSet::default();
                for &id in &results {
                    let result = engine.caches.result(id);
                    if let Some(matched) = result.success() {
                        out.insert(engine.caches.success(
                            MatchNode::Option(Some(matched)),
                            result.end,
                            result.rec_map,
                        ));
                    }
                }
                let empty = engine.caches.empty_rec_map();
                out.insert(engine.caches.success(MatchNode::Option(None), index, empty));
                next(engine, out.into_results());
            }),
        );
    }
}
