//! The caller-facing entry points.

use gram_ir::{Grammar, Parse, PatternId, Token};
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::cache::{Caches, Outcome, ResultId, Results};
use crate::engine::Engine;
use crate::failure::{FailureKind, FailureReport, ParseError};
use crate::rebuild::Rebuilder;

/// Parser settings.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParserConfig {
    /// Tokens shown with each failure, starting at its position.
    pub lookahead: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig { lookahead: 3 }
    }
}

impl ParserConfig {
    #[must_use]
    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead;
        self
    }
}

/// One top-level outcome, before the whole input is required to match.
#[derive(Clone, Debug, PartialEq)]
pub enum Candidate<'g, T: Token> {
    /// A derivation of the tokens before `end`.
    Success { end: usize, parse: Parse<'g, T::Value> },
    Failure(FailureReport<T>),
}

/// Runs patterns of one grammar over token streams.
///
/// Holds no state between calls: every call gets fresh caches.
///
/// A recognizer may be re-entered at one position up to once per remaining
/// token, and memoized successes are replayed only under a context at least
/// as constrained as the one that produced them. Grammars that recurse on
/// the left of one alternative stay cheap. A parallel alternation that
/// recurses on both sides of an operator, as in `expr := expr '+' expr`,
/// re-derives every split of the input and grows roughly tenfold per extra
/// operand; write it as `expr := expr '+' term` when inputs get long.
#[derive(Copy, Clone, Debug)]
pub struct Parser<'g> {
    grammar: &'g Grammar,
    config: ParserConfig,
}

impl<'g> Parser<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Parser::with_config(grammar, ParserConfig::default())
    }

    pub fn with_config(grammar: &'g Grammar, config: ParserConfig) -> Self {
        Parser { grammar, config }
    }

    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    /// The first derivation of `pattern` that consumes all of `tokens`.
    ///
    /// Without one, every distinct failure reached while exploring.
    #[tracing::instrument(level = "debug", skip_all, fields(%pattern, tokens = tokens.len()))]
    pub fn parse_one<T: Token>(
        &self,
        pattern: PatternId,
        tokens: &[T],
    ) -> Result<Parse<'g, T::Value>, ParseError<T>> {
        let mut complete = self.parse_matching(pattern, tokens, 1)?;
        complete
            .pop()
            .ok_or_else(|| ParseError::Internal("no derivation selected".to_owned()))
    }

    /// Every distinct derivation of `pattern` that consumes all of `tokens`,
    /// in discovery order.
    #[tracing::instrument(level = "debug", skip_all, fields(%pattern, tokens = tokens.len()))]
    pub fn parse_all<T: Token>(
        &self,
        pattern: PatternId,
        tokens: &[T],
    ) -> Result<Vec<Parse<'g, T::Value>>, ParseError<T>> {
        self.parse_matching(pattern, tokens, usize::MAX)
    }

    /// The raw top-level results of `pattern` at token 0, including
    /// derivations that stop early and every failure, in discovery order.
    #[tracing::instrument(level = "debug", skip_all, fields(%pattern, tokens = tokens.len()))]
    pub fn candidates<T: Token>(
        &self,
        pattern: PatternId,
        tokens: &[T],
    ) -> Result<Vec<Candidate<'g, T>>, ParseError<T>> {
        let mut engine = Engine::new(self.grammar, tokens);
        let results = self.run(&mut engine, pattern)?;
        let rebuilder = Rebuilder::new(self.grammar, &engine.caches);
        results
            .iter()
            .map(|&id| {
                let result = engine.caches.result(id);
                Ok(match result.outcome {
                    Outcome::Success(matched) => Candidate::Success {
                        end: result.end,
                        parse: rebuilder
                            .rebuild(pattern, matched)
                            .map_err(ParseError::Internal)?,
                    },
                    Outcome::Failure(failure) => Candidate::Failure(FailureReport::new(
                        engine.caches.failures.get(failure).clone(),
                        result.end,
                        tokens,
                        self.config.lookahead,
                    )),
                })
            })
            .collect()
    }

    fn run<T: Token>(
        &self,
        engine: &mut Engine<'_, T>,
        pattern: PatternId,
    ) -> Result<Results, ParseError<T>> {
        let results = engine.run(pattern).map_err(ParseError::Internal)?;
        debug!(
            results = results.len(),
            tasks = engine.stats.tasks,
            evaluations = engine.stats.evaluations,
            memo_hits = engine.stats.memo_hits,
            cutoffs = engine.stats.cutoffs,
            interned = engine.caches.size(),
            "parse finished"
        );
        Ok(results)
    }

    /// Up to `limit` full-input derivations, or the failure list.
    fn parse_matching<T: Token>(
        &self,
        pattern: PatternId,
        tokens: &[T],
        limit: usize,
    ) -> Result<Vec<Parse<'g, T::Value>>, ParseError<T>> {
        let mut engine = Engine::new(self.grammar, tokens);
        let results = self.run(&mut engine, pattern)?;
        let caches = &mut engine.caches;

        let mut complete = Vec::new();
        let mut distinct = FxHashSet::default();
        let mut failures = Vec::new();
        for &id in &results {
            let result = caches.result(id);
            match result.outcome {
                Outcome::Success(matched) if result.end == tokens.len() => {
                    if distinct.insert(matched) {
                        complete.push(matched);
                    }
                }
                Outcome::Success(_) => {
                    let count = tokens.len() - result.end;
                    failures.push(caches.failure(
                        FailureKind::TokensRemaining { count },
                        result.end,
                        result.rec_map,
                    ));
                }
                Outcome::Failure(_) => failures.push(id),
            }
        }

        if complete.is_empty() {
            return Err(ParseError::NoMatch(self.reports(caches, &failures, tokens)));
        }
        let rebuilder = Rebuilder::new(self.grammar, caches);
        complete
            .into_iter()
            .take(limit)
            .map(|matched| rebuilder.rebuild(pattern, matched).map_err(ParseError::Internal))
            .collect()
    }

    /// One report per distinct `(failure, position)`, in discovery order.
    fn reports<T: Token>(
        &self,
        caches: &Caches<T::Value>,
        failures: &[ResultId],
        tokens: &[T],
    ) -> Vec<FailureReport<T>> {
        let mut seen = FxHashSet::default();
        failures
            .iter()
            .filter_map(|&id| {
                let result = caches.result(id);
                let Outcome::Failure(failure) = result.outcome else {
                    return None;
                };
                seen.insert((failure, result.end)).then(|| {
                    FailureReport::new(
                        caches.failures.get(failure).clone(),
                        result.end,
                        tokens,
                        self.config.lookahead,
                    )
                })
            })
            .collect()
    }
}
