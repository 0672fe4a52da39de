//! Gram Parse - the parsing engine.
//!
//! Given a [`Grammar`](gram_ir::Grammar), a pattern in it and a token stream,
//! [`Parser`] finds derivations that consume the whole stream. The engine
//! explores every alternative it is allowed to (parallel `or`s, every
//! repetition count, present and absent options), supports left-recursive
//! rules, and reports every distinct failure it reached when no derivation
//! fits.
//!
//! # Layout
//!
//! - `cache`: interned results, match fragments, values, failures and
//!   left-recursion maps
//! - `left_rec`: per-path left-recursion context
//! - `engine`: the work-stack driven evaluator, one module per combinator
//! - `rebuild`: match fragments back into `Parse` trees
//! - `failure`: failure kinds, reports and [`ParseError`]
//! - `parser`: `parse_one`, `parse_all` and `candidates`

mod cache;
mod engine;
mod failure;
mod left_rec;
mod parser;
mod rebuild;

pub use failure::{FailureKind, FailureReport, ParseError};
pub use parser::{Candidate, Parser, ParserConfig};
