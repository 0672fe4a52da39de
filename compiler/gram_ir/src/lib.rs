//! Gram IR - the pattern algebra shared by every gram crate.
//!
//! A grammar is declared once, through a [`GrammarBuilder`], as a set of named
//! rules whose bodies are [`Pattern`](PatternNode) trees. The same grammar then
//! drives parsing (`gram_parse`), printing (`gram_fmt`) and shape conversion
//! (`gram_shape`).
//!
//! # Layout
//!
//! - [`ids`]: `PatternId`, `RuleId`, `LabelId` index newtypes
//! - [`pattern`]: the pattern node and its kinds
//! - [`grammar`]: the immutable arena every id points into
//! - [`builder`]: construction, attribute setters, rule binding and validation
//! - [`parse`]: the reconstructed match tree handed to printer and shaper
//! - [`token`]: the seams through which tokens reach the engine and printer
//!
//! Patterns reference each other by id only. Cycles are closed through
//! `Thunk` patterns that name a rule, so the arena itself stays acyclic data.

pub mod builder;
pub mod grammar;
pub mod ids;
pub mod parse;
pub mod pattern;
pub mod token;

pub use builder::{GrammarBuilder, GrammarError};
pub use grammar::Grammar;
pub use ids::{LabelId, PatternId, RuleId};
pub use parse::{Parse, ParseNode};
pub use pattern::{Layout, LineKind, OrMode, PatternKind, PatternNode, RecognizerKey, MERGE};
pub use token::{Token, TokenText};
