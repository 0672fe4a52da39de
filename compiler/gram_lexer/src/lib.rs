//! Gram Lexer - tokenizing source text for the parsing engine.
//!
//! A [`Lexer`] is a small state machine. Each [`State`] holds an ordered list
//! of [`Rule`]s; at every offset the rules of the state on top of the state
//! stack are tried in order and the first one that matches there wins. A rule
//! may discard its match, and may switch, push or pop the current state.
//!
//! The produced [`LexToken`]s carry their type, captured values and byte span,
//! and plug into the engine through the `gram_ir` token seams.

mod error;
mod lexer;
mod rule;
mod token;

pub use error::LexError;
pub use lexer::{Lexer, State, TokenizeOptions};
pub use rule::{keyword, Action, Rule};
pub use token::{LexToken, Span};
