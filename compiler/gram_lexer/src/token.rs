//! Lexed tokens.

use std::borrow::Cow;

use serde::Serialize;

/// Byte range of a token in its source. `0..0` when positions are not tracked.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn len(self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }
}

/// A token: the name of the rule that produced it, the rule's captured
/// groups, and where it was found.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct LexToken {
    #[serde(rename = "type")]
    pub kind: String,
    pub values: Vec<String>,
    pub span: Span,
}

impl LexToken {
    /// A token with no captures and no position.
    pub fn new(kind: impl Into<String>) -> Self {
        LexToken {
            kind: kind.into(),
            values: Vec::new(),
            span: Span::default(),
        }
    }

    /// A token with a single captured value and no position.
    pub fn with_value(kind: impl Into<String>, value: impl Into<String>) -> Self {
        LexToken {
            kind: kind.into(),
            values: vec![value.into()],
            span: Span::default(),
        }
    }
}

impl gram_ir::Token for LexToken {
    type Value = LexToken;

    #[inline]
    fn is(&self, terminal: &str) -> bool {
        self.kind == terminal
    }

    fn value(&self) -> LexToken {
        self.clone()
    }
}

impl gram_ir::TokenText for LexToken {
    /// The first captured value, or the token type for tokens without captures.
    fn text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.values.first().unwrap_or(&self.kind))
    }
}
