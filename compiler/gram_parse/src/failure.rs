//! Failure values and the caller-facing error surface.
//!
//! Failures are ordinary results inside the engine. They only become an error
//! when no derivation consumes the whole input, at which point every distinct
//! failure is turned into a [`FailureReport`].

use std::fmt;

/// Why a recognizer did not match.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The left-recursion depth bound for a recognizer was exceeded.
    InfiniteRecursion,
    /// A derivation stopped before the end of the input.
    TokensRemaining { count: usize },
    /// A terminal was expected after the last token.
    TokensExhausted { expected: String },
    /// The token at `found` has a different type than `expected`.
    UnexpectedToken { expected: String, found: usize },
    /// No alternative of the labeled `or` succeeded.
    AlternativeFailed { label: String },
}

/// A failure resolved against the token stream.
#[derive(Clone, Debug, PartialEq)]
pub struct FailureReport<T> {
    pub kind: FailureKind,
    /// Token index the failure was recorded at.
    pub position: usize,
    /// A few tokens starting at `position`.
    pub lookahead: Vec<T>,
    /// Human-readable description.
    pub message: String,
}

impl<T: Clone + fmt::Debug> FailureReport<T> {
    pub(crate) fn new(kind: FailureKind, position: usize, tokens: &[T], lookahead: usize) -> Self {
        let message = describe(&kind, tokens);
        let end = position.saturating_add(lookahead).min(tokens.len());
        let lookahead = tokens.get(position..end).map(<[T]>::to_vec).unwrap_or_default();
        FailureReport {
            kind,
            position,
            lookahead,
            message,
        }
    }
}

impl<T> fmt::Display for FailureReport<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at token {})", self.message, self.position)
    }
}

fn describe<T: fmt::Debug>(kind: &FailureKind, tokens: &[T]) -> String {
    match kind {
        FailureKind::InfiniteRecursion => "Infinite left recursion".to_owned(),
        FailureKind::TokensRemaining { count } => {
            format!("Failed to consume all input tokens. The {count} remaining.")
        }
        FailureKind::TokensExhausted { expected } => {
            format!("Expected token '{expected}', but all tokens were already consumed")
        }
        FailureKind::UnexpectedToken { expected, found } => match tokens.get(*found) {
            Some(token) => format!("Expected token '{expected}', but found: {token:?}"),
            None => format!("Expected token '{expected}', but found token {found}"),
        },
        FailureKind::AlternativeFailed { label } => {
            format!("Failed to match 'or' pattern: {label}")
        }
    }
}

/// Outcome of a parse that produced no usable derivation.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ParseError<T> {
    /// No derivation consumed the whole input; every distinct failure reached.
    #[error("no derivation consumed the whole input{}", bulleted(.0))]
    NoMatch(Vec<FailureReport<T>>),
    /// The engine's own bookkeeping was inconsistent. Not caused by the input.
    #[error("internal parser error: {0}")]
    Internal(String),
}

impl<T> ParseError<T> {
    /// Reports for a [`ParseError::NoMatch`], empty otherwise.
    pub fn failures(&self) -> &[FailureReport<T>] {
        match self {
            ParseError::NoMatch(failures) => failures,
            ParseError::Internal(_) => &[],
        }
    }
}

fn bulleted<T>(failures: &[FailureReport<T>]) -> String {
    let mut out = String::new();
    for failure in failures {
        out.push_str("\n  - ");
        out.push_str(&failure.to_string());
    }
    out
}
