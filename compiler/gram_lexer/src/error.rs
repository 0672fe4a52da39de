//! Lexer errors.

/// Why a lexer could not be built or could not tokenize its input.
#[derive(Clone, Debug, thiserror::Error)]
pub enum LexError {
    #[error("a lexer needs at least one state")]
    NoStates,
    #[error("lexer state '{0}' has no rules")]
    EmptyState(String),
    #[error("lexer state '{0}' isn't defined")]
    UnknownState(String),
    #[error("rule '{rule}' has an invalid pattern: {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },
    #[error("lexer stalled at byte {offset}: rule '{rule}' matched nothing and takes no action")]
    Stalled { rule: String, offset: usize },
    #[error("no rule of state '{state}' matches at byte {offset}")]
    NoMatch { state: String, offset: usize },
    #[error("rule '{rule}' pops the last state '{state}'")]
    PopEmpty { rule: String, state: String },
}
