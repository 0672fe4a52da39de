//! Lexer rules.

/// State change performed after a rule matched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Replace the current state.
    Next(String),
    /// Enter a state, keeping the current one underneath.
    Push(String),
    /// Return to the state underneath.
    Pop,
}

/// A named token pattern.
///
/// `pattern` is a regular expression, matched only at the current offset.
/// Its capture groups become the token's values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    pub name: String,
    pub pattern: String,
    pub action: Option<Action>,
    /// Match without producing a token.
    pub discard: bool,
}

impl Rule {
    /// A rule matching its own name literally, such as `"<"` or `"/>"`.
    pub fn literal(name: impl Into<String>) -> Self {
        let name = name.into();
        let pattern = regex::escape(&name);
        Rule::new(name, pattern)
    }

    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Rule {
            name: name.into(),
            pattern: pattern.into(),
            action: None,
            discard: false,
        }
    }

    #[must_use]
    pub fn discard(mut self) -> Self {
        self.discard = true;
        self
    }

    #[must_use]
    pub fn next(mut self, state: impl Into<String>) -> Self {
        self.action = Some(Action::Next(state.into()));
        self
    }

    #[must_use]
    pub fn push(mut self, state: impl Into<String>) -> Self {
        self.action = Some(Action::Push(state.into()));
        self
    }

    #[must_use]
    pub fn pop(mut self) -> Self {
        self.action = Some(Action::Pop);
        self
    }
}

/// A rule matching the word `name` only when a word boundary follows it.
pub fn keyword(name: &str) -> Rule {
    Rule::new(name, format!(r"{}\b", regex::escape(name)))
}
