//! The tokenizer state machine.

use regex::Regex;
use tracing::trace;

use crate::error::LexError;
use crate::rule::{Action, Rule};
use crate::token::{LexToken, Span};

/// A named, ordered list of rules.
#[derive(Clone, Debug)]
pub struct State {
    pub name: String,
    pub rules: Vec<Rule>,
}

impl State {
    pub fn new(name: impl Into<String>, rules: impl IntoIterator<Item = Rule>) -> Self {
        State {
            name: name.into(),
            rules: rules.into_iter().collect(),
        }
    }
}

/// Tokenizer settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenizeOptions {
    /// Record byte spans. Without them every span is `0..0`, which makes
    /// tokens of equal type and values compare equal wherever they occur.
    pub track_positions: bool,
    /// State stack to start from, bottom first. Defaults to the first state.
    pub initial_state: Option<Vec<String>>,
}

impl Default for TokenizeOptions {
    fn default() -> Self {
        TokenizeOptions {
            track_positions: true,
            initial_state: None,
        }
    }
}

impl TokenizeOptions {
    #[must_use]
    pub fn without_positions(mut self) -> Self {
        self.track_positions = false;
        self
    }

    #[must_use]
    pub fn with_initial_state(mut self, stack: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.initial_state = Some(stack.into_iter().map(Into::into).collect());
        self
    }
}

struct CompiledRule {
    rule: Rule,
    regex: Regex,
    /// Index of the target state for `Next` and `Push`.
    target: Option<usize>,
}

struct CompiledState {
    name: String,
    rules: Vec<CompiledRule>,
}

/// A compiled set of lexer states.
pub struct Lexer {
    states: Vec<CompiledState>,
}

impl Lexer {
    /// Compile `states`. The first state is the default initial state.
    pub fn new(states: impl IntoIterator<Item = State>) -> Result<Self, LexError> {
        let states: Vec<State> = states.into_iter().collect();
        if states.is_empty() {
            return Err(LexError::NoStates);
        }
        let index_of = |name: &str| {
            states
                .iter()
                .position(|state| state.name == name)
                .ok_or_else(|| LexError::UnknownState(name.to_owned()))
        };

        let mut compiled = Vec::with_capacity(states.len());
        for state in &states {
            if state.rules.is_empty() {
                return Err(LexError::EmptyState(state.name.clone()));
            }
            let mut rules = Vec::with_capacity(state.rules.len());
            for rule in &state.rules {
                let regex = Regex::new(&format!("^(?:{})", rule.pattern)).map_err(|source| {
                    LexError::InvalidPattern {
                        rule: rule.name.clone(),
                        source,
                    }
                })?;
                let target = match &rule.action {
                    Some(Action::Next(name) | Action::Push(name)) => Some(index_of(name)?),
                    Some(Action::Pop) | None => None,
                };
                rules.push(CompiledRule {
                    rule: rule.clone(),
                    regex,
                    target,
                });
            }
            compiled.push(CompiledState {
                name: state.name.clone(),
                rules,
            });
        }
        Ok(Lexer { states: compiled })
    }

    /// A lexer with a single state.
    pub fn stateless(rules: impl IntoIterator<Item = Rule>) -> Result<Self, LexError> {
        Lexer::new([State::new("main", rules)])
    }

    pub fn tokenize(&self, source: &str) -> Result<Vec<LexToken>, LexError> {
        self.tokenize_with(source, &TokenizeOptions::default())
    }

    #[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len()))]
    pub fn tokenize_with(
        &self,
        source: &str,
        options: &TokenizeOptions,
    ) -> Result<Vec<LexToken>, LexError> {
        let mut stack = match &options.initial_state {
            Some(names) if !names.is_empty() => names
                .iter()
                .map(|name| self.state_index(name))
                .collect::<Result<Vec<_>, _>>()?,
            _ => vec![0],
        };

        let mut tokens = Vec::new();
        let mut offset = 0;
        while offset < source.len() {
            let Some(&current) = stack.last() else {
                break;
            };
            let state = &self.states[current];
            let rest = &source[offset..];

            let Some((compiled, captures)) = state
                .rules
                .iter()
                .find_map(|compiled| compiled.regex.captures(rest).map(|caps| (compiled, caps)))
            else {
                return Err(LexError::NoMatch {
                    state: state.name.clone(),
                    offset,
                });
            };
            let rule = &compiled.rule;
            let length = captures.get(0).map_or(0, |m| m.end());
            if length == 0 && rule.action.is_none() {
                return Err(LexError::Stalled {
                    rule: rule.name.clone(),
                    offset,
                });
            }

            if !rule.discard {
                let values = captures
                    .iter()
                    .skip(1)
                    .map(|group| group.map_or_else(String::new, |group| group.as_str().to_owned()))
                    .collect();
                let span = if options.track_positions {
                    Span::new(offset, offset + length)
                } else {
                    Span::default()
                };
                tokens.push(LexToken {
                    kind: rule.name.clone(),
                    values,
                    span,
                });
            }

            match (&rule.action, compiled.target) {
                (Some(Action::Next(_)), Some(target)) => {
                    if let Some(top) = stack.last_mut() {
                        *top = target;
                    }
                    trace!(state = %self.states[target].name, "next");
                }
                (Some(Action::Push(_)), Some(target)) => {
                    stack.push(target);
                    trace!(state = %self.states[target].name, "push");
                }
                (Some(Action::Pop), _) => {
                    if stack.len() == 1 {
                        return Err(LexError::PopEmpty {
                            rule: rule.name.clone(),
                            state: state.name.clone(),
                        });
                    }
                    stack.pop();
                    trace!(from = %state.name, "pop");
                }
                _ => {}
            }

            offset += length;
        }
        Ok(tokens)
    }

    /// Names of the states, in declaration order.
    pub fn state_names(&self) -> impl Iterator<Item = &str> {
        self.states.iter().map(|state| state.name.as_str())
    }

    /// Names of the rules whose tokens carry captured values.
    pub fn valued_kinds(&self) -> impl Iterator<Item = &str> {
        self.states
            .iter()
            .flat_map(|state| &state.rules)
            .filter(|compiled| compiled.regex.captures_len() > 1)
            .map(|compiled| compiled.rule.name.as_str())
    }

    fn state_index(&self, name: &str) -> Result<usize, LexError> {
        self.states
            .iter()
            .position(|state| state.name == name)
            .ok_or_else(|| LexError::UnknownState(name.to_owned()))
    }
}
