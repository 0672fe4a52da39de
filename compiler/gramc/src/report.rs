//! Source diagnostics for lexer and parser failures.

use std::ops::Range;

use ariadne::{Config, Label, Report, ReportKind, Source};
use gram_lexer::{LexError, LexToken};
use gram_parse::{FailureReport, ParseError};

use crate::language::LanguageError;

/// Renders failures against the source they came from.
#[derive(Clone, Copy, Debug)]
pub struct Reporter<'s> {
    path: &'s str,
    source: &'s str,
    color: bool,
}

impl<'s> Reporter<'s> {
    pub fn new(path: &'s str, source: &'s str) -> Self {
        Reporter {
            path,
            source,
            color: true,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Render `error`. Parse failures are placed through `tokens`, which must
    /// be the positioned tokens the parse ran on.
    pub fn language_error(&self, error: &LanguageError, tokens: &[LexToken]) -> String {
        match error {
            LanguageError::Lex(error) => self.lex_error(error),
            LanguageError::Parse(error) => self.parse_error(error, tokens),
            LanguageError::UnknownRule(_) | LanguageError::Shape(_) => {
                format!("error: {}: {error}\n", self.path)
            }
        }
    }

    pub fn lex_error(&self, error: &LexError) -> String {
        let offset = match error {
            LexError::NoMatch { offset, .. } | LexError::Stalled { offset, .. } => *offset,
            _ => return format!("error: {}: {error}\n", self.path),
        };
        let start = self.char_index(offset);
        self.render("cannot tokenize input", &[(start..start + 1, error.to_string())])
    }

    pub fn parse_error(&self, error: &ParseError<LexToken>, tokens: &[LexToken]) -> String {
        match error {
            ParseError::NoMatch(failures) => {
                let labels: Vec<_> = failures
                    .iter()
                    .map(|failure| (self.span_of(failure, tokens), failure.message.clone()))
                    .collect();
                self.render("no parse consumed the whole input", &labels)
            }
            ParseError::Internal(_) => format!("error: {}: {error}\n", self.path),
        }
    }

    /// Character range of the token a failure was recorded at, or of the
    /// last character for failures past the end.
    fn span_of(&self, failure: &FailureReport<LexToken>, tokens: &[LexToken]) -> Range<usize> {
        if let Some(token) = tokens.get(failure.position) {
            self.char_index(token.span.start)..self.char_index(token.span.end)
        } else {
            let end = self.source.chars().count();
            end.saturating_sub(1)..end
        }
    }

    /// Diagnostics count characters, spans count bytes.
    fn char_index(&self, byte: usize) -> usize {
        self.source
            .get(..byte)
            .map_or(byte, |prefix| prefix.chars().count())
    }

    fn render(&self, message: &str, labels: &[(Range<usize>, String)]) -> String {
        let offset = labels.first().map_or(0, |(span, _)| span.start);
        let report = Report::build(ReportKind::Error, self.path, offset)
            .with_config(Config::default().with_color(self.color))
            .with_message(message)
            .with_labels(
                labels
                    .iter()
                    .map(|(span, text)| Label::new((self.path, span.clone())).with_message(text)),
            )
            .finish();
        let mut out = Vec::new();
        match report.write((self.path, Source::from(self.source)), &mut out) {
            Ok(()) => String::from_utf8_lossy(&out).into_owned(),
            Err(error) => format!("error: {}: {message} ({error})\n", self.path),
        }
    }
}
