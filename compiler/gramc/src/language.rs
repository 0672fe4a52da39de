//! Language bundles.
//!
//! A [`Language`] is everything needed to go from source text to a tree, to
//! a shape, and back: the lexer, the grammar, the codec that decides how
//! tokens and alternations look as shapes, and the print settings.

use gram_fmt::{print, PrintConfig};
use gram_ir::{Grammar, Parse, PatternId, TokenText};
use gram_lexer::{LexError, LexToken, Lexer, TokenizeOptions};
use gram_parse::{ParseError, Parser, ParserConfig};
use gram_shape::{ShapeCodec, ShapeError, Shaper};
use rustc_hash::FxHashSet;
use serde_json::Value;

/// Anything that can go wrong between source text and shapes.
#[derive(Debug, thiserror::Error)]
pub enum LanguageError {
    #[error("unknown rule '{0}'")]
    UnknownRule(String),
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError<LexToken>),
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// Shapes of lexed tokens.
///
/// A token shapes to its first captured value, or its type when it has none.
/// Going back, a token is rebuilt with the shape as its value only for token
/// types whose lexer rule captures something.
#[derive(Clone, Debug, Default)]
pub struct TokenCodec {
    valued: FxHashSet<String>,
}

impl TokenCodec {
    pub fn for_lexer(lexer: &Lexer) -> Self {
        TokenCodec {
            valued: lexer.valued_kinds().map(str::to_owned).collect(),
        }
    }

    pub fn is_valued(&self, kind: &str) -> bool {
        self.valued.contains(kind)
    }
}

impl ShapeCodec<LexToken> for TokenCodec {
    fn token_to_shape(&self, token: &LexToken) -> Value {
        Value::String(token.text().into_owned())
    }

    fn shape_to_token(&self, shape: &Value, terminal: &str) -> Result<LexToken, ShapeError> {
        if !self.is_valued(terminal) {
            return Ok(LexToken::new(terminal));
        }
        match shape {
            Value::String(text) => Ok(LexToken::with_value(terminal, text.as_str())),
            _ => Err(ShapeError::InvalidToken {
                terminal: terminal.to_owned(),
                shape: shape.to_string(),
            }),
        }
    }

    fn terminal_token(&self, terminal: &str) -> LexToken {
        if self.is_valued(terminal) {
            LexToken::with_value(terminal, terminal)
        } else {
            LexToken::new(terminal)
        }
    }
}

type Codec = Box<dyn ShapeCodec<LexToken> + Send + Sync>;

/// A lexer, grammar and shape codec that belong together.
pub struct Language {
    name: &'static str,
    extensions: &'static [&'static str],
    lexer: Lexer,
    grammar: Grammar,
    entry: &'static str,
    codec: Codec,
    print_config: PrintConfig,
    parser_config: ParserConfig,
}

impl Language {
    /// `entry` names the rule used when none is given.
    pub fn new(
        name: &'static str,
        lexer: Lexer,
        grammar: Grammar,
        entry: &'static str,
        codec: impl ShapeCodec<LexToken> + Send + Sync + 'static,
    ) -> Self {
        Language {
            name,
            extensions: &[],
            lexer,
            grammar,
            entry,
            codec: Box::new(codec),
            print_config: PrintConfig::default(),
            parser_config: ParserConfig::default(),
        }
    }

    /// File extensions, without the dot, that select this language.
    #[must_use]
    pub fn with_extensions(mut self, extensions: &'static [&'static str]) -> Self {
        self.extensions = extensions;
        self
    }

    #[must_use]
    pub fn with_print_config(mut self, config: PrintConfig) -> Self {
        self.print_config = config;
        self
    }

    #[must_use]
    pub fn with_parser_config(mut self, config: ParserConfig) -> Self {
        self.parser_config = config;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        self.extensions
    }

    pub fn entry(&self) -> &'static str {
        self.entry
    }

    pub fn lexer(&self) -> &Lexer {
        &self.lexer
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn print_config(&self) -> &PrintConfig {
        &self.print_config
    }

    /// The body of the rule called `name`.
    pub fn rule(&self, name: &str) -> Result<PatternId, LanguageError> {
        self.grammar
            .rule(name)
            .ok_or_else(|| LanguageError::UnknownRule(name.to_owned()))
    }

    pub fn tokenize(&self, source: &str) -> Result<Vec<LexToken>, LanguageError> {
        Ok(self.lexer.tokenize(source)?)
    }

    /// Tokens without positions, which compare equal to injected ones.
    pub fn tokenize_detached(&self, source: &str) -> Result<Vec<LexToken>, LanguageError> {
        let options = TokenizeOptions::default().without_positions();
        Ok(self.lexer.tokenize_with(source, &options)?)
    }

    /// Parse `source` as the rule called `rule`.
    pub fn parse(&self, rule: &str, source: &str) -> Result<Parse<'_, LexToken>, LanguageError> {
        let tokens = self.tokenize(source)?;
        self.parse_tokens(rule, &tokens)
    }

    #[tracing::instrument(
        level = "debug",
        skip(self, tokens),
        fields(language = self.name, tokens = tokens.len())
    )]
    pub fn parse_tokens(
        &self,
        rule: &str,
        tokens: &[LexToken],
    ) -> Result<Parse<'_, LexToken>, LanguageError> {
        let pattern = self.rule(rule)?;
        let parser = Parser::with_config(&self.grammar, self.parser_config);
        Ok(parser.parse_one(pattern, tokens)?)
    }

    pub fn print(&self, parse: &Parse<'_, LexToken>) -> String {
        print(parse, &self.print_config)
    }

    /// Parse and reprint `source`.
    pub fn format(&self, rule: &str, source: &str) -> Result<String, LanguageError> {
        let parse = self.parse(rule, source)?;
        Ok(self.print(&parse))
    }

    /// The shape of `source` parsed as `rule`.
    pub fn extract(&self, rule: &str, source: &str) -> Result<Value, LanguageError> {
        let parse = self.parse(rule, source)?;
        self.shape_of(&parse)
    }

    pub fn shape_of(&self, parse: &Parse<'_, LexToken>) -> Result<Value, LanguageError> {
        Ok(self.shaper().extract(parse)?)
    }

    /// A tree for `rule` with the given shape.
    pub fn inject(&self, rule: &str, shape: &Value) -> Result<Parse<'_, LexToken>, LanguageError> {
        let pattern = self.rule(rule)?;
        Ok(self.shaper().inject(pattern, shape)?)
    }

    /// Source text for `shape` as `rule`.
    pub fn print_shape(&self, rule: &str, shape: &Value) -> Result<String, LanguageError> {
        let parse = self.inject(rule, shape)?;
        Ok(self.print(&parse))
    }

    fn shaper(&self) -> Shaper<'_, &(dyn ShapeCodec<LexToken> + Send + Sync)> {
        Shaper::new(&self.grammar, self.codec.as_ref())
    }
}
