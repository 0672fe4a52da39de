//! A small XML: elements, attributes, comments and character data.
//!
//! Element closings are remapped by [`XmlCodec`] so that element shapes read
//! naturally: a self-closing element has an empty `content` list, an open
//! element has `content` and `closingTag` fields.

use gram_ir::{Grammar, GrammarBuilder, GrammarError, Layout, LineKind};
use gram_lexer::{LexError, LexToken, Lexer, Rule, State};
use gram_shape::{OrValue, ShapeCodec, ShapeError};
use serde_json::{json, Value};

use super::DefinitionError;
use crate::language::{Language, TokenCodec};

/// Label of the `or` choosing between `/>` and a closing tag.
pub const ELEMENT_CLOSING: &str = "ElementClosing";

/// Label of the `or` choosing the kind of element content.
pub const ELEMENT_CONTENT: &str = "ElementContent";

pub fn lexer() -> Result<Lexer, LexError> {
    Lexer::new([
        State::new(
            "main",
            [
                Rule::new("comment", "<!--(.*?)-->"),
                Rule::literal("</").next("inside"),
                Rule::literal("<").next("inside"),
                Rule::new("charData", "([^<&]+)"),
            ],
        ),
        State::new(
            "inside",
            [
                Rule::new("whitespace", r"[ \t\r\n]").discard(),
                Rule::new("string", r#""([^<"]*)""#),
                Rule::new("name", "([a-zA-Z0-9]+)"),
                Rule::literal("="),
                Rule::literal(">").next("main"),
                Rule::literal("/>").next("main"),
            ],
        ),
    ])
}

pub fn grammar() -> Result<Grammar, GrammarError> {
    let b = GrammarBuilder::new();

    let attributes = b.named(
        b.many_separated(b.rule("attribute"), b.line(LineKind::Default)),
        "attributes",
    );
    let open = b.sequence([
        b.consume(">"),
        b.labeled(
            b.named(b.many(b.rule("elementContent")), "content"),
            "contentItem",
        ),
        b.consume("</"),
        b.consume_named("name", "closingTag"),
        b.consume(">"),
    ]);
    let closing = b.labeled(
        b.named(
            b.typed_or([("selfClosing", b.consume("/>")), ("open", open)]),
            "content",
        ),
        ELEMENT_CLOSING,
    );
    b.define(
        "element",
        b.sequence([
            b.consume("<"),
            b.consume_named("name", "tag"),
            b.indent(b.when(
                b.group(attributes),
                "attributes",
                Some(Layout::Line(LineKind::Default)),
                None,
            )),
            closing,
        ]),
    );

    let comment = b.select(
        b.sequence([
            b.literal("<!--"),
            b.consume_named("comment", "text"),
            b.literal("-->"),
        ]),
        "text",
    );
    b.define(
        "elementContent",
        b.labeled(
            b.named(
                b.typed_or([
                    ("charData", b.consume_named("charData", ".")),
                    ("comment", comment),
                    ("element", b.rule("element")),
                ]),
                ".",
            ),
            ELEMENT_CONTENT,
        ),
    );

    b.define(
        "attribute",
        b.sequence([
            b.consume_named("name", "name"),
            b.consume("="),
            b.literal("\""),
            b.consume_named("string", "value"),
            b.literal("\""),
        ]),
    );

    b.build()
}

pub fn language() -> Result<Language, DefinitionError> {
    let lexer = lexer()?;
    let codec = XmlCodec {
        tokens: TokenCodec::for_lexer(&lexer),
    };
    Ok(Language::new("xml", lexer, grammar()?, "element", codec).with_extensions(&["xml"]))
}

/// Token shapes of [`TokenCodec`], plus the element closing remapping.
#[derive(Clone, Debug)]
pub struct XmlCodec {
    tokens: TokenCodec,
}

fn unknown_or(label: Option<&str>, shape: &Value) -> ShapeError {
    ShapeError::UnknownOr {
        label: label.unwrap_or("none").to_owned(),
        shape: shape.to_string(),
    }
}

impl ShapeCodec<LexToken> for XmlCodec {
    fn token_to_shape(&self, token: &LexToken) -> Value {
        self.tokens.token_to_shape(token)
    }

    fn shape_to_token(&self, shape: &Value, terminal: &str) -> Result<LexToken, ShapeError> {
        self.tokens.shape_to_token(shape, terminal)
    }

    fn terminal_token(&self, terminal: &str) -> LexToken {
        self.tokens.terminal_token(terminal)
    }

    fn or_value_to_shape(&self, value: OrValue, label: Option<&str>) -> Result<Value, ShapeError> {
        match (label, value.kind.as_str()) {
            (Some(ELEMENT_CLOSING), "selfClosing") => Ok(json!([])),
            (Some(ELEMENT_CLOSING), "open") => Ok(value.value),
            (Some(ELEMENT_CONTENT), _) => Ok(value.into_shape()),
            _ => Err(unknown_or(label, &value.into_shape())),
        }
    }

    fn or_shape_to_value(&self, shape: &Value, label: Option<&str>) -> Result<OrValue, ShapeError> {
        match label {
            Some(ELEMENT_CLOSING) => Ok(match shape {
                Value::Object(_) => OrValue {
                    kind: "open".to_owned(),
                    value: shape.clone(),
                },
                _ => OrValue {
                    kind: "selfClosing".to_owned(),
                    value: Value::Null,
                },
            }),
            Some(ELEMENT_CONTENT) => OrValue::from_shape(shape),
            _ => Err(unknown_or(label, shape)),
        }
    }
}

#[cfg(test)]
mod tests;
