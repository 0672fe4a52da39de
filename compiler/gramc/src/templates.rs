//! Building source text and shapes from templates.
//!
//! A template is a list of [`Part`]s: literal source text, and shapes to be
//! printed through one of the language's rules. Rendering splices the printed
//! shapes into the text. Building a node goes one step further and parses the
//! rendered text back into a shape, which makes templates a convenient way to
//! write shapes in the language's own syntax.

use serde_json::Value;

use crate::language::{Language, LanguageError};

/// One piece of a template.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Part<'a> {
    Text(&'a str),
    /// `shape`, printed as the rule called `rule`.
    Node { rule: &'a str, shape: &'a Value },
}

/// Template functions for one language.
#[derive(Clone, Copy)]
pub struct Templates<'l> {
    language: &'l Language,
}

impl<'l> Templates<'l> {
    pub fn new(language: &'l Language) -> Self {
        Templates { language }
    }

    /// The template as source text.
    pub fn render(&self, parts: &[Part<'_>]) -> Result<String, LanguageError> {
        let mut out = String::new();
        for part in parts {
            match part {
                Part::Text(text) => out.push_str(text),
                Part::Node { rule, shape } => {
                    out.push_str(&self.language.print_shape(rule, shape)?);
                }
            }
        }
        Ok(out)
    }

    /// The shape of the rendered template parsed as `rule`.
    pub fn node(&self, rule: &str, parts: &[Part<'_>]) -> Result<Value, LanguageError> {
        let text = self.render(parts)?;
        let tokens = self.language.tokenize_detached(&text)?;
        let parse = self.language.parse_tokens(rule, &tokens)?;
        self.language.shape_of(&parse)
    }
}
