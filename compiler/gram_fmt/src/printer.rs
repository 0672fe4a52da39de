//! `Parse` trees to documents.

use gram_ir::{Layout, Parse, ParseNode, PatternKind, TokenText};
use gram_stack::ensure_sufficient_stack;

use crate::config::PrintConfig;
use crate::doc::Doc;
use crate::render::render;

/// Print `parse` back to source text.
///
/// The whole document is wrapped in a group, so a tree that fits in
/// `config.max_width` prints on one line.
#[tracing::instrument(level = "debug", skip_all, fields(pattern = %parse.pattern().id()))]
pub fn print<V: TokenText>(parse: &Parse<'_, V>, config: &PrintConfig) -> String {
    render(&Doc::group(format(parse)), config)
}

/// The document for `parse`.
pub fn format<V: TokenText>(parse: &Parse<'_, V>) -> Doc {
    ensure_sufficient_stack(|| match parse.node() {
        ParseNode::Consume(value) => Doc::text(value.text()),
        ParseNode::Sequence(children) => Doc::concat(children.iter().map(format)),
        ParseNode::Or { choice: child, .. } | ParseNode::Thunk(child) => format(child),
        ParseNode::Many { items, separators } => {
            let mut parts = Vec::with_capacity(items.len() + separators.len());
            for (index, item) in items.iter().enumerate() {
                parts.push(format(item));
                if let Some(separator) = separators.get(index) {
                    parts.push(format(separator));
                }
            }
            Doc::concat(parts)
        }
        ParseNode::Option(child) => child.as_deref().map_or_else(Doc::nil, format),
        ParseNode::Literal => match parse.pattern().kind() {
            PatternKind::Literal { text } => Doc::text(text.as_str()),
            _ => Doc::nil(),
        },
        ParseNode::Line => match parse.pattern().kind() {
            PatternKind::Line { kind } => Doc::Line(*kind),
            _ => Doc::nil(),
        },
        ParseNode::Indent(child) => Doc::indent(format(child)),
        ParseNode::Group(child) => Doc::group(format(child)),
        ParseNode::If(child) => {
            let PatternKind::If {
                reference,
                before,
                after,
                ..
            } = parse.pattern().kind()
            else {
                return format(child);
            };
            let present = parse
                .find_named(reference)
                .is_some_and(Parse::is_truthy);
            if present {
                Doc::concat([layout(before.as_ref()), format(child), layout(after.as_ref())])
            } else {
                format(child)
            }
        }
    })
}

fn layout(layout: Option<&Layout>) -> Doc {
    match layout {
        Some(Layout::Literal(text)) => Doc::text(text.as_str()),
        Some(Layout::Line(kind)) => Doc::Line(*kind),
        None => Doc::nil(),
    }
}

#[cfg(test)]
mod tests;
