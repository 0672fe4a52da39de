//! `gram parse`: the parse tree outline, or why there is none.

use gram_ir::{Grammar, Parse, ParseNode, PatternKind, TokenText};

use super::{document, load, reporter, CommandOptions};

pub fn parse_file(path: &str, options: &CommandOptions) -> bool {
    let Some((source, language)) = load(path, options) else {
        return false;
    };
    let text = document(&source);
    let rule = options.rule_for(&language);
    let parsed = language
        .tokenize(text)
        .map(|tokens| (language.parse_tokens(rule, &tokens), tokens));
    match parsed {
        Ok((Ok(parse), _)) => {
            print!("{}", outline(&parse, language.grammar()));
            true
        }
        Ok((Err(error), tokens)) => {
            eprint!("{}", reporter(path, text).language_error(&error, &tokens));
            false
        }
        Err(error) => {
            eprint!("{}", reporter(path, text).language_error(&error, &[]));
            false
        }
    }
}

/// One line per node, children indented under their parent.
///
/// ```text
/// sequence
///   consume "<"
///   consume "a" as tag
/// ```
pub fn outline<V: TokenText>(parse: &Parse<'_, V>, grammar: &Grammar) -> String {
    let mut out = String::new();
    let mut stack = vec![(0, parse)];
    while let Some((depth, node)) = stack.pop() {
        out.push_str(&" ".repeat(depth * 2));
        out.push_str(&describe(node, grammar));
        out.push('\n');

        let children = match node.node() {
            // Separators sit between the items they separate.
            ParseNode::Many { items, separators } => {
                let mut ordered = Vec::with_capacity(items.len() + separators.len());
                for (index, item) in items.iter().enumerate() {
                    ordered.push(item);
                    ordered.extend(separators.get(index));
                }
                ordered
            }
            _ => node.children(),
        };
        stack.extend(children.into_iter().rev().map(|child| (depth + 1, child)));
    }
    out
}

/// The outline line of one node, without indentation.
fn describe<V: TokenText>(node: &Parse<'_, V>, grammar: &Grammar) -> String {
    let pattern = node.pattern();
    let mut line = pattern.kind().tag().to_owned();
    let detail = match (pattern.kind(), node.node()) {
        (_, ParseNode::Consume(value)) => Some(format!("{:?}", value.text())),
        (PatternKind::Literal { text }, _) => Some(format!("{text:?}")),
        (PatternKind::Thunk { rule }, _) => Some(grammar.rule_name(*rule).to_owned()),
        (PatternKind::Or { type_names, .. }, ParseNode::Or { index, .. }) => Some(
            type_names
                .as_ref()
                .and_then(|names| names.get(*index))
                .map_or_else(|| format!("#{index}"), ToString::to_string),
        ),
        (_, ParseNode::Option(None)) => Some("(absent)".to_owned()),
        _ => None,
    };
    if let Some(detail) = detail {
        line.push(' ');
        line.push_str(&detail);
    }
    if let Some(name) = pattern.name() {
        line.push_str(" as ");
        line.push_str(name);
    }
    line
}
