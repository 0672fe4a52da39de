#![allow(clippy::unwrap_used, reason = "tests unwrap built grammars and parses")]

use gram_ir::{GrammarBuilder, Layout, LineKind};
use gram_parse::Parser;
use pretty_assertions::assert_eq;

use super::*;

#[test]
fn tokens_and_literals_print_in_order() {
    let b = GrammarBuilder::new();
    let pair = b.sequence([
        b.consume("key"),
        b.literal(":"),
        b.line(LineKind::Default),
        b.consume("value"),
    ]);
    let grammar = b.build().unwrap();

    let parse = Parser::new(&grammar).parse_one(pair, &["key", "value"]).unwrap();
    assert_eq!(print(&parse, &PrintConfig::default()), "key: value");
}

#[test]
fn separators_interleave_with_items() {
    let b = GrammarBuilder::new();
    let list = b.many_separated(
        b.consume("n"),
        b.sequence([b.consume(","), b.line(LineKind::Default)]),
    );
    let grammar = b.build().unwrap();

    let parse = Parser::new(&grammar)
        .parse_one(list, &["n", ",", "n", ",", "n"])
        .unwrap();
    assert_eq!(print(&parse, &PrintConfig::default()), "n, n, n");
    assert_eq!(print(&parse, &PrintConfig::with_max_width(4)), "n,\nn,\nn");
}

#[test]
fn absent_options_print_nothing() {
    let b = GrammarBuilder::new();
    let seq = b.sequence([b.option(b.consume("pub")), b.consume("fn")]);
    let grammar = b.build().unwrap();

    let parse = Parser::new(&grammar).parse_one(seq, &["fn"]).unwrap();
    assert_eq!(print(&parse, &PrintConfig::default()), "fn");
}

#[test]
fn conditional_layout_follows_the_reference() {
    let b = GrammarBuilder::new();
    let items = b.named(b.many(b.consume("x")), "items");
    let guarded = b.when(items, "items", Some(Layout::Literal(" ".to_owned())), None);
    let seq = b.sequence([b.consume("<"), guarded, b.consume(">")]);
    let grammar = b.build().unwrap();
    let parser = Parser::new(&grammar);

    let empty = parser.parse_one(seq, &["<", ">"]).unwrap();
    assert_eq!(print(&empty, &PrintConfig::default()), "<>");

    let full = parser.parse_one(seq, &["<", "x", "x", ">"]).unwrap();
    assert_eq!(print(&full, &PrintConfig::default()), "< xx>");
}

#[test]
fn indented_many_breaks_into_one_item_per_line() {
    let b = GrammarBuilder::new();
    let many = b.named(
        b.many_separated(b.consume("item"), b.line(LineKind::Default)),
        "items",
    );
    let body = b.sequence([b.consume("{"), b.indented_many(many, LineKind::Soft), b.consume("}")]);
    let grammar = b.build().unwrap();
    let parser = Parser::new(&grammar);

    let tokens = ["{", "item", "item", "}"];
    let parse = parser.parse_one(body, &tokens).unwrap();
    assert_eq!(print(&parse, &PrintConfig::default()), "{item item}");
    assert_eq!(
        print(&parse, &PrintConfig::with_max_width(8)),
        "{\n  item\n  item\n}"
    );
}
