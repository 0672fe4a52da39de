#![allow(clippy::unwrap_used, reason = "tests unwrap parse and shape results")]

use gram_ir::{Grammar, GrammarBuilder, LineKind, Parse, PatternId, Token};
use gram_parse::Parser;
use gram_shape::{ShapeError, Shaper, StringCodec};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

/// A token with a terminal type and its own text.
#[derive(Clone, Debug)]
struct Tok {
    kind: &'static str,
    text: &'static str,
}

impl Token for Tok {
    type Value = String;

    fn is(&self, terminal: &str) -> bool {
        self.kind == terminal
    }

    fn value(&self) -> String {
        self.text.to_owned()
    }
}

/// Whitespace-separated words: digits are `number`, letters are `word`,
/// anything else is its own terminal.
fn lex(source: &'static str) -> Vec<Tok> {
    source
        .split_whitespace()
        .map(|text| {
            let kind = match text.chars().next() {
                Some(c) if c.is_ascii_digit() => "number",
                Some(c) if c.is_alphabetic() => "word",
                _ => text,
            };
            Tok { kind, text }
        })
        .collect()
}

fn parse<'g>(grammar: &'g Grammar, pattern: PatternId, source: &'static str) -> Parse<'g, String> {
    Parser::new(grammar).parse_one(pattern, &lex(source)).unwrap()
}

/// `list = "[" (pair ("," pair)*)? "]"`, `pair = word ":" number`
fn list_grammar() -> (Grammar, PatternId) {
    let b = GrammarBuilder::new();
    let pair = b.sequence([
        b.consume_named("word", "key"),
        b.consume(":"),
        b.consume_named("number", "value"),
    ]);
    b.define("pair", pair);
    let list = b.sequence([
        b.consume("["),
        b.named(b.many_separated(b.rule("pair"), b.consume(",")), "items"),
        b.consume("]"),
    ]);
    b.define("list", list);
    (b.build().unwrap(), list)
}

#[test]
fn sequences_merge_named_fields() {
    let (grammar, _) = list_grammar();
    let pair = grammar.rule("pair").unwrap();
    let shaper = Shaper::new(&grammar, StringCodec);

    let shape = shaper.extract(&parse(&grammar, pair, "width : 80")).unwrap();
    assert_eq!(shape, json!({ "key": "width", "value": "80" }));
}

#[test]
fn repetitions_are_lists() {
    let (grammar, list) = list_grammar();
    let shaper = Shaper::new(&grammar, StringCodec);

    let shape = shaper.extract(&parse(&grammar, list, "[ a : 1 , b : 2 ]")).unwrap();
    assert_eq!(
        shape,
        json!({ "items": [
            { "key": "a", "value": "1" },
            { "key": "b", "value": "2" },
        ] })
    );

    let empty = shaper.extract(&parse(&grammar, list, "[ ]")).unwrap();
    assert_eq!(empty, json!({ "items": [] }));
}

#[test]
fn injecting_an_extracted_shape_gives_the_tree_back() {
    let (grammar, list) = list_grammar();
    let shaper = Shaper::new(&grammar, StringCodec);

    for source in ["[ ]", "[ a : 1 ]", "[ a : 1 , b : 2 , c : 3 ]"] {
        let tree = parse(&grammar, list, source);
        let shape = shaper.extract(&tree).unwrap();
        let rebuilt: Parse<'_, String> = shaper.inject(list, &shape).unwrap();
        assert_eq!(rebuilt, tree, "{source}");
    }
}

#[test]
fn injected_separators_come_from_the_terminal() {
    let (grammar, list) = list_grammar();
    let shaper = Shaper::new(&grammar, StringCodec);
    let shape = json!({ "items": [
        { "key": "x", "value": "1" },
        { "key": "y", "value": "2" },
    ] });

    let tree: Parse<'_, String> = shaper.inject(list, &shape).unwrap();
    let values: Vec<&str> = tree.values().into_iter().map(String::as_str).collect();
    assert_eq!(values, ["[", "x", ":", "1", ",", "y", ":", "2", "]"]);
}

#[test]
fn named_thunks_nest() {
    let b = GrammarBuilder::new();
    let pair = b.sequence([
        b.consume_named("word", "key"),
        b.consume(":"),
        b.consume_named("number", "value"),
    ]);
    b.define("pair", pair);
    let range = b.sequence([
        b.named(b.rule("pair"), "from"),
        b.consume(".."),
        b.named(b.rule("pair"), "to"),
    ]);
    let grammar = b.build().unwrap();
    let shaper = Shaper::new(&grammar, StringCodec);

    let tree = parse(&grammar, range, "a : 1 .. b : 2");
    let shape = shaper.extract(&tree).unwrap();
    assert_eq!(
        shape,
        json!({
            "from": { "key": "a", "value": "1" },
            "to": { "key": "b", "value": "2" },
        })
    );
    assert_eq!(shaper.inject::<String>(range, &shape).unwrap(), tree);
}

#[test]
fn typed_alternations_are_tagged() {
    let b = GrammarBuilder::new();
    let atom = b.named(
        b.typed_or([
            ("number", b.consume_named("number", ".")),
            ("word", b.consume_named("word", ".")),
        ]),
        "atom",
    );
    let grammar = b.build().unwrap();
    let shaper = Shaper::new(&grammar, StringCodec);

    let tree = parse(&grammar, atom, "abc");
    let shape = shaper.extract(&tree).unwrap();
    assert_eq!(shape, json!({ "atom": { "type": "word", "value": "abc" } }));
    assert_eq!(shaper.inject::<String>(atom, &shape).unwrap(), tree);
}

#[test]
fn untyped_alternations_use_the_index() {
    let b = GrammarBuilder::new();
    let atom = b.named(
        b.or([b.consume_named("number", "."), b.consume_named("word", ".")]),
        "atom",
    );
    let grammar = b.build().unwrap();
    let shaper = Shaper::new(&grammar, StringCodec);

    let shape = shaper.extract(&parse(&grammar, atom, "42")).unwrap();
    assert_eq!(shape, json!({ "atom": { "type": "0", "value": "42" } }));

    let tree: Parse<'_, String> = shaper
        .inject(atom, &json!({ "atom": { "type": 1, "value": "x" } }))
        .unwrap();
    assert_eq!(tree.values(), [&"x".to_owned()]);
}

#[test]
fn unnamed_alternations_pass_their_choice_through() {
    let b = GrammarBuilder::new();
    let atom = b.or([b.consume_named("number", "n"), b.consume_named("word", "w")]);
    let grammar = b.build().unwrap();
    let shaper = Shaper::new(&grammar, StringCodec);

    let shape = shaper.extract(&parse(&grammar, atom, "x")).unwrap();
    assert_eq!(shape, json!({ "w": "x" }));
    assert_eq!(
        shaper.inject::<String>(atom, &shape).unwrap_err(),
        ShapeError::Unnamed { kind: "or" }
    );
}

#[test]
fn absent_options_use_their_default() {
    let b = GrammarBuilder::new();
    let size = b.named(
        b.default_value(b.option(b.consume_named("number", ".")), json!("auto")),
        "size",
    );
    let decl = b.sequence([b.consume_named("word", "name"), size]);
    let grammar = b.build().unwrap();
    let shaper = Shaper::new(&grammar, StringCodec);

    let absent = parse(&grammar, decl, "box");
    let shape = shaper.extract(&absent).unwrap();
    assert_eq!(shape, json!({ "name": "box", "size": "auto" }));
    assert_eq!(shaper.inject::<String>(decl, &shape).unwrap(), absent);

    let present = parse(&grammar, decl, "box 3");
    let shape = shaper.extract(&present).unwrap();
    assert_eq!(shape, json!({ "name": "box", "size": "3" }));
    assert_eq!(shaper.inject::<String>(decl, &shape).unwrap(), present);

    // A missing option field injects as absent.
    let tree: Parse<'_, String> = shaper.inject(decl, &json!({ "name": "box" })).unwrap();
    assert_eq!(tree, absent);
}

#[test]
fn null_fields_are_dropped_from_sequences() {
    let b = GrammarBuilder::new();
    let decl = b.sequence([
        b.consume_named("word", "name"),
        b.named(b.option(b.consume_named("number", ".")), "size"),
    ]);
    let grammar = b.build().unwrap();
    let shaper = Shaper::new(&grammar, StringCodec);

    let tree = parse(&grammar, decl, "box");
    let shape = shaper.extract(&tree).unwrap();
    assert_eq!(shape, json!({ "name": "box" }));
    assert_eq!(shaper.inject::<String>(decl, &shape).unwrap(), tree);
}

#[test]
fn select_picks_one_field() {
    let b = GrammarBuilder::new();
    let paren = b.select(
        b.sequence([b.consume("("), b.consume_named("number", "inner"), b.consume(")")]),
        "inner",
    );
    b.define("paren", paren);
    let call = b.sequence([b.consume_named("word", "callee"), b.named(b.rule("paren"), "arg")]);
    let grammar = b.build().unwrap();
    let shaper = Shaper::new(&grammar, StringCodec);

    let tree = parse(&grammar, call, "f ( 7 )");
    let shape = shaper.extract(&tree).unwrap();
    assert_eq!(shape, json!({ "callee": "f", "arg": "7" }));
    assert_eq!(shaper.inject::<String>(call, &shape).unwrap(), tree);
}

#[test]
fn layout_contributes_nothing() {
    let b = GrammarBuilder::new();
    let block = b.group(b.sequence([
        b.literal("{"),
        b.indent(b.sequence([b.line(LineKind::Default), b.consume_named("word", "body")])),
        b.line(LineKind::Soft),
        b.literal("}"),
    ]));
    let grammar = b.build().unwrap();
    let shaper = Shaper::new(&grammar, StringCodec);

    let tree = parse(&grammar, block, "hello");
    let shape = shaper.extract(&tree).unwrap();
    assert_eq!(shape, json!({ "body": "hello" }));
    assert_eq!(shaper.inject::<String>(block, &shape).unwrap(), tree);
}

#[test]
fn injection_errors() {
    let (grammar, list) = list_grammar();
    let shaper = Shaper::new(&grammar, StringCodec);

    assert_eq!(
        shaper.inject::<String>(list, &json!({})).unwrap_err(),
        ShapeError::MissingField {
            field: "items".to_owned(),
            shape: "{}".to_owned()
        }
    );
    assert_eq!(
        shaper.inject::<String>(list, &json!({ "items": 3 })).unwrap_err(),
        ShapeError::ExpectedList {
            field: "items".to_owned(),
            shape: "3".to_owned()
        }
    );
    assert!(matches!(
        shaper.inject::<String>(list, &json!({ "items": [{ "key": 1, "value": "2" }] })),
        Err(ShapeError::InvalidToken { .. })
    ));

    let b = GrammarBuilder::new();
    let atom = b.named(b.typed_or([("word", b.consume_named("word", "."))]), "atom");
    let merged = b.named(b.option(b.consume("word")), ".");
    let repeated = b.many(b.consume("word"));
    let grammar = b.build().unwrap();
    let shaper = Shaper::new(&grammar, StringCodec);

    assert_eq!(
        shaper
            .inject::<String>(atom, &json!({ "atom": { "type": "number", "value": "1" } }))
            .unwrap_err(),
        ShapeError::UnknownAlternative {
            kind: "number".to_owned()
        }
    );
    assert_eq!(
        shaper.inject::<String>(merged, &Value::Null).unwrap_err(),
        ShapeError::MergedOption
    );
    assert_eq!(
        shaper.inject::<String>(repeated, &json!([])).unwrap_err(),
        ShapeError::Unnamed { kind: "many" }
    );
}

#[test]
fn deep_trees_extract() {
    let b = GrammarBuilder::new();
    let nested = b.or([
        b.sequence([b.consume("("), b.named(b.rule("nested"), "inner"), b.consume(")")]),
        b.consume_named("word", "leaf"),
    ]);
    b.define("nested", nested);
    let grammar = b.build().unwrap();
    let shaper = Shaper::new(&grammar, StringCodec);

    let depth = 300;
    let source: &'static str = Box::leak(
        format!("{}x{}", "( ".repeat(depth), " )".repeat(depth)).into_boxed_str(),
    );
    let tree = parse(&grammar, nested, source);
    let mut shape = &shaper.extract(&tree).unwrap();
    for _ in 0..depth {
        shape = &shape["inner"];
    }
    assert_eq!(shape, &json!({ "leaf": "x" }));
}
