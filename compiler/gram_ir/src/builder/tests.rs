#![allow(clippy::unwrap_used, reason = "tests unwrap built grammars")]

use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;
use crate::RecognizerKey;

#[test]
fn ids_are_issued_per_builder() {
    let first = GrammarBuilder::new();
    let second = GrammarBuilder::new();
    let a = first.consume("a");
    let b = second.consume("b");
    assert_eq!(a, PatternId::new(0));
    assert_eq!(b, PatternId::new(0));
    assert_eq!(first.consume("c"), PatternId::new(1));
}

#[test]
fn rules_may_be_referenced_before_definition() {
    let b = GrammarBuilder::new();
    let reference = b.rule("term");
    let expr = b.sequence([reference, b.consume("+"), b.rule("term")]);
    b.define("expr", expr);
    let term = b.consume("a");
    b.define("term", term);
    let grammar = b.build().unwrap();

    assert_eq!(grammar.rule("expr"), Some(expr));
    assert_eq!(grammar.rule("term"), Some(term));
    let PatternKind::Thunk { rule } = grammar.pattern(reference).kind() else {
        panic!("expected a thunk");
    };
    assert_eq!(grammar.resolve(*rule), term);
    assert_eq!(grammar.rule_name(*rule), "term");
    assert_eq!(grammar.rule_names().collect::<Vec<_>>(), vec!["term", "expr"]);
}

#[test]
fn undefined_rule_fails_to_build() {
    let b = GrammarBuilder::new();
    let body = b.rule("missing");
    b.define("main", body);
    assert_eq!(
        b.build().unwrap_err(),
        GrammarError::UndefinedRule("missing".to_owned())
    );
}

#[test]
fn duplicate_rule_fails_to_build() {
    let b = GrammarBuilder::new();
    b.define("main", b.consume("a"));
    b.define("main", b.consume("b"));
    assert_eq!(
        b.build().unwrap_err(),
        GrammarError::DuplicateRule("main".to_owned())
    );
}

#[test]
fn attributes_are_recorded() {
    let b = GrammarBuilder::new();
    let item = b.consume_named("name", "value");
    let option = b.option(item);
    b.named(option, "maybe");
    b.labeled(option, "maybe-label");
    b.default_value(option, json!([]));
    let grammar = b.build().unwrap();

    let node = grammar.pattern(option);
    assert_eq!(node.name(), Some("maybe"));
    assert_eq!(node.default_value(), Some(&json!([])));
    let label = node.label().unwrap();
    assert_eq!(grammar.label(label), "maybe-label");
    assert_eq!(node.recognizer(), RecognizerKey::Label(label));
    assert_eq!(
        grammar.pattern(item).recognizer(),
        RecognizerKey::Pattern(item)
    );
}

#[test]
fn shared_labels_share_recognizer_keys() {
    let b = GrammarBuilder::new();
    let left = b.labeled(b.consume("a"), "same");
    let right = b.labeled(b.consume("b"), "same");
    let grammar = b.build().unwrap();
    assert_eq!(
        grammar.pattern(left).recognizer(),
        grammar.pattern(right).recognizer()
    );
}

#[test]
fn misplaced_attributes_are_reported() {
    let b = GrammarBuilder::new();
    b.select(b.consume("a"), "field");
    assert_eq!(
        b.build().unwrap_err(),
        GrammarError::InvalidAttribute {
            attribute: "select",
            kind: "consume",
        }
    );

    let b = GrammarBuilder::new();
    b.parallel(b.many(b.consume("a")));
    assert_eq!(
        b.build().unwrap_err(),
        GrammarError::InvalidAttribute {
            attribute: "parallel",
            kind: "many",
        }
    );
}

#[test]
fn typed_or_keeps_names_in_order() {
    let b = GrammarBuilder::new();
    let or = b.typed_or([("left", b.consume("a")), ("right", b.consume("b"))]);
    let grammar = b.build().unwrap();
    let PatternKind::Or {
        mode, type_names, ..
    } = grammar.pattern(or).kind()
    else {
        panic!("expected an or");
    };
    assert_eq!(*mode, OrMode::Ordered);
    assert_eq!(
        type_names.as_deref(),
        Some(&["left".to_owned(), "right".to_owned()][..])
    );
}

#[test]
fn indented_many_wraps_a_named_many() {
    let b = GrammarBuilder::new();
    let many = b.named(b.many(b.consume("a")), "items");
    let wrapped = b.indented_many(many, LineKind::Hard);
    let grammar = b.build().unwrap();

    let PatternKind::Group { child } = grammar.pattern(wrapped).kind() else {
        panic!("expected a group");
    };
    let PatternKind::If {
        child,
        reference,
        before: None,
        after: Some(Layout::Line(LineKind::Hard)),
    } = grammar.pattern(*child).kind()
    else {
        panic!("expected the outer if");
    };
    assert_eq!(reference, "items");
    let PatternKind::Indent { child } = grammar.pattern(*child).kind() else {
        panic!("expected an indent");
    };
    let PatternKind::If {
        child,
        before: Some(Layout::Line(LineKind::Hard)),
        after: None,
        ..
    } = grammar.pattern(*child).kind()
    else {
        panic!("expected the inner if");
    };
    assert_eq!(*child, many);
}

#[test]
fn indented_many_requires_a_name() {
    let b = GrammarBuilder::new();
    b.indented_many(b.many(b.consume("a")), LineKind::Default);
    assert_eq!(b.build().unwrap_err(), GrammarError::UnnamedIndentedMany);
}

#[test]
fn foreign_ids_are_rejected() {
    let other = GrammarBuilder::new();
    for _ in 0..4 {
        other.consume("x");
    }
    let foreign = other.consume("x");

    let b = GrammarBuilder::new();
    b.define("main", b.sequence([foreign]));
    assert_eq!(b.build().unwrap_err(), GrammarError::UnknownPattern(foreign));
}
