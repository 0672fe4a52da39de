#![allow(clippy::unwrap_used, reason = "tests unwrap parse results")]

use gram_ir::{Grammar, GrammarBuilder, ParseNode, PatternId};
use gram_parse::{Candidate, FailureKind, ParseError, Parser, ParserConfig};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn sum_grammar() -> (Grammar, PatternId) {
    let b = GrammarBuilder::new();
    let expr = b.parallel_or([
        b.sequence([b.rule("expr"), b.consume("+"), b.rule("expr")]),
        b.rule("term"),
    ]);
    b.define("expr", expr);
    b.define("term", b.consume("a"));
    (b.build().unwrap(), expr)
}

fn sum_tokens(terms: usize) -> Vec<&'static str> {
    let mut tokens = vec!["a"];
    for _ in 1..terms {
        tokens.extend(["+", "a"]);
    }
    tokens
}

#[test]
fn single_token() {
    let b = GrammarBuilder::new();
    let hello = b.consume("hello");
    let grammar = b.build().unwrap();

    let parse = Parser::new(&grammar).parse_one(hello, &["hello"]).unwrap();
    assert_eq!(parse.node(), &ParseNode::Consume("hello".to_owned()));
    assert_eq!(parse.pattern().id(), hello);
}

#[test]
fn unexpected_token_is_the_only_failure() {
    let b = GrammarBuilder::new();
    let hello = b.consume("hello");
    let grammar = b.build().unwrap();

    let error = Parser::new(&grammar).parse_one(hello, &["world"]).unwrap_err();
    let failures = error.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(
        failures[0].kind,
        FailureKind::UnexpectedToken {
            expected: "hello".to_owned(),
            found: 0
        }
    );
    assert_eq!(failures[0].position, 0);
    assert_eq!(failures[0].lookahead, vec!["world"]);
}

#[test]
fn trailing_tokens_are_a_failure() {
    let b = GrammarBuilder::new();
    let a = b.consume("a");
    let grammar = b.build().unwrap();

    let error = Parser::new(&grammar).parse_one(a, &["a", "a", "a"]).unwrap_err();
    assert_eq!(
        error,
        ParseError::NoMatch(vec![gram_parse::FailureReport {
            kind: FailureKind::TokensRemaining { count: 2 },
            position: 1,
            lookahead: vec!["a", "a"],
            message: "Failed to consume all input tokens. The 2 remaining.".to_owned(),
        }])
    );
}

#[test]
fn lookahead_window_follows_the_config() {
    let b = GrammarBuilder::new();
    let seq = b.sequence([b.consume("a"), b.consume("b")]);
    let grammar = b.build().unwrap();

    let parser = Parser::with_config(&grammar, ParserConfig::default().with_lookahead(1));
    let error = parser.parse_one(seq, &["a", "c", "d"]).unwrap_err();
    assert_eq!(error.failures()[0].lookahead, vec!["c"]);
}

#[test]
fn sequence_and_many_values_keep_input_order() {
    let b = GrammarBuilder::new();
    let list = b.sequence([
        b.consume("["),
        b.many_separated(b.consume("n"), b.consume(",")),
        b.consume("]"),
    ]);
    let grammar = b.build().unwrap();

    let tokens = ["[", "n", ",", "n", ",", "n", "]"];
    let parse = Parser::new(&grammar).parse_one(list, &tokens).unwrap();
    assert_eq!(parse.values(), tokens.map(str::to_owned).iter().collect::<Vec<_>>());
}

#[test]
fn option_may_be_absent_for_the_rest_to_match() {
    let b = GrammarBuilder::new();
    let option = b.option(b.consume("a"));
    let seq = b.sequence([option, b.consume("a")]);
    let grammar = b.build().unwrap();

    let parse = Parser::new(&grammar).parse_one(seq, &["a"]).unwrap();
    let ParseNode::Sequence(children) = parse.node() else {
        panic!("expected a sequence, got {parse:?}");
    };
    assert_eq!(children[0].node(), &ParseNode::Option(None));
}

#[test]
fn left_recursive_sums() {
    let (grammar, expr) = sum_grammar();
    let parser = Parser::new(&grammar);
    for terms in 1..=3 {
        let tokens = sum_tokens(terms);
        let parse = parser.parse_one(expr, &tokens).unwrap();
        assert_eq!(parse.values().len(), tokens.len());
    }
}

#[test]
fn long_left_recursive_chains() {
    let b = GrammarBuilder::new();
    let expr = b.parallel_or([
        b.sequence([b.rule("expr"), b.consume("+"), b.rule("term")]),
        b.rule("term"),
    ]);
    b.define("expr", expr);
    b.define("term", b.consume("a"));
    let grammar = b.build().unwrap();

    let tokens = sum_tokens(12);
    let parses = Parser::new(&grammar).parse_all(expr, &tokens).unwrap();
    assert_eq!(parses.len(), 1);
    assert_eq!(parses[0].values().len(), tokens.len());
}

#[test]
fn member_and_call_on_the_same_prefix() {
    let b = GrammarBuilder::new();
    let expr = b.parallel_or([
        b.sequence([b.rule("expr"), b.consume("."), b.consume("a")]),
        b.sequence([b.rule("expr"), b.consume("("), b.consume(")")]),
        b.consume("a"),
    ]);
    b.define("expr", expr);
    let grammar = b.build().unwrap();
    let parser = Parser::new(&grammar);
    let tokens = ["a", ".", "a", "(", ")"];

    assert!(parser.parse_one(expr, &tokens).is_ok());

    // `(a.a)()`: a call whose callee is a member access.
    let call_on_member = parser.parse_all(expr, &tokens).unwrap().into_iter().any(|parse| {
        let ParseNode::Or { index: 1, choice } = parse.node() else {
            return false;
        };
        let ParseNode::Sequence(call) = choice.node() else {
            return false;
        };
        let ParseNode::Thunk(callee) = call[0].node() else {
            return false;
        };
        matches!(callee.node(), ParseNode::Or { index: 0, .. })
    });
    assert!(call_on_member);
}

#[test]
fn candidates_include_partial_derivations() {
    let b = GrammarBuilder::new();
    let many = b.many(b.consume("a"));
    let grammar = b.build().unwrap();

    let ends: Vec<_> = Parser::new(&grammar)
        .candidates(many, &["a", "a"])
        .unwrap()
        .into_iter()
        .map(|candidate| match candidate {
            Candidate::Success { end, .. } => Some(end),
            Candidate::Failure(_) => None,
        })
        .collect();
    assert_eq!(ends, vec![Some(2), Some(1), Some(0)]);
}

#[test]
fn deep_trees_are_rebuilt() {
    let b = GrammarBuilder::new();
    let nested = b.or([
        b.sequence([b.consume("("), b.rule("nested"), b.consume(")")]),
        b.consume("x"),
    ]);
    b.define("nested", nested);
    let grammar = b.build().unwrap();

    let depth = 500;
    let mut tokens = vec!["("; depth];
    tokens.push("x");
    tokens.extend(std::iter::repeat_n(")", depth));

    let parse = Parser::new(&grammar).parse_one(nested, &tokens).unwrap();
    assert_eq!(parse.values().len(), tokens.len());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn left_recursion_terminates(terms in 1usize..6) {
        let (grammar, expr) = sum_grammar();
        let tokens = sum_tokens(terms);
        let parse = Parser::new(&grammar).parse_one(expr, &tokens);
        prop_assert!(parse.is_ok());
    }

    #[test]
    fn many_yields_to_what_follows(count in 2usize..12) {
        let b = GrammarBuilder::new();
        let seq = b.sequence([b.many(b.consume("a")), b.consume("a"), b.consume("a")]);
        let grammar = b.build().unwrap();

        let tokens = vec!["a"; count];
        let parse = Parser::new(&grammar).parse_one(seq, &tokens).unwrap();
        let ParseNode::Sequence(children) = parse.node() else {
            panic!("expected a sequence");
        };
        let ParseNode::Many { items, .. } = children[0].node() else {
            panic!("expected a repetition");
        };
        prop_assert_eq!(items.len(), count - 2);
    }
}
