#![allow(clippy::unwrap_used, reason = "tests unwrap lexer and codec results")]

use gram_lexer::TokenizeOptions;
use pretty_assertions::assert_eq;

use super::*;

fn codec() -> XmlCodec {
    XmlCodec {
        tokens: TokenCodec::for_lexer(&lexer().unwrap()),
    }
}

#[test]
fn attributes_lex_inside_tags() {
    let options = TokenizeOptions::default()
        .without_positions()
        .with_initial_state(["inside"]);
    let tokens = lexer().unwrap().tokenize_with(r#"foo="bar""#, &options).unwrap();
    assert_eq!(
        tokens,
        vec![
            LexToken::with_value("name", "foo"),
            LexToken::new("="),
            LexToken::with_value("string", "bar"),
        ]
    );
}

#[test]
fn tags_switch_between_states() {
    let tokens = lexer().unwrap().tokenize("<a>text<!--note--></a>").unwrap();
    let kinds: Vec<&str> = tokens.iter().map(|token| token.kind.as_str()).collect();
    assert_eq!(
        kinds,
        vec!["<", "name", ">", "charData", "comment", "</", "name", ">"]
    );
    assert_eq!(tokens[4].values, vec!["note".to_owned()]);
}

#[test]
fn only_capturing_rules_carry_values() {
    let codec = codec();
    assert_eq!(
        codec.shape_to_token(&json!("el"), "name").unwrap(),
        LexToken::with_value("name", "el")
    );
    assert_eq!(codec.shape_to_token(&json!("ignored"), "/>").unwrap(), LexToken::new("/>"));
    assert_eq!(codec.terminal_token("<"), LexToken::new("<"));
}

#[test]
fn element_closings_are_remapped() {
    let codec = codec();
    let self_closing = OrValue {
        kind: "selfClosing".to_owned(),
        value: Value::Null,
    };
    let open = OrValue {
        kind: "open".to_owned(),
        value: json!({ "content": [], "closingTag": "el" }),
    };

    let shape = codec
        .or_value_to_shape(self_closing.clone(), Some(ELEMENT_CLOSING))
        .unwrap();
    assert_eq!(shape, json!([]));
    assert_eq!(
        codec.or_shape_to_value(&shape, Some(ELEMENT_CLOSING)).unwrap(),
        self_closing
    );

    let shape = codec.or_value_to_shape(open.clone(), Some(ELEMENT_CLOSING)).unwrap();
    assert_eq!(shape, json!({ "content": [], "closingTag": "el" }));
    assert_eq!(codec.or_shape_to_value(&shape, Some(ELEMENT_CLOSING)).unwrap(), open);
}

#[test]
fn element_content_keeps_its_tag() {
    let codec = codec();
    let comment = OrValue {
        kind: "comment".to_owned(),
        value: json!("hello"),
    };
    let shape = codec
        .or_value_to_shape(comment.clone(), Some(ELEMENT_CONTENT))
        .unwrap();
    assert_eq!(shape, json!({ "type": "comment", "value": "hello" }));
    assert_eq!(codec.or_shape_to_value(&shape, Some(ELEMENT_CONTENT)).unwrap(), comment);
}

#[test]
fn unlabeled_alternations_are_rejected() {
    let codec = codec();
    let value = OrValue {
        kind: "0".to_owned(),
        value: Value::Null,
    };
    assert!(matches!(
        codec.or_value_to_shape(value, None),
        Err(ShapeError::UnknownOr { .. })
    ));
    assert!(matches!(
        codec.or_shape_to_value(&json!([]), Some("Other")),
        Err(ShapeError::UnknownOr { .. })
    ));
}
