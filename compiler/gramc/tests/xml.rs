#![allow(clippy::unwrap_used, reason = "tests unwrap parse and shape results")]

use gram_fmt::PrintConfig;
use gramc::languages::xml;
use gramc::Language;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Value};

/// Parse `source` as `rule`, check that it prints back unchanged and that
/// injecting its shape rebuilds the same tree. Returns the shape.
fn expect_parse(language: &Language, rule: &str, source: &str) -> Value {
    let tokens = language.tokenize_detached(source).unwrap();
    let parse = language.parse_tokens(rule, &tokens).unwrap();
    assert_eq!(language.print(&parse), source);

    let shape = language.shape_of(&parse).unwrap();
    assert_eq!(language.inject(rule, &shape).unwrap(), parse);
    shape
}

#[test]
fn attributes() {
    let language = xml::language().unwrap();
    let shape = expect_parse(&language, "element", r#"<el foo="bar"/>"#);
    assert_eq!(shape["attributes"], json!([{ "name": "foo", "value": "bar" }]));
}

#[test]
fn comments_are_element_content() {
    let language = xml::language().unwrap();
    let shape = expect_parse(&language, "element", "<el><!--hello--></el>");
    assert_eq!(
        shape["content"]["content"],
        json!([{ "type": "comment", "value": "hello" }])
    );
}

#[test]
fn open_elements() {
    let language = xml::language().unwrap();
    let shape = expect_parse(&language, "element", r#"<el attr="val"></el>"#);
    assert_eq!(
        shape,
        json!({
            "tag": "el",
            "attributes": [{ "name": "attr", "value": "val" }],
            "content": { "content": [], "closingTag": "el" },
        })
    );
}

#[test]
fn nested_elements() {
    let language = xml::language().unwrap();
    let shape = expect_parse(&language, "element", "<el><!--com-->cd<b/></el>");
    assert_eq!(
        shape,
        json!({
            "tag": "el",
            "attributes": [],
            "content": {
                "content": [
                    { "type": "comment", "value": "com" },
                    { "type": "charData", "value": "cd" },
                    {
                        "type": "element",
                        "value": { "tag": "b", "attributes": [], "content": [] },
                    },
                ],
                "closingTag": "el",
            },
        })
    );
}

#[test]
fn self_closing_elements() {
    let language = xml::language().unwrap();
    let shape = expect_parse(&language, "element", r#"<el attr1="val1" attr2="val2"/>"#);
    assert_eq!(shape["content"], json!([]));
    assert_eq!(shape["attributes"].as_array().map(Vec::len), Some(2));
}

#[test]
fn long_attribute_lists_wrap() {
    let language = xml::language()
        .unwrap()
        .with_print_config(PrintConfig::with_max_width(40));
    let parse = language
        .parse(
            "element",
            r#"<el veryLongAttributeName1="val1" veryLongAttributeName2="val2"/>"#,
        )
        .unwrap();
    assert_eq!(
        language.print(&parse),
        "<el\n  veryLongAttributeName1=\"val1\"\n  veryLongAttributeName2=\"val2\"/>"
    );
}

#[test]
fn wrapped_output_parses_to_the_same_shape() {
    let source = r#"<el veryLongAttributeName1="val1" veryLongAttributeName2="val2"/>"#;
    let narrow = xml::language()
        .unwrap()
        .with_print_config(PrintConfig::with_max_width(20));
    let wrapped = narrow.format("element", source).unwrap();
    assert!(wrapped.contains('\n'));
    assert_eq!(
        narrow.extract("element", &wrapped).unwrap(),
        narrow.extract("element", source).unwrap()
    );
}

#[test]
fn shapes_can_be_written_by_hand() {
    let language = xml::language().unwrap();
    let shape = json!({
        "tag": "list",
        "attributes": [{ "name": "kind", "value": "todo" }],
        "content": {
            "content": [
                { "type": "element", "value": { "tag": "item", "attributes": [], "content": [] } },
                { "type": "charData", "value": "done" },
            ],
            "closingTag": "list",
        },
    });
    assert_eq!(
        language.print_shape("element", &shape).unwrap(),
        r#"<list kind="todo"><item/>done</list>"#
    );
}

#[test]
fn truncated_input_fails() {
    let language = xml::language().unwrap();
    assert!(language.parse("element", "<el></el").is_err());
    assert!(language.parse("element", "<el").is_err());
}

fn attribute() -> impl Strategy<Value = (String, String)> {
    ("[a-z][a-z0-9]{0,7}", "[a-z0-9 ]{0,10}")
}

proptest! {
    #[test]
    fn attribute_lists_round_trip(
        attributes in prop::collection::vec(attribute(), 0..6),
        width in 20usize..100,
    ) {
        let language = xml::language()
            .unwrap()
            .with_print_config(PrintConfig::with_max_width(width));
        let source = format!(
            "<el{}/>",
            attributes
                .iter()
                .map(|(name, value)| format!(" {name}=\"{value}\""))
                .collect::<Vec<_>>()
                .concat()
        );

        let tokens = language.tokenize_detached(&source).unwrap();
        let parse = language.parse_tokens("element", &tokens).unwrap();
        let shape = language.shape_of(&parse).unwrap();
        prop_assert_eq!(&language.inject("element", &shape).unwrap(), &parse);

        let printed = language.print(&parse);
        let reparsed = language.tokenize_detached(&printed).unwrap();
        prop_assert_eq!(&language.parse_tokens("element", &reparsed).unwrap(), &parse);

        let expected: Vec<Value> = attributes
            .iter()
            .map(|(name, value)| json!({ "name": name, "value": value }))
            .collect();
        prop_assert_eq!(&shape["attributes"], &Value::Array(expected));
    }
}
