#![allow(clippy::unwrap_used, reason = "tests unwrap template results")]

use gramc::languages::{logic, xml};
use gramc::{Part, Templates};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn shapes_are_printed_into_text() {
    let language = logic::language().unwrap();
    let templates = Templates::new(&language);
    let annotation = json!({ "value": "Number", "genericArguments": [] });
    let text = templates
        .render(&[
            Part::Text("let x: "),
            Part::Node {
                rule: "typeAnnotation",
                shape: &annotation,
            },
            Part::Text(" = 1"),
        ])
        .unwrap();
    assert_eq!(text, "let x: Number = 1");
}

#[test]
fn nodes_parse_the_rendered_text() {
    let language = logic::language().unwrap();
    let templates = Templates::new(&language);
    let name = json!({ "value": "Point" });
    let shape = templates
        .node(
            "structDeclaration",
            &[
                Part::Text("struct "),
                Part::Node {
                    rule: "identifier",
                    shape: &name,
                },
                Part::Text(" { let x: Number = 0 }"),
            ],
        )
        .unwrap();
    assert_eq!(shape["name"], name);
    assert_eq!(shape["body"][0]["type"], "variableDeclaration");
    assert_eq!(
        language.print_shape("structDeclaration", &shape).unwrap(),
        "struct Point {\n  let x: Number = 0\n}"
    );
}

#[test]
fn templates_work_for_any_language() {
    let language = xml::language().unwrap();
    let templates = Templates::new(&language);
    let child = json!({ "tag": "b", "attributes": [], "content": [] });
    let shape = templates
        .node(
            "element",
            &[
                Part::Text("<a>"),
                Part::Node {
                    rule: "element",
                    shape: &child,
                },
                Part::Text("</a>"),
            ],
        )
        .unwrap();
    assert_eq!(
        shape["content"]["content"],
        json!([{ "type": "element", "value": child }])
    );
}

#[test]
fn bad_shapes_are_reported() {
    let language = logic::language().unwrap();
    let templates = Templates::new(&language);
    let shape = json!({ "name": "missing" });
    assert!(templates
        .render(&[Part::Node {
            rule: "typeAnnotation",
            shape: &shape,
        }])
        .is_err());
}
