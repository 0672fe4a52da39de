#![allow(clippy::unwrap_used, reason = "tests unwrap bundled definitions")]

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn bundled_languages_build() {
    let names: Vec<&str> = all().unwrap().iter().map(Language::name).collect();
    assert_eq!(names, vec!["xml", "logic"]);
}

#[test]
fn languages_are_found_by_name_and_extension() {
    assert_eq!(by_name("logic").unwrap().unwrap().name(), "logic");
    assert_eq!(by_extension("xml").unwrap().unwrap().name(), "xml");
    assert_eq!(by_extension("lg").unwrap().unwrap().name(), "logic");
    assert!(by_name("json").unwrap().is_none());
    assert!(by_extension("rs").unwrap().is_none());
}
