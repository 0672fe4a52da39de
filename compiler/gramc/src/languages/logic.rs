//! Logic: a small declaration language with structs, enums, functions and
//! expressions.
//!
//! Expressions are left recursive (`foo.bar`, `foo()`), which the parser
//! handles directly. Every declaration keeps its header in a group of its
//! own, so a body broken over several lines leaves the header on one line.

use gram_ir::{Grammar, GrammarBuilder, GrammarError, Layout, LineKind, PatternId};
use gram_lexer::{keyword, LexError, Lexer, Rule};
use serde_json::json;

use super::DefinitionError;
use crate::language::{Language, TokenCodec};

const KEYWORDS: [&str; 10] = [
    "true",
    "false",
    "enum",
    "case",
    "struct",
    "extension",
    "let",
    "func",
    "return",
    "import",
];

const PUNCTUATION: [&str; 15] = [
    "#", "@", "[", "]", "{", "}", "(", ")", ",", ":", "->", "=", ">", "<", ".",
];

pub fn lexer() -> Result<Lexer, LexError> {
    let mut rules: Vec<Rule> = KEYWORDS.into_iter().map(keyword).collect();
    rules.extend(PUNCTUATION.into_iter().map(Rule::literal));
    rules.extend([
        Rule::new("identifier", "([_a-zA-Z][_a-zA-Z0-9]*)"),
        Rule::new("string", r#""([^"]*)""#),
        Rule::new("float", r"((?:\+|-)?[0-9]+\.[0-9]+)"),
        Rule::new("integer", r"((?:\+|-)?[0-9]+)"),
        Rule::new("comment", r"/\*([\S\s]*?)\*/"),
        Rule::new("whitespace", r"[ \t\n\r]+").discard(),
    ]);
    Lexer::stateless(rules)
}

struct Builder {
    b: GrammarBuilder,
}

impl Builder {
    fn line(&self) -> PatternId {
        self.b.line(LineKind::Default)
    }

    fn hardline(&self) -> PatternId {
        self.b.line(LineKind::Hard)
    }

    /// `, ` that may break.
    fn comma(&self) -> PatternId {
        self.b.sequence([self.b.consume(","), self.line()])
    }

    fn field(&self, rule: &str, name: &str) -> PatternId {
        self.b.named(self.b.rule(rule), name)
    }

    fn comment(&self) -> PatternId {
        self.b.named(self.b.option(self.b.rule("comment")), "comment")
    }

    /// An optional list, shaped as the list itself and `[]` when absent.
    fn optional_list(&self, item: PatternId, name: &str) -> PatternId {
        let b = &self.b;
        b.named(
            b.default_value(b.select(b.option(item), name), json!([])),
            name,
        )
    }

    /// `label:` in front of an argument or associated value.
    fn label(&self) -> PatternId {
        let b = &self.b;
        let labeled = b.named(
            b.sequence([b.rule("identifier"), b.consume(":"), self.line()]),
            "identifier",
        );
        b.named(b.select(b.option(labeled), "identifier"), "label")
    }

    fn block(&self, kind: &str, body: PatternId) -> PatternId {
        let b = &self.b;
        b.sequence([
            self.comment(),
            b.rule("attributeList"),
            b.group(b.sequence([
                b.consume(kind),
                self.line(),
                self.field("identifier", "name"),
                self.optional_list(b.rule("genericIdentifierList"), "generics"),
                self.line(),
                b.consume("{"),
            ])),
            b.indented_many(
                b.named(b.many_separated(body, self.hardline()), "body"),
                LineKind::Hard,
            ),
            b.consume("}"),
        ])
    }

    fn declarations(&self) {
        let b = &self.b;
        b.define(
            "program",
            b.named(
                b.many_separated(b.rule("declaration"), self.hardline()),
                "declarations",
            ),
        );
        b.define(
            "declaration",
            b.named(
                b.typed_or([
                    ("variableDeclaration", b.rule("variableDeclaration")),
                    ("structDeclaration", b.rule("structDeclaration")),
                    ("namespaceDeclaration", b.rule("namespaceDeclaration")),
                    ("functionDeclaration", b.rule("functionDeclaration")),
                    ("enumDeclaration", b.rule("enumDeclaration")),
                    ("importDeclaration", b.rule("importDeclaration")),
                ]),
                ".",
            ),
        );
        b.define(
            "importDeclaration",
            b.group(b.sequence([
                b.consume("import"),
                self.line(),
                self.field("identifier", "name"),
            ])),
        );
        b.define(
            "comment",
            b.sequence([
                b.literal("/*"),
                b.consume_named("comment", "comment"),
                b.literal("*/"),
                self.hardline(),
            ]),
        );
        b.define(
            "attributeList",
            b.when(
                b.named(
                    b.many_separated(b.rule("attribute"), self.hardline()),
                    "attributes",
                ),
                "attributes",
                None,
                Some(Layout::Line(LineKind::Hard)),
            ),
        );
        b.define(
            "genericIdentifierList",
            b.sequence([
                b.consume("<"),
                b.named(
                    b.many_separated(b.rule("identifier"), self.comma()),
                    "generics",
                ),
                b.consume(">"),
            ]),
        );
        b.define(
            "variableDeclaration",
            b.sequence([
                self.comment(),
                b.rule("attributeList"),
                b.group(b.sequence([
                    b.consume("let"),
                    self.line(),
                    self.field("identifier", "name"),
                    b.consume(":"),
                    self.line(),
                    self.field("typeAnnotation", "annotation"),
                    self.line(),
                    b.consume("="),
                    self.line(),
                    self.field("expression", "initializer"),
                ])),
            ]),
        );
        b.define(
            "functionParameter",
            b.sequence([
                self.field("identifier", "name"),
                b.consume(":"),
                self.line(),
                self.field("typeAnnotation", "annotation"),
            ]),
        );
        b.define(
            "functionDeclaration",
            b.sequence([
                self.comment(),
                b.rule("attributeList"),
                b.group(b.sequence([
                    b.consume("func"),
                    self.line(),
                    self.field("identifier", "name"),
                    self.optional_list(b.rule("genericIdentifierList"), "generics"),
                    b.consume("("),
                    b.indented_many(
                        b.named(
                            b.many_separated(b.rule("functionParameter"), self.comma()),
                            "arguments",
                        ),
                        LineKind::Soft,
                    ),
                    b.consume(")"),
                    self.line(),
                    b.consume("->"),
                    self.line(),
                    self.field("typeAnnotation", "returnType"),
                    self.line(),
                    b.consume("{"),
                    b.consume("}"),
                ])),
            ]),
        );
        b.define("structDeclaration", self.block("struct", b.rule("declaration")));
        b.define(
            "namespaceDeclaration",
            self.block("extension", b.rule("declaration")),
        );
        b.define("enumDeclaration", self.block("enum", b.rule("enumCase")));
        b.define(
            "enumCase",
            b.sequence([
                self.comment(),
                b.group(b.sequence([
                    b.consume("case"),
                    self.line(),
                    self.field("identifier", "name"),
                    b.consume("("),
                    b.named(
                        b.many_separated(b.rule("associatedValue"), self.comma()),
                        "associatedValues",
                    ),
                    b.consume(")"),
                ])),
            ]),
        );
        b.define(
            "associatedValue",
            b.sequence([self.label(), self.field("typeAnnotation", "annotation")]),
        );
    }

    fn expressions(&self) {
        let b = &self.b;
        b.define(
            "expression",
            b.named(
                b.parallel(b.typed_or([
                    ("functionCallExpression", b.rule("functionCallExpression")),
                    ("memberExpression", b.rule("memberExpression")),
                    ("identifierExpression", b.rule("identifierExpression")),
                    ("literalExpression", b.rule("literalExpression")),
                ])),
                ".",
            ),
        );
        b.define(
            "functionCallExpression",
            b.sequence([
                self.field("expression", "expression"),
                b.consume("("),
                b.indented_many(
                    b.named(
                        b.many_separated(b.rule("functionCallArgument"), self.comma()),
                        "arguments",
                    ),
                    LineKind::Soft,
                ),
                b.consume(")"),
            ]),
        );
        b.define(
            "functionCallArgument",
            b.sequence([self.label(), self.field("expression", "expression")]),
        );
        b.define(
            "memberExpression",
            b.sequence([
                self.field("expression", "expression"),
                b.consume("."),
                self.field("expression", "member"),
            ]),
        );
        b.define("identifierExpression", b.sequence([b.rule("identifier")]));
        b.define(
            "literalExpression",
            b.named(
                b.typed_or([
                    ("boolean", b.rule("booleanLiteral")),
                    ("number", b.rule("numberLiteral")),
                    ("string", b.rule("stringLiteral")),
                    ("array", b.rule("arrayLiteral")),
                ]),
                ".",
            ),
        );
        b.define(
            "booleanLiteral",
            b.named(
                b.typed_or([("true", b.consume("true")), ("false", b.consume("false"))]),
                ".",
            ),
        );
        b.define(
            "numberLiteral",
            b.named(
                b.typed_or([
                    ("integer", b.consume_named("integer", ".")),
                    ("float", b.consume_named("float", ".")),
                ]),
                ".",
            ),
        );
        b.define(
            "stringLiteral",
            b.sequence([
                b.literal("\""),
                b.consume_named("string", "value"),
                b.literal("\""),
            ]),
        );
        b.define(
            "arrayLiteral",
            b.sequence([
                b.consume("["),
                b.indented_many(
                    b.named(
                        b.many_separated(b.rule("expression"), self.comma()),
                        "body",
                    ),
                    LineKind::Soft,
                ),
                b.consume("]"),
            ]),
        );
    }

    fn types(&self) {
        let b = &self.b;
        let arguments = b.sequence([
            b.consume("<"),
            b.named(
                b.many_separated(b.rule("typeAnnotation"), self.comma()),
                "genericArguments",
            ),
            b.consume(">"),
        ]);
        b.define(
            "typeAnnotation",
            b.sequence([
                b.rule("identifier"),
                self.optional_list(arguments, "genericArguments"),
            ]),
        );
        b.define("identifier", b.consume_named("identifier", "value"));
        b.define(
            "attribute",
            b.sequence([b.consume("@"), b.consume_named("identifier", "value")]),
        );
    }
}

pub fn grammar() -> Result<Grammar, GrammarError> {
    let builder = Builder {
        b: GrammarBuilder::new(),
    };
    builder.declarations();
    builder.expressions();
    builder.types();
    builder.b.build()
}

pub fn language() -> Result<Language, DefinitionError> {
    let lexer = lexer()?;
    let codec = TokenCodec::for_lexer(&lexer);
    Ok(Language::new("logic", lexer, grammar()?, "program", codec).with_extensions(&["lg", "logic"]))
}
