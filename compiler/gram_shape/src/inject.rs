//! Shape to parse tree.
//!
//! The pattern drives the walk: every node of the rebuilt tree is the node
//! its pattern calls for, with names looked up in the shape. Separators of a
//! repetition and unnamed tokens have no shape of their own and are rebuilt
//! from an empty object and the terminal name respectively.

use std::borrow::Cow;

use gram_ir::{Parse, ParseNode, PatternId, PatternKind, MERGE};
use gram_stack::ensure_sufficient_stack;
use serde_json::{Map, Value};

use crate::codec::ShapeCodec;
use crate::error::ShapeError;
use crate::{wrap, Shaper};

impl<'g, C> Shaper<'g, C> {
    /// A tree for `pattern` whose shape is `shape`.
    ///
    /// Alternations, repetitions and options must be named: their names
    /// are the only record of which branch, how many items, or whether the
    /// option was present.
    #[tracing::instrument(level = "debug", skip_all, fields(%pattern))]
    pub fn inject<V>(&self, pattern: PatternId, shape: &Value) -> Result<Parse<'g, V>, ShapeError>
    where
        C: ShapeCodec<V>,
    {
        self.tree_of(pattern, shape)
    }

    fn boxed<V>(&self, pattern: PatternId, shape: &Value) -> Result<Box<Parse<'g, V>>, ShapeError>
    where
        C: ShapeCodec<V>,
    {
        self.tree_of(pattern, shape).map(Box::new)
    }

    fn tree_of<V>(&self, pattern: PatternId, shape: &Value) -> Result<Parse<'g, V>, ShapeError>
    where
        C: ShapeCodec<V>,
    {
        ensure_sufficient_stack(|| {
            let grammar = self.grammar;
            let node = grammar.pattern(pattern);
            let name = node.name();
            let parsed = match node.kind() {
                PatternKind::Thunk { rule } => {
                    let inner = field(name.unwrap_or(MERGE), shape)?;
                    ParseNode::Thunk(self.boxed(grammar.resolve(*rule), inner)?)
                }
                PatternKind::Group { child } => ParseNode::Group(self.boxed(*child, shape)?),
                PatternKind::Indent { child } => ParseNode::Indent(self.boxed(*child, shape)?),
                PatternKind::If { child, .. } => ParseNode::If(self.boxed(*child, shape)?),
                PatternKind::Literal { .. } => ParseNode::Literal,
                PatternKind::Line { .. } => ParseNode::Line,
                PatternKind::Consume { terminal } => ParseNode::Consume(match name {
                    Some(name) => self.codec.shape_to_token(field(name, shape)?, terminal)?,
                    None => self.codec.terminal_token(terminal),
                }),
                PatternKind::Sequence { children } => {
                    let inner = selected(node.select(), field(name.unwrap_or(MERGE), shape)?);
                    ParseNode::Sequence(
                        children
                            .iter()
                            .map(|&child| self.tree_of(child, &inner))
                            .collect::<Result<_, _>>()?,
                    )
                }
                PatternKind::Or {
                    alternatives,
                    type_names,
                    ..
                } => {
                    let name = name.ok_or(ShapeError::Unnamed { kind: "or" })?;
                    let label = node.label().map(|label| grammar.label(label));
                    let value = self.codec.or_shape_to_value(field(name, shape)?, label)?;
                    let index = match type_names {
                        Some(names) => names.iter().position(|name| *name == value.kind),
                        None => value.kind.parse::<usize>().ok(),
                    }
                    .filter(|&index| index < alternatives.len())
                    .ok_or_else(|| ShapeError::UnknownAlternative {
                        kind: value.kind.clone(),
                    })?;
                    ParseNode::Or {
                        index,
                        choice: self.boxed(alternatives[index], &value.value)?,
                    }
                }
                PatternKind::Many { item, separator } => {
                    let name = name.ok_or(ShapeError::Unnamed { kind: "many" })?;
                    let list = field(name, shape)?;
                    let Value::Array(list) = list else {
                        return Err(ShapeError::ExpectedList {
                            field: name.to_owned(),
                            shape: list.to_string(),
                        });
                    };
                    let items = list
                        .iter()
                        .map(|value| self.tree_of(*item, value))
                        .collect::<Result<Vec<_>, _>>()?;
                    let separators = match separator {
                        Some(separator) => {
                            let empty = Value::Object(Map::new());
                            (1..items.len())
                                .map(|_| self.tree_of(*separator, &empty))
                                .collect::<Result<_, _>>()?
                        }
                        None => Vec::new(),
                    };
                    ParseNode::Many { items, separators }
                }
                PatternKind::Option { item } => {
                    let name = name.ok_or(ShapeError::Unnamed { kind: "option" })?;
                    if name == MERGE {
                        return Err(ShapeError::MergedOption);
                    }
                    let value = shape.get(name).unwrap_or(&Value::Null);
                    let absent = node.default_value().unwrap_or(&Value::Null);
                    if value == absent || value.is_null() {
                        ParseNode::Option(None)
                    } else {
                        let inner = selected(node.select(), value);
                        ParseNode::Option(Some(self.boxed(*item, &inner)?))
                    }
                }
            };
            Ok(Parse::new(node, parsed))
        })
    }
}

/// The shape under `name`, or `shape` itself for the merge name.
fn field<'v>(name: &str, shape: &'v Value) -> Result<&'v Value, ShapeError> {
    if name == MERGE {
        return Ok(shape);
    }
    shape.get(name).ok_or_else(|| ShapeError::MissingField {
        field: name.to_owned(),
        shape: shape.to_string(),
    })
}

/// Undo a `select`: put `value` back under the selected field.
fn selected<'v>(select: Option<&str>, value: &'v Value) -> Cow<'v, Value> {
    match select {
        Some(field) => Cow::Owned(wrap(field, value.clone())),
        None => Cow::Borrowed(value),
    }
}
