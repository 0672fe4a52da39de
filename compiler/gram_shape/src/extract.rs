//! Parse tree to shape.

use gram_ir::{Parse, ParseNode, PatternKind, MERGE};
use gram_stack::ensure_sufficient_stack;
use serde_json::{Map, Value};

use crate::codec::{OrValue, ShapeCodec};
use crate::error::ShapeError;
use crate::{wrap, Shaper};

impl<C> Shaper<'_, C> {
    /// The shape of `parse`.
    ///
    /// Unnamed tokens, layout and unnamed options contribute nothing.
    /// Sequences merge the object shapes of their children, dropping `null`
    /// fields.
    #[tracing::instrument(level = "debug", skip_all, fields(pattern = %parse.pattern().id()))]
    pub fn extract<V>(&self, parse: &Parse<'_, V>) -> Result<Value, ShapeError>
    where
        C: ShapeCodec<V>,
    {
        self.shape_of(parse)
    }

    fn shape_of<V>(&self, parse: &Parse<'_, V>) -> Result<Value, ShapeError>
    where
        C: ShapeCodec<V>,
    {
        ensure_sufficient_stack(|| {
            let pattern = parse.pattern();
            let name = pattern.name();
            match parse.node() {
                ParseNode::Thunk(child) => Ok(wrap(name.unwrap_or(MERGE), self.shape_of(child)?)),
                ParseNode::Group(child) | ParseNode::Indent(child) | ParseNode::If(child) => {
                    self.shape_of(child)
                }
                ParseNode::Literal | ParseNode::Line => Ok(Value::Null),
                ParseNode::Consume(value) => Ok(match name {
                    Some(name) => wrap(name, self.codec.token_to_shape(value)),
                    None => Value::Null,
                }),
                ParseNode::Sequence(children) => {
                    let mut merged = Map::new();
                    for child in children {
                        if let Value::Object(fields) = self.shape_of(child)? {
                            merged.extend(fields);
                        }
                    }
                    merged.retain(|_, value| !value.is_null());
                    let wrapped = wrap(name.unwrap_or(MERGE), Value::Object(merged));
                    Ok(match pattern.select() {
                        Some(field) => field_or_null(&wrapped, field),
                        None => wrapped,
                    })
                }
                ParseNode::Or { index, choice } => {
                    let Some(name) = name else {
                        return self.shape_of(choice);
                    };
                    let kind = match pattern.kind() {
                        PatternKind::Or {
                            type_names: Some(names),
                            ..
                        } => names.get(*index).cloned(),
                        _ => None,
                    }
                    .unwrap_or_else(|| index.to_string());
                    let value = OrValue {
                        kind,
                        value: self.shape_of(choice)?,
                    };
                    let label = pattern.label().map(|label| self.grammar.label(label));
                    Ok(wrap(name, self.codec.or_value_to_shape(value, label)?))
                }
                ParseNode::Many { items, .. } => {
                    let items = items
                        .iter()
                        .map(|item| self.shape_of(item))
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(match name {
                        Some(name) => wrap(name, Value::Array(items)),
                        None => Value::Array(items),
                    })
                }
                ParseNode::Option(child) => {
                    let Some(name) = name else {
                        return Ok(Value::Null);
                    };
                    let default = pattern.default_value().cloned().unwrap_or(Value::Null);
                    let shape = match child {
                        Some(child) => self.shape_of(child)?,
                        None => default.clone(),
                    };
                    Ok(match pattern.select() {
                        Some(field) if shape != default => wrap(name, field_or_null(&shape, field)),
                        _ => wrap(name, shape),
                    })
                }
            }
        })
    }
}

fn field_or_null(shape: &Value, field: &str) -> Value {
    shape.get(field).cloned().unwrap_or(Value::Null)
}
