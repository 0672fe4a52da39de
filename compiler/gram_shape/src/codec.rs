//! Token and alternation encodings.

use serde_json::{json, Value};

use crate::error::ShapeError;

/// The default shape of a matched alternation: which alternative, and its
/// shape. Alternatives are identified by their type name, or by their index
/// when the alternation has no type names.
#[derive(Clone, Debug, PartialEq)]
pub struct OrValue {
    pub kind: String,
    pub value: Value,
}

impl OrValue {
    /// `{"type": kind, "value": value}`
    pub fn into_shape(self) -> Value {
        json!({ "type": self.kind, "value": self.value })
    }

    /// Read a `{"type", "value"}` object. A missing value is `null`.
    pub fn from_shape(shape: &Value) -> Result<OrValue, ShapeError> {
        let kind = match shape.get("type") {
            Some(Value::String(kind)) => kind.clone(),
            Some(Value::Number(index)) => index.to_string(),
            _ => return Err(ShapeError::UntaggedValue(shape.to_string())),
        };
        Ok(OrValue {
            kind,
            value: shape.get("value").cloned().unwrap_or(Value::Null),
        })
    }
}

/// How tokens of type `V` and alternations appear in shapes.
pub trait ShapeCodec<V> {
    /// Shape of a named token.
    fn token_to_shape(&self, token: &V) -> Value;

    /// A `terminal` token carrying what `shape` describes.
    fn shape_to_token(&self, shape: &Value, terminal: &str) -> Result<V, ShapeError>;

    /// The token an unnamed `consume(terminal)` stands for.
    fn terminal_token(&self, terminal: &str) -> V;

    /// Shape of a named alternation labeled `label`.
    fn or_value_to_shape(&self, value: OrValue, label: Option<&str>) -> Result<Value, ShapeError> {
        let _ = label;
        Ok(value.into_shape())
    }

    /// Inverse of [`ShapeCodec::or_value_to_shape`].
    fn or_shape_to_value(&self, shape: &Value, label: Option<&str>) -> Result<OrValue, ShapeError> {
        let _ = label;
        OrValue::from_shape(shape)
    }
}

impl<V, C: ShapeCodec<V> + ?Sized> ShapeCodec<V> for &C {
    fn token_to_shape(&self, token: &V) -> Value {
        (**self).token_to_shape(token)
    }

    fn shape_to_token(&self, shape: &Value, terminal: &str) -> Result<V, ShapeError> {
        (**self).shape_to_token(shape, terminal)
    }

    fn terminal_token(&self, terminal: &str) -> V {
        (**self).terminal_token(terminal)
    }

    fn or_value_to_shape(&self, value: OrValue, label: Option<&str>) -> Result<Value, ShapeError> {
        (**self).or_value_to_shape(value, label)
    }

    fn or_shape_to_value(&self, shape: &Value, label: Option<&str>) -> Result<OrValue, ShapeError> {
        (**self).or_shape_to_value(shape, label)
    }
}

/// Tokens that are their own text: a token's shape is the JSON string of it.
#[derive(Copy, Clone, Debug, Default)]
pub struct StringCodec;

impl ShapeCodec<String> for StringCodec {
    fn token_to_shape(&self, token: &String) -> Value {
        Value::String(token.clone())
    }

    fn shape_to_token(&self, shape: &Value, terminal: &str) -> Result<String, ShapeError> {
        shape
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| ShapeError::InvalidToken {
                terminal: terminal.to_owned(),
                shape: shape.to_string(),
            })
    }

    fn terminal_token(&self, terminal: &str) -> String {
        terminal.to_owned()
    }
}
