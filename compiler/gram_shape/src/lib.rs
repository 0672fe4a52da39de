//! Gram Shape - plain data views of parse trees.
//!
//! A *shape* is a `serde_json::Value` built from the named parts of a
//! [`Parse`](gram_ir::Parse): the `as` names of patterns become object keys,
//! repetitions become arrays and typed alternations become tagged values.
//! [`Shaper::extract`] computes the shape of a tree and [`Shaper::inject`]
//! rebuilds a tree for a pattern from a shape, so that for grammars where
//! every choice is named, injecting an extracted shape gives the tree back.
//!
//! How token values and alternation values look as shapes is decided by a
//! [`ShapeCodec`].

mod codec;
mod error;
mod extract;
mod inject;

use gram_ir::{Grammar, MERGE};
use serde_json::{Map, Value};

pub use codec::{OrValue, ShapeCodec, StringCodec};
pub use error::ShapeError;

/// Converts between parse trees of one grammar and shapes.
pub struct Shaper<'g, C> {
    grammar: &'g Grammar,
    codec: C,
}

impl<'g, C> Shaper<'g, C> {
    pub fn new(grammar: &'g Grammar, codec: C) -> Self {
        Shaper { grammar, codec }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }
}

/// `{name: shape}`, or `shape` itself for the merge name.
fn wrap(name: &str, shape: Value) -> Value {
    if name == MERGE {
        return shape;
    }
    let mut object = Map::new();
    object.insert(name.to_owned(), shape);
    Value::Object(object)
}
