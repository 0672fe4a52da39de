//! Token seams.
//!
//! The engine is generic over token representation. It only asks whether a
//! token has a given terminal type and what value to store in the tree for it.
//! The printer only asks for the text a stored value prints as.

use std::borrow::Cow;
use std::fmt;
use std::hash::Hash;

/// A token as seen by the parsing engine.
pub trait Token: Clone + fmt::Debug {
    /// What a `Consume` node stores for this token.
    type Value: Clone + Eq + Hash + fmt::Debug;

    /// Does this token have terminal type `terminal`?
    fn is(&self, terminal: &str) -> bool;

    fn value(&self) -> Self::Value;
}

/// Text a consumed value prints as.
pub trait TokenText {
    fn text(&self) -> Cow<'_, str>;
}

impl Token for &str {
    type Value = String;

    fn is(&self, terminal: &str) -> bool {
        *self == terminal
    }

    fn value(&self) -> String {
        (*self).to_owned()
    }
}

impl Token for String {
    type Value = String;

    fn is(&self, terminal: &str) -> bool {
        self == terminal
    }

    fn value(&self) -> String {
        self.clone()
    }
}

impl TokenText for String {
    fn text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}
