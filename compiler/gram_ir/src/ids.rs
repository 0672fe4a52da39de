//! Index newtypes into the [`Grammar`](crate::Grammar) arena.
//!
//! All three are `u32` handles. They are only meaningful for the grammar that
//! issued them; the builder is the single source of fresh ids, so two grammars
//! built side by side never share a counter.

use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(index: u32) -> Self {
                Self(index)
            }

            /// Position in the owning arena.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            /// Id for the next slot of an arena currently holding `len` entries.
            pub(crate) fn next(len: usize) -> Self {
                Self(u32::try_from(len).unwrap_or(u32::MAX))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id! {
    /// Construction identity of a pattern; doubles as its recognizer key when
    /// the pattern carries no label.
    PatternId
}

define_id! {
    /// A named rule slot. Thunks point at rules, not at patterns, so a rule
    /// can be referenced before its body exists.
    RuleId
}

define_id! {
    /// An interned recognizer label.
    LabelId
}
