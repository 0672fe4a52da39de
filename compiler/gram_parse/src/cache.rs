//! Hash-consed result storage.
//!
//! Every intermediate value the engine produces (results, match fragments,
//! projected token values, failure descriptors, left-recursion maps) is
//! interned into an [`Interner`] and referred to by a `u32` handle. Two
//! structurally equal values always share a handle, so revisiting the same
//! sub-derivation through a different exploration path costs one hash lookup
//! and no memory.

use std::collections::BTreeMap;
use std::hash::Hash;

use gram_ir::RecognizerKey;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::failure::FailureKind;

/// Handle into an [`Interner`].
pub(crate) trait Handle: Copy + Eq + Hash {
    fn from_index(index: usize) -> Self;
    fn index(self) -> usize;
}

macro_rules! define_handle {
    ($($(#[$meta:meta])* $name:ident;)*) => {$(
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub(crate) struct $name(u32);

        impl Handle for $name {
            #[inline]
            #[expect(
                clippy::cast_possible_truncation,
                reason = "interners stay far below u32::MAX entries"
            )]
            fn from_index(index: usize) -> Self {
                Self(index as u32)
            }

            #[inline]
            fn index(self) -> usize {
                self.0 as usize
            }
        }
    )*};
}

define_handle! {
    /// An interned [`ParseResult`].
    ResultId;
    /// An interned [`MatchNode`].
    MatchId;
    /// An interned projected token value.
    ValueId;
    /// An interned [`FailureKind`].
    FailureId;
    /// An interned [`RecMap`].
    RecMapId;
}

/// Content-addressed storage: equal values get equal handles.
pub(crate) struct Interner<H, T> {
    values: Vec<T>,
    lookup: FxHashMap<T, H>,
}

impl<H: Handle, T: Clone + Eq + Hash> Interner<H, T> {
    pub(crate) fn new() -> Self {
        Interner {
            values: Vec::new(),
            lookup: FxHashMap::default(),
        }
    }

    pub(crate) fn intern(&mut self, value: T) -> H {
        if let Some(&handle) = self.lookup.get(&value) {
            return handle;
        }
        let handle = H::from_index(self.values.len());
        self.values.push(value.clone());
        self.lookup.insert(value, handle);
        handle
    }

    #[inline]
    pub(crate) fn get(&self, handle: H) -> &T {
        &self.values[handle.index()]
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }
}

/// `(tokenIndex, recognizer)`: the memoization and left-recursion key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct MemoKey {
    pub index: usize,
    pub recognizer: RecognizerKey,
}

/// Recursion depth per recognizer, as recorded in a left-recursion context.
pub(crate) type RecMap = BTreeMap<MemoKey, u32>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Outcome {
    Success(MatchId),
    Failure(FailureId),
}

/// One candidate outcome of a recognizer: what matched (or why not) and where
/// the derivation stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct ParseResult {
    pub outcome: Outcome,
    /// Token index after the match, or the failure position.
    pub end: usize,
    pub rec_map: RecMapId,
}

impl ParseResult {
    pub(crate) fn success(self) -> Option<MatchId> {
        match self.outcome {
            Outcome::Success(matched) => Some(matched),
            Outcome::Failure(_) => None,
        }
    }
}

/// Compact match fragment. Unlike a `Parse` node it carries no pattern; the
/// pattern is supplied again during reconstruction.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum MatchNode {
    Consume(ValueId),
    Sequence(Vec<MatchId>),
    Or { index: usize, choice: MatchId },
    Many {
        items: Vec<MatchId>,
        separators: Vec<MatchId>,
    },
    Option(Option<MatchId>),
    Thunk(MatchId),
    Literal,
    Line,
    Indent(MatchId),
    Group(MatchId),
    If(MatchId),
}

/// A list of result handles, typically short.
pub(crate) type Results = SmallVec<[ResultId; 4]>;

/// Insertion-ordered set of result handles.
#[derive(Default)]
pub(crate) struct ResultSet {
    order: Results,
    seen: FxHashSet<ResultId>,
}

impl ResultSet {
    pub(crate) fn insert(&mut self, result: ResultId) -> bool {
        let fresh = self.seen.insert(result);
        if fresh {
            self.order.push(result);
        }
        fresh
    }

    pub(crate) fn extend(&mut self, results: impl IntoIterator<Item = ResultId>) {
        for result in results {
            self.insert(result);
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub(crate) fn into_results(self) -> Results {
        self.order
    }
}

/// The five interners of one parse.
pub(crate) struct Caches<V> {
    pub results: Interner<ResultId, ParseResult>,
    pub matches: Interner<MatchId, MatchNode>,
    pub values: Interner<ValueId, V>,
    pub failures: Interner<FailureId, FailureKind>,
    pub rec_maps: Interner<RecMapId, RecMap>,
    empty_rec_map: RecMapId,
}

impl<V: Clone + Eq + Hash> Caches<V> {
    pub(crate) fn new() -> Self {
        let mut rec_maps = Interner::new();
        let empty_rec_map = rec_maps.intern(RecMap::new());
        Caches {
            results: Interner::new(),
            matches: Interner::new(),
            values: Interner::new(),
            failures: Interner::new(),
            rec_maps,
            empty_rec_map,
        }
    }

    #[inline]
    pub(crate) fn empty_rec_map(&self) -> RecMapId {
        self.empty_rec_map
    }

    #[inline]
    pub(crate) fn result(&self, id: ResultId) -> ParseResult {
        *self.results.get(id)
    }

    pub(crate) fn success(&mut self, node: MatchNode, end: usize, rec_map: RecMapId) -> ResultId {
        let matched = self.matches.intern(node);
        self.results.intern(ParseResult {
            outcome: Outcome::Success(matched),
            end,
            rec_map,
        })
    }

    pub(crate) fn failure(&mut self, kind: FailureKind, at: usize, rec_map: RecMapId) -> ResultId {
        let failure = self.failures.intern(kind);
        self.results.intern(ParseResult {
            outcome: Outcome::Failure(failure),
            end: at,
            rec_map,
        })
    }

    pub(crate) fn is_infinite_recursion(&self, result: ParseResult) -> bool {
        match result.outcome {
            Outcome::Failure(id) => matches!(self.failures.get(id), FailureKind::InfiniteRecursion),
            Outcome::Success(_) => false,
        }
    }

    /// Union of two recursion maps, `right` winning on shared keys.
    pub(crate) fn merge_rec_maps(&mut self, left: RecMapId, right: RecMapId) -> RecMapId {
        if left == right || right == self.empty_rec_map {
            return left;
        }
        if left == self.empty_rec_map {
            return right;
        }
        let mut merged = self.rec_maps.get(left).clone();
        merged.extend(self.rec_maps.get(right).iter().map(|(key, depth)| (*key, *depth)));
        self.rec_maps.intern(merged)
    }

    /// Total number of interned values, for statistics.
    pub(crate) fn size(&self) -> usize {
        self.results.len()
            + self.matches.len()
            + self.values.len()
            + self.failures.len()
            + self.rec_maps.len()
    }
}
