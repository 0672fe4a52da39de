//! Left-recursion context.
//!
//! Each invocation path carries its own [`RecursionContext`]: for every token
//! position the path has visited, the recursion depth at which each recognizer
//! was (re-)entered there. Contexts are persistent; entering a recognizer
//! produces a new context for the callee and leaves the caller's untouched.

use std::rc::Rc;

use crate::cache::{Interner, MemoKey, RecMap, RecMapId};

#[derive(Clone, Debug)]
pub(crate) struct RecursionContext {
    entries: Rc<[(usize, RecMapId)]>,
}

impl RecursionContext {
    pub(crate) fn new() -> Self {
        RecursionContext {
            entries: Rc::from(Vec::new()),
        }
    }

    /// Depth map recorded for `index` on this path.
    pub(crate) fn at(&self, index: usize) -> Option<RecMapId> {
        self.entries
            .iter()
            .find(|(position, _)| *position == index)
            .map(|&(_, map)| map)
    }

    /// Context for the callee of `key` entered at `depth`.
    ///
    /// The first recognizer to reach a position only opens an empty map for
    /// it; recognizers entered at an already open position record their depth.
    pub(crate) fn enter(
        &self,
        rec_maps: &mut Interner<RecMapId, RecMap>,
        empty: RecMapId,
        key: MemoKey,
        depth: u32,
    ) -> Self {
        let entries: Vec<(usize, RecMapId)> = match self.at(key.index) {
            None => self
                .entries
                .iter()
                .copied()
                .chain(std::iter::once((key.index, empty)))
                .collect(),
            Some(map) => {
                let mut updated = rec_maps.get(map).clone();
                updated.insert(key, depth);
                let updated = rec_maps.intern(updated);
                self.entries
                    .iter()
                    .map(|&(position, map)| {
                        if position == key.index {
                            (position, updated)
                        } else {
                            (position, map)
                        }
                    })
                    .collect()
            }
        };
        RecursionContext {
            entries: Rc::from(entries),
        }
    }
}

/// May a success computed under `recorded` be reused under `current`?
///
/// Only if no recognizer in `recorded` was deeper than it currently is.
/// Recognizers absent from `current` are unconstrained.
pub(crate) fn is_more_constrained(current: &RecMap, recorded: &RecMap) -> bool {
    recorded
        .iter()
        .all(|(key, depth)| current.get(key).is_none_or(|active| depth <= active))
}
