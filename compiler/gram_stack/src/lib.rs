//! Stack headroom for recursive tree walks.
//!
//! The parsing engine itself never recurses on the native stack: it drains an
//! explicit work stack. The passes that run *after* parsing (tree
//! reconstruction, printing, shape extraction and injection) are plain
//! structural recursions over a `Parse` tree whose depth follows the input,
//! so each recursive step goes through [`ensure_sufficient_stack`].
//!
//! On native targets the stack is grown with `stacker` once less than
//! [`RED_ZONE`] bytes remain. On `wasm32` the closure is called directly.

/// Remaining stack below which a new segment is allocated.
pub const RED_ZONE: usize = 64 * 1024;

/// Size of each newly allocated stack segment.
pub const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if less than [`RED_ZONE`] is left.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
