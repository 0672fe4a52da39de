//! Gram Formatter
//!
//! Regenerates source text from a `Parse` tree.
//!
//! # Architecture
//!
//! Printing happens in two steps:
//!
//! 1. **Format**: the tree is turned into a [`Doc`], a small document algebra
//!    of text, line breaks, indentation and groups. Token text comes from the
//!    consumed values; literals, lines and indentation come from the layout
//!    patterns of the grammar.
//! 2. **Render**: the document is laid out for a maximum width. A group stays
//!    on one line when it and the rest of the line after it fit; otherwise
//!    every line directly inside it breaks.
//!
//! # Modules
//!
//! - [`config`]: width, indentation and tab settings
//! - [`doc`]: the document algebra
//! - [`emitter`]: output abstraction
//! - [`render`]: the width-aware layout
//! - [`printer`]: `Parse` trees to documents

pub mod config;
pub mod doc;
pub mod emitter;
pub mod printer;
pub mod render;

pub use config::{PrintConfig, INDENT_WIDTH, MAX_LINE_WIDTH};
pub use doc::Doc;
pub use emitter::{Emitter, StringEmitter};
pub use printer::{format, print};
pub use render::{render, render_to};
