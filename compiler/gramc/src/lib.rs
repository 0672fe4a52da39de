//! Gram - one grammar for parsing, printing and data conversion.
//!
//! The lower crates each do one job: `gram_lexer` tokenizes, `gram_parse`
//! parses, `gram_fmt` prints and `gram_shape` converts trees to and from JSON
//! shapes. This crate ties them together:
//!
//! - [`Language`] bundles a lexer, a grammar and a shape codec
//! - [`languages`] holds the bundled demo languages (XML and Logic)
//! - [`templates`] builds source text and shapes from mixed text and shapes
//! - [`report`] renders lexer and parser failures as source diagnostics
//! - [`commands`] implements the `gram` subcommands

pub mod commands;
pub mod language;
pub mod languages;
pub mod report;
pub mod templates;

use std::sync::Once;

pub use language::{Language, LanguageError, TokenCodec};
pub use templates::{Part, Templates};

static TRACING_INIT: Once = Once::new();

/// Install the global tracing subscriber.
///
/// Filtering follows `RUST_LOG` (default `warn`). With `GRAM_LOG_TREE` set,
/// spans are rendered as an indented tree. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let registry = tracing_subscriber::registry().with(filter);
        let installed = if std::env::var_os("GRAM_LOG_TREE").is_some() {
            registry
                .with(tracing_tree::HierarchicalLayer::new(2).with_targets(true))
                .try_init()
        } else {
            registry
                .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
                .try_init()
        };
        if let Err(error) = installed {
            eprintln!("warning: tracing already initialized: {error}");
        }
    });
}
