//! `gram fmt`: reprint files through their grammar.

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use super::{document, load, reporter, CommandOptions};

/// Result of formatting a single file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormatResult {
    /// Already formatted.
    Unchanged,
    Formatted,
    /// Would change, in check mode.
    WouldFormat,
    /// The rendered diagnostics.
    Error(String),
}

/// Format one file, rewriting it unless `options.check` is set.
#[tracing::instrument(level = "debug", skip(options))]
pub fn format_file(path: &str, options: &CommandOptions) -> FormatResult {
    let Some((source, language)) = load(path, options) else {
        return FormatResult::Error(String::new());
    };
    let text = document(&source);
    let rule = options.rule_for(&language);
    let tokens = match language.tokenize(text) {
        Ok(tokens) => tokens,
        Err(error) => {
            return FormatResult::Error(reporter(path, text).language_error(&error, &[]));
        }
    };
    let printed = match language.parse_tokens(rule, &tokens) {
        Ok(parse) => language.print(&parse),
        Err(error) => {
            return FormatResult::Error(reporter(path, text).language_error(&error, &tokens));
        }
    };

    // Ensure trailing newline
    let formatted = if printed.ends_with('\n') {
        printed
    } else {
        format!("{printed}\n")
    };

    if formatted == source {
        return FormatResult::Unchanged;
    }
    if options.check {
        return FormatResult::WouldFormat;
    }
    if let Err(error) = std::fs::write(path, &formatted) {
        return FormatResult::Error(format!("error: cannot write '{path}': {error}\n"));
    }
    FormatResult::Formatted
}

/// Format every file in `options.files` in parallel.
///
/// Fails when a file has errors, or in check mode when a file would change.
pub fn format_files(options: &CommandOptions) -> bool {
    if options.files.is_empty() {
        eprintln!("error: no files to format");
        return false;
    }

    let formatted_count = AtomicUsize::new(0);
    let unchanged_count = AtomicUsize::new(0);
    let error_count = AtomicUsize::new(0);

    options
        .files
        .par_iter()
        .for_each(|path| match format_file(path, options) {
            FormatResult::Formatted => {
                println!("Formatted: {path}");
                formatted_count.fetch_add(1, Ordering::Relaxed);
            }
            FormatResult::WouldFormat => {
                println!("Would format: {path}");
                formatted_count.fetch_add(1, Ordering::Relaxed);
            }
            FormatResult::Unchanged => {
                unchanged_count.fetch_add(1, Ordering::Relaxed);
            }
            FormatResult::Error(errors) => {
                eprint!("{errors}");
                error_count.fetch_add(1, Ordering::Relaxed);
            }
        });

    let formatted = formatted_count.load(Ordering::Relaxed);
    let unchanged = unchanged_count.load(Ordering::Relaxed);
    if options.files.len() > 1 {
        let verb = if options.check {
            "would format"
        } else {
            "formatted"
        };
        println!("\n{formatted} {verb}, {unchanged} unchanged");
    }

    error_count.load(Ordering::Relaxed) == 0 && !(options.check && formatted > 0)
}
