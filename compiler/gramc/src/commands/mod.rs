//! Command handlers for the `gram` CLI.
//!
//! Each submodule implements one subcommand. Option parsing, file reading and
//! language selection are shared and live here. Handlers print their own
//! output and diagnostics and return whether they succeeded.

use std::ffi::OsStr;
use std::io::IsTerminal;
use std::path::Path;

use gram_fmt::PrintConfig;

use crate::language::Language;
use crate::languages;
use crate::report::Reporter;

mod fmt;
mod lex;
mod parse;
mod shape;

pub use fmt::{format_file, format_files, FormatResult};
pub use lex::lex_file;
pub use parse::{outline, parse_file};
pub use shape::shape_file;

/// Options shared by every subcommand.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOptions {
    pub files: Vec<String>,
    /// Rule to parse with, instead of the language's entry rule.
    pub rule: Option<String>,
    /// Language name, instead of choosing by file extension.
    pub language: Option<String>,
    pub width: Option<usize>,
    pub indent: Option<usize>,
    pub tabs: bool,
    /// Report files that would change instead of rewriting them.
    pub check: bool,
}

impl CommandOptions {
    /// Parse `args`, the arguments after the subcommand name.
    pub fn parse(args: &[String]) -> Result<Self, String> {
        let mut options = CommandOptions::default();
        for arg in args {
            if let Some(rule) = arg.strip_prefix("--rule=") {
                options.rule = Some(rule.to_owned());
            } else if let Some(language) = arg.strip_prefix("--lang=") {
                options.language = Some(language.to_owned());
            } else if let Some(width) = arg.strip_prefix("--width=") {
                options.width = Some(number("--width", width)?);
            } else if let Some(indent) = arg.strip_prefix("--indent=") {
                options.indent = Some(number("--indent", indent)?);
            } else if arg == "--tabs" {
                options.tabs = true;
            } else if arg == "--check" {
                options.check = true;
            } else if arg.starts_with('-') {
                return Err(format!("unknown option '{arg}'"));
            } else {
                options.files.push(arg.clone());
            }
        }
        Ok(options)
    }

    /// The print settings these options ask for, on top of `base`.
    pub fn print_config(&self, base: PrintConfig) -> PrintConfig {
        let mut config = base.use_tabs(self.tabs || base.use_tabs);
        if let Some(width) = self.width {
            config.max_width = width;
        }
        if let Some(indent) = self.indent {
            config = config.indent_width(indent);
        }
        config
    }

    /// The language for `path`, configured by these options.
    pub fn language_for(&self, path: &str) -> Result<Language, String> {
        let found = if let Some(name) = &self.language {
            languages::by_name(name)
        } else {
            let extension = Path::new(path)
                .extension()
                .and_then(OsStr::to_str)
                .unwrap_or_default();
            languages::by_extension(extension)
        };
        let language = found
            .map_err(|error| format!("internal error: {error}"))?
            .ok_or_else(|| match &self.language {
                Some(name) => format!("unknown language '{name}'"),
                None => format!("no language for '{path}' (use --lang=<name>)"),
            })?;
        let config = self.print_config(*language.print_config());
        Ok(language.with_print_config(config))
    }

    /// The rule to use with `language`.
    pub fn rule_for<'a>(&'a self, language: &Language) -> &'a str {
        self.rule.as_deref().unwrap_or(language.entry())
    }
}

fn number(option: &str, value: &str) -> Result<usize, String> {
    value
        .parse()
        .map_err(|_| format!("{option} expects a number, got '{value}'"))
}

/// Read a source file, describing failures the way users expect.
pub fn read_file(path: &str) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|error| match error.kind() {
        std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
        std::io::ErrorKind::PermissionDenied => format!("permission denied reading '{path}'"),
        std::io::ErrorKind::InvalidData => format!("'{path}' contains invalid UTF-8 data"),
        _ => format!("error reading '{path}': {error}"),
    })
}

/// The source and language of `path`, or a printed error.
fn load(path: &str, options: &CommandOptions) -> Option<(String, Language)> {
    let loaded = read_file(path).and_then(|source| Ok((source, options.language_for(path)?)));
    match loaded {
        Ok(loaded) => Some(loaded),
        Err(message) => {
            eprintln!("error: {message}");
            None
        }
    }
}

/// Diagnostics for `path`, colored when stderr is a terminal.
fn reporter<'s>(path: &'s str, source: &'s str) -> Reporter<'s> {
    Reporter::new(path, source).with_color(std::io::stderr().is_terminal())
}

/// The part of a file that is parsed: trailing whitespace belongs to the
/// file, not to the document.
fn document(source: &str) -> &str {
    source.trim_end()
}
