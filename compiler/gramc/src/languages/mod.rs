//! Bundled languages.

pub mod logic;
pub mod xml;

use gram_ir::GrammarError;
use gram_lexer::LexError;

use crate::language::Language;

/// A bundled language failed to build. Always a bug in its definition.
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    #[error("lexer definition: {0}")]
    Lexer(#[from] LexError),
    #[error("grammar definition: {0}")]
    Grammar(#[from] GrammarError),
}

/// Every bundled language.
pub fn all() -> Result<Vec<Language>, DefinitionError> {
    Ok(vec![xml::language()?, logic::language()?])
}

/// The bundled language called `name`.
pub fn by_name(name: &str) -> Result<Option<Language>, DefinitionError> {
    Ok(all()?.into_iter().find(|language| language.name() == name))
}

/// The bundled language for files ending in `.extension`.
pub fn by_extension(extension: &str) -> Result<Option<Language>, DefinitionError> {
    Ok(all()?
        .into_iter()
        .find(|language| language.extensions().contains(&extension)))
}

#[cfg(test)]
mod tests;
