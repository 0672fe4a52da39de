//! Shape conversion errors.

/// Why a shape could not be produced or turned back into a tree.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("expected '{field}' in {shape}")]
    MissingField { field: String, shape: String },
    #[error("expected a list for '{field}', found {shape}")]
    ExpectedList { field: String, shape: String },
    #[error("pattern '{kind}' must have an 'as' name")]
    Unnamed { kind: &'static str },
    #[error("option patterns can't use '.' for their 'as' name")]
    MergedOption,
    #[error("no alternative of type '{kind}'")]
    UnknownAlternative { kind: String },
    #[error("expected a tagged value with a 'type', found {0}")]
    UntaggedValue(String),
    #[error("unknown 'or' value (label: {label}): {shape}")]
    UnknownOr { label: String, shape: String },
    #[error("cannot turn {shape} into a '{terminal}' token")]
    InvalidToken { terminal: String, shape: String },
}
