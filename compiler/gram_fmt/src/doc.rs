//! The document algebra.

use gram_ir::LineKind;

/// A layout-independent description of output text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Doc {
    Text(String),
    /// A break opportunity; see [`LineKind`].
    Line(LineKind),
    /// The content, with breaks inside it one level deeper.
    Indent(Box<Doc>),
    /// The content, laid out flat if it fits.
    Group(Box<Doc>),
    Concat(Vec<Doc>),
}

impl Doc {
    /// The empty document.
    pub fn nil() -> Doc {
        Doc::Concat(Vec::new())
    }

    pub fn text(text: impl Into<String>) -> Doc {
        Doc::Text(text.into())
    }

    /// A space when flat, a newline when broken.
    pub fn line() -> Doc {
        Doc::Line(LineKind::Default)
    }

    /// Nothing when flat, a newline when broken.
    pub fn softline() -> Doc {
        Doc::Line(LineKind::Soft)
    }

    /// Always a newline. Forces every enclosing group to break.
    pub fn hardline() -> Doc {
        Doc::Line(LineKind::Hard)
    }

    pub fn indent(doc: Doc) -> Doc {
        Doc::Indent(Box::new(doc))
    }

    pub fn group(doc: Doc) -> Doc {
        Doc::Group(Box::new(doc))
    }

    /// Concatenation, flattening nested concatenations.
    pub fn concat(docs: impl IntoIterator<Item = Doc>) -> Doc {
        let mut parts = Vec::new();
        for doc in docs {
            match doc {
                Doc::Concat(inner) => parts.extend(inner),
                other => parts.push(other),
            }
        }
        if parts.len() == 1 {
            if let Some(single) = parts.pop() {
                return single;
            }
        }
        Doc::Concat(parts)
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Doc::Concat(parts) if parts.is_empty())
    }
}
