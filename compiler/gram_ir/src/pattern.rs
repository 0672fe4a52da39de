//! Pattern nodes.
//!
//! A pattern is immutable once the grammar is built. Matching kinds
//! (`Consume`, `Sequence`, `Or`, `Many`, `Option`, `Thunk`) drive the parser;
//! layout kinds (`Literal`, `Line`, `Indent`, `Group`, `If`) succeed without
//! consuming input and only carry hints for the printer.

use serde_json::Value;

use crate::ids::{LabelId, PatternId, RuleId};

/// Extraction name meaning "merge into the enclosing shape".
pub const MERGE: &str = ".";

/// Line break flavour of a `Line` marker.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// A space when the enclosing group fits, a newline otherwise.
    #[default]
    Default,
    /// Nothing when the enclosing group fits, a newline otherwise.
    Soft,
    /// Always a newline.
    Hard,
}

/// Layout leaf usable as the `before`/`after` decoration of an `If` marker.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Layout {
    Literal(String),
    Line(LineKind),
}

/// Alternation strategy of an `Or`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum OrMode {
    /// First alternative with a success wins.
    #[default]
    Ordered,
    /// Every alternative is explored and all successes are kept.
    Parallel,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PatternKind {
    Consume {
        terminal: String,
    },
    Sequence {
        children: Vec<PatternId>,
    },
    Or {
        alternatives: Vec<PatternId>,
        mode: OrMode,
        /// Shape discriminants, one per alternative, for typed alternations.
        type_names: Option<Vec<String>>,
    },
    Many {
        item: PatternId,
        separator: Option<PatternId>,
    },
    Option {
        item: PatternId,
    },
    Thunk {
        rule: RuleId,
    },
    Literal {
        text: String,
    },
    Line {
        kind: LineKind,
    },
    Indent {
        child: PatternId,
    },
    Group {
        child: PatternId,
    },
    If {
        child: PatternId,
        reference: String,
        before: Option<Layout>,
        after: Option<Layout>,
    },
}

impl PatternKind {
    /// Short lowercase name, used in diagnostics and logs.
    pub fn tag(&self) -> &'static str {
        match self {
            PatternKind::Consume { .. } => "consume",
            PatternKind::Sequence { .. } => "sequence",
            PatternKind::Or { .. } => "or",
            PatternKind::Many { .. } => "many",
            PatternKind::Option { .. } => "option",
            PatternKind::Thunk { .. } => "thunk",
            PatternKind::Literal { .. } => "literal",
            PatternKind::Line { .. } => "line",
            PatternKind::Indent { .. } => "indent",
            PatternKind::Group { .. } => "group",
            PatternKind::If { .. } => "if",
        }
    }

    /// Layout markers never look at tokens.
    pub fn is_layout(&self) -> bool {
        matches!(
            self,
            PatternKind::Literal { .. }
                | PatternKind::Line { .. }
                | PatternKind::Indent { .. }
                | PatternKind::Group { .. }
                | PatternKind::If { .. }
        )
    }
}

/// Key under which memoization and left-recursion bookkeeping index a pattern.
///
/// Two patterns sharing a label are one recognizer as far as the engine is
/// concerned.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecognizerKey {
    Label(LabelId),
    Pattern(PatternId),
}

/// A pattern plus its optional attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternNode {
    pub(crate) id: PatternId,
    pub(crate) kind: PatternKind,
    pub(crate) name: Option<String>,
    pub(crate) label: Option<LabelId>,
    pub(crate) select: Option<String>,
    pub(crate) default: Option<Value>,
}

impl PatternNode {
    pub(crate) fn new(id: PatternId, kind: PatternKind) -> Self {
        PatternNode {
            id,
            kind,
            name: None,
            label: None,
            select: None,
            default: None,
        }
    }

    #[inline]
    pub fn id(&self) -> PatternId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> &PatternKind {
        &self.kind
    }

    /// Extraction name (`as`).
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn label(&self) -> Option<LabelId> {
        self.label
    }

    /// Field picked out of a sequence or option shape.
    pub fn select(&self) -> Option<&str> {
        self.select.as_deref()
    }

    /// Shape an absent option extracts to.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn recognizer(&self) -> RecognizerKey {
        match self.label {
            Some(label) => RecognizerKey::Label(label),
            None => RecognizerKey::Pattern(self.id),
        }
    }
}
