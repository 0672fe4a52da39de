//! Printer configuration.

/// Default maximum line width before groups break.
pub const MAX_LINE_WIDTH: usize = 80;

/// Default spaces per indentation level.
pub const INDENT_WIDTH: usize = 2;

/// Layout settings for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintConfig {
    /// Maximum line width before breaking groups.
    pub max_width: usize,

    /// Columns per indentation level. With `use_tabs`, the width a tab
    /// counts for when measuring.
    pub indent_width: usize,

    /// Indent with one tab per level instead of spaces.
    pub use_tabs: bool,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            max_width: MAX_LINE_WIDTH,
            indent_width: INDENT_WIDTH,
            use_tabs: false,
        }
    }
}

impl PrintConfig {
    /// Create a config with the specified max width.
    pub fn with_max_width(max_width: usize) -> Self {
        Self {
            max_width,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn indent_width(mut self, indent_width: usize) -> Self {
        self.indent_width = indent_width;
        self
    }

    #[must_use]
    pub fn use_tabs(mut self, use_tabs: bool) -> Self {
        self.use_tabs = use_tabs;
        self
    }

    /// Text of one indentation level.
    pub fn indent_unit(&self) -> String {
        if self.use_tabs {
            "\t".to_owned()
        } else {
            " ".repeat(self.indent_width)
        }
    }
}
