//! Output Emitter
//!
//! Abstraction for output production during rendering.

/// Trait for emitting rendered output.
pub trait Emitter {
    /// Emit a text fragment.
    fn emit(&mut self, text: &str);

    /// End the current line. Blanks at the end of the finished line are dropped.
    fn emit_newline(&mut self);

    /// Emit `level` copies of the indentation `unit`.
    fn emit_indent(&mut self, level: usize, unit: &str);
}

/// String-based emitter for in-memory rendering.
#[derive(Default)]
pub struct StringEmitter {
    buffer: String,
}

impl StringEmitter {
    /// Create a new string emitter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the rendered output.
    pub fn output(self) -> String {
        self.buffer
    }

    /// Get the current buffer contents without consuming.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }
}

impl Emitter for StringEmitter {
    fn emit(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn emit_newline(&mut self) {
        let trimmed = self.buffer.trim_end_matches([' ', '\t']).len();
        self.buffer.truncate(trimmed);
        self.buffer.push('\n');
    }

    fn emit_indent(&mut self, level: usize, unit: &str) {
        for _ in 0..level {
            self.buffer.push_str(unit);
        }
    }
}
