//! Indentation-aware text accumulator.

use crate::Indent;

/// Trait for values that know how to write themselves.
///
/// Expressions write inline text at the current position; statements write
/// whole lines through [`Writer::write_line`].
pub trait Render {
    /// Write this value into `writer`.
    fn render(&self, writer: &mut Writer);
}

impl Render for str {
    fn render(&self, writer: &mut Writer) {
        writer.buffer.push_str(self);
    }
}

impl Render for String {
    fn render(&self, writer: &mut Writer) {
        self.as_str().render(writer);
    }
}

/// Blanket implementation for references.
impl<T: Render + ?Sized> Render for &T {
    fn render(&self, writer: &mut Writer) {
        (*self).render(writer);
    }
}

/// Blanket implementation for Box.
impl<T: Render + ?Sized> Render for Box<T> {
    fn render(&self, writer: &mut Writer) {
        self.as_ref().render(writer);
    }
}

/// Single-pass writer tracking the current indentation depth.
///
/// ```
/// use outsource_codegen::{Indent, Writer};
///
/// let mut writer = Writer::new(Indent::PYTHON);
/// writer.write_line("if ready:");
/// writer.indented(|w| {
///     w.write_line("go()");
/// });
/// assert_eq!(writer.finish(), "if ready:\n    go()\n");
/// ```
#[derive(Debug, Clone)]
pub struct Writer {
    indent_level: usize,
    unit: String,
    buffer: String,
}

impl Writer {
    /// Create a writer using `indent` for each nesting level.
    pub fn new(indent: Indent) -> Self {
        Self {
            indent_level: 0,
            unit: indent.unit(),
            buffer: String::new(),
        }
    }

    /// Write a value at the current position.
    pub fn write(&mut self, value: &(impl Render + ?Sized)) -> &mut Self {
        value.render(self);
        self
    }

    /// Write indentation, the value and a line terminator.
    ///
    /// Lines that render to nothing are emitted without indentation.
    pub fn write_line(&mut self, value: &(impl Render + ?Sized)) -> &mut Self {
        let line_start = self.buffer.len();
        self.write_indent();
        let content_start = self.buffer.len();
        value.render(self);
        if self.buffer.len() == content_start {
            self.buffer.truncate(line_start);
        }
        self.buffer.push('\n');
        self
    }

    /// Run `f` one indentation level deeper.
    ///
    /// The previous level is restored when `f` returns or unwinds.
    pub fn indented<T>(&mut self, f: impl FnOnce(&mut Writer) -> T) -> T {
        let was = self.indent_level;
        self.indent_level += 1;
        let mut guard = IndentGuard { writer: self, was };
        f(&mut *guard.writer)
    }

    /// Get the current indentation level.
    pub fn current_indent(&self) -> usize {
        self.indent_level
    }

    /// Get a reference to the text written so far.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Consume the writer and return the generated text.
    pub fn finish(self) -> String {
        self.buffer
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(&self.unit);
        }
    }
}

impl Default for Writer {
    fn default() -> Self {
        Self::new(Indent::default())
    }
}

struct IndentGuard<'a> {
    writer: &'a mut Writer,
    was: usize,
}

impl Drop for IndentGuard<'_> {
    fn drop(&mut self) {
        self.writer.indent_level = self.was;
    }
}
