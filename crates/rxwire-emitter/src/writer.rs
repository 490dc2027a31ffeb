//! Indentation-aware source writer for generated code.

const INDENT: &str = "    ";

/// Accumulates generated source text with indentation tracking.
#[derive(Debug, Default)]
pub struct SourceWriter {
    out: String,
    indent: usize,
    at_line_start: bool,
}

impl SourceWriter {
    pub fn new() -> Self {
        SourceWriter {
            out: String::new(),
            indent: 0,
            at_line_start: true,
        }
    }

    fn flush_indent(&mut self) {
        if self.at_line_start {
            for _ in 0..self.indent {
                self.out.push_str(INDENT);
            }
            self.at_line_start = false;
        }
    }

    /// Write text at the current indentation.
    pub fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.flush_indent();
        self.out.push_str(text);
    }

    /// Write text followed by a newline.
    pub fn write_line(&mut self, text: &str) {
        self.write(text);
        self.newline();
    }

    /// Terminate the current line.
    pub fn newline(&mut self) {
        self.out.push('\n');
        self.at_line_start = true;
    }

    /// Write an empty line (no indentation).
    pub fn blank_line(&mut self) {
        if !self.at_line_start {
            self.newline();
        }
        self.out.push('\n');
        self.at_line_start = true;
    }

    pub fn increase_indent(&mut self) {
        self.indent += 1;
    }

    pub fn decrease_indent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Write a `{`-terminated line, indent, run `body`, then close with `}`.
    pub fn block(&mut self, header: &str, body: impl FnOnce(&mut Self)) {
        self.write(header);
        self.write_line(" {");
        self.increase_indent();
        body(self);
        self.decrease_indent();
        self.write_line("}");
    }

    pub fn finish(self) -> String {
        self.out
    }
}
