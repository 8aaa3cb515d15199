// src/emit/writer.rs
//! Indentation-aware text buffer for generated source.

use std::fmt::Write;

const INDENT: &str = "    ";

#[derive(Debug, Default)]
pub struct CodeWriter {
    out: String,
    depth: usize,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes one line at the current depth; empty text yields a blank line.
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str(INDENT);
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.line("")
    }

    /// Writes `header {`, runs `body` one level deeper, then closes with
    /// `}` followed by `trailer`.
    pub fn block(
        &mut self,
        header: impl AsRef<str>,
        trailer: &str,
        body: impl FnOnce(&mut Self),
    ) -> &mut Self {
        self.line(format!("{} {{", header.as_ref()));
        self.depth += 1;
        body(self);
        self.depth -= 1;
        self.line(format!("}}{}", trailer))
    }

    /// Writes `comment` as `///` doc lines. Blank comments write nothing.
    pub fn doc(&mut self, comment: &str) -> &mut Self {
        for line in comment.trim().lines() {
            let line = line.trim_end();
            if line.is_empty() {
                self.line("///");
            } else {
                self.line(format!("/// {}", line));
            }
        }
        self
    }

    /// Raw text appended without indentation.
    pub fn raw(&mut self, text: &str) -> &mut Self {
        let _ = write!(self.out, "{}", text);
        self
    }

    pub fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_indent_their_body() {
        let mut w = CodeWriter::new();
        w.doc("An emoji.\n\nSee the reference.");
        w.block("pub struct Emoji", "", |w| {
            w.line("pub emoji: String,");
        });
        assert_eq!(
            w.finish(),
            "/// An emoji.\n///\n/// See the reference.\npub struct Emoji {\n    pub emoji: String,\n}\n"
        );
    }
}
