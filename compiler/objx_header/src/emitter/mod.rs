//! Header sinks.
//!
//! The header is assembled line by line into an [`Emitter`]: a string for
//! the driver library and tests, or a buffered file for the CLI.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Sink for header text. Lines end with `\n` on every platform.
pub trait Emitter {
    fn emit(&mut self, text: &str);

    fn emit_line(&mut self, line: &str) {
        self.emit(line);
        self.emit("\n");
    }

    fn blank_line(&mut self) {
        self.emit("\n");
    }

    /// A rendered declaration (already `\n`-terminated) and its separator.
    fn emit_block(&mut self, block: &str) {
        self.emit(block);
        self.blank_line();
    }
}

/// Collects the header in memory.
#[derive(Default)]
pub struct StringEmitter {
    text: String,
}

impl StringEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        StringEmitter {
            text: String::with_capacity(capacity),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl Emitter for StringEmitter {
    fn emit(&mut self, text: &str) {
        self.text.push_str(text);
    }
}

/// Writes the header straight to disk.
///
/// `Emitter` methods cannot fail, so the first I/O error is held back and
/// returned by [`FileEmitter::finish`]; nothing is written after it.
pub struct FileEmitter {
    writer: BufWriter<File>,
    written: usize,
    error: Option<io::Error>,
}

impl FileEmitter {
    /// Create or truncate the file at `path`.
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(FileEmitter {
            writer: BufWriter::new(File::create(path)?),
            written: 0,
            error: None,
        })
    }

    /// Flush the file and report the number of bytes written, or the
    /// first error met along the way.
    pub fn finish(mut self) -> io::Result<usize> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.writer.flush()?;
        Ok(self.written)
    }
}

impl Emitter for FileEmitter {
    fn emit(&mut self, text: &str) {
        if self.error.is_some() {
            return;
        }
        match self.writer.write_all(text.as_bytes()) {
            Ok(()) => self.written += text.len(),
            Err(err) => self.error = Some(err),
        }
    }
}

#[cfg(test)]
mod tests;
