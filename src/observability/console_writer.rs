//! Level-aware line writer for the browser console.
//!
//! The fmt layer writes one formatted event per writer. [`ConsoleWriter`] buffers the
//! bytes and emits them as a single console call when flushed or dropped, so each
//! event becomes one console entry at the matching severity.

use std::io::{self, Write};
use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

/// Hands out a [`ConsoleWriter`] per event.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeConsoleWriter;

impl<'a> MakeWriter<'a> for MakeConsoleWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// Buffers one event and emits it at `level`.
#[derive(Debug)]
pub struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    #[must_use]
    pub const fn new(level: Level) -> Self {
        Self {
            level,
            buffer: Vec::new(),
        }
    }

    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }

    /// Bytes written since the last flush.
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    fn emit(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let bytes = std::mem::take(&mut self.buffer);
        let line = String::from_utf8_lossy(&bytes);
        sink::emit(self.level, line.trim_end())
    }
}

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.emit()
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let _ = self.emit();
    }
}

#[cfg(target_arch = "wasm32")]
mod sink {
    use std::io;
    use tracing::Level;
    use wasm_bindgen::JsValue;

    pub(super) fn emit(level: Level, line: &str) -> io::Result<()> {
        let value = JsValue::from_str(line);
        match level {
            Level::ERROR => web_sys::console::error_1(&value),
            Level::WARN => web_sys::console::warn_1(&value),
            Level::INFO => web_sys::console::log_1(&value),
            Level::DEBUG | Level::TRACE => web_sys::console::debug_1(&value),
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod sink {
    use std::io::{self, Write};
    use tracing::Level;

    pub(super) fn emit(_level: Level, line: &str) -> io::Result<()> {
        let mut stderr = io::stderr().lock();
        writeln!(stderr, "{line}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_writer_logs_at_info() {
        assert_eq!(MakeConsoleWriter.make_writer().level(), Level::INFO);
    }

    #[test]
    fn flush_drains_buffer() {
        let mut writer = ConsoleWriter::new(Level::DEBUG);
        write!(writer, "rows bound").unwrap();
        assert_eq!(writer.pending(), b"rows bound");

        writer.flush().unwrap();
        assert!(writer.pending().is_empty());
    }
}
