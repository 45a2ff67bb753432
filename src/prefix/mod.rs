//! Line reassembly and prefix injection.
//!
//! Child process output arrives as arbitrary byte chunks. [`LineReassembler`]
//! buffers those chunks, prepends the configured prefix to every logical
//! line, and writes complete lines to its sink as soon as a line terminator
//! is seen. The trailing partial line is flushed (with a synthetic
//! terminator) when the stream ends.

use std::io::Write;

use once_cell::sync::Lazy;
use regex::bytes::{Captures, Regex};


/// A line terminator is `\r\n` or a bare `\n`.
static LINE_TERMINATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r?\n").expect("valid regex pattern"));

/// Per-stream reassembly state: the prefix, the not-yet-flushed bytes, and
/// the destination for finished lines.
///
/// The pending buffer always begins with the prefix of the line currently
/// being assembled: [`Self::on_data`] seeds it when the buffer is empty, and
/// the reinsertion step seeds it after the last flushed terminator. After a
/// flush the buffer never contains a complete terminator.
#[derive(Debug)]
pub struct LineReassembler<W: Write> {
    prefix: String,
    pending: Vec<u8>,
    sink: W,
}

impl<W: Write> LineReassembler<W> {
    pub fn new(prefix: impl Into<String>, sink: W) -> Self {
        Self {
            prefix: prefix.into(),
            pending: Vec::new(),
            sink,
        }
    }

    /// Feed one chunk of raw bytes from the stream.
    ///
    /// Reinserts the prefix after every terminator currently in the buffer,
    /// then flushes everything through the last terminator. Completed lines
    /// are drained before the next call, which keeps the reinsertion
    /// idempotent. With an empty prefix this degenerates to plain
    /// line-buffered passthrough.
    pub fn on_data(&mut self, chunk: &[u8]) -> std::io::Result<()> {
        if self.pending.is_empty() {
            self.pending.extend_from_slice(self.prefix.as_bytes());
        }
        self.pending.extend_from_slice(chunk);

        if !self.prefix.is_empty() && LINE_TERMINATOR.is_match(&self.pending) {
            let prefix = self.prefix.as_bytes();
            self.pending = LINE_TERMINATOR
                .replace_all(&self.pending, |caps: &Captures<'_>| {
                    let mut seeded = caps[0].to_vec();
                    seeded.extend_from_slice(prefix);
                    seeded
                })
                .into_owned();
        }

        if let Some(last) = self.pending.iter().rposition(|&b| b == b'\n') {
            self.sink.write_all(&self.pending[..=last])?;
            self.sink.flush()?;
            self.pending.drain(..=last);
        }
        Ok(())
    }

    /// Signal end-of-stream. Emits the trailing partial line, if any, with a
    /// synthetic terminator so no bytes are lost. A buffer that holds
    /// nothing beyond the seeded prefix has no unflushed content, so this is
    /// a no-op for it.
    pub fn on_end(&mut self) -> std::io::Result<()> {
        if self.pending.is_empty() || self.pending.as_slice() == self.prefix.as_bytes() {
            return Ok(());
        }
        if !self.pending.ends_with(b"\n") {
            self.pending.push(b'\n');
        }
        self.on_data(&[])
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    /// Consume the reassembler and hand back its sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}
