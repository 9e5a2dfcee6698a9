use std::io::{ErrorKind, Write};

use duplexwire_stream::BufferSink;

use crate::error::{FrameError, Result};
use crate::formatter::{MessageFormatter, WireFormat};
use crate::message::Message;

/// Writes complete messages to any `Write` stream.
///
/// Each message is encoded into an internal staging sink, then written out
/// whole and flushed.
pub struct MessageWriter<T> {
    inner: T,
    sink: BufferSink,
    formatter: MessageFormatter,
    format: WireFormat,
}

impl<T: Write> MessageWriter<T> {
    /// Create a writer encoding `format` frames into `inner`.
    pub fn new(inner: T, format: WireFormat) -> Self {
        Self {
            inner,
            sink: BufferSink::new(),
            formatter: MessageFormatter::new(),
            format,
        }
    }

    /// Create a writer whose staging sink refuses messages that encode to
    /// more than `limit` bytes.
    pub fn with_limit(inner: T, format: WireFormat, limit: usize) -> Self {
        Self {
            inner,
            sink: BufferSink::with_limit(limit),
            formatter: MessageFormatter::new(),
            format,
        }
    }

    /// Encode and send a complete message (blocking).
    pub fn send(&mut self, message: &Message) -> Result<()> {
        self.sink.clear();
        self.formatter
            .try_write_message(message, &mut self.sink, self.format)?;

        let mut offset = 0usize;
        while offset < self.sink.len() {
            match self.inner.write(&self.sink.as_slice()[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
