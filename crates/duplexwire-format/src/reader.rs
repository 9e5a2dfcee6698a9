use std::io::{ErrorKind, Read};

use bytes::Bytes;
use duplexwire_stream::ByteCursor;

use crate::error::{FrameError, Result};
use crate::formatter::{MessageFormatter, WireFormat};
use crate::message::Message;

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads complete messages from any `Read` stream.
///
/// Chunk boundaries are handled internally — callers always get complete
/// messages, however the transport fragments them.
pub struct MessageReader<T> {
    inner: T,
    cursor: ByteCursor,
    formatter: MessageFormatter,
    format: WireFormat,
}

impl<T: Read> MessageReader<T> {
    /// Create a reader decoding `format` frames from `inner`.
    pub fn new(inner: T, format: WireFormat) -> Self {
        Self {
            inner,
            cursor: ByteCursor::new(),
            formatter: MessageFormatter::new(),
            format,
        }
    }

    /// Read the next complete message (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached; use
    /// [`is_mid_message`](Self::is_mid_message) to tell a clean peer close
    /// from a stream truncated mid-message.
    pub fn read_message(&mut self) -> Result<Message> {
        loop {
            if let Some(message) = self
                .formatter
                .try_parse_message(&mut self.cursor, self.format)?
            {
                return Ok(message);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                tracing::trace!(mid_message = self.is_mid_message(), "stream reached EOF");
                return Err(FrameError::ConnectionClosed);
            }

            self.cursor.push(Bytes::copy_from_slice(&chunk[..read]));
        }
    }

    /// True if bytes of an unfinished message are still pending.
    pub fn is_mid_message(&self) -> bool {
        !self.cursor.is_empty() || self.formatter.in_progress()
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
