use bytes::{BufMut, Bytes, BytesMut};

/// Incremental writable destination for encoded wire bytes.
///
/// Every operation reports whether the bytes could be written. A `false`
/// return means "could not complete this write" — typically capacity
/// exhaustion — and the caller aborts the surrounding encode. Partial
/// progress from earlier calls may remain in the sink.
pub trait ByteSink {
    /// Write a raw byte slice.
    fn try_write(&mut self, bytes: &[u8]) -> bool;

    /// Write a single byte.
    fn try_write_u8(&mut self, value: u8) -> bool {
        self.try_write(&[value])
    }

    /// Write a signed 64-bit integer in network byte order.
    fn try_write_i64_be(&mut self, value: i64) -> bool {
        self.try_write(&value.to_be_bytes())
    }

    /// Write a single character as UTF-8.
    fn try_write_char(&mut self, ch: char) -> bool {
        let mut buf = [0u8; 4];
        self.try_write(ch.encode_utf8(&mut buf).as_bytes())
    }

    /// Write a string as UTF-8.
    fn try_write_str(&mut self, text: &str) -> bool {
        self.try_write(text.as_bytes())
    }
}

/// Growable in-memory sink with an optional hard capacity limit.
///
/// Without a limit it never refuses a write. With a limit, a write that
/// would push the total past the limit is refused whole — the sink never
/// truncates a slice.
#[derive(Debug, Default)]
pub struct BufferSink {
    buf: BytesMut,
    limit: Option<usize>,
}

impl BufferSink {
    /// Create an unbounded sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink that refuses writes past `limit` total bytes.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            buf: BytesMut::new(),
            limit: Some(limit),
        }
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// View the written bytes.
    pub fn as_slice(&self) -> &[u8] {
        self.buf.as_ref()
    }

    /// Discard the written bytes, keeping the limit.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Consume the sink and return the written bytes.
    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }
}

impl ByteSink for BufferSink {
    fn try_write(&mut self, bytes: &[u8]) -> bool {
        if let Some(limit) = self.limit {
            if self.buf.len() + bytes.len() > limit {
                return false;
            }
        }
        self.buf.put_slice(bytes);
        true
    }
}

/// Unbounded sink over a caller-owned buffer.
impl ByteSink for BytesMut {
    fn try_write(&mut self, bytes: &[u8]) -> bool {
        self.put_slice(bytes);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_sink_accepts_everything() {
        let mut sink = BufferSink::new();

        assert!(sink.try_write(b"hello"));
        assert!(sink.try_write_u8(b'!'));
        assert!(sink.try_write_str(" world"));

        assert_eq!(sink.as_slice(), b"hello! world");
    }

    #[test]
    fn big_endian_integer_layout() {
        let mut sink = BufferSink::new();

        assert!(sink.try_write_i64_be(2));

        assert_eq!(sink.as_slice(), &[0, 0, 0, 0, 0, 0, 0, 2]);
    }

    #[test]
    fn char_written_as_utf8() {
        let mut sink = BufferSink::new();

        assert!(sink.try_write_char('T'));
        assert!(sink.try_write_char('é'));

        assert_eq!(sink.as_slice(), "Té".as_bytes());
    }

    #[test]
    fn limited_sink_refuses_overflow() {
        let mut sink = BufferSink::with_limit(4);

        assert!(sink.try_write(b"abc"));
        assert!(!sink.try_write(b"de"));
        // Refusal is all-or-nothing.
        assert_eq!(sink.as_slice(), b"abc");
        assert!(sink.try_write_u8(b'd'));
        assert_eq!(sink.as_slice(), b"abcd");
        assert!(!sink.try_write_u8(b'e'));
    }

    #[test]
    fn clear_keeps_limit() {
        let mut sink = BufferSink::with_limit(2);
        assert!(sink.try_write(b"ab"));

        sink.clear();

        assert!(sink.is_empty());
        assert!(sink.try_write(b"cd"));
        assert!(!sink.try_write_u8(b'e'));
    }

    #[test]
    fn bytes_mut_is_an_unbounded_sink() {
        let mut buf = BytesMut::new();

        assert!(buf.try_write(b"raw"));
        assert!(buf.try_write_i64_be(-1));

        assert_eq!(buf.len(), 3 + 8);
    }

    #[test]
    fn into_bytes_hands_off_ownership() {
        let mut sink = BufferSink::new();
        sink.try_write(b"done");

        let bytes = sink.into_bytes();
        assert_eq!(bytes.as_ref(), b"done");
    }
}
