use std::collections::VecDeque;

use bytes::{Buf, Bytes};

/// Incremental readable view over a chunked byte stream.
///
/// A transport pushes chunks as they arrive; a parser consumes logical bytes
/// through the [`Buf`] interface without ever seeing chunk boundaries.
/// Multi-byte reads (e.g. `get_i64`) work transparently across segments.
#[derive(Debug, Default)]
pub struct ByteCursor {
    segments: VecDeque<Bytes>,
    unread: usize,
}

impl ByteCursor {
    /// Create an empty cursor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an arriving chunk to the unread region.
    ///
    /// Empty chunks are dropped so `chunk()` always exposes a non-empty span
    /// while data remains.
    pub fn push(&mut self, chunk: impl Into<Bytes>) {
        let chunk = chunk.into();
        if !chunk.is_empty() {
            self.unread += chunk.len();
            self.segments.push_back(chunk);
        }
    }

    /// True if no unread bytes remain.
    pub fn is_empty(&self) -> bool {
        self.unread == 0
    }

    /// Scan the unread region for `delimiter`.
    ///
    /// Returns the bytes strictly before the delimiter, or `None` if the
    /// delimiter has not arrived yet. Nothing is consumed either way; the
    /// scan is idempotent and callers re-scan after pushing more chunks.
    pub fn scan_to(&self, delimiter: u8) -> Option<Vec<u8>> {
        let mut span = Vec::new();
        for segment in &self.segments {
            match segment.iter().position(|&b| b == delimiter) {
                Some(index) => {
                    span.extend_from_slice(&segment[..index]);
                    return Some(span);
                }
                None => span.extend_from_slice(segment),
            }
        }
        None
    }
}

impl Buf for ByteCursor {
    fn remaining(&self) -> usize {
        self.unread
    }

    fn chunk(&self) -> &[u8] {
        self.segments.front().map_or(&[], |segment| segment.as_ref())
    }

    fn advance(&mut self, mut cnt: usize) {
        assert!(
            cnt <= self.unread,
            "cannot advance past end of cursor ({cnt} > {})",
            self.unread
        );
        self.unread -= cnt;
        while cnt > 0 {
            let front = self
                .segments
                .front_mut()
                .expect("unread count tracks segment bytes");
            if cnt < front.len() {
                front.advance(cnt);
                return;
            }
            cnt -= front.len();
            self.segments.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cursor() {
        let cursor = ByteCursor::new();
        assert!(cursor.is_empty());
        assert_eq!(cursor.remaining(), 0);
        assert_eq!(cursor.chunk(), &[] as &[u8]);
        assert_eq!(cursor.scan_to(b':'), None);
    }

    #[test]
    fn push_and_consume_single_chunk() {
        let mut cursor = ByteCursor::new();
        cursor.push(Bytes::from_static(b"hello"));

        assert_eq!(cursor.remaining(), 5);
        assert_eq!(cursor.chunk(), b"hello");

        cursor.advance(2);
        assert_eq!(cursor.remaining(), 3);
        assert_eq!(cursor.chunk(), b"llo");
    }

    #[test]
    fn advance_crosses_chunk_boundaries() {
        let mut cursor = ByteCursor::new();
        cursor.push(Bytes::from_static(b"ab"));
        cursor.push(Bytes::from_static(b"cd"));
        cursor.push(Bytes::from_static(b"ef"));

        cursor.advance(3);
        assert_eq!(cursor.remaining(), 3);
        assert_eq!(cursor.chunk(), b"d");

        cursor.advance(3);
        assert!(cursor.is_empty());
    }

    #[test]
    fn empty_chunks_are_dropped() {
        let mut cursor = ByteCursor::new();
        cursor.push(Bytes::new());
        cursor.push(Bytes::from_static(b"x"));
        cursor.push(Bytes::new());

        assert_eq!(cursor.remaining(), 1);
        assert_eq!(cursor.chunk(), b"x");
    }

    #[test]
    fn fixed_width_read_spans_chunks() {
        let mut cursor = ByteCursor::new();
        cursor.push(Bytes::from_static(&[0x00, 0x00, 0x00]));
        cursor.push(Bytes::from_static(&[0x00, 0x00, 0x00, 0x01]));
        cursor.push(Bytes::from_static(&[0x02]));

        assert_eq!(cursor.get_i64(), 0x0102);
        assert!(cursor.is_empty());
    }

    #[test]
    fn scan_finds_delimiter_in_first_chunk() {
        let mut cursor = ByteCursor::new();
        cursor.push(Bytes::from_static(b"12:T:hi;"));

        assert_eq!(cursor.scan_to(b':'), Some(b"12".to_vec()));
        // Non-destructive: the same scan succeeds again.
        assert_eq!(cursor.scan_to(b':'), Some(b"12".to_vec()));
        assert_eq!(cursor.remaining(), 8);
    }

    #[test]
    fn scan_spans_chunks() {
        let mut cursor = ByteCursor::new();
        cursor.push(Bytes::from_static(b"10"));
        cursor.push(Bytes::from_static(b"24"));
        cursor.push(Bytes::from_static(b":rest"));

        assert_eq!(cursor.scan_to(b':'), Some(b"1024".to_vec()));
    }

    #[test]
    fn scan_without_delimiter_returns_none() {
        let mut cursor = ByteCursor::new();
        cursor.push(Bytes::from_static(b"123"));

        assert_eq!(cursor.scan_to(b':'), None);

        cursor.push(Bytes::from_static(b"4:"));
        assert_eq!(cursor.scan_to(b':'), Some(b"1234".to_vec()));
    }

    #[test]
    fn scan_with_delimiter_first_yields_empty_span() {
        let mut cursor = ByteCursor::new();
        cursor.push(Bytes::from_static(b":T:"));

        assert_eq!(cursor.scan_to(b':'), Some(Vec::new()));
    }

    #[test]
    #[should_panic(expected = "cannot advance past end")]
    fn advance_past_end_panics() {
        let mut cursor = ByteCursor::new();
        cursor.push(Bytes::from_static(b"ab"));
        cursor.advance(3);
    }
}
