use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bytes::{Buf, Bytes, BytesMut};
use duplexwire_stream::{ByteCursor, ByteSink};

use crate::error::{sink_write, FrameError, Result};
use crate::message::{Message, MessageKind};

const FIELD_DELIMITER: u8 = b':';
const MESSAGE_TERMINATOR: u8 = b';';

/// Parse phases, advanced strictly in order within and across calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    ReadingLength,
    LengthComplete,
    ReadingType,
    TypeComplete,
    ReadingPayload,
    ReadingTerminator,
}

// Kind indicator table for the text format. Kept separate from the binary
// table: the two formats intentionally encode the same enum differently.
fn indicator(kind: MessageKind) -> char {
    match kind {
        MessageKind::Text => 'T',
        MessageKind::Binary => 'B',
        MessageKind::Close => 'C',
        MessageKind::Error => 'E',
    }
}

fn kind_for(value: u8) -> Result<MessageKind> {
    match value {
        b'T' => Ok(MessageKind::Text),
        b'B' => Ok(MessageKind::Binary),
        b'C' => Ok(MessageKind::Close),
        b'E' => Ok(MessageKind::Error),
        value => Err(FrameError::UnknownKindChar {
            value: value as char,
        }),
    }
}

/// Delimited text framing codec with base64-encoded binary payloads.
///
/// Wire format: `<decimal-length>:<kind-char>:<payload>;` where the length
/// counts *encoded* payload bytes — post-base64 for Binary messages, raw
/// UTF-8 byte length otherwise.
#[derive(Debug)]
pub struct TextMessageFormatter {
    phase: Phase,
    expected_length: usize,
    kind: MessageKind,
    payload: Option<BytesMut>,
    bytes_read: usize,
}

impl Default for TextMessageFormatter {
    fn default() -> Self {
        Self {
            phase: Phase::ReadingLength,
            expected_length: 0,
            kind: MessageKind::Text,
            payload: None,
            bytes_read: 0,
        }
    }
}

impl TextMessageFormatter {
    /// Create a formatter with empty parse state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard any suspended parse progress.
    ///
    /// A no-op after a completed parse: the formatter resets itself when it
    /// emits a message.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// True if a parse is suspended mid-message.
    pub fn in_progress(&self) -> bool {
        self.phase != Phase::ReadingLength
    }

    /// Encode a complete message into `sink`.
    pub fn try_write(&self, message: &Message, sink: &mut dyn ByteSink) -> Result<()> {
        let encoded = match message.kind {
            MessageKind::Binary => Some(STANDARD.encode(&message.payload)),
            _ => None,
        };
        let encoded_len = encoded.as_ref().map_or(message.payload.len(), String::len);
        if encoded_len > i32::MAX as usize {
            return Err(FrameError::LengthOverflow {
                declared: encoded_len as i64,
                max: i32::MAX as usize,
            });
        }

        sink_write(sink.try_write_str(&encoded_len.to_string()))?;
        sink_write(sink.try_write_u8(FIELD_DELIMITER))?;
        sink_write(sink.try_write_char(indicator(message.kind)))?;
        sink_write(sink.try_write_u8(FIELD_DELIMITER))?;
        match &encoded {
            Some(text) => sink_write(sink.try_write_str(text))?,
            None => sink_write(sink.try_write(&message.payload))?,
        }
        sink_write(sink.try_write_u8(MESSAGE_TERMINATOR))?;
        Ok(())
    }

    /// Advance the parse with whatever `cursor` currently holds.
    ///
    /// Returns `Ok(None)` when more bytes are needed. The phase reached and
    /// fields already determined are cached, so the next call resumes
    /// instead of re-parsing — except the length scan, which consumes
    /// nothing until the delimiter has arrived and is therefore idempotent.
    pub fn try_parse(&mut self, cursor: &mut ByteCursor) -> Result<Option<Message>> {
        if self.phase == Phase::ReadingLength {
            let span = match cursor.scan_to(FIELD_DELIMITER) {
                Some(span) => span,
                None => return Ok(None),
            };
            self.expected_length = parse_length(&span)?;
            cursor.advance(span.len());
            self.phase = Phase::LengthComplete;
        }

        if self.phase == Phase::LengthComplete {
            if !cursor.has_remaining() {
                return Ok(None);
            }
            let found = cursor.get_u8();
            if found != FIELD_DELIMITER {
                return Err(FrameError::MissingDelimiter {
                    field: "length",
                    found,
                });
            }
            self.phase = Phase::ReadingType;
        }

        if self.phase == Phase::ReadingType {
            if !cursor.has_remaining() {
                return Ok(None);
            }
            self.kind = kind_for(cursor.get_u8())?;
            self.phase = Phase::TypeComplete;
        }

        if self.phase == Phase::TypeComplete {
            if !cursor.has_remaining() {
                return Ok(None);
            }
            let found = cursor.get_u8();
            if found != FIELD_DELIMITER {
                return Err(FrameError::MissingDelimiter {
                    field: "type",
                    found,
                });
            }
            self.phase = Phase::ReadingPayload;
        }

        if self.phase == Phase::ReadingPayload {
            let expected = self.expected_length;
            let payload = self
                .payload
                .get_or_insert_with(|| BytesMut::with_capacity(expected));
            while self.bytes_read < expected && cursor.has_remaining() {
                let chunk = cursor.chunk();
                let take = chunk.len().min(expected - self.bytes_read);
                payload.extend_from_slice(&chunk[..take]);
                cursor.advance(take);
                self.bytes_read += take;
            }
            if self.bytes_read < expected {
                return Ok(None);
            }
            self.phase = Phase::ReadingTerminator;
        }

        // ReadingTerminator: the trailing ';' seals the message.
        if !cursor.has_remaining() {
            return Ok(None);
        }
        let found = cursor.get_u8();
        if found != MESSAGE_TERMINATOR {
            return Err(FrameError::MissingTerminator { found });
        }

        let encoded = self.payload.take().unwrap_or_default();
        let payload = decode_payload(self.kind, encoded)?;
        let kind = self.kind;
        self.reset();
        Ok(Some(Message {
            payload,
            kind,
            end_of_message: true,
        }))
    }
}

fn parse_length(span: &[u8]) -> Result<usize> {
    let invalid = || FrameError::InvalidLength {
        text: String::from_utf8_lossy(span).into_owned(),
    };
    if span.is_empty() || !span.iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }
    let text = std::str::from_utf8(span).expect("digits are ASCII");
    let length = text.parse::<i32>().map_err(|_| invalid())?;
    Ok(length as usize)
}

fn decode_payload(kind: MessageKind, encoded: BytesMut) -> Result<Bytes> {
    if kind != MessageKind::Binary || encoded.is_empty() {
        return Ok(encoded.freeze());
    }

    // Decoded length derived from the encoded length and trailing padding.
    let mut expected = encoded.len() / 4 * 3;
    if encoded.ends_with(b"==") {
        expected = expected.saturating_sub(2);
    } else if encoded.ends_with(b"=") {
        expected = expected.saturating_sub(1);
    }

    let decoded = STANDARD
        .decode(&encoded)
        .map_err(|_| FrameError::InvalidBase64)?;
    if decoded.len() != expected {
        return Err(FrameError::InvalidBase64);
    }
    Ok(decoded.into())
}
