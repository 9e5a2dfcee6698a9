use bytes::{Buf, BytesMut};
use duplexwire_stream::{ByteCursor, ByteSink};

use crate::error::{sink_write, FrameError, Result};
use crate::message::{Message, MessageKind};

/// Size of the length prefix.
pub const LENGTH_SIZE: usize = 8;

/// Maximum payload accepted by the binary format.
///
/// Payloads are materialized as one contiguous buffer, so declared lengths
/// are bounded to a signed 31-bit value even though the wire field is 64
/// bits wide.
pub const MAX_PAYLOAD: usize = i32::MAX as usize;

// Kind indicator table for the binary format. Kept separate from the text
// table: the two formats intentionally encode the same enum differently.
fn indicator(kind: MessageKind) -> u8 {
    match kind {
        MessageKind::Text => 0x00,
        MessageKind::Binary => 0x01,
        MessageKind::Error => 0x02,
        MessageKind::Close => 0x03,
    }
}

fn kind_for(value: u8) -> Result<MessageKind> {
    match value {
        0x00 => Ok(MessageKind::Text),
        0x01 => Ok(MessageKind::Binary),
        0x02 => Ok(MessageKind::Error),
        0x03 => Ok(MessageKind::Close),
        value => Err(FrameError::UnknownKindByte { value }),
    }
}

/// Length-prefixed binary framing codec.
///
/// Wire format:
/// ```text
/// [8 bytes: payload length, signed 64-bit big-endian]
/// [1 byte : kind indicator]   Text=0x00 Binary=0x01 Error=0x02 Close=0x03
/// [N bytes: raw payload]
/// ```
#[derive(Debug, Default)]
pub struct BinaryMessageFormatter {
    expected_length: Option<usize>,
    kind: Option<MessageKind>,
    payload: Option<BytesMut>,
    bytes_read: usize,
}

impl BinaryMessageFormatter {
    /// Create a formatter with empty parse state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard any suspended parse progress.
    ///
    /// A no-op after a completed parse: the formatter resets itself when it
    /// emits a message.
    pub fn reset(&mut self) {
        self.expected_length = None;
        self.kind = None;
        self.payload = None;
        self.bytes_read = 0;
    }

    /// True if a parse is suspended mid-message.
    pub fn in_progress(&self) -> bool {
        self.expected_length.is_some()
    }

    /// Encode a complete message into `sink`.
    pub fn try_write(&self, message: &Message, sink: &mut dyn ByteSink) -> Result<()> {
        if message.payload.len() > MAX_PAYLOAD {
            return Err(FrameError::LengthOverflow {
                declared: message.payload.len() as i64,
                max: MAX_PAYLOAD,
            });
        }
        sink_write(sink.try_write_i64_be(message.payload.len() as i64))?;
        sink_write(sink.try_write_u8(indicator(message.kind)))?;
        sink_write(sink.try_write(&message.payload))?;
        Ok(())
    }

    /// Advance the parse with whatever `cursor` currently holds.
    ///
    /// Returns `Ok(None)` when more bytes are needed. Fields already
    /// determined are cached in the formatter, so the next call resumes
    /// where this one stopped instead of re-parsing.
    pub fn try_parse(&mut self, cursor: &mut ByteCursor) -> Result<Option<Message>> {
        let expected = match self.expected_length {
            Some(expected) => expected,
            None => {
                if cursor.remaining() < LENGTH_SIZE {
                    return Ok(None);
                }
                let declared = cursor.get_i64();
                if declared < 0 || declared > MAX_PAYLOAD as i64 {
                    // Bail before allocating anything for a bogus length.
                    return Err(FrameError::LengthOverflow {
                        declared,
                        max: MAX_PAYLOAD,
                    });
                }
                let expected = declared as usize;
                self.expected_length = Some(expected);
                expected
            }
        };

        if self.kind.is_none() {
            if !cursor.has_remaining() {
                return Ok(None);
            }
            self.kind = Some(kind_for(cursor.get_u8())?);
        }

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

        let payload = self.payload.take().expect("payload allocated above").freeze();
        let kind = self.kind.expect("kind parsed above");
        self.reset();
        Ok(Some(Message {
            payload,
            kind,
            end_of_message: true,
        }))
    }
}
