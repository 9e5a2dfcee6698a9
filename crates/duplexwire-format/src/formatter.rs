use duplexwire_stream::{ByteCursor, ByteSink};

use crate::binary::BinaryMessageFormatter;
use crate::error::{FrameError, Result};
use crate::message::Message;
use crate::text::TextMessageFormatter;

/// Wire encoding selector.
///
/// Chosen once per connection and independent of the kind of any individual
/// message: a Binary-kind message travels base64-encoded over the Text wire
/// format and raw over the Binary one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WireFormat {
    /// Length-prefixed binary framing.
    #[default]
    Binary,
    /// Delimited `length:kind:payload;` framing.
    Text,
}

/// Facade dispatching to the two framing codecs.
///
/// A connection owns exactly one `MessageFormatter` (and with it one
/// instance of each inner formatter). Instances are not safe for concurrent
/// use; callers serialize access per connection — one reader, one writer.
#[derive(Debug, Default)]
pub struct MessageFormatter {
    binary: BinaryMessageFormatter,
    text: TextMessageFormatter,
}

impl MessageFormatter {
    /// Create a formatter pair with empty parse state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset both inner formatters.
    pub fn reset(&mut self) {
        self.binary.reset();
        self.text.reset();
    }

    /// True if either inner formatter is suspended mid-message.
    pub fn in_progress(&self) -> bool {
        self.binary.in_progress() || self.text.in_progress()
    }

    /// Encode a complete message into `sink` using `format`.
    ///
    /// A message not marked end-of-message is a caller defect; the call
    /// fails before any byte reaches the sink.
    pub fn try_write_message(
        &mut self,
        message: &Message,
        sink: &mut dyn ByteSink,
        format: WireFormat,
    ) -> Result<()> {
        if !message.end_of_message {
            return Err(FrameError::PartialMessage);
        }
        match format {
            WireFormat::Binary => self.binary.try_write(message, sink),
            WireFormat::Text => self.text.try_write(message, sink),
        }
    }

    /// Advance the parse for `format` with whatever `cursor` holds.
    pub fn try_parse_message(
        &mut self,
        cursor: &mut ByteCursor,
        format: WireFormat,
    ) -> Result<Option<Message>> {
        match format {
            WireFormat::Binary => self.binary.try_parse(cursor),
            WireFormat::Text => self.text.try_parse(cursor),
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use duplexwire_stream::BufferSink;

    use super::*;
    use crate::message::MessageKind;

    #[test]
    fn dispatches_by_wire_format() {
        let mut formatter = MessageFormatter::new();
        let message = Message::text("hi");

        let mut binary_sink = BufferSink::new();
        formatter
            .try_write_message(&message, &mut binary_sink, WireFormat::Binary)
            .unwrap();
        assert_eq!(
            binary_sink.as_slice(),
            &[0, 0, 0, 0, 0, 0, 0, 2, 0x00, b'h', b'i']
        );

        let mut text_sink = BufferSink::new();
        formatter
            .try_write_message(&message, &mut text_sink, WireFormat::Text)
            .unwrap();
        assert_eq!(text_sink.as_slice(), b"2:T:hi;");
    }

    #[test]
    fn roundtrip_through_both_formats() {
        let mut formatter = MessageFormatter::new();
        let message = Message::binary(vec![0x01, 0x02, 0x03]);

        for format in [WireFormat::Binary, WireFormat::Text] {
            let mut sink = BufferSink::new();
            formatter
                .try_write_message(&message, &mut sink, format)
                .unwrap();

            let mut cursor = ByteCursor::new();
            cursor.push(sink.into_bytes());
            let parsed = formatter
                .try_parse_message(&mut cursor, format)
                .unwrap()
                .unwrap();
            assert_eq!(parsed, message);
        }
    }

    #[test]
    fn incomplete_message_is_a_contract_violation() {
        let mut formatter = MessageFormatter::new();
        let staged = Message::new(MessageKind::Text, "frag", false);

        for format in [WireFormat::Binary, WireFormat::Text] {
            let mut sink = BufferSink::new();
            let err = formatter
                .try_write_message(&staged, &mut sink, format)
                .unwrap_err();
            assert!(matches!(err, FrameError::PartialMessage));
            assert!(sink.is_empty(), "no bytes may be written");
        }
    }

    #[test]
    fn reset_clears_both_parsers() {
        let mut formatter = MessageFormatter::new();

        let mut cursor = ByteCursor::new();
        cursor.push(Bytes::from_static(b"5:T:he"));
        assert!(formatter
            .try_parse_message(&mut cursor, WireFormat::Text)
            .unwrap()
            .is_none());
        assert!(formatter.in_progress());

        formatter.reset();
        assert!(!formatter.in_progress());
    }

    #[test]
    fn interleaved_formats_keep_separate_state() {
        let mut formatter = MessageFormatter::new();

        // Suspend the text parser mid-message.
        let mut text_cursor = ByteCursor::new();
        text_cursor.push(Bytes::from_static(b"5:T:he"));
        assert!(formatter
            .try_parse_message(&mut text_cursor, WireFormat::Text)
            .unwrap()
            .is_none());

        // The binary parser is unaffected.
        let mut binary_cursor = ByteCursor::new();
        binary_cursor.push(Bytes::from_static(&[
            0, 0, 0, 0, 0, 0, 0, 2, 0x00, b'o', b'k',
        ]));
        let parsed = formatter
            .try_parse_message(&mut binary_cursor, WireFormat::Binary)
            .unwrap()
            .unwrap();
        assert_eq!(parsed, Message::text("ok"));

        // And the text parser resumes where it left off.
        text_cursor.push(Bytes::from_static(b"llo;"));
        let parsed = formatter
            .try_parse_message(&mut text_cursor, WireFormat::Text)
            .unwrap()
            .unwrap();
        assert_eq!(parsed, Message::text("hello"));
    }
}
