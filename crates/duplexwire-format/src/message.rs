use bytes::Bytes;

/// The logical kind of a message.
///
/// Each wire format maps each variant to its own indicator (a byte for the
/// binary format, a character for the text format); the mappings live with
/// the codecs and are independent of one another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// UTF-8 application text.
    Text,
    /// Opaque application bytes.
    Binary,
    /// Channel close notification.
    Close,
    /// Application-level error report.
    Error,
}

/// A logical unit of communication exchanged over a duplex channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// The message payload.
    pub payload: Bytes,
    /// The logical kind of this message.
    pub kind: MessageKind,
    /// Whether this message is logically complete.
    ///
    /// The formatters only encode complete messages; a hosting layer that
    /// assembles fragments stages them with this flag unset and must never
    /// hand such a value to a writer.
    pub end_of_message: bool,
}

impl Message {
    /// Create a message with an explicit completeness flag.
    pub fn new(kind: MessageKind, payload: impl Into<Bytes>, end_of_message: bool) -> Self {
        Self {
            payload: payload.into(),
            kind,
            end_of_message,
        }
    }

    /// Create a complete text message.
    pub fn text(payload: impl Into<Bytes>) -> Self {
        Self::new(MessageKind::Text, payload, true)
    }

    /// Create a complete binary message.
    pub fn binary(payload: impl Into<Bytes>) -> Self {
        Self::new(MessageKind::Binary, payload, true)
    }

    /// Create a complete close message with an empty payload.
    pub fn close() -> Self {
        Self::new(MessageKind::Close, Bytes::new(), true)
    }

    /// Create a complete error message.
    pub fn error(payload: impl Into<Bytes>) -> Self {
        Self::new(MessageKind::Error, payload, true)
    }
}
