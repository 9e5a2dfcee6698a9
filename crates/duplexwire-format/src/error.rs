/// Errors that can occur while encoding or decoding wire messages.
///
/// Parsing distinguishes three outcomes: insufficient data is `Ok(None)`
/// from the parse methods (call again once more bytes arrive), grammar
/// violations are the format variants below (fatal for the connection, no
/// resynchronization is attempted), and `PartialMessage` marks a caller
/// defect rather than a runtime condition to recover from.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The declared payload length cannot be materialized as a single
    /// contiguous buffer.
    #[error("declared payload length {declared} out of range (max {max})")]
    LengthOverflow { declared: i64, max: usize },

    /// The text length field is not a plain decimal integer.
    #[error("invalid message length '{text}'")]
    InvalidLength { text: String },

    /// The binary kind indicator byte is not mapped.
    #[error("unknown kind indicator byte 0x{value:02x}")]
    UnknownKindByte { value: u8 },

    /// The text kind indicator character is not mapped.
    #[error("unknown kind indicator '{value}'")]
    UnknownKindChar { value: char },

    /// A text field was not followed by the `:` delimiter.
    #[error("expected ':' after {field}, found 0x{found:02x}")]
    MissingDelimiter { field: &'static str, found: u8 },

    /// A text payload was not followed by the `;` terminator.
    #[error("expected ';' after payload, found 0x{found:02x}")]
    MissingTerminator { found: u8 },

    /// A binary payload did not decode to the padding-derived length.
    #[error("invalid base64 payload")]
    InvalidBase64,

    /// A message not marked end-of-message was passed to a writer.
    /// This layer only encodes complete messages; the caller is expected to
    /// have assembled fragments before handing a message over.
    #[error("message is not marked end-of-message")]
    PartialMessage,

    /// The sink refused a write (capacity exhausted).
    #[error("sink capacity exhausted")]
    SinkFull,

    /// An I/O error occurred while reading or writing a stream.
    #[error("stream I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream closed before a complete message was received or written.
    #[error("connection closed (incomplete message)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;

/// Fold a sink's refusal `bool` into the error taxonomy.
pub(crate) fn sink_write(written: bool) -> Result<()> {
    if written {
        Ok(())
    } else {
        Err(FrameError::SinkFull)
    }
}
