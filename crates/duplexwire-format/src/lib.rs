//! Resumable message framing for real-time duplex channels.
//!
//! This is the core value-add layer of duplexwire. A logical [`Message`]
//! (text, binary, close or error payload) travels in one of two wire
//! encodings:
//!
//! - binary: 8-byte big-endian length + kind indicator byte + raw payload
//! - text: `length:kind:payload;` with base64-encoded binary payloads
//!
//! Both parsers are resumable state machines. They consume byte chunks of
//! unpredictable size and boundary alignment, never assume a complete field
//! is available in one call, and distinguish "not enough data yet"
//! (`Ok(None)`, retry later) from "the stream is malformed" (fatal error,
//! tear the connection down).

pub mod binary;
pub mod error;
pub mod formatter;
pub mod message;
pub mod reader;
pub mod text;
pub mod writer;

pub use binary::BinaryMessageFormatter;
pub use error::{FrameError, Result};
pub use formatter::{MessageFormatter, WireFormat};
pub use message::{Message, MessageKind};
pub use reader::MessageReader;
pub use text::TextMessageFormatter;
pub use writer::MessageWriter;
