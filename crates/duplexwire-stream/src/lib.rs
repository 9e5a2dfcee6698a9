//! Byte-stream primitives for duplexwire.
//!
//! This is the lowest layer of duplexwire. It provides the two interfaces the
//! framing codecs consume:
//!
//! - [`ByteCursor`] — an incremental readable view over bytes that arrive in
//!   arbitrarily-sized, discontiguous chunks
//! - [`ByteSink`] — a writable destination that may refuse a write when its
//!   capacity is exhausted
//!
//! The parsers above this layer only ever see logical bytes; chunk boundaries
//! are invisible to them.

pub mod cursor;
pub mod sink;

pub use cursor::ByteCursor;
pub use sink::{BufferSink, ByteSink};
