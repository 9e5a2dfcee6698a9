//! Message framing for real-time duplex channels.
//!
//! duplexwire converts logical messages (text, binary, close, error) into
//! one of two wire encodings and reconstructs them from byte streams that
//! arrive in arbitrarily-fragmented chunks.
//!
//! # Crate Structure
//!
//! - [`stream`] — Chunked byte-cursor and sink primitives
//! - [`format`] — Resumable binary and text framing codecs
//! - [`pump`] — Connection-side message pumps (behind `pump` feature)

/// Re-export stream types.
pub mod stream {
    pub use duplexwire_stream::*;
}

/// Re-export format types.
pub mod format {
    pub use duplexwire_format::*;
}

/// Re-export pump types (requires `pump` feature).
#[cfg(feature = "pump")]
pub mod pump {
    pub use duplexwire_pump::*;
}
