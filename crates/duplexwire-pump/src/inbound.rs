use std::io::Read;

use duplexwire_format::{FrameError, Message, MessageReader, WireFormat};
use tracing::{debug, warn};

use crate::error::{PumpError, Result};

/// Delivers parsed inbound messages to a handler until the stream ends.
///
/// One pump per connection, owned by the connection's reader thread. A peer
/// that closes between messages ends the loop cleanly; a stream that ends
/// mid-message is reported as an error, as is any wire-grammar violation.
pub struct InboundPump<R: Read> {
    reader: MessageReader<R>,
}

impl<R: Read> InboundPump<R> {
    /// Create a pump decoding `format` frames from `inner`.
    pub fn new(inner: R, format: WireFormat) -> Self {
        Self {
            reader: MessageReader::new(inner, format),
        }
    }

    /// Run until the stream closes, handing each message to `handler`.
    ///
    /// The pump does not interpret message kinds; Close messages are
    /// delivered like any other and connection teardown stays with the
    /// hosting layer.
    pub fn run(&mut self, mut handler: impl FnMut(Message)) -> Result<()> {
        loop {
            match self.reader.read_message() {
                Ok(message) => handler(message),
                Err(FrameError::ConnectionClosed) => {
                    if self.reader.is_mid_message() {
                        warn!("stream truncated mid-message");
                        return Err(PumpError::Frame(FrameError::ConnectionClosed));
                    }
                    debug!("stream closed cleanly");
                    return Ok(());
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Consume the pump and return the inner stream.
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }
}
