use std::io::{ErrorKind, Write};
use std::sync::mpsc::Receiver;

use duplexwire_format::{FrameError, Message, MessageWriter, WireFormat};
use tracing::{debug, warn};

use crate::error::{PumpError, Result};

/// Drains a queue of outbound messages into a stream.
///
/// One pump per connection, owned by the connection's writer thread. The
/// loop ends cleanly when either side goes away: a closed queue means the
/// application cancelled the connection, a closed stream means the peer
/// went first. Neither is an application error.
pub struct OutboundPump<W: Write> {
    writer: MessageWriter<W>,
    queue: Receiver<Message>,
}

impl<W: Write> OutboundPump<W> {
    /// Create a pump writing `format` frames to `inner`.
    pub fn new(inner: W, format: WireFormat, queue: Receiver<Message>) -> Self {
        Self {
            writer: MessageWriter::new(inner, format),
            queue,
        }
    }

    /// Create a pump that refuses any single message encoding to more than
    /// `limit` bytes.
    pub fn with_message_limit(
        inner: W,
        format: WireFormat,
        limit: usize,
        queue: Receiver<Message>,
    ) -> Self {
        Self {
            writer: MessageWriter::with_limit(inner, format, limit),
            queue,
        }
    }

    /// Run until the queue or the connection closes.
    ///
    /// Under correct usage (complete messages, capacity available) the loop
    /// only ever ends with `Ok`. Capacity exhaustion is surfaced distinctly
    /// from stream closure so the hosting layer can tell them apart.
    pub fn run(&mut self) -> Result<()> {
        loop {
            let message = match self.queue.recv() {
                Ok(message) => message,
                Err(_) => {
                    debug!("outbound queue closed, stopping pump");
                    return Ok(());
                }
            };

            match self.writer.send(&message) {
                Ok(()) => {}
                Err(FrameError::ConnectionClosed) => {
                    debug!("connection closed, stopping pump");
                    return Ok(());
                }
                Err(FrameError::Io(err)) if is_disconnect(err.kind()) => {
                    debug!(error = %err, "peer went away, stopping pump");
                    return Ok(());
                }
                Err(FrameError::SinkFull) => {
                    warn!(
                        kind = ?message.kind,
                        payload_len = message.payload.len(),
                        "outbound message exceeded staging capacity"
                    );
                    return Err(PumpError::CapacityExhausted);
                }
                Err(err) => return Err(PumpError::Frame(err)),
            }
        }
    }

    /// Consume the pump and return the inner stream.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

fn is_disconnect(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::BrokenPipe | ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted
    )
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::mpsc;
    use std::thread;

    use bytes::Bytes;
    use duplexwire_format::{MessageKind, MessageReader};

    use super::*;

    fn drain(mut pump: OutboundPump<Cursor<Vec<u8>>>) -> Vec<u8> {
        pump.run().unwrap();
        pump.into_inner().into_inner()
    }

    #[test]
    fn drains_queue_then_stops_cleanly() {
        let (tx, rx) = mpsc::channel();
        tx.send(Message::text("one")).unwrap();
        tx.send(Message::binary(vec![0x02])).unwrap();
        tx.send(Message::close()).unwrap();
        drop(tx);

        let wire = drain(OutboundPump::new(
            Cursor::new(Vec::new()),
            WireFormat::Text,
            rx,
        ));

        let mut reader = MessageReader::new(Cursor::new(wire), WireFormat::Text);
        assert_eq!(reader.read_message().unwrap(), Message::text("one"));
        assert_eq!(reader.read_message().unwrap(), Message::binary(vec![0x02]));
        assert_eq!(reader.read_message().unwrap(), Message::close());
    }

    #[test]
    fn feeds_messages_from_another_thread() {
        let (tx, rx) = mpsc::channel();
        let producer = thread::spawn(move || {
            for i in 0..16 {
                tx.send(Message::text(format!("msg-{i}"))).unwrap();
            }
        });

        let wire = drain(OutboundPump::new(
            Cursor::new(Vec::new()),
            WireFormat::Binary,
            rx,
        ));
        producer.join().unwrap();

        let mut reader = MessageReader::new(Cursor::new(wire), WireFormat::Binary);
        for i in 0..16 {
            assert_eq!(
                reader.read_message().unwrap(),
                Message::text(format!("msg-{i}"))
            );
        }
    }

    #[test]
    fn closed_connection_is_not_an_error() {
        let (tx, rx) = mpsc::channel();
        tx.send(Message::text("lost")).unwrap();

        let mut pump = OutboundPump::new(ZeroWriter, WireFormat::Binary, rx);
        assert!(pump.run().is_ok());
    }

    #[test]
    fn broken_pipe_is_not_an_error() {
        let (tx, rx) = mpsc::channel();
        tx.send(Message::text("lost")).unwrap();

        let mut pump = OutboundPump::new(BrokenPipeWriter, WireFormat::Binary, rx);
        assert!(pump.run().is_ok());
    }

    #[test]
    fn capacity_exhaustion_is_distinct() {
        let (tx, rx) = mpsc::channel();
        tx.send(Message::text("this will not fit")).unwrap();

        let mut pump =
            OutboundPump::with_message_limit(Cursor::new(Vec::new()), WireFormat::Text, 4, rx);
        let err = pump.run().unwrap_err();
        assert!(matches!(err, PumpError::CapacityExhausted));
    }

    #[test]
    fn partial_message_in_queue_is_fatal() {
        let (tx, rx) = mpsc::channel();
        tx.send(Message::new(MessageKind::Text, Bytes::from("frag"), false))
            .unwrap();

        let mut pump = OutboundPump::new(Cursor::new(Vec::new()), WireFormat::Text, rx);
        let err = pump.run().unwrap_err();
        assert!(matches!(err, PumpError::Frame(FrameError::PartialMessage)));
    }

    struct ZeroWriter;

    impl Write for ZeroWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct BrokenPipeWriter;

    impl Write for BrokenPipeWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
