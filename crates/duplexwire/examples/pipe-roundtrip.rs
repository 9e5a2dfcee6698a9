//! One connection, two pumps: an outbound pump drains a queue into one end
//! of a socket pair while an inbound pump parses the other end.
//!
//! Run with: `cargo run -p duplexwire --example pipe-roundtrip`

use std::sync::mpsc;
use std::thread;

use duplexwire::format::{Message, WireFormat};
use duplexwire::pump::{InboundPump, OutboundPump};

fn main() {
    let (left, right) = std::os::unix::net::UnixStream::pair().expect("socket pair");
    let (tx, rx) = mpsc::channel();

    let writer = thread::spawn(move || {
        let mut pump = OutboundPump::new(left, WireFormat::Text, rx);
        pump.run().expect("outbound pump failed");
        // Dropping the pump closes `left`, which ends the inbound side.
    });

    tx.send(Message::text("hello over the wire")).unwrap();
    tx.send(Message::binary(vec![0xDE, 0xAD, 0xBE, 0xEF])).unwrap();
    tx.send(Message::close()).unwrap();
    drop(tx);

    let mut pump = InboundPump::new(right, WireFormat::Text);
    pump.run(|message| {
        println!(
            "received {:?} message, {} payload byte(s)",
            message.kind,
            message.payload.len()
        );
    })
    .expect("inbound pump failed");

    writer.join().unwrap();
}
