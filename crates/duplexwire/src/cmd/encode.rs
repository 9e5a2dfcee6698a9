use std::fs;
use std::io::Read;

use duplexwire_format::{Message, MessageFormatter};
use duplexwire_stream::BufferSink;

use crate::cmd::EncodeArgs;
use crate::exit::{frame_error, io_error, CliResult, SUCCESS};
use crate::output::print_raw;

pub fn run(args: EncodeArgs) -> CliResult<i32> {
    let payload = resolve_payload(&args)?;
    let message = Message::new(args.kind.as_kind(), payload, true);

    let mut formatter = MessageFormatter::new();
    let mut sink = BufferSink::new();
    formatter
        .try_write_message(&message, &mut sink, args.wire.as_wire_format())
        .map_err(|err| frame_error("encode failed", err))?;

    tracing::debug!(
        wire_bytes = sink.len(),
        payload_bytes = message.payload.len(),
        "message encoded"
    );

    match &args.out {
        Some(path) => fs::write(path, sink.as_slice()).map_err(|err| {
            io_error(&format!("failed writing {}", path.display()), err)
        })?,
        None => print_raw(sink.as_slice()),
    }

    Ok(SUCCESS)
}

fn resolve_payload(args: &EncodeArgs) -> CliResult<Vec<u8>> {
    if let Some(data) = &args.data {
        return Ok(data.as_bytes().to_vec());
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    let mut payload = Vec::new();
    std::io::stdin()
        .read_to_end(&mut payload)
        .map_err(|err| io_error("failed reading stdin", err))?;
    Ok(payload)
}
