use std::fs;
use std::io::Read;

use duplexwire_format::MessageFormatter;
use duplexwire_stream::ByteCursor;

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, io_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::output::{print_message, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let input = resolve_input(&args)?;
    let chunk_size = match args.chunk_size {
        Some(0) => return Err(CliError::new(USAGE, "chunk size must be greater than zero")),
        Some(size) => size,
        // One chunk: parse the whole input in a single pass.
        None => input.len().max(1),
    };
    let wire_format = args.wire.as_wire_format();
    let limit = args.count.unwrap_or(usize::MAX);

    let mut formatter = MessageFormatter::new();
    let mut cursor = ByteCursor::new();
    let mut decoded = 0usize;

    'feed: for fragment in input.chunks(chunk_size) {
        cursor.push(fragment.to_vec());
        loop {
            match formatter.try_parse_message(&mut cursor, wire_format) {
                Ok(Some(message)) => {
                    print_message(&message, decoded, format);
                    decoded += 1;
                    if decoded >= limit {
                        break 'feed;
                    }
                }
                Ok(None) => continue 'feed,
                Err(err) => return Err(frame_error("decode failed", err)),
            }
        }
    }

    if decoded < limit && (!cursor.is_empty() || formatter.in_progress()) {
        return Err(CliError::new(
            DATA_INVALID,
            format!("input ended mid-message after {decoded} complete message(s)"),
        ));
    }

    tracing::debug!(messages = decoded, "decode finished");
    Ok(SUCCESS)
}

fn resolve_input(args: &DecodeArgs) -> CliResult<Vec<u8>> {
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    let mut input = Vec::new();
    std::io::stdin()
        .read_to_end(&mut input)
        .map_err(|err| io_error("failed reading stdin", err))?;
    Ok(input)
}
