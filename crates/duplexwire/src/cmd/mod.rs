use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use duplexwire_format::{MessageKind, WireFormat};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a single message into wire bytes.
    Encode(EncodeArgs),
    /// Decode wire bytes and print the messages.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args),
        Command::Decode(args) => decode::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Wire format selector shared by encode and decode.
#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum WireArg {
    Binary,
    Text,
}

impl WireArg {
    pub fn as_wire_format(self) -> WireFormat {
        match self {
            WireArg::Binary => WireFormat::Binary,
            WireArg::Text => WireFormat::Text,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum KindArg {
    Text,
    Binary,
    Close,
    Error,
}

impl KindArg {
    pub fn as_kind(self) -> MessageKind {
        match self {
            KindArg::Text => MessageKind::Text,
            KindArg::Binary => MessageKind::Binary,
            KindArg::Close => MessageKind::Close,
            KindArg::Error => MessageKind::Error,
        }
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Wire format to produce.
    #[arg(long, value_enum, default_value_t = WireArg::Binary)]
    pub wire: WireArg,
    /// Kind of the message.
    #[arg(long, value_enum, default_value_t = KindArg::Text)]
    pub kind: KindArg,
    /// Payload as a string.
    #[arg(long, conflicts_with = "file")]
    pub data: Option<String>,
    /// Read the payload from a file.
    #[arg(long, conflicts_with = "data")]
    pub file: Option<PathBuf>,
    /// Write wire bytes to a file instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Wire format to expect.
    #[arg(long, value_enum, default_value_t = WireArg::Binary)]
    pub wire: WireArg,
    /// Read wire bytes from a file instead of stdin.
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Feed the parser in chunks of this many bytes.
    #[arg(long, value_name = "BYTES")]
    pub chunk_size: Option<usize>,
    /// Stop after decoding N messages.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub struct VersionArgs {
    /// Show extended build information.
    #[arg(long)]
    pub extended: bool,
}
