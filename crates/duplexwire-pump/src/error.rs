/// Errors that can occur while pumping messages for a connection.
#[derive(Debug, thiserror::Error)]
pub enum PumpError {
    /// Frame-level error: malformed inbound data or a failed write.
    #[error("frame error: {0}")]
    Frame(#[from] duplexwire_format::FrameError),

    /// An outbound message could not be encoded within the staging
    /// capacity. Distinct from stream closure: the connection is alive but
    /// the message cannot be sent.
    #[error("outbound staging capacity exhausted")]
    CapacityExhausted,
}

pub type Result<T> = std::result::Result<T, PumpError>;
