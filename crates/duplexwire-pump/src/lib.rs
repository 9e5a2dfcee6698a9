//! Connection-side message pumps for duplexwire.
//!
//! A connection runs one [`OutboundPump`] on its writer thread and one
//! [`InboundPump`] on its reader thread. The pumps own the formatting layer
//! end of the connection; cancellation (queue closed, peer gone) terminates
//! a pump cleanly, while malformed data and resource exhaustion surface as
//! errors the hosting layer must act on.

pub mod error;
pub mod inbound;
pub mod outbound;

pub use error::{PumpError, Result};
pub use inbound::InboundPump;
pub use outbound::OutboundPump;
