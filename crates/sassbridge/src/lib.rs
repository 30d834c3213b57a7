//! Host-side bridge to an embedded stylesheet compiler.
//!
//! sassbridge runs a compiler in `--embedded` mode as a child process and
//! talks to it over its standard streams using varint-framed protobuf
//! messages.
//!
//! # Crate Structure
//!
//! - [`transport`]: Compiler subprocess spawning and loader fallback
//! - [`frame`]: Varint length-prefixed framing with message ids
//! - [`protocol`]: Envelope schema, codec, and native result types
//! - [`connection`]: Thread-safe framed channel and dispatcher seam

/// Re-export transport types.
pub mod transport {
    pub use sassbridge_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use sassbridge_frame::*;
}

/// Re-export protocol types.
pub mod protocol {
    pub use sassbridge_protocol::*;
}

/// Re-export connection types.
pub mod connection {
    pub use sassbridge_connection::*;
}
