//! Varint length-prefixed message framing.
//!
//! Every message exchanged with the compiler is framed as:
//! - A varint total length (size of the encoded id plus the payload)
//! - A varint message id used to multiplex concurrent requests
//! - The serialized protocol message
//!
//! No partial reads, no buffer management in user code.

pub mod codec;
pub mod error;
pub mod reader;
pub mod varint;
pub mod writer;

#[cfg(feature = "async")]
pub mod tokio_codec;

pub use codec::{decode_frame, encode_frame, Frame, FrameConfig, DEFAULT_MAX_PAYLOAD};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use writer::FrameWriter;

#[cfg(feature = "async")]
pub use tokio_codec::FrameCodec;
