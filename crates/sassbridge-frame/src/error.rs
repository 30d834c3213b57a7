/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// A varint ran past the widest encoding of a 64-bit integer.
    #[error("malformed varint (more than {0} bytes)")]
    MalformedVarint(usize),

    /// The declared frame length cannot even hold the encoded id.
    #[error("malformed frame (length {length} shorter than {id_len}-byte id)")]
    MalformedFrame { length: u64, id_len: usize },

    /// The message id does not fit the protocol's 32-bit id space.
    #[error("message id {0} out of range")]
    IdOutOfRange(u64),

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream was closed before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
