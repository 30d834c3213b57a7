/// Errors that can occur on a compiler connection.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// The compiler could not be started.
    #[error("transport error: {0}")]
    Transport(#[from] sassbridge_transport::TransportError),

    /// Framing failed on the compiler's stdin or stdout.
    #[error("frame error: {0}")]
    Frame(#[from] sassbridge_frame::FrameError),

    /// An I/O error outside of framing (thread spawn, process wait).
    #[error("connection I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection was closed, either explicitly or after a fatal fault.
    #[error("connection is closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, ConnectionError>;
