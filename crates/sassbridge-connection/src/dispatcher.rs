use bytes::Bytes;

use crate::error::ConnectionError;

/// Receiver of everything the compiler sends back.
///
/// Both methods are called from the connection's stdout thread, never
/// concurrently with each other. Implementations must be cheap or hand work
/// off; the next frame is not read until `receive` returns.
pub trait Dispatcher: Send + Sync {
    /// A complete frame arrived.
    fn receive(&self, id: u32, payload: Bytes);

    /// The channel failed and is no longer usable. Called at most once.
    fn error(&self, error: ConnectionError);
}
