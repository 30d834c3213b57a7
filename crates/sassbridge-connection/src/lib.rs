//! Framed channel to a compiler worker process.
//!
//! A [`Connection`] owns one spawned compiler and is the single point of
//! truth for whether the channel is usable. Outbound frames are written
//! under one lock so concurrent callers never interleave on the wire.
//! Inbound frames are delivered from a background thread to a
//! [`Dispatcher`], which also receives the one-shot fatal error if the
//! channel breaks.

pub mod config;
pub mod connection;
pub mod dispatcher;
pub mod error;

pub use config::ConnectionConfig;
pub use connection::Connection;
pub use dispatcher::Dispatcher;
pub use error::{ConnectionError, Result};
