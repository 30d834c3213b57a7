//! Compiler subprocess transport.
//!
//! Spawns a single-purpose compiler worker with its standard streams captured
//! as binary pipes:
//! - stdin carries framed requests from the host
//! - stdout carries framed responses and events from the compiler
//! - stderr carries free-form diagnostics
//!
//! This is the lowest layer of sassbridge. Everything else builds on top of
//! the [`CompilerProcess`] type provided here.

pub mod command;
pub mod error;
pub mod loader;
pub mod process;

pub use command::{CompilerCommand, EMBEDDED_FLAG};
pub use error::{Result, TransportError};
pub use process::CompilerProcess;
