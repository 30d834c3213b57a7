//! Embedded compiler protocol.
//!
//! Frame payloads are protobuf envelopes:
//! - [`proto::InboundMessage`] flows from the host into the compiler
//! - [`proto::OutboundMessage`] flows from the compiler back to the host
//!
//! The [`codec`] module translates between those envelopes and the native
//! value types in [`types`]. It performs no I/O.

pub mod codec;
pub mod error;
pub mod proto;
pub mod types;

pub use codec::{
    decode_envelope, encode_envelope, output_style_to_wire, syntax_to_wire,
    translate_compile_response, translate_location, translate_span,
};
pub use error::{CodecError, ResponseError, Result};
pub use types::{CompileError, CompileResult, SourceLocation, SourceSpan};
