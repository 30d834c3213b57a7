use crate::types::CompileError;

/// Protocol faults raised while translating envelopes.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The payload is not a valid envelope.
    #[error("failed to decode envelope: {0}")]
    Decode(#[from] prost::DecodeError),

    /// The envelope parsed but carries no message.
    #[error("envelope has no message set")]
    EmptyEnvelope,

    /// A compile response carried neither a success nor a failure.
    #[error("compile response has no result")]
    MissingCompileResult,

    /// A caller-supplied option is outside its closed set of values.
    #[error("{what} must be one of {}, got {value:?}", allowed.join(", "))]
    InvalidArgument {
        what: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },
}

/// Why a compile response did not produce a [`CompileResult`](crate::CompileResult).
#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    /// The compiler reported a stylesheet error.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// The response itself was malformed.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

pub type Result<T> = std::result::Result<T, CodecError>;
