//! Translation between wire envelopes and native values.

use prost::Message as _;
use tracing::trace;

use crate::error::{CodecError, ResponseError, Result};
use crate::proto::{self, compile_response, inbound_message, outbound_message};
use crate::types::{CompileError, CompileResult, SourceLocation, SourceSpan};

const SYNTAXES: &[&str] = &["scss", "indented", "css"];
const OUTPUT_STYLES: &[&str] = &["expanded", "compressed"];

/// Registers each host message type with the envelope slot that carries it.
///
/// Every type listed here gets a `From` conversion into the inbound envelope
/// union, so [`encode_envelope`] only accepts registered types.
macro_rules! inbound_slots {
    ($($ty:ident => $slot:literal),+ $(,)?) => {
        $(
            impl From<proto::$ty> for inbound_message::Message {
                fn from(message: proto::$ty) -> Self {
                    inbound_message::Message::$ty(message)
                }
            }
        )+

        impl inbound_message::Message {
            /// Name of the envelope field this message occupies.
            pub fn slot_name(&self) -> &'static str {
                match self {
                    $(inbound_message::Message::$ty(_) => $slot,)+
                }
            }
        }
    };
}

inbound_slots! {
    CompileRequest => "compile_request",
    CanonicalizeResponse => "canonicalize_response",
    ImportResponse => "import_response",
    FileImportResponse => "file_import_response",
    FunctionCallResponse => "function_call_response",
    VersionRequest => "version_request",
}

impl outbound_message::Message {
    /// Name of the envelope field this message occupied.
    pub fn slot_name(&self) -> &'static str {
        match self {
            outbound_message::Message::Error(_) => "error",
            outbound_message::Message::CompileResponse(_) => "compile_response",
            outbound_message::Message::LogEvent(_) => "log_event",
            outbound_message::Message::CanonicalizeRequest(_) => "canonicalize_request",
            outbound_message::Message::ImportRequest(_) => "import_request",
            outbound_message::Message::FileImportRequest(_) => "file_import_request",
            outbound_message::Message::FunctionCallRequest(_) => "function_call_request",
            outbound_message::Message::VersionResponse(_) => "version_response",
        }
    }
}

/// Parse a compiler payload and return the message it carries.
pub fn decode_envelope(payload: &[u8]) -> Result<outbound_message::Message> {
    let envelope = proto::OutboundMessage::decode(payload)?;
    let message = envelope.message.ok_or(CodecError::EmptyEnvelope)?;
    trace!(slot = message.slot_name(), len = payload.len(), "decoded envelope");
    Ok(message)
}

/// Wrap a host message in the inbound envelope and serialize it.
pub fn encode_envelope<M>(message: M) -> Vec<u8>
where
    M: Into<inbound_message::Message>,
{
    let message = message.into();
    let slot = message.slot_name();
    let bytes = proto::InboundMessage {
        message: Some(message),
    }
    .encode_to_vec();
    trace!(slot, len = bytes.len(), "encoded envelope");
    bytes
}

/// Turn a compile response into its native outcome.
///
/// A failure response becomes a [`CompileError`] whose primary message is the
/// formatted text when the compiler supplied one, and the plain message
/// otherwise.
pub fn translate_compile_response(
    response: proto::CompileResponse,
) -> std::result::Result<CompileResult, ResponseError> {
    match response.result {
        Some(compile_response::Result::Success(success)) => Ok(CompileResult {
            css: success.css,
            source_map: success.source_map,
            loaded_urls: success.loaded_urls,
        }),
        Some(compile_response::Result::Failure(failure)) => {
            let message = match failure.formatted {
                Some(formatted) if !formatted.is_empty() => formatted,
                _ => failure.message.clone(),
            };
            Err(ResponseError::Compile(CompileError {
                message,
                sass_message: failure.message,
                sass_stack: failure.stack_trace,
                span: translate_span(failure.span),
            }))
        }
        None => Err(ResponseError::Codec(CodecError::MissingCompileResult)),
    }
}

pub fn translate_span(span: Option<proto::SourceSpan>) -> Option<SourceSpan> {
    let span = span?;
    Some(SourceSpan {
        start: translate_location(span.start),
        end: translate_location(span.end),
        text: span.text,
        url: span.url,
        context: span.context,
    })
}

pub fn translate_location(location: Option<proto::SourceLocation>) -> Option<SourceLocation> {
    location.map(|location| SourceLocation {
        offset: location.offset,
        line: location.line,
        column: location.column,
    })
}

/// Map a syntax name (`scss`, `indented`, `css`) to its wire value.
pub fn syntax_to_wire(name: &str) -> Result<proto::Syntax> {
    match name {
        "scss" => Ok(proto::Syntax::Scss),
        "indented" => Ok(proto::Syntax::Indented),
        "css" => Ok(proto::Syntax::Css),
        other => Err(CodecError::InvalidArgument {
            what: "syntax",
            value: other.to_string(),
            allowed: SYNTAXES,
        }),
    }
}

/// Map an output style name (`expanded`, `compressed`) to its wire value.
pub fn output_style_to_wire(name: &str) -> Result<proto::OutputStyle> {
    match name {
        "expanded" => Ok(proto::OutputStyle::Expanded),
        "compressed" => Ok(proto::OutputStyle::Compressed),
        other => Err(CodecError::InvalidArgument {
            what: "style",
            value: other.to_string(),
            allowed: OUTPUT_STYLES,
        }),
    }
}

impl proto::CompileRequest {
    /// Request compiling an inline stylesheet.
    pub fn from_string(
        source: impl Into<String>,
        url: Option<String>,
        syntax: proto::Syntax,
        style: proto::OutputStyle,
    ) -> Self {
        let input = proto::compile_request::StringInput {
            source: source.into(),
            url: url.unwrap_or_default(),
            syntax: syntax.into(),
            importer: None,
        };
        Self {
            input: Some(proto::compile_request::Input::String(input)),
            style: style.into(),
            ..Default::default()
        }
    }

    /// Request compiling a stylesheet on disk.
    pub fn from_path(path: impl Into<String>, style: proto::OutputStyle) -> Self {
        Self {
            input: Some(proto::compile_request::Input::Path(path.into())),
            style: style.into(),
            ..Default::default()
        }
    }
}
