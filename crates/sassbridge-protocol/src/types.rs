use serde::Serialize;

/// Output of a successful compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileResult {
    /// The compiled stylesheet.
    pub css: String,
    /// Source map JSON, if one was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_map: Option<String>,
    /// Canonical URLs of every stylesheet loaded during compilation.
    pub loaded_urls: Vec<String>,
}

/// A compilation that the compiler rejected.
///
/// This is ordinary protocol data rather than a transport fault: the
/// compiler answered normally and the answer is "your stylesheet is wrong".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct CompileError {
    /// Human-readable message, pre-formatted with source excerpt when the
    /// compiler provides one.
    pub message: String,
    /// The bare error message without formatting.
    pub sass_message: String,
    /// Stylesheet-level stack trace.
    pub sass_stack: String,
    /// Location of the failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<SourceSpan>,
}

/// A contiguous section of a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSpan {
    pub start: Option<SourceLocation>,
    pub end: Option<SourceLocation>,
    /// The text covered by the span.
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Text surrounding the span, usually the full lines it touches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// A single point in a source file. All fields are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SourceLocation {
    pub offset: u32,
    pub line: u32,
    pub column: u32,
}
