use std::path::PathBuf;

/// Errors that can occur while starting or talking to the compiler process.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The compiler executable could not be started.
    #[error("failed to spawn {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },

    /// Direct execution failed and no usable program loader was found.
    #[error(
        "{} is not directly executable and no program loader is available: {source}",
        program.display()
    )]
    LoaderUnavailable {
        program: PathBuf,
        source: std::io::Error,
    },

    /// A standard stream was not captured as a pipe.
    #[error("compiler {0} was not captured")]
    MissingStream(&'static str),

    /// An I/O error occurred on a compiler stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
