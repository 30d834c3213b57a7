use sassbridge_frame::FrameConfig;
use sassbridge_transport::CompilerCommand;

/// Everything needed to open a [`Connection`](crate::Connection).
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// How to launch the compiler.
    pub command: CompilerCommand,
    /// Limits applied to frames read from the compiler.
    pub frame: FrameConfig,
}

impl ConnectionConfig {
    pub fn new(command: CompilerCommand) -> Self {
        Self {
            command,
            frame: FrameConfig::default(),
        }
    }

    /// Override the maximum inbound payload size.
    pub fn max_payload_size(mut self, max_payload_size: usize) -> Self {
        self.frame.max_payload_size = max_payload_size;
        self
    }
}

impl From<CompilerCommand> for ConnectionConfig {
    fn from(command: CompilerCommand) -> Self {
        Self::new(command)
    }
}
