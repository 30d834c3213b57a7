use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::{Duration, Instant};

use bytes::Bytes;
use sassbridge_connection::{Connection, ConnectionConfig, ConnectionError, Dispatcher};
use sassbridge_protocol::proto::{self, outbound_message};
use sassbridge_protocol::{decode_envelope, encode_envelope};
use sassbridge_transport::CompilerCommand;

use crate::exit::{
    codec_error, connection_error, CliError, CliResult, DATA_INVALID, INTERNAL, INTERRUPTED,
    TIMEOUT,
};

const POLL_SLICE: Duration = Duration::from_millis(100);

/// Everything the compiler sends back, in arrival order.
enum Event {
    Frame(u32, Bytes),
    Fault(ConnectionError),
}

/// Forwards frames and faults from the stdout thread to the CLI thread.
struct ChannelDispatcher {
    tx: Mutex<Sender<Event>>,
}

impl ChannelDispatcher {
    fn forward(&self, event: Event) {
        // The sender holds no state a panic could leave half-updated.
        let tx = self.tx.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = tx.send(event);
    }
}

impl Dispatcher for ChannelDispatcher {
    fn receive(&self, id: u32, payload: Bytes) {
        self.forward(Event::Frame(id, payload));
    }

    fn error(&self, error: ConnectionError) {
        self.forward(Event::Fault(error));
    }
}

/// A single-request conversation with one compiler process.
pub struct Session {
    conn: Connection,
    events: Receiver<Event>,
    deadline: Instant,
    timeout: Duration,
}

impl Session {
    pub fn open(
        compiler: PathBuf,
        loader: Option<PathBuf>,
        timeout: Duration,
    ) -> CliResult<Self> {
        let mut command = CompilerCommand::embedded(compiler);
        if let Some(loader) = loader {
            command = command.loader(loader);
        }

        let (tx, events) = mpsc::channel();
        let dispatcher = Arc::new(ChannelDispatcher { tx: Mutex::new(tx) });
        let conn = Connection::spawn(ConnectionConfig::new(command), dispatcher)
            .map_err(|err| connection_error("failed to start compiler", err))?;
        tracing::debug!(pid = conn.pid(), ?timeout, "compiler session open");

        Ok(Self {
            conn,
            events,
            deadline: Instant::now() + timeout,
            timeout,
        })
    }

    /// Send one host message under `id`.
    pub fn send<M>(&self, id: u32, message: M) -> CliResult<()>
    where
        M: Into<proto::inbound_message::Message>,
    {
        self.conn
            .write(id, &encode_envelope(message))
            .map_err(|err| connection_error("failed to send request", err))
    }

    /// Wait for the reply addressed to `id`.
    ///
    /// Log events are surfaced through `tracing` on the way. Callbacks the
    /// compiler makes into the host are answered with an error since this
    /// session registers no importers or functions.
    pub fn await_reply(&self, id: u32) -> CliResult<outbound_message::Message> {
        loop {
            let (frame_id, payload) = self.next_frame()?;
            let message =
                decode_envelope(&payload).map_err(|err| codec_error("invalid reply", err))?;
            tracing::trace!(id = frame_id, slot = message.slot_name(), "received message");

            match message {
                outbound_message::Message::LogEvent(event) => log_event(&event),
                outbound_message::Message::Error(err) => return Err(protocol_error(&err)),
                outbound_message::Message::CanonicalizeRequest(request) => self.send(
                    frame_id,
                    proto::CanonicalizeResponse {
                        id: request.id,
                        result: Some(proto::canonicalize_response::Result::Error(
                            no_importers(),
                        )),
                    },
                )?,
                outbound_message::Message::ImportRequest(request) => self.send(
                    frame_id,
                    proto::ImportResponse {
                        id: request.id,
                        result: Some(proto::import_response::Result::Error(no_importers())),
                    },
                )?,
                outbound_message::Message::FileImportRequest(request) => self.send(
                    frame_id,
                    proto::FileImportResponse {
                        id: request.id,
                        result: Some(proto::file_import_response::Result::Error(
                            no_importers(),
                        )),
                    },
                )?,
                outbound_message::Message::FunctionCallRequest(request) => self.send(
                    frame_id,
                    proto::FunctionCallResponse {
                        id: request.id,
                        result: Some(proto::function_call_response::Result::Error(
                            "no host functions are registered".to_string(),
                        )),
                        accessed_argument_lists: Vec::new(),
                    },
                )?,
                reply if frame_id == id => return Ok(reply),
                other => {
                    tracing::debug!(id = frame_id, slot = other.slot_name(), "ignoring message");
                }
            }
        }
    }

    pub fn pid(&self) -> u32 {
        self.conn.pid()
    }

    /// Close stdin and wait for the compiler to exit.
    pub fn close(self) -> CliResult<()> {
        self.conn
            .close()
            .map_err(|err| connection_error("failed to stop compiler", err))
    }

    fn next_frame(&self) -> CliResult<(u32, Bytes)> {
        loop {
            if interrupted().load(Ordering::SeqCst) {
                return Err(CliError::new(INTERRUPTED, "interrupted"));
            }
            let remaining = self.deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(CliError::new(
                    TIMEOUT,
                    format!("compiler did not reply within {:?}", self.timeout),
                ));
            }

            match self.events.recv_timeout(remaining.min(POLL_SLICE)) {
                Ok(Event::Frame(id, payload)) => return Ok((id, payload)),
                Ok(Event::Fault(err)) => {
                    return Err(connection_error("compiler connection failed", err))
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(CliError::new(INTERNAL, "compiler event channel closed"))
                }
            }
        }
    }
}

/// Flag raised by Ctrl-C. The handler is installed on first use.
fn interrupted() -> &'static AtomicBool {
    static INTERRUPTED_FLAG: OnceLock<Arc<AtomicBool>> = OnceLock::new();
    INTERRUPTED_FLAG.get_or_init(|| {
        let flag = Arc::new(AtomicBool::new(false));
        let handler_flag = Arc::clone(&flag);
        if let Err(err) = ctrlc::set_handler(move || handler_flag.store(true, Ordering::SeqCst)) {
            tracing::warn!(error = %err, "signal handler setup failed");
        }
        flag
    })
}

fn no_importers() -> String {
    "no importers are registered".to_string()
}

fn protocol_error(err: &proto::ProtocolError) -> CliError {
    let kind = match err.r#type() {
        proto::ProtocolErrorType::Parse => "parse",
        proto::ProtocolErrorType::Params => "params",
        proto::ProtocolErrorType::Internal => "internal",
    };
    CliError::new(
        DATA_INVALID,
        format!("compiler reported a {kind} protocol error: {}", err.message),
    )
}

fn log_event(event: &proto::LogEvent) {
    let text = if event.formatted.is_empty() {
        event.message.as_str()
    } else {
        event.formatted.as_str()
    };
    match event.r#type() {
        proto::LogEventType::Warning => tracing::warn!(target: "sassbridge::compiler", "{text}"),
        proto::LogEventType::DeprecationWarning => tracing::warn!(
            target: "sassbridge::compiler",
            deprecation = event.deprecation_type.as_deref().unwrap_or("unknown"),
            "{text}"
        ),
        proto::LogEventType::Debug => tracing::debug!(target: "sassbridge::compiler", "{text}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poisoned_dispatcher() -> (Arc<ChannelDispatcher>, Receiver<Event>) {
        let (tx, events) = mpsc::channel();
        let dispatcher = Arc::new(ChannelDispatcher { tx: Mutex::new(tx) });

        let holder = Arc::clone(&dispatcher);
        let panicked = std::thread::spawn(move || {
            let _guard = holder.tx.lock().unwrap();
            panic!("dispatcher poisoned");
        })
        .join();
        assert!(panicked.is_err());
        assert!(dispatcher.tx.is_poisoned());
        (dispatcher, events)
    }

    #[test]
    fn frames_survive_a_poisoned_sender() {
        let (dispatcher, events) = poisoned_dispatcher();
        dispatcher.receive(7, Bytes::from_static(b"css"));

        match events.try_recv() {
            Ok(Event::Frame(id, payload)) => {
                assert_eq!(id, 7);
                assert_eq!(payload.as_ref(), b"css");
            }
            _ => panic!("frame was lost"),
        }
    }

    #[test]
    fn faults_survive_a_poisoned_sender() {
        let (dispatcher, events) = poisoned_dispatcher();
        dispatcher.error(ConnectionError::Closed);

        assert!(matches!(
            events.try_recv(),
            Ok(Event::Fault(ConnectionError::Closed))
        ));
    }
}
