use std::io::{BufRead, BufReader, Read};
use std::process::{Child, ChildStdin, ChildStdout, ExitStatus};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use sassbridge_frame::{FrameConfig, FrameError, FrameReader, FrameWriter};
use sassbridge_transport::CompilerProcess;
use tracing::{debug, info, warn};

use crate::config::ConnectionConfig;
use crate::dispatcher::Dispatcher;
use crate::error::{ConnectionError, Result};

const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// A framed channel to one compiler worker.
///
/// `write` may be called from any number of threads. Inbound frames are
/// delivered to the [`Dispatcher`] from a dedicated stdout thread; compiler
/// stderr is relayed line by line as `warn` events on the
/// `sassbridge::compiler` target.
pub struct Connection {
    shared: Arc<Shared>,
    pid: u32,
    readers: Mutex<Vec<JoinHandle<()>>>,
}

struct Shared {
    /// Guards writes, close and liveness checks together.
    state: Mutex<ChannelState>,
    /// Set once an orderly close begins; EOF after this point is expected.
    closing: AtomicBool,
}

struct ChannelState {
    stdin: Option<FrameWriter<ChildStdin>>,
    child: Child,
    exit_status: Option<ExitStatus>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, ChannelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ChannelState {
    /// Whether the worker process is still running. Caches the exit status.
    fn alive(&mut self) -> bool {
        if self.exit_status.is_some() {
            return false;
        }
        match self.child.try_wait() {
            Ok(Some(status)) => {
                debug!(pid = self.child.id(), %status, "compiler exited");
                self.exit_status = Some(status);
                false
            }
            Ok(None) => true,
            Err(err) => {
                warn!(pid = self.child.id(), error = %err, "failed to query compiler status");
                false
            }
        }
    }
}

impl Connection {
    /// Spawn the compiler and start the stdout and stderr threads.
    pub fn spawn(config: ConnectionConfig, dispatcher: Arc<dyn Dispatcher>) -> Result<Self> {
        let process = CompilerProcess::spawn(&config.command)?;
        Self::from_process(process, config.frame, dispatcher)
    }

    /// Wrap an already spawned compiler process.
    pub fn from_process(
        process: CompilerProcess,
        frame: FrameConfig,
        dispatcher: Arc<dyn Dispatcher>,
    ) -> Result<Self> {
        let CompilerProcess {
            child,
            stdin,
            stdout,
            stderr,
        } = process;
        let pid = child.id();

        let shared = Arc::new(Shared {
            state: Mutex::new(ChannelState {
                stdin: Some(FrameWriter::new(stdin)),
                child,
                exit_status: None,
            }),
            closing: AtomicBool::new(false),
        });

        let stdout_thread = {
            let shared = Arc::clone(&shared);
            let reader = FrameReader::with_config(stdout, frame);
            thread::Builder::new()
                .name("sassbridge-stdout-poller".into())
                .spawn(move || poll_stdout(reader, &shared, dispatcher.as_ref()))
        };
        let stdout_thread = match stdout_thread {
            Ok(handle) => handle,
            Err(err) => {
                kill(&shared);
                return Err(err.into());
            }
        };

        let stderr_thread = thread::Builder::new()
            .name("sassbridge-stderr-relay".into())
            .spawn(move || relay_stderr(stderr, pid));
        let stderr_thread = match stderr_thread {
            Ok(handle) => handle,
            Err(err) => {
                kill(&shared);
                let _ = stdout_thread.join();
                return Err(err.into());
            }
        };

        info!(pid, "compiler connection open");
        Ok(Self {
            shared,
            pid,
            readers: Mutex::new(vec![stdout_thread, stderr_thread]),
        })
    }

    /// Send one frame to the compiler.
    ///
    /// Header and payload are written while holding the channel lock, so
    /// frames from concurrent callers never interleave. Fails with
    /// [`ConnectionError::Closed`] once the channel has been closed or has
    /// failed; a failed write closes the channel.
    pub fn write(&self, id: u32, payload: &[u8]) -> Result<()> {
        if self.shared.closing.load(Ordering::Acquire) {
            return Err(ConnectionError::Closed);
        }

        let mut state = self.shared.lock();
        let writer = state.stdin.as_mut().ok_or(ConnectionError::Closed)?;
        if let Err(err) = writer.send(id, payload) {
            warn!(pid = self.pid, id, error = %err, "write to compiler failed");
            state.stdin = None;
            return Err(err.into());
        }
        Ok(())
    }

    /// Close stdin, wait for the compiler to exit, and join the reader
    /// threads.
    ///
    /// Calling `close` again, or after the channel failed, is a no-op.
    pub fn close(&self) -> Result<()> {
        self.shared.closing.store(true, Ordering::Release);

        if self.shared.lock().stdin.take().is_some() {
            debug!(pid = self.pid, "closed compiler stdin");
        }

        // The lock is released between polls so a writer that raced the
        // closing flag can observe the closed stdin and return.
        loop {
            let mut state = self.shared.lock();
            if !state.alive() {
                break;
            }
            drop(state);
            thread::sleep(EXIT_POLL_INTERVAL);
        }

        let readers = std::mem::take(
            &mut *self
                .readers
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for handle in readers {
            // close() may be called from a dispatcher running on the poller.
            if handle.thread().id() == thread::current().id() {
                continue;
            }
            if handle.join().is_err() {
                warn!(pid = self.pid, "compiler reader thread panicked");
            }
        }

        Ok(())
    }

    /// True once stdin is closed and the compiler process has exited.
    pub fn is_closed(&self) -> bool {
        let mut state = self.shared.lock();
        state.stdin.is_none() && !state.alive()
    }

    /// OS process id of the compiler.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Exit status of the compiler, once it has exited.
    pub fn exit_status(&self) -> Option<ExitStatus> {
        let mut state = self.shared.lock();
        state.alive();
        state.exit_status
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if self.shared.closing.swap(true, Ordering::AcqRel) {
            return;
        }
        // Let the worker see EOF, then reap it off this thread so dropping
        // never blocks and never leaves a zombie behind.
        self.shared.lock().stdin.take();
        let shared = Arc::clone(&self.shared);
        let reaper = thread::Builder::new()
            .name("sassbridge-reaper".into())
            .spawn(move || reap(&shared));
        if let Err(err) = reaper {
            warn!(pid = self.pid, error = %err, "failed to start reaper, killing compiler");
            kill(&self.shared);
        }
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("pid", &self.pid)
            .field("closing", &self.shared.closing.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Wait for the worker to exit, releasing the lock between polls.
fn reap(shared: &Shared) {
    loop {
        if !shared.lock().alive() {
            return;
        }
        thread::sleep(EXIT_POLL_INTERVAL);
    }
}

fn kill(shared: &Shared) {
    shared.closing.store(true, Ordering::Release);
    let mut state = shared.lock();
    state.stdin = None;
    let _ = state.child.kill();
    if let Ok(status) = state.child.wait() {
        state.exit_status = Some(status);
    }
}

fn poll_stdout(mut reader: FrameReader<ChildStdout>, shared: &Shared, dispatcher: &dyn Dispatcher) {
    let err = loop {
        match reader.read_frame() {
            Ok(frame) => dispatcher.receive(frame.id, frame.payload),
            Err(err) => break err,
        }
    };

    let orderly =
        shared.closing.load(Ordering::Acquire) && matches!(err, FrameError::ConnectionClosed);
    if orderly {
        debug!("compiler stdout closed");
    } else {
        warn!(error = %err, "compiler stdout failed");
        dispatcher.error(err.into());
    }

    let mut state = shared.lock();
    drop(reader);
    if !orderly {
        // Closing stdin lets the worker notice and exit.
        state.stdin = None;
    }
}

fn relay_stderr<R: Read>(stderr: R, pid: u32) {
    let mut reader = BufReader::new(stderr);
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                let text = String::from_utf8_lossy(&line);
                warn!(target: "sassbridge::compiler", pid, "{}", text.trim_end());
            }
        }
    }
}
