use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStderr, ChildStdin, ChildStdout};

use tracing::{debug, info, warn};

use crate::command::CompilerCommand;
use crate::error::{Result, TransportError};
use crate::loader;

/// A running compiler worker with all three standard streams captured.
///
/// The streams are raw byte pipes; no text translation is applied in either
/// direction.
#[derive(Debug)]
pub struct CompilerProcess {
    /// Handle used to wait for (or kill) the worker.
    pub child: Child,
    /// Requests flow into the compiler here.
    pub stdin: ChildStdin,
    /// Framed responses and events flow out of the compiler here.
    pub stdout: ChildStdout,
    /// Free-form diagnostics.
    pub stderr: ChildStderr,
}

impl CompilerProcess {
    /// Spawn the compiler described by `command`.
    ///
    /// Direct execution is attempted first. If the kernel reports that the
    /// binary cannot be executed natively, the spawn is retried exactly once
    /// through a program loader: the command's explicit loader if set,
    /// otherwise the interpreter of the host executable. Every other failure
    /// is returned as-is.
    pub fn spawn(command: &CompilerCommand) -> Result<Self> {
        let program = command.program();
        debug!(program = %program.display(), args = ?command.get_args(), "spawning compiler");

        let child = match command.direct().spawn() {
            Ok(child) => child,
            Err(err) if needs_loader(&err, program) => {
                let loader = resolve_loader(command, err)?;
                info!(
                    program = %program.display(),
                    loader = %loader.display(),
                    "compiler is not directly executable, retrying through program loader"
                );
                command
                    .through_loader(&loader)
                    .spawn()
                    .map_err(|source| TransportError::Spawn {
                        program: loader,
                        source,
                    })?
            }
            Err(source) => {
                return Err(TransportError::Spawn {
                    program: program.to_path_buf(),
                    source,
                })
            }
        };

        Self::from_child(child)
    }

    /// Take ownership of an already spawned child with piped stdio.
    ///
    /// The child is killed if any of its streams was not captured.
    pub fn from_child(mut child: Child) -> Result<Self> {
        let streams = (child.stdin.take(), child.stdout.take(), child.stderr.take());
        let (stdin, stdout, stderr) = match streams {
            (Some(stdin), Some(stdout), Some(stderr)) => (stdin, stdout, stderr),
            (stdin, stdout, _) => {
                let missing = if stdin.is_none() {
                    "stdin"
                } else if stdout.is_none() {
                    "stdout"
                } else {
                    "stderr"
                };
                let _ = child.kill();
                let _ = child.wait();
                return Err(TransportError::MissingStream(missing));
            }
        };

        info!(pid = child.id(), "compiler process started");
        Ok(Self {
            child,
            stdin,
            stdout,
            stderr,
        })
    }

    /// OS process id of the worker.
    pub fn id(&self) -> u32 {
        self.child.id()
    }
}

fn resolve_loader(command: &CompilerCommand, spawn_err: io::Error) -> Result<PathBuf> {
    if let Some(loader) = command.get_loader() {
        return Ok(loader.to_path_buf());
    }
    match loader::host_interpreter() {
        Ok(Some(loader)) => Ok(loader),
        Ok(None) => Err(TransportError::LoaderUnavailable {
            program: command.program().to_path_buf(),
            source: spawn_err,
        }),
        Err(err) => {
            warn!(error = %err, "failed to resolve host program loader");
            Err(TransportError::LoaderUnavailable {
                program: command.program().to_path_buf(),
                source: spawn_err,
            })
        }
    }
}

/// Whether a direct spawn failure means "binary exists but cannot run here".
///
/// `ENOEXEC` is reported for an unknown executable format. `ENOENT` for a
/// program file that does exist means its recorded interpreter is missing.
/// Bare names are resolved through `PATH`, so a file of the same name in the
/// current directory says nothing about them.
#[cfg(unix)]
pub(crate) fn needs_loader(err: &io::Error, program: &Path) -> bool {
    match err.raw_os_error() {
        Some(code) if code == libc::ENOEXEC => true,
        Some(code) if code == libc::ENOENT => {
            program.components().count() > 1 && program.is_file()
        }
        _ => false,
    }
}

#[cfg(not(unix))]
pub(crate) fn needs_loader(_err: &io::Error, _program: &Path) -> bool {
    false
}
