use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Flag selecting the stdio protocol mode of the compiler.
pub const EMBEDDED_FLAG: &str = "--embedded";

/// Description of how to launch the compiler worker.
///
/// The command is only a recipe; [`CompilerProcess::spawn`](crate::CompilerProcess::spawn)
/// turns it into a running process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerCommand {
    program: PathBuf,
    args: Vec<OsString>,
    current_dir: Option<PathBuf>,
    loader: Option<PathBuf>,
}

impl CompilerCommand {
    /// Launch `program` with no extra arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            loader: None,
        }
    }

    /// Launch `program` in embedded protocol mode (`program --embedded`).
    pub fn embedded(program: impl Into<PathBuf>) -> Self {
        Self::new(program).arg(EMBEDDED_FLAG)
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_os_string()));
        self
    }

    /// Pin the working directory of the compiler.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Use an explicit program loader when direct execution fails.
    ///
    /// Without an override the loader is resolved from the host executable.
    pub fn loader(mut self, loader: impl Into<PathBuf>) -> Self {
        self.loader = Some(loader.into());
        self
    }

    /// The compiler executable.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments passed after the program.
    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Explicit loader override, if any.
    pub fn get_loader(&self) -> Option<&Path> {
        self.loader.as_deref()
    }

    /// Working directory the compiler runs in.
    ///
    /// Falls back to the directory that holds the compiler binary so that
    /// companion resources next to it can be located.
    pub fn working_dir(&self) -> Option<&Path> {
        if let Some(dir) = &self.current_dir {
            return Some(dir);
        }
        self.program
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
    }

    /// Build a direct invocation: `program args...`.
    pub(crate) fn direct(&self) -> Command {
        let mut cmd = Command::new(self.resolved_program());
        cmd.args(&self.args);
        self.configure(&mut cmd);
        cmd
    }

    /// Build an invocation through a program loader: `loader program args...`.
    pub(crate) fn through_loader(&self, loader: &Path) -> Command {
        let mut cmd = Command::new(loader);
        cmd.arg(self.resolved_program()).args(&self.args);
        self.configure(&mut cmd);
        cmd
    }

    /// Relative paths are made absolute so they survive the working directory
    /// change; bare names are left for `PATH` lookup.
    fn resolved_program(&self) -> PathBuf {
        if self.program.components().count() > 1 {
            std::path::absolute(&self.program).unwrap_or_else(|_| self.program.clone())
        } else {
            self.program.clone()
        }
    }

    fn configure(&self, cmd: &mut Command) {
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = self.working_dir() {
            cmd.current_dir(dir);
        }
    }
}
