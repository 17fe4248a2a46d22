//! Subprocess execution utilities.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use wait_timeout::ChildExt;

use crate::util::errors::ExternalToolError;

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    timeout: Option<Duration>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    ///
    /// A bare name is looked up on `PATH` when the process runs.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: BTreeMap::new(),
            timeout: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set an environment variable.
    pub fn env(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.env
            .insert(key.as_ref().to_string(), value.as_ref().to_string());
        self
    }

    /// Kill the process if it runs longer than `timeout`.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn get_program(&self) -> &Path {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn get_env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub fn get_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Display the command for error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }

    /// Execute the command and wait for completion, capturing its output.
    ///
    /// A non-zero exit is not an error here; see [`ProcessOutput::check`].
    pub fn exec(&self) -> Result<ProcessOutput, ExternalToolError> {
        let command_line = self.display_command();
        let program = find_executable(&self.program).ok_or_else(|| ExternalToolError::NotFound {
            command_line: command_line.clone(),
        })?;
        tracing::debug!(command = %command_line, program = %program.display(), "running");

        let mut cmd = Command::new(&program);
        cmd.args(&self.args)
            .envs(&self.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|source| ExternalToolError::Spawn {
            command_line: command_line.clone(),
            source,
        })?;

        // Both pipes are read while we wait, or a full pipe stalls the child.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match self.timeout {
            Some(timeout) => match child.wait_timeout(timeout) {
                Ok(Some(status)) => status,
                Ok(None) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(ExternalToolError::TimedOut {
                        command_line,
                        timeout,
                    });
                }
                Err(source) => return Err(ExternalToolError::Spawn { command_line, source }),
            },
            None => child
                .wait()
                .map_err(|source| ExternalToolError::Spawn {
                    command_line: command_line.clone(),
                    source,
                })?,
        };

        Ok(ProcessOutput {
            code: status.code(),
            stdout: collect(stdout, &command_line)?,
            stderr: collect(stderr, &command_line)?,
        })
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<std::io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf)?;
        }
        Ok(buf)
    })
}

fn collect(
    handle: JoinHandle<std::io::Result<Vec<u8>>>,
    command_line: &str,
) -> Result<Vec<u8>, ExternalToolError> {
    let unreadable = |reason: String| ExternalToolError::UnreadableOutput {
        command_line: command_line.to_string(),
        reason,
    };
    handle
        .join()
        .map_err(|_| unreadable("output reader panicked".to_string()))?
        .map_err(|e| unreadable(e.to_string()))
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code; `None` when the process was ended by a signal.
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Require a zero exit, turning anything else into
    /// `ExternalToolError::Failed` for `command_line`.
    pub fn check(self, command_line: &str) -> Result<Self, ExternalToolError> {
        if self.success() {
            return Ok(self);
        }
        Err(ExternalToolError::Failed {
            command_line: command_line.to_string(),
            code: self.code,
            stderr: String::from_utf8_lossy(&self.stderr).into_owned(),
        })
    }

    /// Stdout as UTF-8 text.
    pub fn stdout_text(&self, command_line: &str) -> Result<&str, ExternalToolError> {
        std::str::from_utf8(&self.stdout).map_err(|e| ExternalToolError::UnreadableOutput {
            command_line: command_line.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Seam between config-tool adapters and the operating system.
pub trait ProcessRunner: std::fmt::Debug {
    fn run(&self, process: &ProcessBuilder) -> Result<ProcessOutput, ExternalToolError>;
}

/// Runs processes for real.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, process: &ProcessBuilder) -> Result<ProcessOutput, ExternalToolError> {
        process.exec()
    }
}

/// Find an executable in PATH. Paths with a directory part are checked
/// as given.
pub fn find_executable(name: impl AsRef<OsStr>) -> Option<PathBuf> {
    which::which(name).ok()
}
