//! Test utilities and mocks for rigging unit tests.
//!
//! `MockRunner` stands in for the operating system when config-tool
//! contributors run external commands.
//!
//! # Example
//!
//! ```rust,ignore
//! use rigging::test_support::{MockProcessOutput, MockRunner};
//!
//! let runner = Arc::new(MockRunner::new());
//! runner.expect("sdl2-config --cflags", MockProcessOutput::success("-I/usr/include/SDL2"));
//! let sdl = SdlConfig::new().with_runner(runner.clone());
//! ```

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::util::errors::ExternalToolError;
use crate::util::process::{ProcessBuilder, ProcessOutput, ProcessRunner};

/// Mock process output for testing command execution.
#[derive(Debug, Clone)]
pub struct MockProcessOutput {
    /// Exit status code (0 = success).
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl MockProcessOutput {
    /// Create a successful output with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        MockProcessOutput {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Create a failure output with the given stderr and status code.
    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    fn to_output(&self) -> ProcessOutput {
        ProcessOutput {
            code: Some(self.status),
            stdout: self.stdout.clone().into_bytes(),
            stderr: self.stderr.clone().into_bytes(),
        }
    }
}

/// Pattern for matching command lines in `MockRunner`.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
    /// Match using a regex pattern.
    Regex(String),
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
            CommandPattern::Regex(pattern) => regex::Regex::new(pattern)
                .map(|re| re.is_match(cmd))
                .unwrap_or(false),
        }
    }
}

#[derive(Debug)]
struct Expectation {
    pattern: CommandPattern,
    output: MockProcessOutput,
}

#[derive(Debug, Default)]
struct State {
    expectations: Vec<Expectation>,
    calls: Vec<String>,
    last_env: BTreeMap<String, String>,
}

/// Scripted process runner.
///
/// Command lines are matched against expectations in insertion order.
/// A command line with no matching expectation behaves like a missing
/// executable and fails with `ExternalToolError::NotFound`.
#[derive(Debug, Default)]
pub struct MockRunner {
    state: Mutex<State>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an expectation for an exact command match.
    pub fn expect(&self, cmd: &str, output: MockProcessOutput) -> &Self {
        self.expect_pattern(CommandPattern::Exact(cmd.to_string()), output)
    }

    /// Add an expectation for a custom pattern.
    pub fn expect_pattern(&self, pattern: CommandPattern, output: MockProcessOutput) -> &Self {
        self.lock().expectations.push(Expectation { pattern, output });
        self
    }

    /// Every command line run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Environment overrides of the most recent run.
    pub fn last_env(&self) -> BTreeMap<String, String> {
        self.lock().last_env.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ProcessRunner for MockRunner {
    fn run(&self, process: &ProcessBuilder) -> Result<ProcessOutput, ExternalToolError> {
        let command_line = process.display_command();
        let mut state = self.lock();
        state.calls.push(command_line.clone());
        state.last_env = process.get_env().clone();

        state
            .expectations
            .iter()
            .find(|exp| exp.pattern.matches(&command_line))
            .map(|exp| exp.output.to_output())
            .ok_or(ExternalToolError::NotFound { command_line })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_runner_patterns() {
        let runner = MockRunner::new();
        runner
            .expect("tool --version", MockProcessOutput::success("1.0"))
            .expect_pattern(
                CommandPattern::Regex(r"^tool --libs( --static)?$".to_string()),
                MockProcessOutput::success("-lfoo"),
            )
            .expect_pattern(
                CommandPattern::StartsWith("tool --cflags".to_string()),
                MockProcessOutput::failure(1, "nope"),
            );

        let out = runner.run(&ProcessBuilder::new("tool").arg("--version")).unwrap();
        assert_eq!(out.stdout, b"1.0");

        let out = runner
            .run(&ProcessBuilder::new("tool").args(["--libs", "--static"]))
            .unwrap();
        assert_eq!(out.stdout, b"-lfoo");

        let out = runner
            .run(&ProcessBuilder::new("tool").args(["--cflags", "x"]))
            .unwrap();
        assert_eq!(out.code, Some(1));

        let err = runner.run(&ProcessBuilder::new("other")).unwrap_err();
        assert!(matches!(err, ExternalToolError::NotFound { .. }));
        assert_eq!(runner.calls().len(), 4);
    }
}
