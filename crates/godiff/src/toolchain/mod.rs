//! Toolchain adapters.
//!
//! A [`Toolchain`] takes a generated program to observable output. Each
//! implementation owns its own build and execution mechanics:
//! - [`CommandToolchain`]: spawns external compilers (`go run`, `gccgo`)
//! - [`SyntaxCheckToolchain`]: in-process grammar check, no toolchain needed
//! - [`InProcessToolchain`]: wraps a closure, for tests and custom adapters

mod command;
mod stub;

use std::path::PathBuf;
use std::time::Duration;

use godiff_gen::Program;
use thiserror::Error;

use crate::scratch::ScratchDir;

pub use command::{CommandStep, CommandToolchain, DEFAULT_TIMEOUT, run_with_timeout};
pub use stub::{InProcessToolchain, SyntaxCheckToolchain};

/// Captured output of a successful execution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Output {
    /// Compared byte-for-byte between toolchains.
    pub stdout: Vec<u8>,
    /// Kept for reporting only.
    pub stderr: Vec<u8>,
}

impl Output {
    /// Output with the given stdout and empty stderr.
    pub fn stdout(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: Vec::new(),
        }
    }
}

/// Failure marker for one execution.
#[derive(Debug, Error)]
pub enum ToolchainError {
    #[error("failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("build failed ({})", describe_exit(*.code))]
    Build { code: Option<i32>, stderr: Vec<u8> },

    #[error("run failed ({})", describe_exit(*.code))]
    Run { code: Option<i32>, stderr: Vec<u8> },

    #[error("`{command}` timed out after {}s", .timeout.as_secs_f64())]
    Timeout { command: String, timeout: Duration },

    #[error("failed to read captured output {}: {source}", .path.display())]
    Capture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("rejected: {0}")]
    Rejected(String),
}

fn describe_exit(code: Option<i32>) -> String {
    code.map_or_else(|| "killed by signal".to_string(), |c| format!("exit code {c}"))
}

impl ToolchainError {
    /// Diagnostic output captured from the failing step, if any.
    #[must_use]
    pub fn stderr(&self) -> &[u8] {
        match self {
            Self::Build { stderr, .. } | Self::Run { stderr, .. } => stderr,
            Self::Launch { .. }
            | Self::Timeout { .. }
            | Self::Capture { .. }
            | Self::Rejected(_) => &[],
        }
    }
}

/// Outcome of handing a program to one toolchain.
pub type ExecutionResult = std::result::Result<Output, ToolchainError>;

/// A compiler/runtime pair under test.
///
/// Implementations must be shareable across threads so that parallel cycles
/// can use one adapter instance.
pub trait Toolchain: Send + Sync {
    /// Short name used in reports and metric labels.
    fn name(&self) -> &str;

    /// Build and run `program`, whose source is already written to
    /// `scratch.source_path()`.
    ///
    /// Artifacts must stay inside `scratch`; it is removed after the cycle.
    fn execute(&self, program: &Program, scratch: &ScratchDir) -> ExecutionResult;
}

/// Find an executable in `PATH`.
///
/// Names containing a path separator are checked directly.
#[must_use]
pub fn which(binary: &str) -> Option<PathBuf> {
    if binary.contains(std::path::MAIN_SEPARATOR) {
        let path = PathBuf::from(binary);
        return path.is_file().then_some(path);
    }
    std::env::var_os("PATH").and_then(|paths| {
        std::env::split_paths(&paths)
            .map(|dir| dir.join(binary))
            .find(|full_path| full_path.is_file())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ToolchainError::Build {
            code: Some(2),
            stderr: b"main.go:8:1: a5 declared and not used".to_vec(),
        };
        assert_eq!(err.to_string(), "build failed (exit code 2)");
        assert!(err.stderr().starts_with(b"main.go"));

        let err = ToolchainError::Run {
            code: None,
            stderr: Vec::new(),
        };
        assert_eq!(err.to_string(), "run failed (killed by signal)");

        let err = ToolchainError::Timeout {
            command: "gccgo".into(),
            timeout: Duration::from_millis(1500),
        };
        assert_eq!(err.to_string(), "`gccgo` timed out after 1.5s");
    }

    #[test]
    fn test_which_missing() {
        assert!(which("godiff-definitely-not-a-binary").is_none());
        assert!(which("/nonexistent/godiff/bin").is_none());
    }
}
