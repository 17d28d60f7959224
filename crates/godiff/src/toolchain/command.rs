//! Process-backed toolchains.
//!
//! Stdout and stderr of every step go to files in the scratch directory, so a
//! chatty child can never block on a full pipe while we poll for its exit.

use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use godiff_gen::Program;
use tracing::{debug, info_span};

use super::{ExecutionResult, Output, Toolchain, ToolchainError};
use crate::scratch::ScratchDir;

/// Default per-step timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// One process invocation.
///
/// `{src}` and `{out}` in the program or any argument are replaced with the
/// scratch source file and artifact paths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandStep {
    program: String,
    args: Vec<String>,
}

impl CommandStep {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    fn expand(template: &str, scratch: &ScratchDir) -> String {
        template
            .replace("{src}", &scratch.source_path().to_string_lossy())
            .replace("{out}", &scratch.artifact_path().to_string_lossy())
    }

    /// The command line with placeholders substituted.
    #[must_use]
    pub fn render(&self, scratch: &ScratchDir) -> Vec<String> {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|part| Self::expand(part, scratch))
            .collect()
    }
}

/// A toolchain driven by external processes.
///
/// Interpreter-style toolchains have only a run step. Ahead-of-time toolchains
/// add a build step that writes `{out}`, then run the artifact.
#[derive(Clone, Debug)]
pub struct CommandToolchain {
    name: String,
    build: Option<CommandStep>,
    run: CommandStep,
    timeout: Duration,
}

impl CommandToolchain {
    pub fn new(name: impl Into<String>, build: Option<CommandStep>, run: CommandStep) -> Self {
        Self {
            name: name.into(),
            build,
            run,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// The gc toolchain: `go run {src}`.
    #[must_use]
    pub fn go(binary: &str) -> Self {
        Self::new("go", None, CommandStep::new(binary, ["run", "{src}"]))
    }

    /// gccgo: `gccgo {src} -o {out} -static-libgo`, then `{out}`.
    #[must_use]
    pub fn gccgo(binary: &str) -> Self {
        Self::new(
            "gccgo",
            Some(CommandStep::new(
                binary,
                ["{src}", "-o", "{out}", "-static-libgo"],
            )),
            CommandStep::new("{out}", std::iter::empty::<String>()),
        )
    }

    /// Set the timeout applied to each step.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run one step, returning its exit status and captured output.
    fn run_step(
        &self,
        step: &CommandStep,
        stage: &str,
        scratch: &ScratchDir,
    ) -> Result<(ExitStatus, Output), ToolchainError> {
        let argv = step.render(scratch);
        let command_line = argv.join(" ");
        let _span = info_span!("step", toolchain = %self.name, stage).entered();
        debug!(command = %command_line, "spawning");

        let launch_error = |source| ToolchainError::Launch {
            command: command_line.clone(),
            source,
        };

        let stdout_path = scratch.path().join(format!("{}-{stage}.stdout", self.name));
        let stderr_path = scratch.path().join(format!("{}-{stage}.stderr", self.name));
        let stdout = File::create(&stdout_path).map_err(launch_error)?;
        let stderr = File::create(&stderr_path).map_err(launch_error)?;

        let mut cmd = Command::new(&argv[0]);
        cmd.args(&argv[1..])
            .current_dir(scratch.path())
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr);

        let status = match run_with_timeout(&mut cmd, self.timeout) {
            Ok(status) => status,
            Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                return Err(ToolchainError::Timeout {
                    command: command_line.clone(),
                    timeout: self.timeout,
                });
            }
            Err(e) => return Err(launch_error(e)),
        };

        let output = Output {
            stdout: read_capture(&stdout_path)?,
            stderr: read_capture(&stderr_path)?,
        };
        debug!(%status, stdout_bytes = output.stdout.len(), "step finished");
        Ok((status, output))
    }
}

impl Toolchain for CommandToolchain {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, _program: &Program, scratch: &ScratchDir) -> ExecutionResult {
        if let Some(build) = &self.build {
            let (status, output) = self.run_step(build, "build", scratch)?;
            if !status.success() {
                return Err(ToolchainError::Build {
                    code: status.code(),
                    stderr: output.stderr,
                });
            }
        }

        let (status, output) = self.run_step(&self.run, "run", scratch)?;
        if !status.success() {
            // `go run` reports compile errors through the run step.
            return Err(ToolchainError::Run {
                code: status.code(),
                stderr: output.stderr,
            });
        }
        Ok(output)
    }
}

fn read_capture(path: &Path) -> Result<Vec<u8>, ToolchainError> {
    fs::read(path).map_err(|source| ToolchainError::Capture {
        path: path.to_path_buf(),
        source,
    })
}

/// Spawn `cmd` in its own process group and wait for it.
///
/// Once `timeout` elapses the whole group is killed, so helpers forked by a
/// driver such as `go run` die with it. A timeout is reported as an
/// `ErrorKind::TimedOut` error.
pub fn run_with_timeout(cmd: &mut Command, timeout: Duration) -> io::Result<ExitStatus> {
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }
    let mut child = cmd.spawn()?;
    let deadline = Instant::now() + timeout;

    while Instant::now() < deadline {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        std::thread::sleep(POLL_INTERVAL);
    }

    kill_group(&mut child);
    let _ = child.wait();
    Err(io::Error::new(
        io::ErrorKind::TimedOut,
        format!("no exit after {timeout:?}"),
    ))
}

#[cfg(unix)]
fn kill_group(child: &mut Child) {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    #[allow(clippy::cast_possible_wrap)]
    let group = Pid::from_raw(child.id() as i32);
    if let Err(e) = killpg(group, Signal::SIGKILL) {
        debug!(pid = child.id(), error = %e, "killpg failed, killing leader only");
        let _ = child.kill();
    }
}

#[cfg(not(unix))]
fn kill_group(child: &mut Child) {
    let _ = child.kill();
}
