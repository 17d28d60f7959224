//! Toolchains command.

use std::process::{Command, Stdio};
use std::time::Duration;

use godiff::toolchain::{run_with_timeout, which};
use tracing::debug;

use crate::cli::{BinaryArgs, EXIT_FAILURE, EXIT_SUCCESS, ToolchainArg};
use crate::terminal::{self, Spinner};

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Version flag for each preset's binary.
const fn version_flag(preset: ToolchainArg) -> &'static str {
    match preset {
        ToolchainArg::Go => "version",
        ToolchainArg::Gccgo => "--version",
    }
}

fn probe(binary: &str, flag: &str) -> bool {
    let mut cmd = Command::new(binary);
    cmd.arg(flag)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    match run_with_timeout(&mut cmd, PROBE_TIMEOUT) {
        Ok(status) => status.success(),
        Err(e) => {
            debug!(binary, error = %e, "version probe failed");
            false
        }
    }
}

/// Report each preset's binary and whether it answers a version query.
pub fn cmd_toolchains(binaries: &BinaryArgs) -> i32 {
    let mut missing = 0;
    for preset in [ToolchainArg::Go, ToolchainArg::Gccgo] {
        let binary = preset.binary(binaries);
        let Some(path) = which(binary) else {
            terminal::error(&format!("{}: `{binary}` not found in PATH", preset.name()));
            missing += 1;
            continue;
        };

        let spinner = Spinner::new(format!("Probing {}...", path.display()));
        if probe(binary, version_flag(preset)) {
            spinner.finish_with_success(&format!("{}: {}", preset.name(), path.display()));
        } else {
            spinner.finish_with_failure(&format!(
                "{}: {} does not respond to `{}`",
                preset.name(),
                path.display(),
                version_flag(preset)
            ));
            missing += 1;
        }
    }

    if missing == 0 {
        EXIT_SUCCESS
    } else {
        terminal::warning("use --dry-run to exercise the pipeline without toolchains");
        EXIT_FAILURE
    }
}
