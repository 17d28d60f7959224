//! Command implementations.

mod generate;
mod run;
mod toolchains;

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::info;

use crate::cli::{Cli, Commands};

/// Dispatch CLI command to the appropriate handler.
pub fn run_command(cli: &Cli) -> i32 {
    match &cli.command {
        Commands::Run { .. } => handle_run(cli),
        Commands::Generate {
            generator,
            seed,
            count,
        } => generate::cmd_generate(generator, resolve_seed(*seed), *count),
        Commands::Toolchains { binaries } => toolchains::cmd_toolchains(binaries),
    }
}

fn handle_run(cli: &Cli) -> i32 {
    let Commands::Run {
        generator,
        binaries,
        iterations,
        seed,
        left,
        right,
        timeout,
        jobs,
        dry_run,
        fail_on_mismatch,
        show_program,
        scratch_dir,
    } = &cli.command
    else {
        unreachable!("run command variant mismatch");
    };

    run::cmd_run(&run::RunOptions {
        generator,
        binaries,
        iterations: *iterations,
        seed: resolve_seed(*seed),
        left: *left,
        right: *right,
        timeout_secs: *timeout,
        jobs: *jobs,
        dry_run: *dry_run,
        fail_on_mismatch: *fail_on_mismatch,
        show_program: *show_program,
        scratch_dir: scratch_dir.as_deref(),
        quiet: cli.silent,
    })
}

/// Use the given seed, or derive one from the system clock.
fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        #[allow(clippy::cast_possible_truncation)]
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos() as u64);
        info!(seed, "no seed given, using system clock");
        seed
    })
}
