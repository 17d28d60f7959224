//! Run command.

use std::path::Path;
use std::time::Duration;

use godiff::report::{format_cycle, format_skipped, format_summary};
use godiff::{
    CycleError, CycleReport, GeneratorConfig, ProgramGenerator, Suite, SuiteSummary,
    SyntaxCheckToolchain, Toolchain, run_parallel,
};
use tracing::{error, info};

use crate::cli::{
    BinaryArgs, EXIT_FAILURE, EXIT_SUCCESS, EXIT_USAGE, GeneratorArgs, ToolchainArg,
};
use crate::terminal::{self, Progress};

/// Resolved `run` arguments.
pub struct RunOptions<'a> {
    pub generator: &'a GeneratorArgs,
    pub binaries: &'a BinaryArgs,
    pub iterations: usize,
    pub seed: u64,
    pub left: ToolchainArg,
    pub right: ToolchainArg,
    pub timeout_secs: u64,
    pub jobs: usize,
    pub dry_run: bool,
    pub fail_on_mismatch: bool,
    pub show_program: bool,
    pub scratch_dir: Option<&'a Path>,
    pub quiet: bool,
}

fn build_toolchain(preset: ToolchainArg, opts: &RunOptions<'_>) -> Box<dyn Toolchain> {
    if opts.dry_run {
        Box::new(SyntaxCheckToolchain::new(preset.name()))
    } else {
        Box::new(
            preset
                .toolchain(opts.binaries)
                .with_timeout(Duration::from_secs(opts.timeout_secs)),
        )
    }
}

/// Handle the `run` command.
pub fn cmd_run(opts: &RunOptions<'_>) -> i32 {
    let generator = match ProgramGenerator::seeded(GeneratorConfig::from(opts.generator), opts.seed)
    {
        Ok(g) => g,
        Err(e) => {
            error!(error = %e, "invalid generator configuration");
            return EXIT_USAGE;
        }
    };
    if opts.timeout_secs == 0 {
        error!("--timeout must be at least 1 second");
        return EXIT_USAGE;
    }

    let left = build_toolchain(opts.left, opts);
    let right = build_toolchain(opts.right, opts);

    if !opts.quiet {
        terminal::info(&format!(
            "{} cycles, {} vs {}, seed {}{}",
            opts.iterations,
            left.name(),
            right.name(),
            opts.seed,
            if opts.dry_run { " (dry run)" } else { "" }
        ));
    }
    info!(
        iterations = opts.iterations,
        seed = opts.seed,
        left = left.name(),
        right = right.name(),
        "starting suite"
    );

    let summary = if opts.jobs == 1 {
        run_sequential(opts, generator, left.as_ref(), right.as_ref())
    } else {
        let mut generator = generator;
        let programs = (0..opts.iterations)
            .map(|_| generator.generate_program())
            .collect();
        match run_parallel(
            programs,
            left.as_ref(),
            right.as_ref(),
            opts.jobs,
            opts.scratch_dir,
        ) {
            Ok(results) => {
                let mut summary = SuiteSummary::default();
                for result in &results {
                    print_result(result, opts);
                    summary.add(result);
                }
                summary
            }
            Err(e) => {
                error!(error = %e, "parallel run failed");
                return EXIT_FAILURE;
            }
        }
    };

    print!("{}", format_summary(&summary));
    if summary.has_mismatch() {
        terminal::warning(&format!(
            "{} mismatch(es); rerun with --seed {} to reproduce",
            summary.mismatched, opts.seed
        ));
        if opts.fail_on_mismatch {
            return EXIT_FAILURE;
        }
    }
    EXIT_SUCCESS
}

fn run_sequential<R: rand::Rng>(
    opts: &RunOptions<'_>,
    generator: ProgramGenerator<R>,
    left: &dyn Toolchain,
    right: &dyn Toolchain,
) -> SuiteSummary {
    let mut suite = Suite::new(opts.iterations, generator, left, right);
    if let Some(dir) = opts.scratch_dir {
        suite = suite.with_scratch_root(dir);
    }

    let progress = Progress::new(opts.iterations as u64, "Comparing");
    let mut summary = SuiteSummary::default();
    for result in suite {
        progress.suspend(|| print_result(&result, opts));
        summary.add(&result);
        progress.inc(1);
    }
    progress.finish();
    summary
}

fn print_result(result: &Result<CycleReport, CycleError>, opts: &RunOptions<'_>) {
    match result {
        Ok(report) => print!(
            "{}",
            format_cycle(report, opts.iterations, opts.show_program)
        ),
        Err(e) => print!("{}", format_skipped(e, opts.iterations)),
    }
}
