//! Differential execution of generated programs.
//!
//! A cycle writes one program to a fresh [`ScratchDir`], hands it to both
//! toolchains in order, and classifies the pair of results:
//!
//! ```text
//! Pending -> ExecutedLeft -> ExecutedRight -> Classified{Match|Mismatch|Inconclusive}
//! ```
//!
//! Failures are reported, never retried. A cycle whose scratch directory
//! cannot be prepared is skipped; the suite carries on with the next one.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use godiff_gen::{Program, ProgramGenerator};
use rand::Rng;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, info_span, warn};

use crate::metrics;
use crate::scratch::ScratchDir;
use crate::toolchain::{ExecutionResult, Toolchain};

/// Classification of one cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Both succeeded with byte-identical stdout.
    Match,
    /// Both succeeded with different stdout.
    Mismatch,
    /// At least one side failed; outputs were not compared.
    Inconclusive,
}

impl Verdict {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::Mismatch => "mismatch",
            Self::Inconclusive => "inconclusive",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress of a single cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleState {
    Pending,
    ExecutedLeft,
    ExecutedRight,
    Classified(Verdict),
}

impl fmt::Display for CycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::ExecutedLeft => write!(f, "executed-left"),
            Self::ExecutedRight => write!(f, "executed-right"),
            Self::Classified(v) => write!(f, "classified({v})"),
        }
    }
}

/// Which side(s) of an inconclusive cycle failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailedSides {
    Left,
    Right,
    Both,
}

/// Classify a pair of results.
///
/// Outputs are compared only when both sides succeeded.
#[must_use]
pub fn classify(left: &ExecutionResult, right: &ExecutionResult) -> Verdict {
    match (left, right) {
        (Ok(l), Ok(r)) if l.stdout == r.stdout => Verdict::Match,
        (Ok(_), Ok(_)) => Verdict::Mismatch,
        _ => Verdict::Inconclusive,
    }
}

/// One toolchain's result within a cycle.
#[derive(Debug)]
pub struct Execution {
    pub toolchain: String,
    pub result: ExecutionResult,
    pub elapsed: Duration,
}

impl Execution {
    fn run(toolchain: &dyn Toolchain, program: &Program, scratch: &ScratchDir) -> Self {
        let _span = info_span!("execute", toolchain = toolchain.name()).entered();
        let start = Instant::now();
        let result = toolchain.execute(program, scratch);
        let elapsed = start.elapsed();
        if let Err(e) = &result {
            debug!(error = %e, "toolchain failed");
        }
        metrics::record_execution(toolchain.name(), elapsed, result.is_err());
        Self {
            toolchain: toolchain.name().to_string(),
            result,
            elapsed,
        }
    }
}

/// Everything known about a finished cycle.
#[derive(Debug)]
pub struct CycleReport {
    pub index: usize,
    pub program: Program,
    pub left: Execution,
    pub right: Execution,
    pub verdict: Verdict,
}

impl CycleReport {
    /// Sides that failed, or `None` if both produced output.
    #[must_use]
    pub const fn failed_sides(&self) -> Option<FailedSides> {
        match (self.left.result.is_err(), self.right.result.is_err()) {
            (false, false) => None,
            (true, false) => Some(FailedSides::Left),
            (false, true) => Some(FailedSides::Right),
            (true, true) => Some(FailedSides::Both),
        }
    }
}

/// A cycle that could not run.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("cycle {index}: failed to prepare scratch directory: {source}")]
    Scratch {
        index: usize,
        #[source]
        source: std::io::Error,
    },
}

impl CycleError {
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::Scratch { index, .. } => *index,
        }
    }
}

/// Run one comparison cycle.
///
/// Both toolchains always run, so both diagnostics are kept even when the
/// first one fails. The scratch directory is gone when this returns.
///
/// # Errors
///
/// Returns [`CycleError::Scratch`] if the source file cannot be written.
pub fn run_cycle(
    index: usize,
    program: Program,
    left: &dyn Toolchain,
    right: &dyn Toolchain,
    scratch_root: Option<&Path>,
) -> Result<CycleReport, CycleError> {
    let _span = info_span!("cycle", index).entered();
    let mut state = CycleState::Pending;
    debug!(%state, statements = program.len());

    let scratch = ScratchDir::create(scratch_root, &program).map_err(|source| {
        metrics::record_skipped();
        CycleError::Scratch { index, source }
    })?;

    let left_exec = Execution::run(left, &program, &scratch);
    state = CycleState::ExecutedLeft;
    debug!(%state);

    let right_exec = Execution::run(right, &program, &scratch);
    state = CycleState::ExecutedRight;
    debug!(%state);

    let scratch_path = scratch.path().to_path_buf();
    if let Err(e) = scratch.close() {
        warn!(path = %scratch_path.display(), error = %e, "failed to remove scratch directory");
    }

    let verdict = classify(&left_exec.result, &right_exec.result);
    state = CycleState::Classified(verdict);
    debug!(%state);
    metrics::record_cycle(verdict, program.len());

    Ok(CycleReport {
        index,
        program,
        left: left_exec,
        right: right_exec,
        verdict,
    })
}

/// Lazy, strictly sequential sequence of cycles.
///
/// Cycle `i + 1` is not generated until cycle `i` has been classified.
pub struct Suite<'a, R: Rng> {
    generator: ProgramGenerator<R>,
    left: &'a dyn Toolchain,
    right: &'a dyn Toolchain,
    count: usize,
    next: usize,
    scratch_root: Option<PathBuf>,
}

impl<'a, R: Rng> Suite<'a, R> {
    pub fn new(
        count: usize,
        generator: ProgramGenerator<R>,
        left: &'a dyn Toolchain,
        right: &'a dyn Toolchain,
    ) -> Self {
        Self {
            generator,
            left,
            right,
            count,
            next: 0,
            scratch_root: None,
        }
    }

    /// Create scratch directories under `root` instead of the system temp dir.
    #[must_use]
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }
}

impl<R: Rng> Iterator for Suite<'_, R> {
    type Item = Result<CycleReport, CycleError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let index = self.next;
        self.next += 1;

        let program = self.generator.generate_program();
        let result = run_cycle(
            index,
            program,
            self.left,
            self.right,
            self.scratch_root.as_deref(),
        );
        if let Err(e) = &result {
            warn!(error = %e, "skipping cycle");
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }
}

impl<R: Rng> ExactSizeIterator for Suite<'_, R> {}

/// Run already-generated programs on a pool of `jobs` threads.
///
/// `jobs == 0` uses one thread per CPU. Every cycle gets its own scratch
/// directory. Results come back in program order.
///
/// # Errors
///
/// Returns an error if the thread pool cannot be built.
pub fn run_parallel(
    programs: Vec<Program>,
    left: &dyn Toolchain,
    right: &dyn Toolchain,
    jobs: usize,
    scratch_root: Option<&Path>,
) -> crate::Result<Vec<Result<CycleReport, CycleError>>> {
    let threads = if jobs == 0 { num_cpus::get() } else { jobs };
    info!(threads, cycles = programs.len(), "running cycles in parallel");
    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;

    let results: Vec<_> = pool.install(|| {
        programs
            .into_par_iter()
            .enumerate()
            .map(|(index, program)| {
                let result = run_cycle(index, program, left, right, scratch_root);
                if let Err(e) = &result {
                    warn!(error = %e, "skipping cycle");
                }
                result
            })
            .collect()
    });
    Ok(results)
}

/// Totals over a suite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SuiteSummary {
    pub matched: usize,
    pub mismatched: usize,
    pub inconclusive: usize,
    pub skipped: usize,
}

impl SuiteSummary {
    pub fn add(&mut self, result: &Result<CycleReport, CycleError>) {
        match result {
            Ok(report) => match report.verdict {
                Verdict::Match => self.matched += 1,
                Verdict::Mismatch => self.mismatched += 1,
                Verdict::Inconclusive => self.inconclusive += 1,
            },
            Err(_) => self.skipped += 1,
        }
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.matched + self.mismatched + self.inconclusive + self.skipped
    }

    #[must_use]
    pub const fn has_mismatch(&self) -> bool {
        self.mismatched > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolchain::{InProcessToolchain, Output, ToolchainError};
    use godiff_gen::GeneratorConfig;

    fn ok(stdout: &str) -> ExecutionResult {
        Ok(Output::stdout(stdout))
    }

    fn build_failure() -> ExecutionResult {
        Err(ToolchainError::Build {
            code: Some(2),
            stderr: b"undefined: a17".to_vec(),
        })
    }

    #[test]
    fn test_classify_match() {
        assert_eq!(classify(&ok("7\n"), &ok("7\n")), Verdict::Match);
        assert_eq!(classify(&ok(""), &ok("")), Verdict::Match);
    }

    #[test]
    fn test_classify_mismatch() {
        assert_eq!(classify(&ok("7\n"), &ok("8\n")), Verdict::Mismatch);
        assert_eq!(classify(&ok("7\n"), &ok("7")), Verdict::Mismatch);
    }

    #[test]
    fn test_classify_ignores_stderr() {
        let left = Ok(Output {
            stdout: b"1\n".to_vec(),
            stderr: b"warning".to_vec(),
        });
        assert_eq!(classify(&left, &ok("1\n")), Verdict::Match);
    }

    #[test]
    fn test_classify_inconclusive() {
        assert_eq!(classify(&ok("7\n"), &build_failure()), Verdict::Inconclusive);
        assert_eq!(classify(&build_failure(), &ok("7\n")), Verdict::Inconclusive);
        assert_eq!(
            classify(&build_failure(), &build_failure()),
            Verdict::Inconclusive
        );
    }

    fn program() -> Program {
        ProgramGenerator::seeded(GeneratorConfig::default(), 8)
            .unwrap()
            .generate_program()
    }

    #[test]
    fn test_failed_sides() {
        let left = InProcessToolchain::new("left", |_: &Program, _: &ScratchDir| ok("x"));
        let right = InProcessToolchain::new("right", |_: &Program, _: &ScratchDir| build_failure());

        let report = run_cycle(0, program(), &left, &right, None).unwrap();
        assert_eq!(report.verdict, Verdict::Inconclusive);
        assert_eq!(report.failed_sides(), Some(FailedSides::Right));

        let report = run_cycle(1, program(), &right, &left, None).unwrap();
        assert_eq!(report.failed_sides(), Some(FailedSides::Left));

        let report = run_cycle(2, program(), &right, &right, None).unwrap();
        assert_eq!(report.failed_sides(), Some(FailedSides::Both));

        let report = run_cycle(3, program(), &left, &left, None).unwrap();
        assert_eq!(report.verdict, Verdict::Match);
        assert_eq!(report.failed_sides(), None);
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = SuiteSummary::default();
        summary.add(&Err(CycleError::Scratch {
            index: 0,
            source: std::io::Error::other("disk full"),
        }));
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.total(), 1);
        assert!(!summary.has_mismatch());
    }

    #[test]
    fn test_cycle_state_display() {
        assert_eq!(CycleState::Pending.to_string(), "pending");
        assert_eq!(
            CycleState::Classified(Verdict::Mismatch).to_string(),
            "classified(mismatch)"
        );
    }
}
