//! Human-readable cycle reports.

use std::fmt::Write;

use console::style;

use crate::runner::{CycleError, CycleReport, Execution, SuiteSummary, Verdict};

/// Lines of captured stderr shown per failing side.
const STDERR_LINES: usize = 20;

fn indent(out: &mut String, text: &str) {
    for line in text.lines() {
        let _ = writeln!(out, "    {line}");
    }
}

fn verdict_label(verdict: Verdict) -> String {
    match verdict {
        Verdict::Match => style("MATCH").green().bold().to_string(),
        Verdict::Mismatch => style("MISMATCH").red().bold().to_string(),
        Verdict::Inconclusive => style("INCONCLUSIVE").yellow().bold().to_string(),
    }
}

fn describe_execution(out: &mut String, exec: &Execution, show_stdout: bool) {
    match &exec.result {
        Ok(output) => {
            if show_stdout {
                let _ = writeln!(out, "  {} stdout:", exec.toolchain);
                indent(out, &String::from_utf8_lossy(&output.stdout));
            }
        }
        Err(e) => {
            let _ = writeln!(out, "  {} {}", exec.toolchain, style(e).red());
            let stderr = String::from_utf8_lossy(e.stderr());
            let lines: Vec<&str> = stderr.lines().collect();
            for line in lines.iter().take(STDERR_LINES) {
                let _ = writeln!(out, "    {}", style(line).dim());
            }
            if lines.len() > STDERR_LINES {
                let _ = writeln!(out, "    ... ({} more lines)", lines.len() - STDERR_LINES);
            }
        }
    }
}

/// Render one cycle.
///
/// Mismatches always include the program and both outputs. Other verdicts
/// include the program only when `show_program` is set.
#[must_use]
pub fn format_cycle(report: &CycleReport, total: usize, show_program: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "[{}/{}] {} ({} {:.2}s, {} {:.2}s, {} statements)",
        report.index + 1,
        total,
        verdict_label(report.verdict),
        report.left.toolchain,
        report.left.elapsed.as_secs_f64(),
        report.right.toolchain,
        report.right.elapsed.as_secs_f64(),
        report.program.len(),
    );

    let mismatch = report.verdict == Verdict::Mismatch;
    if mismatch || show_program {
        let _ = writeln!(out, "  program:");
        indent(&mut out, report.program.source());
    }
    describe_execution(&mut out, &report.left, mismatch);
    describe_execution(&mut out, &report.right, mismatch);
    out
}

/// Render a skipped cycle.
#[must_use]
pub fn format_skipped(error: &CycleError, total: usize) -> String {
    format!(
        "[{}/{}] {} {error}\n",
        error.index() + 1,
        total,
        style("SKIPPED").dim().bold()
    )
}

/// Render suite totals.
#[must_use]
pub fn format_summary(summary: &SuiteSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "================================");
    let _ = writeln!(out, "{}: {}", style("MATCH").green(), summary.matched);
    let _ = writeln!(out, "{}: {}", style("MISMATCH").red(), summary.mismatched);
    let _ = writeln!(
        out,
        "{}: {}",
        style("INCONCLUSIVE").yellow(),
        summary.inconclusive
    );
    if summary.skipped > 0 {
        let _ = writeln!(out, "{}: {}", style("SKIPPED").dim(), summary.skipped);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolchain::{Output, ToolchainError};
    use godiff_gen::{GeneratorConfig, ProgramGenerator};
    use std::time::Duration;

    fn report(left: crate::ExecutionResult, right: crate::ExecutionResult) -> CycleReport {
        let program = ProgramGenerator::seeded(GeneratorConfig::default(), 4)
            .unwrap()
            .generate_program();
        let verdict = crate::classify(&left, &right);
        CycleReport {
            index: 2,
            program,
            left: Execution {
                toolchain: "go".into(),
                result: left,
                elapsed: Duration::from_millis(400),
            },
            right: Execution {
                toolchain: "gccgo".into(),
                result: right,
                elapsed: Duration::from_millis(1200),
            },
            verdict,
        }
    }

    #[test]
    fn test_mismatch_shows_both_payloads() {
        let r = report(Ok(Output::stdout("7\n")), Ok(Output::stdout("8\n")));
        let text = format_cycle(&r, 10, false);
        assert!(text.starts_with("[3/10]"));
        assert!(text.contains("MISMATCH"));
        assert!(text.contains("package main"));
        assert!(text.contains("go stdout:\n    7\n"));
        assert!(text.contains("gccgo stdout:\n    8\n"));
    }

    #[test]
    fn test_match_is_one_line() {
        let r = report(Ok(Output::stdout("1\n")), Ok(Output::stdout("1\n")));
        let text = format_cycle(&r, 10, false);
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("MATCH"));
    }

    #[test]
    fn test_inconclusive_shows_diagnostics() {
        let r = report(
            Ok(Output::stdout("1\n")),
            Err(ToolchainError::Build {
                code: Some(1),
                stderr: b"main.go:9:1: undefined: a3\n".to_vec(),
            }),
        );
        let text = format_cycle(&r, 10, false);
        assert!(text.contains("INCONCLUSIVE"));
        assert!(text.contains("build failed (exit code 1)"));
        assert!(text.contains("undefined: a3"));
        assert!(!text.contains("package main"));
    }

    #[test]
    fn test_summary() {
        let summary = SuiteSummary {
            matched: 3,
            mismatched: 1,
            inconclusive: 6,
            skipped: 0,
        };
        let text = format_summary(&summary);
        assert!(text.contains(": 3"));
        assert!(text.contains(": 6"));
        assert!(!text.contains("SKIPPED"));
    }
}
