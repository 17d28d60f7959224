//! Suite behaviour with in-process toolchains.

use std::path::PathBuf;
use std::sync::Mutex;

use godiff::{
    BinaryOp, FailedSides, GeneratorConfig, InProcessToolchain, Output, Program,
    ProgramGenerator, Suite, SuiteSummary, SyntaxCheckToolchain, ToolchainError, ValueKind,
    Verdict, run_cycle, run_parallel,
};

fn constant(name: &str, stdout: &'static str) -> impl godiff::Toolchain {
    InProcessToolchain::new(name, move |_: &Program, _: &godiff::ScratchDir| {
        Ok(Output::stdout(stdout))
    })
}

fn program(seed: u64) -> Program {
    ProgramGenerator::seeded(GeneratorConfig::default(), seed)
        .unwrap()
        .generate_program()
}

#[test]
fn mismatch_keeps_both_outputs() {
    let left = constant("left", "7\n");
    let right = constant("right", "8\n");
    let report = run_cycle(0, program(1), &left, &right, None).unwrap();

    assert_eq!(report.verdict, Verdict::Mismatch);
    assert_eq!(report.left.result.as_ref().unwrap().stdout, b"7\n");
    assert_eq!(report.right.result.as_ref().unwrap().stdout, b"8\n");
    assert_eq!(report.failed_sides(), None);
}

#[test]
fn identical_output_matches() {
    let left = constant("left", "3\n");
    let right = constant("right", "3\n");
    let report = run_cycle(0, program(2), &left, &right, None).unwrap();
    assert_eq!(report.verdict, Verdict::Match);
}

#[test]
fn build_failure_is_inconclusive_and_suite_continues() {
    let left = constant("left", "1\n");
    let right = InProcessToolchain::new("right", |_: &Program, _: &godiff::ScratchDir| {
        Err(ToolchainError::Build {
            code: Some(2),
            stderr: b"declared and not used: a4\n".to_vec(),
        })
    });
    let generator = ProgramGenerator::seeded(GeneratorConfig::default(), 3).unwrap();

    let mut summary = SuiteSummary::default();
    let mut seen = 0;
    for result in Suite::new(4, generator, &left, &right) {
        let report = result.unwrap();
        assert_eq!(report.verdict, Verdict::Inconclusive);
        assert_eq!(report.failed_sides(), Some(FailedSides::Right));
        let err = report.right.result.as_ref().unwrap_err();
        assert!(String::from_utf8_lossy(err.stderr()).contains("a4"));
        summary.add(&Ok(report));
        seen += 1;
    }
    assert_eq!(seen, 4);
    assert_eq!(summary.inconclusive, 4);
    assert!(!summary.has_mismatch());
}

#[test]
fn both_sides_run_when_left_fails() {
    let left = InProcessToolchain::new("left", |_: &Program, _: &godiff::ScratchDir| {
        Err(ToolchainError::Rejected("nope".into()))
    });
    let right = constant("right", "ok\n");
    let report = run_cycle(0, program(4), &left, &right, None).unwrap();
    assert_eq!(report.failed_sides(), Some(FailedSides::Left));
    assert!(report.right.result.is_ok());
}

#[test]
fn scratch_removed_on_success_and_failure() {
    let seen: Mutex<Vec<PathBuf>> = Mutex::new(Vec::new());
    let recording = InProcessToolchain::new("record", |_: &Program, scratch: &godiff::ScratchDir| {
        assert!(scratch.source_path().is_file());
        seen.lock().unwrap().push(scratch.path().to_path_buf());
        Ok(Output::stdout("x\n"))
    });
    let failing = InProcessToolchain::new("fail", |_: &Program, scratch: &godiff::ScratchDir| {
        seen.lock().unwrap().push(scratch.path().to_path_buf());
        Err(ToolchainError::Run {
            code: Some(2),
            stderr: b"panic: runtime error: integer divide by zero\n".to_vec(),
        })
    });

    let root = tempfile::tempdir().unwrap();
    let generator = ProgramGenerator::seeded(GeneratorConfig::default(), 5).unwrap();
    let results: Vec<_> = Suite::new(3, generator, &recording, &failing)
        .with_scratch_root(root.path())
        .collect();

    assert_eq!(results.len(), 3);
    let seen = seen.into_inner().unwrap();
    assert_eq!(seen.len(), 6);
    for path in &seen {
        assert!(path.starts_with(root.path()));
        assert!(!path.exists(), "{} left behind", path.display());
    }
}

#[test]
fn source_written_before_execution() {
    let toolchain = InProcessToolchain::new("read", |program: &Program, scratch: &godiff::ScratchDir| {
        let text = std::fs::read_to_string(scratch.source_path()).map_err(|source| {
            ToolchainError::Launch {
                command: "read".into(),
                source,
            }
        })?;
        assert_eq!(text, program.source());
        Ok(Output::stdout(text))
    });
    let report = run_cycle(0, program(6), &toolchain, &toolchain, None).unwrap();
    assert_eq!(report.verdict, Verdict::Match);
}

#[test]
fn missing_scratch_root_skips_cycle() {
    let root = tempfile::tempdir().unwrap();
    let missing = root.path().join("does-not-exist");
    let left = constant("left", "1\n");
    let generator = ProgramGenerator::seeded(GeneratorConfig::default(), 7).unwrap();

    let results: Vec<_> = Suite::new(2, generator, &left, &left)
        .with_scratch_root(&missing)
        .collect();
    assert_eq!(results.len(), 2);

    let mut summary = SuiteSummary::default();
    for (i, result) in results.iter().enumerate() {
        assert_eq!(result.as_ref().unwrap_err().index(), i);
        summary.add(result);
    }
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.total(), 2);
}

#[test]
fn suite_is_lazy_and_sized() {
    let left = SyntaxCheckToolchain::new("left");
    let right = SyntaxCheckToolchain::new("right");
    let generator = ProgramGenerator::seeded(GeneratorConfig::default(), 8).unwrap();

    let mut suite = Suite::new(5, generator, &left, &right);
    assert_eq!(suite.len(), 5);
    let first = suite.next().unwrap().unwrap();
    assert_eq!(first.index, 0);
    assert_eq!(first.verdict, Verdict::Match);
    assert_eq!(suite.len(), 4);
    assert_eq!(suite.count(), 4);
}

#[test]
fn same_seed_same_programs() {
    let left = SyntaxCheckToolchain::new("left");
    let right = SyntaxCheckToolchain::new("right");
    let config = GeneratorConfig::default()
        .with_kinds([ValueKind::Int])
        .with_operators([BinaryOp::Add]);

    let sources = |seed| -> Vec<String> {
        let generator = ProgramGenerator::seeded(config.clone(), seed).unwrap();
        Suite::new(4, generator, &left, &right)
            .map(|r| r.unwrap().program.source().to_string())
            .collect()
    };
    assert_eq!(sources(9), sources(9));
    assert_ne!(sources(9), sources(10));
}

#[test]
fn parallel_matches_sequential() {
    let left = SyntaxCheckToolchain::new("left");
    let right = SyntaxCheckToolchain::new("right");

    let mut generator = ProgramGenerator::seeded(GeneratorConfig::default(), 12).unwrap();
    let programs: Vec<Program> = (0..8).map(|_| generator.generate_program()).collect();
    let expected: Vec<String> = programs.iter().map(|p| p.source().to_string()).collect();

    let results = run_parallel(programs, &left, &right, 4, None).unwrap();
    assert_eq!(results.len(), 8);
    for (i, result) in results.iter().enumerate() {
        let report = result.as_ref().unwrap();
        assert_eq!(report.index, i);
        assert_eq!(report.program.source(), expected[i]);
        assert_eq!(report.verdict, Verdict::Match);
    }

    let sequential = ProgramGenerator::seeded(GeneratorConfig::default(), 12).unwrap();
    let sequential: Vec<String> = Suite::new(8, sequential, &left, &right)
        .map(|r| r.unwrap().program.source().to_string())
        .collect();
    assert_eq!(sequential, expected);
}
