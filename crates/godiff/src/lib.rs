//! godiff - differential tester for Go toolchains
//!
//! Generates random Go programs, runs each through two toolchains, and flags
//! programs whose standard output differs.
//!
//! # Example
//!
//! ```ignore
//! use godiff::{CommandToolchain, GeneratorConfig, ProgramGenerator, Suite};
//!
//! let go = CommandToolchain::go("go");
//! let gccgo = CommandToolchain::gccgo("gccgo");
//! let generator = ProgramGenerator::seeded(GeneratorConfig::default(), 42)?;
//! for cycle in Suite::new(10, generator, &go, &gccgo) {
//!     println!("{:?}", cycle.map(|report| report.verdict));
//! }
//! ```

pub use godiff_gen::{
    BinaryOp, GeneratorConfig, GeneratorError, Operand, Program, ProgramGenerator, StatementSpec,
    ValueKind, syntax,
};

mod error;
pub mod metrics;
pub mod report;
pub mod runner;
pub mod scratch;
pub mod toolchain;

pub use error::{Error, Result};
pub use runner::{
    CycleError, CycleReport, CycleState, Execution, FailedSides, Suite, SuiteSummary, Verdict,
    classify, run_cycle, run_parallel,
};
pub use scratch::ScratchDir;
pub use toolchain::{
    CommandStep, CommandToolchain, ExecutionResult, InProcessToolchain, Output,
    SyntaxCheckToolchain, Toolchain, ToolchainError,
};
