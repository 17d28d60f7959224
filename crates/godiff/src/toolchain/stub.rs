//! In-process toolchains.

use godiff_gen::{Program, syntax};

use super::{ExecutionResult, Output, Toolchain, ToolchainError};
use crate::scratch::ScratchDir;

/// Accepts exactly the programs the generator grammar allows.
///
/// On success the output is `ok <statements>\n`, so two checkers agree on every
/// well-formed program. Useful for dry runs without a Go installation.
#[derive(Clone, Debug)]
pub struct SyntaxCheckToolchain {
    name: String,
}

impl SyntaxCheckToolchain {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for SyntaxCheckToolchain {
    fn default() -> Self {
        Self::new("syntax")
    }
}

impl Toolchain for SyntaxCheckToolchain {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, program: &Program, _scratch: &ScratchDir) -> ExecutionResult {
        syntax::check(program.source())
            .map(|count| Output::stdout(format!("ok {count}\n")))
            .map_err(|e| ToolchainError::Rejected(e.to_string()))
    }
}

/// Toolchain backed by a closure.
pub struct InProcessToolchain<F> {
    name: String,
    execute: F,
}

impl<F> InProcessToolchain<F>
where
    F: Fn(&Program, &ScratchDir) -> ExecutionResult + Send + Sync,
{
    pub fn new(name: impl Into<String>, execute: F) -> Self {
        Self {
            name: name.into(),
            execute,
        }
    }
}

impl<F> Toolchain for InProcessToolchain<F>
where
    F: Fn(&Program, &ScratchDir) -> ExecutionResult + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, program: &Program, scratch: &ScratchDir) -> ExecutionResult {
        (self.execute)(program, scratch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use godiff_gen::{GeneratorConfig, ProgramGenerator};

    #[test]
    fn test_syntax_check_accepts_generated() {
        let mut generator = ProgramGenerator::seeded(GeneratorConfig::default(), 11).unwrap();
        let toolchain = SyntaxCheckToolchain::default();
        for _ in 0..10 {
            let program = generator.generate_program();
            let scratch = ScratchDir::create(None, &program).unwrap();
            let output = toolchain.execute(&program, &scratch).unwrap();
            assert_eq!(output.stdout, format!("ok {}\n", program.len()).into_bytes());
        }
    }

    #[test]
    fn test_in_process_sees_source_file() {
        let program = ProgramGenerator::seeded(GeneratorConfig::default(), 12)
            .unwrap()
            .generate_program();
        let scratch = ScratchDir::create(None, &program).unwrap();
        let toolchain = InProcessToolchain::new("reader", |_: &Program, scratch: &ScratchDir| {
            std::fs::read(scratch.source_path())
                .map(Output::stdout)
                .map_err(|e| ToolchainError::Rejected(e.to_string()))
        });
        let output = toolchain.execute(&program, &scratch).unwrap();
        assert_eq!(output.stdout, program.source().as_bytes());
    }
}
