//! Seeded program generator.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::GeneratorConfig;
use crate::error::GeneratorError;
use crate::kind::ValueKind;
use crate::program::Program;
use crate::statement::{Operand, StatementSpec};

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generates random programs from an owned random source.
///
/// Generation is a pure function of the configuration and the random stream:
/// two generators with the same config and the same seed produce identical
/// program sequences.
#[derive(Debug)]
pub struct ProgramGenerator<R: Rng = StdRng> {
    config: GeneratorConfig,
    rng: R,
}

impl ProgramGenerator<StdRng> {
    /// Create a generator driven by a `StdRng` seeded with `seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn seeded(config: GeneratorConfig, seed: u64) -> Result<Self, GeneratorError> {
        Self::new(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ProgramGenerator<R> {
    /// Create a generator drawing from `rng`.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn new(config: GeneratorConfig, rng: R) -> Result<Self, GeneratorError> {
        config.validate()?;
        Ok(Self { config, rng })
    }

    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate one program with a uniformly drawn statement count.
    pub fn generate_program(&mut self) -> Program {
        let count = self
            .rng
            .gen_range(self.config.min_statements..=self.config.max_statements);
        let statements = (0..count).map(|_| self.generate_statement()).collect();
        Program::new(statements)
    }

    /// Generate one statement.
    ///
    /// Draw order: kind, operator, both operands, bound identifier, printed identifier.
    pub fn generate_statement(&mut self) -> StatementSpec {
        let kind = self.config.kinds[self.rng.gen_range(0..self.config.kinds.len())];
        let op = self.config.operators[self.rng.gen_range(0..self.config.operators.len())];
        let lhs = self.operand(kind);
        let rhs = self.operand(kind);
        let binding = self.identifier();
        let printed = self.identifier();
        StatementSpec {
            kind,
            op,
            lhs,
            rhs,
            binding,
            printed,
        }
    }

    fn operand(&mut self, kind: ValueKind) -> Operand {
        match kind {
            ValueKind::Int => Operand::Int(self.rng.gen_range(0..self.config.int_bound)),
            ValueKind::Float => Operand::Float(self.rng.gen_range(0.0..self.config.float_bound)),
            ValueKind::Text => Operand::Text(self.text()),
        }
    }

    fn text(&mut self) -> String {
        (0..self.config.text_len)
            .map(|_| char::from(LETTERS[self.rng.gen_range(0..LETTERS.len())]))
            .collect()
    }

    fn identifier(&mut self) -> u32 {
        self.rng.gen_range(0..self.config.identifier_space)
    }
}
