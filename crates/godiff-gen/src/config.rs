//! Generator configuration.

use crate::error::GeneratorError;
use crate::kind::{BinaryOp, ValueKind};

/// Tunables for program synthesis.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorConfig {
    /// Fewest statements in a program (inclusive).
    pub min_statements: usize,
    /// Most statements in a program (inclusive).
    pub max_statements: usize,
    /// Kinds drawn from, uniformly.
    pub kinds: Vec<ValueKind>,
    /// Operators drawn from, uniformly.
    pub operators: Vec<BinaryOp>,
    /// Identifiers are `a0 .. a{identifier_space - 1}`, shared across the program.
    pub identifier_space: u32,
    /// Integer operands are drawn from `[0, int_bound)`.
    pub int_bound: u32,
    /// Float operands are drawn from `[0, float_bound)`.
    pub float_bound: f64,
    /// Length of each text operand.
    pub text_len: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_statements: 5,
            max_statements: 20,
            kinds: ValueKind::ALL.to_vec(),
            operators: BinaryOp::ALL.to_vec(),
            identifier_space: 100,
            int_bound: 100,
            float_bound: 100.0,
            text_len: 5,
        }
    }
}

impl GeneratorConfig {
    /// Set the inclusive statement count range.
    #[must_use]
    pub const fn with_statements(mut self, min: usize, max: usize) -> Self {
        self.min_statements = min;
        self.max_statements = max;
        self
    }

    /// Restrict the value kinds.
    #[must_use]
    pub fn with_kinds(mut self, kinds: impl Into<Vec<ValueKind>>) -> Self {
        self.kinds = kinds.into();
        self
    }

    /// Restrict the operators.
    #[must_use]
    pub fn with_operators(mut self, operators: impl Into<Vec<BinaryOp>>) -> Self {
        self.operators = operators.into();
        self
    }

    /// Set the identifier namespace size.
    #[must_use]
    pub const fn with_identifier_space(mut self, space: u32) -> Self {
        self.identifier_space = space;
        self
    }

    /// Check that every draw has a non-empty domain.
    ///
    /// # Errors
    ///
    /// Returns the first constraint that does not hold.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.min_statements > self.max_statements {
            return Err(GeneratorError::EmptyStatementRange {
                min: self.min_statements,
                max: self.max_statements,
            });
        }
        if self.kinds.is_empty() {
            return Err(GeneratorError::NoKinds);
        }
        if self.operators.is_empty() {
            return Err(GeneratorError::NoOperators);
        }
        if self.identifier_space == 0 {
            return Err(GeneratorError::EmptyIdentifierSpace);
        }
        if self.int_bound == 0 {
            return Err(GeneratorError::EmptyIntRange);
        }
        if !(self.float_bound.is_finite() && self.float_bound > 0.0) {
            return Err(GeneratorError::InvalidFloatBound(self.float_bound));
        }
        Ok(())
    }
}
