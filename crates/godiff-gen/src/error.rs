use thiserror::Error;

/// Invalid generator configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeneratorError {
    #[error("statement range is empty: min {min} > max {max}")]
    EmptyStatementRange { min: usize, max: usize },
    #[error("no value kinds enabled")]
    NoKinds,
    #[error("no operators enabled")]
    NoOperators,
    #[error("identifier space must contain at least one name")]
    EmptyIdentifierSpace,
    #[error("integer operand bound must be positive")]
    EmptyIntRange,
    #[error("float operand bound must be positive and finite, got {0}")]
    InvalidFloatBound(f64),
}
