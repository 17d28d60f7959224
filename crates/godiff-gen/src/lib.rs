//! Random Go program synthesis for differential toolchain testing.
//!
//! A generated program is a flat list of statements inside `func main()`.
//! Each statement binds `aN := x op y` and then prints an independently drawn
//! identifier `aM`. Nothing ties the printed name to an earlier binding, so
//! programs may reference unbound or differently-typed names. Such programs
//! are valid test inputs: two toolchains can disagree on how they reject them.
//!
//! # Example
//!
//! ```
//! use godiff_gen::{GeneratorConfig, ProgramGenerator};
//!
//! let mut generator = ProgramGenerator::seeded(GeneratorConfig::default(), 42).unwrap();
//! let program = generator.generate_program();
//! assert!(program.source().starts_with("package main"));
//! ```

mod config;
mod error;
mod generator;
mod kind;
mod program;
mod statement;
pub mod syntax;

pub use config::GeneratorConfig;
pub use error::GeneratorError;
pub use generator::ProgramGenerator;
pub use kind::{BinaryOp, ValueKind};
pub use program::{EPILOGUE, PRELUDE, Program};
pub use statement::{Operand, StatementSpec, identifier};
