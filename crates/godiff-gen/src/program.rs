//! Rendered programs.

use std::fmt;

use crate::statement::StatementSpec;

/// Everything before the first statement.
pub const PRELUDE: &str = "package main\n\nimport (\n\"fmt\"\n)\n\nfunc main() {\n";

/// Everything after the last statement.
pub const EPILOGUE: &str = "}\n";

/// A generated program: its statements and their rendered Go source.
///
/// The source is rendered once on construction and never changes.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    statements: Vec<StatementSpec>,
    source: String,
}

impl Program {
    /// Render `statements` inside the fixed boilerplate.
    #[must_use]
    pub fn new(statements: Vec<StatementSpec>) -> Self {
        let mut source = String::with_capacity(PRELUDE.len() + EPILOGUE.len() + statements.len() * 40);
        source.push_str(PRELUDE);
        for stmt in &statements {
            stmt.render_into(&mut source);
        }
        source.push_str(EPILOGUE);
        Self { statements, source }
    }

    #[must_use]
    pub fn statements(&self) -> &[StatementSpec] {
        &self.statements
    }

    /// Complete Go source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of statements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
