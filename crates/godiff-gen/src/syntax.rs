//! Grammar check for generated sources.
//!
//! Accepts exactly the language the generator emits: the fixed prelude, zero
//! or more binding/print line pairs, and the closing brace. Identifiers are not
//! resolved, so unbound and mistyped references pass.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::program::{EPILOGUE, PRELUDE};

static BINDING_PATTERN: OnceLock<Regex> = OnceLock::new();
static PRINT_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Where and why a source failed the grammar.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("missing package/import/main prelude")]
    MissingPrelude,
    #[error("missing closing brace of main")]
    MissingEpilogue,
    #[error("line {line}: expected binding, found `{text}`")]
    ExpectedBinding { line: usize, text: String },
    #[error("line {line}: expected print, found `{text}`")]
    ExpectedPrint { line: usize, text: String },
    #[error("line {line}: binding is not followed by a print")]
    DanglingBinding { line: usize },
}

fn binding_pattern() -> &'static Regex {
    BINDING_PATTERN.get_or_init(|| {
        Regex::new(
            r#"^a\d+ := (?:\d+ [-+*/] \d+|\d+\.\d{6} [-+*/] \d+\.\d{6}|"[A-Za-z]*" \+ "[A-Za-z]*")$"#,
        )
        .unwrap()
    })
}

fn print_pattern() -> &'static Regex {
    PRINT_PATTERN.get_or_init(|| Regex::new(r"^fmt\.Println\(a\d+\)$").unwrap())
}

/// Check `source` against the statement grammar.
///
/// Returns the number of statements on success.
///
/// # Errors
///
/// Returns the first violation, with 1-based line numbers.
pub fn check(source: &str) -> Result<usize, SyntaxError> {
    let body = source
        .strip_prefix(PRELUDE)
        .ok_or(SyntaxError::MissingPrelude)?;
    let body = body
        .strip_suffix(EPILOGUE)
        .ok_or(SyntaxError::MissingEpilogue)?;

    let first_line = PRELUDE.lines().count() + 1;
    let mut statements = 0;
    let mut lines = body.lines().enumerate().map(|(i, text)| (first_line + i, text));

    while let Some((line, text)) = lines.next() {
        if !binding_pattern().is_match(text) {
            return Err(SyntaxError::ExpectedBinding {
                line,
                text: text.to_string(),
            });
        }
        let Some((print_line, print_text)) = lines.next() else {
            return Err(SyntaxError::DanglingBinding { line });
        };
        if !print_pattern().is_match(print_text) {
            return Err(SyntaxError::ExpectedPrint {
                line: print_line,
                text: print_text.to_string(),
            });
        }
        statements += 1;
    }

    Ok(statements)
}
