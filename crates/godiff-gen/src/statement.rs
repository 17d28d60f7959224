//! A single synthesized statement.

use std::fmt::{self, Write};

use crate::kind::{BinaryOp, ValueKind};

/// Literal operand of a binding.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    Int(u32),
    Float(f64),
    /// Letters only, so the literal never needs escaping.
    Text(String),
}

impl Operand {
    /// Kind of this literal.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Text(_) => ValueKind::Text,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:.6}"),
            Self::Text(s) => write!(f, "\"{s}\""),
        }
    }
}

/// Name of identifier number `n`.
#[must_use]
pub fn identifier(n: u32) -> String {
    format!("a{n}")
}

/// A binding `a{binding} := lhs op rhs` followed by `fmt.Println(a{printed})`.
///
/// `printed` is drawn independently of `binding` and may name an identifier
/// that is never bound, or one bound to a different kind.
#[derive(Clone, Debug, PartialEq)]
pub struct StatementSpec {
    pub kind: ValueKind,
    /// Operator as drawn. See [`StatementSpec::rendered_op`].
    pub op: BinaryOp,
    pub lhs: Operand,
    pub rhs: Operand,
    pub binding: u32,
    pub printed: u32,
}

impl StatementSpec {
    /// Operator that appears in the source.
    ///
    /// Text bindings always concatenate, whatever operator was drawn.
    #[must_use]
    pub const fn rendered_op(&self) -> BinaryOp {
        match self.kind {
            ValueKind::Text => BinaryOp::Add,
            ValueKind::Int | ValueKind::Float => self.op,
        }
    }

    /// Append both lines of this statement to `out`.
    pub fn render_into(&self, out: &mut String) {
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "a{} := {} {} {}",
            self.binding,
            self.lhs,
            self.rendered_op(),
            self.rhs
        );
        let _ = writeln!(out, "fmt.Println(a{})", self.printed);
    }
}

impl fmt::Display for StatementSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.render_into(&mut out);
        f.write_str(&out)
    }
}
