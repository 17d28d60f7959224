//! Value kinds and binary operators of the statement grammar.

use std::fmt;
use std::str::FromStr;

/// Type of the literals on the right-hand side of a binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Go `int`, rendered as a decimal literal.
    Int,
    /// Go `float64`, rendered as a fixed-point literal.
    Float,
    /// Go `string`, rendered as a quoted literal.
    Text,
}

impl ValueKind {
    /// Every kind, in draw order.
    pub const ALL: &'static [Self] = &[Self::Int, Self::Float, Self::Text];

    /// Go type name for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float64",
            Self::Text => "string",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "int" | "integer" | "i" => Ok(Self::Int),
            "float" | "float64" | "f" => Ok(Self::Float),
            "string" | "text" | "str" | "s" => Ok(Self::Text),
            _ => Err(format!("unknown value kind: {s}")),
        }
    }
}

/// Binary operator placed between the two operands of a binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    /// Every operator, in draw order.
    pub const ALL: &'static [Self] = &[Self::Add, Self::Sub, Self::Mul, Self::Div];

    /// Source-level symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for BinaryOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "+" | "add" => Ok(Self::Add),
            "-" | "sub" => Ok(Self::Sub),
            "*" | "mul" => Ok(Self::Mul),
            "/" | "div" => Ok(Self::Div),
            _ => Err(format!("unknown operator: {s}")),
        }
    }
}
