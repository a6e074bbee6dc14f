//! Command syntax tree.

use std::fmt;

use dna_core::dataset::Value;

/// A parsed command: the operations applied to `df`, left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    pub column: String,
    pub descending: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Keep rows where the predicate is true.
    Filter(Expr),
    Select(Vec<String>),
    Drop(Vec<String>),
    /// `(old, new)` pairs.
    Rename(Vec<(String, String)>),
    /// Add or replace a column.
    Derive { name: String, expr: Expr },
    Sort(Vec<SortKey>),
    Head(usize),
    /// Drop rows with a null in any listed column (all columns if empty).
    DropNa(Vec<String>),
    /// Replace nulls in the listed columns (all columns if empty).
    FillNa { value: Value, columns: Vec<String> },
    /// Keep the first row for each distinct key (whole row if empty).
    Distinct(Vec<String>),
    /// Use the first row as column names and drop it.
    PromoteHeader,
}

impl Operation {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Filter(_) => "filter",
            Self::Select(_) => "select",
            Self::Drop(_) => "drop",
            Self::Rename(_) => "rename",
            Self::Derive { .. } => "derive",
            Self::Sort(_) => "sort",
            Self::Head(_) => "head",
            Self::DropNa(_) => "dropna",
            Self::FillNa { .. } => "fillna",
            Self::Distinct(_) => "distinct",
            Self::PromoteHeader => "promote_header",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::And => "and",
            Self::Or => "or",
        })
    }
}

/// Whitelisted scalar functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Lower,
    Upper,
    Trim,
    Len,
    Contains,
    StartsWith,
    EndsWith,
    Abs,
    Round,
    IsNull,
    Coalesce,
}

impl Function {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "lower" => Self::Lower,
            "upper" => Self::Upper,
            "trim" | "strip" => Self::Trim,
            "len" | "length" => Self::Len,
            "contains" => Self::Contains,
            "starts_with" | "startswith" => Self::StartsWith,
            "ends_with" | "endswith" => Self::EndsWith,
            "abs" => Self::Abs,
            "round" => Self::Round,
            "is_null" | "isnull" | "isna" => Self::IsNull,
            "coalesce" => Self::Coalesce,
            _ => return None,
        })
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Lower => "lower",
            Self::Upper => "upper",
            Self::Trim => "trim",
            Self::Len => "len",
            Self::Contains => "contains",
            Self::StartsWith => "starts_with",
            Self::EndsWith => "ends_with",
            Self::Abs => "abs",
            Self::Round => "round",
            Self::IsNull => "is_null",
            Self::Coalesce => "coalesce",
        }
    }

    /// Accepted argument count as `(min, max)`; `None` means unbounded.
    #[must_use]
    pub const fn arity(self) -> (usize, Option<usize>) {
        match self {
            Self::Lower | Self::Upper | Self::Trim | Self::Len | Self::Abs | Self::IsNull => {
                (1, Some(1))
            }
            Self::Contains | Self::StartsWith | Self::EndsWith => (2, Some(2)),
            Self::Round => (1, Some(2)),
            Self::Coalesce => (1, None),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Column(String),
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        func: Function,
        args: Vec<Expr>,
    },
}
