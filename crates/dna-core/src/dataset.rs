//! In-memory tabular model.
//!
//! A [`Dataset`] is a rectangular table: an ordered list of typed columns and
//! a list of rows whose width always equals the column count. Loading and
//! writing live in `dna-lake`; transformations live in `dna-transform`.

use std::cmp::Ordering;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// A single cell value.
///
/// Serializes untagged, so a row renders as a plain JSON array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Type of this value, or `None` for `Null`.
    #[must_use]
    pub const fn data_type(&self) -> Option<DataType> {
        match self {
            Self::Null => None,
            Self::Bool(_) => Some(DataType::Boolean),
            Self::Int(_) => Some(DataType::Integer),
            Self::Float(_) => Some(DataType::Float),
            Self::Text(_) => Some(DataType::Text),
        }
    }

    /// Numeric view of the value (integers widen to `f64`).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Total order used for sorting.
    ///
    /// Nulls sort first, then booleans, then numbers (integers and floats
    /// compared numerically), then text.
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        const fn rank(v: &Value) -> u8 {
            match v {
                Value::Null => 0,
                Value::Bool(_) => 1,
                Value::Int(_) | Value::Float(_) => 2,
                Value::Text(_) => 3,
            }
        }

        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => rank(a).cmp(&rank(b)),
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Logical column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Boolean,
    Integer,
    Float,
    Text,
}

impl DataType {
    /// Widest type able to hold values of both `self` and `other`.
    #[must_use]
    pub const fn unify(self, other: Self) -> Self {
        match (self, other) {
            (Self::Integer, Self::Float) | (Self::Float, Self::Integer) => Self::Float,
            (a, b) if a as u8 == b as u8 => a,
            _ => Self::Text,
        }
    }

    /// Infer a column type from its values. All-null columns are `Text`.
    #[must_use]
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a Value>) -> Self {
        values
            .into_iter()
            .filter_map(Value::data_type)
            .reduce(Self::unify)
            .unwrap_or(Self::Text)
    }
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Column {
    pub name: String,
    pub dtype: DataType,
}

impl Column {
    #[must_use]
    pub fn new(name: impl Into<String>, dtype: DataType) -> Self {
        Self {
            name: name.into(),
            dtype,
        }
    }
}

/// A rectangular in-memory table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
}

impl Dataset {
    /// Build a dataset, checking that every row matches the column count and
    /// column names are unique.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] on a ragged row or duplicate column.
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<Value>>) -> Result<Self, CoreError> {
        for (i, col) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == col.name) {
                return Err(CoreError::Validation(format!(
                    "duplicate column name '{}'",
                    col.name
                )));
            }
        }
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(CoreError::Validation(format!(
                "row {idx} has {} values, expected {}",
                row.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// First `n` rows, cloned.
    #[must_use]
    pub fn head(&self, n: usize) -> Vec<Vec<Value>> {
        self.page(0, n)
    }

    /// Up to `limit` rows starting at `offset`, cloned. Empty past the end.
    #[must_use]
    pub fn page(&self, offset: usize, limit: usize) -> Vec<Vec<Value>> {
        self.rows.iter().skip(offset).take(limit).cloned().collect()
    }

    /// Split into columns and rows.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Column>, Vec<Vec<Value>>) {
        (self.columns, self.rows)
    }
}
