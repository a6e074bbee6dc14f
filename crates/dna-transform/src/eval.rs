//! Evaluation of parsed programs against an in-memory [`Dataset`].
//!
//! Expressions are bound to column indices before any row is touched, so an
//! unknown column fails even when the dataset is empty. Nulls propagate
//! through arithmetic and comparisons; a filter drops rows whose predicate is
//! null.

use std::cmp::Ordering;
use std::collections::HashSet;

use dna_core::dataset::{Column, DataType, Dataset, Value};

use crate::ast::{BinaryOp, Expr, Function, Operation, Program, SortKey, UnaryOp};
use crate::error::TransformError;

/// Expression with column references resolved to indices.
enum Bound {
    Literal(Value),
    Column(usize),
    Unary(UnaryOp, Box<Bound>),
    Binary(BinaryOp, Box<Bound>, Box<Bound>),
    Call(Function, Vec<Bound>),
}

#[derive(PartialEq, Eq, Hash)]
enum KeyPart {
    Null,
    Bool(bool),
    Int(i64),
    Float(u64),
    Text(String),
}

impl From<&Value> for KeyPart {
    fn from(v: &Value) -> Self {
        match v {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Int(i) => Self::Int(*i),
            Value::Float(f) => Self::Float(f.to_bits()),
            Value::Text(s) => Self::Text(s.clone()),
        }
    }
}

impl Program {
    /// Run every operation in order, consuming the input.
    ///
    /// # Errors
    ///
    /// Returns the first [`TransformError`] raised by an operation.
    pub fn apply(&self, mut dataset: Dataset) -> Result<Dataset, TransformError> {
        for op in &self.operations {
            let before = dataset.row_count();
            dataset = apply_operation(op, dataset)?;
            tracing::debug!(
                operation = op.name(),
                rows_in = before,
                rows_out = dataset.row_count(),
                "applied operation"
            );
        }
        Ok(dataset)
    }
}

fn unknown_column(name: &str, dataset: &Dataset) -> TransformError {
    TransformError::UnknownColumn {
        name: name.to_string(),
        available: dataset.column_names(),
    }
}

fn resolve(dataset: &Dataset, name: &str) -> Result<usize, TransformError> {
    dataset
        .column_index(name)
        .ok_or_else(|| unknown_column(name, dataset))
}

/// Resolve a list of names, or every column when the list is empty.
fn resolve_or_all(dataset: &Dataset, names: &[String]) -> Result<Vec<usize>, TransformError> {
    if names.is_empty() {
        return Ok((0..dataset.columns().len()).collect());
    }
    names.iter().map(|n| resolve(dataset, n)).collect()
}

fn bind(expr: &Expr, dataset: &Dataset) -> Result<Bound, TransformError> {
    Ok(match expr {
        Expr::Literal(v) => Bound::Literal(v.clone()),
        Expr::Column(name) => Bound::Column(resolve(dataset, name)?),
        Expr::Unary { op, expr } => Bound::Unary(*op, Box::new(bind(expr, dataset)?)),
        Expr::Binary { op, lhs, rhs } => Bound::Binary(
            *op,
            Box::new(bind(lhs, dataset)?),
            Box::new(bind(rhs, dataset)?),
        ),
        Expr::Call { func, args } => Bound::Call(
            *func,
            args.iter()
                .map(|a| bind(a, dataset))
                .collect::<Result<_, _>>()?,
        ),
    })
}

fn apply_operation(op: &Operation, dataset: Dataset) -> Result<Dataset, TransformError> {
    match op {
        Operation::Filter(predicate) => filter(&dataset, predicate),
        Operation::Select(names) => select(&dataset, names),
        Operation::Drop(names) => {
            let dropped: HashSet<usize> = names
                .iter()
                .map(|n| resolve(&dataset, n))
                .collect::<Result<_, _>>()?;
            let keep: Vec<usize> = (0..dataset.columns().len())
                .filter(|i| !dropped.contains(i))
                .collect();
            project(&dataset, &keep)
        }
        Operation::Rename(pairs) => rename(dataset, pairs),
        Operation::Derive { name, expr } => derive(dataset, name, expr),
        Operation::Sort(keys) => sort(dataset, keys),
        Operation::Head(n) => {
            let (columns, mut rows) = dataset.into_parts();
            rows.truncate(*n);
            Ok(Dataset::new(columns, rows)?)
        }
        Operation::DropNa(names) => {
            let idx = resolve_or_all(&dataset, names)?;
            let (columns, mut rows) = dataset.into_parts();
            rows.retain(|row| idx.iter().all(|&i| !row[i].is_null()));
            Ok(Dataset::new(columns, rows)?)
        }
        Operation::FillNa { value, columns } => fill_na(dataset, value, columns),
        Operation::Distinct(names) => {
            let idx = resolve_or_all(&dataset, names)?;
            let (columns, mut rows) = dataset.into_parts();
            let mut seen = HashSet::new();
            rows.retain(|row| {
                let key: Vec<KeyPart> = idx.iter().map(|&i| KeyPart::from(&row[i])).collect();
                seen.insert(key)
            });
            Ok(Dataset::new(columns, rows)?)
        }
        Operation::PromoteHeader => promote_header(dataset),
    }
}

/// Header cells become names (blank ones `column_<n>`); columns that were
/// all text are re-read as integers or floats when every value parses.
fn promote_header(dataset: Dataset) -> Result<Dataset, TransformError> {
    let (_, mut rows) = dataset.into_parts();
    if rows.is_empty() {
        return Err(TransformError::args("promote_header", "dataset has no rows"));
    }
    let header = rows.remove(0);

    let columns = header
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let name = match cell.to_string().trim() {
                "" => format!("column_{}", i + 1),
                name => name.to_string(),
            };
            Column::new(name, retype(&mut rows, i))
        })
        .collect();
    Ok(Dataset::new(columns, rows)?)
}

fn retype(rows: &mut [Vec<Value>], i: usize) -> DataType {
    let textual = rows
        .iter()
        .all(|row| matches!(row[i], Value::Text(_) | Value::Null));
    if textual {
        let parse_with = |parse: fn(&str) -> Option<Value>| -> Option<Vec<Value>> {
            rows.iter()
                .map(|row| match &row[i] {
                    Value::Text(s) => parse(s.trim()),
                    _ => Some(Value::Null),
                })
                .collect()
        };
        let parsed = parse_with(|s| s.parse().ok().map(Value::Int)).or_else(|| {
            parse_with(|s| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(Value::Float)
            })
        });
        if let Some(values) = parsed {
            for (row, value) in rows.iter_mut().zip(values) {
                row[i] = value;
            }
        }
    }
    DataType::infer(rows.iter().map(|row| &row[i]))
}

fn filter(dataset: &Dataset, predicate: &Expr) -> Result<Dataset, TransformError> {
    let bound = bind(predicate, dataset)?;
    let mut rows = Vec::new();
    for row in dataset.rows() {
        match eval(&bound, row)? {
            Value::Bool(true) => rows.push(row.clone()),
            Value::Bool(false) | Value::Null => {}
            other => {
                return Err(TransformError::Type(format!(
                    "filter predicate must be boolean, got {}",
                    type_name(&other)
                )));
            }
        }
    }
    Ok(Dataset::new(dataset.columns().to_vec(), rows)?)
}

fn select(dataset: &Dataset, names: &[String]) -> Result<Dataset, TransformError> {
    let idx = names
        .iter()
        .map(|n| resolve(dataset, n))
        .collect::<Result<Vec<_>, _>>()?;
    project(dataset, &idx)
}

fn project(dataset: &Dataset, idx: &[usize]) -> Result<Dataset, TransformError> {
    let columns = idx.iter().map(|&i| dataset.columns()[i].clone()).collect();
    let rows = dataset
        .rows()
        .iter()
        .map(|row| idx.iter().map(|&i| row[i].clone()).collect())
        .collect();
    Ok(Dataset::new(columns, rows)?)
}

fn rename(dataset: Dataset, pairs: &[(String, String)]) -> Result<Dataset, TransformError> {
    let idx = pairs
        .iter()
        .map(|(old, _)| resolve(&dataset, old))
        .collect::<Result<Vec<_>, _>>()?;
    let (mut columns, rows) = dataset.into_parts();
    for (i, (_, new)) in idx.into_iter().zip(pairs) {
        columns[i].name.clone_from(new);
    }
    Ok(Dataset::new(columns, rows)?)
}

fn derive(dataset: Dataset, name: &str, expr: &Expr) -> Result<Dataset, TransformError> {
    let bound = bind(expr, &dataset)?;
    let values = dataset
        .rows()
        .iter()
        .map(|row| eval(&bound, row))
        .collect::<Result<Vec<_>, _>>()?;

    let existing = dataset.column_index(name);
    let dtype = if values.iter().all(Value::is_null) {
        existing.map_or(DataType::Text, |i| dataset.columns()[i].dtype)
    } else {
        DataType::infer(&values)
    };

    let (mut columns, mut rows) = dataset.into_parts();
    match existing {
        Some(i) => {
            columns[i].dtype = dtype;
            for (row, v) in rows.iter_mut().zip(values) {
                row[i] = v;
            }
        }
        None => {
            columns.push(Column::new(name, dtype));
            for (row, v) in rows.iter_mut().zip(values) {
                row.push(v);
            }
        }
    }
    Ok(Dataset::new(columns, rows)?)
}

/// Nulls go last in both directions.
fn compare_for_sort(a: &Value, b: &Value, descending: bool) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) if descending => b.total_cmp(a),
        (false, false) => a.total_cmp(b),
    }
}

fn sort(dataset: Dataset, keys: &[SortKey]) -> Result<Dataset, TransformError> {
    let idx = keys
        .iter()
        .map(|k| Ok((resolve(&dataset, &k.column)?, k.descending)))
        .collect::<Result<Vec<_>, TransformError>>()?;
    let (columns, mut rows) = dataset.into_parts();
    rows.sort_by(|a, b| {
        idx.iter()
            .map(|&(i, desc)| compare_for_sort(&a[i], &b[i], desc))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    });
    Ok(Dataset::new(columns, rows)?)
}

fn fill_na(dataset: Dataset, value: &Value, names: &[String]) -> Result<Dataset, TransformError> {
    let idx = resolve_or_all(&dataset, names)?;
    let (mut columns, mut rows) = dataset.into_parts();
    for row in &mut rows {
        for &i in &idx {
            if row[i].is_null() {
                row[i] = value.clone();
            }
        }
    }
    for &i in &idx {
        columns[i].dtype = DataType::infer(rows.iter().map(|r| &r[i]));
    }
    Ok(Dataset::new(columns, rows)?)
}

// ── expressions ────────────────────────────────────────────────────────

const fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Int(_) => "integer",
        Value::Float(_) => "float",
        Value::Text(_) => "text",
    }
}

fn type_error(op: impl std::fmt::Display, lhs: &Value, rhs: &Value) -> TransformError {
    TransformError::Type(format!(
        "cannot apply '{op}' to {} and {}",
        type_name(lhs),
        type_name(rhs)
    ))
}

fn overflow() -> TransformError {
    TransformError::Type("integer overflow".into())
}

fn eval(expr: &Bound, row: &[Value]) -> Result<Value, TransformError> {
    match expr {
        Bound::Literal(v) => Ok(v.clone()),
        Bound::Column(i) => Ok(row[*i].clone()),
        Bound::Unary(op, inner) => unary(*op, eval(inner, row)?),
        Bound::Binary(BinaryOp::And, lhs, rhs) => {
            let l = as_bool(eval(lhs, row)?, "and")?;
            if l == Some(false) {
                return Ok(Value::Bool(false));
            }
            let r = as_bool(eval(rhs, row)?, "and")?;
            Ok(match (l, r) {
                (_, Some(false)) => Value::Bool(false),
                (Some(true), Some(true)) => Value::Bool(true),
                _ => Value::Null,
            })
        }
        Bound::Binary(BinaryOp::Or, lhs, rhs) => {
            let l = as_bool(eval(lhs, row)?, "or")?;
            if l == Some(true) {
                return Ok(Value::Bool(true));
            }
            let r = as_bool(eval(rhs, row)?, "or")?;
            Ok(match (l, r) {
                (_, Some(true)) => Value::Bool(true),
                (Some(false), Some(false)) => Value::Bool(false),
                _ => Value::Null,
            })
        }
        Bound::Binary(op, lhs, rhs) => binary(*op, &eval(lhs, row)?, &eval(rhs, row)?),
        Bound::Call(func, args) => {
            let values = args
                .iter()
                .map(|a| eval(a, row))
                .collect::<Result<Vec<_>, _>>()?;
            call(*func, &values)
        }
    }
}

fn as_bool(v: Value, op: &str) -> Result<Option<bool>, TransformError> {
    match v {
        Value::Bool(b) => Ok(Some(b)),
        Value::Null => Ok(None),
        other => Err(TransformError::Type(format!(
            "'{op}' needs boolean operands, got {}",
            type_name(&other)
        ))),
    }
}

fn unary(op: UnaryOp, v: Value) -> Result<Value, TransformError> {
    match (op, v) {
        (_, Value::Null) => Ok(Value::Null),
        (UnaryOp::Neg, Value::Int(i)) => i.checked_neg().map(Value::Int).ok_or_else(overflow),
        (UnaryOp::Neg, Value::Float(f)) => Ok(Value::Float(-f)),
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOp::Neg, other) => Err(TransformError::Type(format!(
            "cannot negate {}",
            type_name(&other)
        ))),
        (UnaryOp::Not, other) => Err(TransformError::Type(format!(
            "'not' needs a boolean, got {}",
            type_name(&other)
        ))),
    }
}

/// Ordering between two non-null values, if they are comparable.
fn compare(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (a, b) => a.as_f64().zip(b.as_f64()).and_then(|(x, y)| x.partial_cmp(&y)),
    }
}

fn binary(op: BinaryOp, lhs: &Value, rhs: &Value) -> Result<Value, TransformError> {
    if lhs.is_null() || rhs.is_null() {
        return Ok(Value::Null);
    }

    match op {
        BinaryOp::Eq => Ok(Value::Bool(compare(lhs, rhs) == Some(Ordering::Equal))),
        BinaryOp::Ne => Ok(Value::Bool(compare(lhs, rhs) != Some(Ordering::Equal))),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let ord = compare(lhs, rhs).ok_or_else(|| type_error(op, lhs, rhs))?;
            Ok(Value::Bool(match op {
                BinaryOp::Lt => ord.is_lt(),
                BinaryOp::Le => ord.is_le(),
                BinaryOp::Gt => ord.is_gt(),
                _ => ord.is_ge(),
            }))
        }
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
            arithmetic(op, lhs, rhs)
        }
        // handled with short-circuiting in `eval`
        BinaryOp::And | BinaryOp::Or => Err(type_error(op, lhs, rhs)),
    }
}

fn arithmetic(op: BinaryOp, lhs: &Value, rhs: &Value) -> Result<Value, TransformError> {
    match (op, lhs, rhs) {
        (BinaryOp::Add, Value::Text(a), Value::Text(b)) => Ok(Value::Text(format!("{a}{b}"))),
        (BinaryOp::Add, Value::Int(a), Value::Int(b)) => {
            a.checked_add(*b).map(Value::Int).ok_or_else(overflow)
        }
        (BinaryOp::Sub, Value::Int(a), Value::Int(b)) => {
            a.checked_sub(*b).map(Value::Int).ok_or_else(overflow)
        }
        (BinaryOp::Mul, Value::Int(a), Value::Int(b)) => {
            a.checked_mul(*b).map(Value::Int).ok_or_else(overflow)
        }
        (BinaryOp::Rem, Value::Int(_), Value::Int(0)) => Ok(Value::Null),
        (BinaryOp::Rem, Value::Int(a), Value::Int(b)) => {
            a.checked_rem(*b).map(Value::Int).ok_or_else(overflow)
        }
        _ => {
            let (Some(a), Some(b)) = (lhs.as_f64(), rhs.as_f64()) else {
                return Err(type_error(op, lhs, rhs));
            };
            Ok(match op {
                BinaryOp::Add => Value::Float(a + b),
                BinaryOp::Sub => Value::Float(a - b),
                BinaryOp::Mul => Value::Float(a * b),
                // division by zero yields null rather than infinity
                BinaryOp::Div | BinaryOp::Rem if b == 0.0 => Value::Null,
                BinaryOp::Div => Value::Float(a / b),
                _ => Value::Float(a % b),
            })
        }
    }
}

fn text_arg<'a>(func: Function, v: &'a Value) -> Result<&'a str, TransformError> {
    match v {
        Value::Text(s) => Ok(s),
        other => Err(TransformError::Type(format!(
            "{}() needs text, got {}",
            func.name(),
            type_name(other)
        ))),
    }
}

#[allow(clippy::cast_possible_wrap)]
fn call(func: Function, args: &[Value]) -> Result<Value, TransformError> {
    match func {
        Function::IsNull => return Ok(Value::Bool(args[0].is_null())),
        Function::Coalesce => {
            return Ok(args
                .iter()
                .find(|v| !v.is_null())
                .cloned()
                .unwrap_or(Value::Null));
        }
        _ => {}
    }
    if args.iter().any(Value::is_null) {
        return Ok(Value::Null);
    }

    match func {
        Function::Lower => Ok(Value::Text(text_arg(func, &args[0])?.to_lowercase())),
        Function::Upper => Ok(Value::Text(text_arg(func, &args[0])?.to_uppercase())),
        Function::Trim => Ok(Value::Text(text_arg(func, &args[0])?.trim().to_string())),
        Function::Len => Ok(Value::Int(text_arg(func, &args[0])?.chars().count() as i64)),
        Function::Contains => Ok(Value::Bool(
            text_arg(func, &args[0])?.contains(text_arg(func, &args[1])?),
        )),
        Function::StartsWith => Ok(Value::Bool(
            text_arg(func, &args[0])?.starts_with(text_arg(func, &args[1])?),
        )),
        Function::EndsWith => Ok(Value::Bool(
            text_arg(func, &args[0])?.ends_with(text_arg(func, &args[1])?),
        )),
        Function::Abs => match &args[0] {
            Value::Int(i) => i.checked_abs().map(Value::Int).ok_or_else(overflow),
            Value::Float(f) => Ok(Value::Float(f.abs())),
            other => Err(TransformError::Type(format!(
                "abs() needs a number, got {}",
                type_name(other)
            ))),
        },
        Function::Round => round(args),
        Function::IsNull | Function::Coalesce => Ok(Value::Null),
    }
}

fn round(args: &[Value]) -> Result<Value, TransformError> {
    let digits = match args.get(1) {
        None => 0,
        Some(Value::Int(d)) => i32::try_from(*d)
            .map_err(|_| TransformError::Type("round() digits out of range".into()))?,
        Some(other) => {
            return Err(TransformError::Type(format!(
                "round() digits must be an integer, got {}",
                type_name(other)
            )));
        }
    };
    match &args[0] {
        Value::Int(i) if digits >= 0 => Ok(Value::Int(*i)),
        v => {
            let Some(x) = v.as_f64() else {
                return Err(TransformError::Type(format!(
                    "round() needs a number, got {}",
                    type_name(v)
                )));
            };
            let factor = 10f64.powi(digits);
            Ok(Value::Float((x * factor).round() / factor))
        }
    }
}
