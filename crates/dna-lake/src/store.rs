//! Reading and writing datasets through an in-memory `DuckDB` connection.
//!
//! Each call opens its own connection; nothing is cached between calls.
//! Column types are normalised on the way in so every cell maps onto one of
//! the four [`DataType`]s.

use std::fs;
use std::path::Path;

use duckdb::types::Value as DuckValue;
use duckdb::{Connection, appender_params_from_iter};

use dna_core::dataset::{Column, DataType, Dataset, Value};

use crate::LakeError;
use crate::format::DataFormat;

const STAGING_TABLE: &str = "dataset";

/// In-memory connection that never fetches extensions; Parquet support is
/// compiled in.
fn open() -> Result<Connection, LakeError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch(
        "SET autoinstall_known_extensions = false; SET autoload_known_extensions = false;",
    )?;
    Ok(conn)
}

/// Quote a string as a SQL literal.
fn sql_literal(path: &Path) -> String {
    format!("'{}'", path.to_string_lossy().replace('\'', "''"))
}

/// Quote a column name as a SQL identifier.
fn sql_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Map a `DuckDB` type name onto a logical column type.
fn logical_type(duck_type: &str) -> DataType {
    let upper = duck_type.to_ascii_uppercase();
    match upper.as_str() {
        "BOOLEAN" => DataType::Boolean,
        "TINYINT" | "SMALLINT" | "INTEGER" | "BIGINT" | "UTINYINT" | "USMALLINT"
        | "UINTEGER" | "UBIGINT" | "HUGEINT" => DataType::Integer,
        "FLOAT" | "REAL" | "DOUBLE" => DataType::Float,
        t if t.starts_with("DECIMAL") => DataType::Float,
        _ => DataType::Text,
    }
}

const fn storage_type(dtype: DataType) -> &'static str {
    match dtype {
        DataType::Boolean => "BOOLEAN",
        DataType::Integer => "BIGINT",
        DataType::Float => "DOUBLE",
        DataType::Text => "VARCHAR",
    }
}

fn from_duck(value: DuckValue) -> Value {
    match value {
        DuckValue::Null => Value::Null,
        DuckValue::Boolean(b) => Value::Bool(b),
        DuckValue::BigInt(i) => Value::Int(i),
        DuckValue::Double(f) => Value::Float(f),
        DuckValue::Text(s) => Value::Text(s),
        // Only reachable if a cast above is bypassed.
        other => Value::Text(format!("{other:?}")),
    }
}

/// Convert a cell for a column of type `dtype`.
#[allow(clippy::cast_precision_loss)]
fn to_duck(value: &Value, dtype: DataType) -> DuckValue {
    match (value, dtype) {
        (Value::Null, _) => DuckValue::Null,
        (Value::Bool(b), DataType::Boolean) => DuckValue::Boolean(*b),
        (Value::Int(i), DataType::Integer) => DuckValue::BigInt(*i),
        (Value::Int(i), DataType::Float) => DuckValue::Double(*i as f64),
        (Value::Float(f), DataType::Float) => DuckValue::Double(*f),
        (v, _) => DuckValue::Text(v.to_string()),
    }
}

/// Load a Parquet or CSV file into memory.
pub(crate) fn read_dataset(path: &Path) -> Result<Dataset, LakeError> {
    let format = DataFormat::from_path(path)?;
    if !path.is_file() {
        return Err(LakeError::NotFound(path.to_path_buf()));
    }

    let corrupt = |e: duckdb::Error| LakeError::CorruptData {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let conn = open()?;
    let source = format!("{}({})", format.reader(), sql_literal(path));

    let columns: Vec<Column> = {
        let mut stmt = conn
            .prepare(&format!("DESCRIBE SELECT * FROM {source}"))
            .map_err(corrupt)?;
        stmt.query_map([], |row| {
            let name: String = row.get(0)?;
            let duck_type: String = row.get(1)?;
            Ok(Column::new(name, logical_type(&duck_type)))
        })
        .map_err(corrupt)?
        .collect::<Result<_, _>>()
        .map_err(corrupt)?
    };

    let select_list = columns
        .iter()
        .map(|c| {
            format!(
                "CAST({} AS {})",
                sql_ident(&c.name),
                storage_type(c.dtype)
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    let mut rows = Vec::new();
    if !columns.is_empty() {
        let mut stmt = conn
            .prepare(&format!("SELECT {select_list} FROM {source}"))
            .map_err(corrupt)?;
        let mut result = stmt.query([]).map_err(corrupt)?;
        while let Some(row) = result.next().map_err(corrupt)? {
            let mut values = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                values.push(from_duck(row.get::<_, DuckValue>(i).map_err(corrupt)?));
            }
            rows.push(values);
        }
    }

    tracing::debug!(
        path = %path.display(),
        %format,
        columns = columns.len(),
        rows = rows.len(),
        "loaded dataset"
    );
    Ok(Dataset::new(columns, rows)?)
}

/// Write a dataset as Parquet, replacing any existing file.
///
/// Output is staged next to the target and renamed into place, so a failed
/// write never leaves a partial file at `path`.
pub(crate) fn write_parquet(dataset: &Dataset, path: &Path) -> Result<(), LakeError> {
    if dataset.columns().is_empty() {
        return Err(LakeError::EmptySchema);
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let conn = open()?;
    let ddl = dataset
        .columns()
        .iter()
        .map(|c| format!("{} {}", sql_ident(&c.name), storage_type(c.dtype)))
        .collect::<Vec<_>>()
        .join(", ");
    conn.execute_batch(&format!("CREATE TABLE {STAGING_TABLE} ({ddl})"))?;

    {
        let mut appender = conn.appender(STAGING_TABLE)?;
        for row in dataset.rows() {
            let cells = row
                .iter()
                .zip(dataset.columns())
                .map(|(v, c)| to_duck(v, c.dtype));
            appender.append_row(appender_params_from_iter(cells))?;
        }
        appender.flush()?;
    }

    let staging = path.with_extension("parquet.tmp");
    conn.execute_batch(&format!(
        "COPY {STAGING_TABLE} TO {} (FORMAT PARQUET)",
        sql_literal(&staging)
    ))?;
    fs::rename(&staging, path)?;

    tracing::debug!(
        path = %path.display(),
        rows = dataset.row_count(),
        "wrote parquet"
    );
    Ok(())
}
