//! # dna-transform
//!
//! A small, closed command language for reshaping a [`Dataset`].
//!
//! Commands keep a dataframe-like surface so generated text reads naturally:
//!
//! ```text
//! df = df.filter(amt > 100).select(id, name, amt).sort(amt, desc=true).head(20)
//! df = df[df['amt'] > 100]
//! ```
//!
//! Text is tokenized, parsed into a [`Program`], and interpreted in-process.
//! Only the operations and functions listed in [`GRAMMAR`] exist; nothing in a
//! command can reach the filesystem, the network, or the host process.

pub mod ast;
pub mod error;
mod eval;
pub mod lexer;
pub mod parser;

pub use ast::{Operation, Program};
pub use error::TransformError;
pub use parser::parse;

use dna_core::dataset::Dataset;

/// Every command starts with this assignment.
pub const COMMAND_PREFIX: &str = "df =";

/// Human-readable summary of the language, suitable for prompting.
pub const GRAMMAR: &str = "\
Commands have the form `df = df.<op>(...).<op>(...)`.
Operations:
  filter(<predicate>)              keep rows where the predicate is true
  select(col, ...)                 keep and reorder columns
  drop(col, ...)                   remove columns
  rename(old=\"new\", ...)           rename columns
  derive(name=<expr>, ...)         add or replace a column
  sort(col, ..., desc=false)       order rows (nulls last)
  head(n)                          keep the first n rows
  dropna(col, ...)                 drop rows with nulls (all columns if none given)
  fillna(value, col, ...)          replace nulls (all columns if none given)
  distinct(col, ...)               drop duplicate rows (whole row if none given)
  promote_header()                 use the first row as column names
Expressions: column names (or col(\"name with spaces\")), numbers, 'strings',
true/false/null, + - * / %, == != < <= > >=, and/or/not.
Functions: lower, upper, trim, len, contains, starts_with, ends_with, abs,
round, is_null, coalesce.";

/// Parse `command` and apply it to `dataset`.
///
/// # Errors
///
/// Returns a [`TransformError`] if the command fails to parse or to apply.
pub fn execute(command: &str, dataset: Dataset) -> Result<Dataset, TransformError> {
    parse(command)?.apply(dataset)
}
