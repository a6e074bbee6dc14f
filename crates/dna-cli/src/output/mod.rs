use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(&serde_json::to_value(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

/// Table of dataset rows under their column names.
pub fn render_rows<T: Serialize>(columns: &[String], rows: &[Vec<T>]) -> anyhow::Result<String> {
    if columns.is_empty() {
        return Ok(String::from("(no columns)"));
    }
    let headers = columns.iter().map(String::as_str).collect::<Vec<_>>();
    let cells = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|v| serde_json::to_value(v).map(|v| value_to_cell(&v)))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(table::render(&headers, &cells, table_options()))
}

fn table_options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn render_table(value: &Value) -> anyhow::Result<String> {
    match value {
        Value::Array(items) => Ok(render_array_table(items)),
        Value::Object(map) => {
            let rows = map
                .iter()
                .map(|(key, value)| vec![key.clone(), value_to_cell(value)])
                .collect::<Vec<_>>();
            Ok(table::render(&["key", "value"], &rows, table_options()))
        }
        scalar => Ok(table::render(
            &["value"],
            &[vec![value_to_cell(scalar)]],
            table_options(),
        )),
    }
}

/// Arrays of objects become one row per item under the union of their keys.
fn render_array_table(items: &[Value]) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }

    if !items.iter().all(Value::is_object) {
        let rows = items
            .iter()
            .map(|item| vec![value_to_cell(item)])
            .collect::<Vec<_>>();
        return table::render(&["value"], &rows, table_options());
    }

    let mut headers = Vec::<&str>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !headers.contains(&key.as_str()) {
                headers.push(key);
            }
        }
    }

    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| map.get(*header).map_or_else(|| String::from("-"), value_to_cell))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    table::render(&headers, &rows, table_options())
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("null"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::{render, render_rows};
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Summary {
        id: i64,
        step_name: &'static str,
        command: Option<&'static str>,
    }

    #[test]
    fn json_render_is_valid_json() {
        let value = Summary {
            id: 1,
            step_name: "x",
            command: None,
        };
        let out = render(&value, OutputFormat::Json).expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["id"], 1);
        assert!(parsed["command"].is_null());
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let value = vec![
            Summary {
                id: 1,
                step_name: "a",
                command: None,
            },
            Summary {
                id: 2,
                step_name: "b",
                command: Some("df = df"),
            },
        ];
        let out = render(&value, OutputFormat::Raw).expect("raw render should work");
        assert!(!out.contains('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed[1]["command"], "df = df");
    }

    #[test]
    fn table_render_has_one_row_per_item() {
        let value = vec![Summary {
            id: 3,
            step_name: "trim",
            command: Some("df = df.head(1)"),
        }];
        let out = render(&value, OutputFormat::Table).expect("table render should work");
        let header = out.lines().next().unwrap();
        let id = header.find("id").unwrap();
        let name = header.find("step_name").unwrap();
        let command = header.find("command").unwrap();
        // serde_json maps are key-sorted
        assert!(command < id && id < name, "{header}");
        assert!(out.contains("df = df.head(1)"));
    }

    #[test]
    fn empty_list_renders_placeholder() {
        let out = render(&Vec::<Summary>::new(), OutputFormat::Table).unwrap();
        assert_eq!(out, "(no rows)");
    }

    #[test]
    fn rows_render_under_columns() {
        let out = render_rows(
            &["id".to_string(), "name".to_string()],
            &[
                vec![serde_json::json!(1), serde_json::json!("bob")],
                vec![serde_json::json!(2), serde_json::Value::Null],
            ],
        )
        .unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("id"));
        assert!(lines[2].contains("bob"));
        assert!(lines[3].contains("null"));
    }
}
