pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Flatten nested objects into dotted `parent.child` fields.
///
/// Arrays of objects (the year-by-year schedules) are summarised as a row
/// count; use JSON output to see them.
pub fn flatten(value: &Value) -> Vec<(String, Value)> {
    let mut fields = Vec::new();
    flatten_into("", value, &mut fields);
    fields
}

fn flatten_into(prefix: &str, value: &Value, fields: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_into(&path, val, fields);
            }
        }
        Value::Array(items) if items.iter().any(Value::is_object) => {
            fields.push((prefix.to_string(), Value::String(format!("[{} rows]", items.len()))));
        }
        _ => fields.push((prefix.to_string(), value.clone())),
    }
}
