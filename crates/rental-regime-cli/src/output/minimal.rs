use serde_json::Value;

use super::flatten;

/// Print just the key answer value from the output.
///
/// Heuristic: look for well-known result fields in order of priority,
/// matched on the last segment of the flattened field name, then fall back
/// to the first field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result").or_else(|| m.get("results")))
        .unwrap_or(value);

    // One line per sweep point
    if let Value::Array(points) = result_obj {
        for point in points {
            match (point.get("holding_years"), point.get("advantage")) {
                (Some(years), Some(adv)) => {
                    println!("{}: {}", format_minimal(years), format_minimal(adv))
                }
                _ => println!("{}", format_minimal(point)),
            }
        }
        return;
    }

    let priority_keys = ["advantage", "total_tax_due", "tax", "marginal_rate", "label"];

    if result_obj.is_object() {
        let fields = flatten(result_obj);
        for key in &priority_keys {
            let hit = fields.iter().find(|(name, val)| {
                !val.is_null() && name.rsplit('.').next() == Some(*key)
            });
            if let Some((_, val)) = hit {
                println!("{}", format_minimal(val));
                return;
            }
        }

        if let Some((key, val)) = fields.first() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
