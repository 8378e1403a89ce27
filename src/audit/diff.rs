//! Change summaries for audit entries

use serde_json::{Map, Value};

/// Longest string value shown verbatim in a summary
const MAX_STRING_LEN: usize = 40;

/// Summarize the differences between two entity snapshots
///
/// Objects are compared field by field; nested objects (a budget's
/// worksheet, for instance) are descended into with dotted paths, arrays
/// are summarized by length. Returns `None` when nothing changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let mut changes = Vec::new();
    collect_changes("", before, after, &mut changes);

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn collect_changes(path: &str, before: &Value, after: &Value, changes: &mut Vec<String>) {
    if before == after {
        return;
    }

    match (before, after) {
        (Value::Object(b), Value::Object(a)) => collect_object_changes(path, b, a, changes),
        _ => changes.push(format!(
            "{}{} -> {}",
            label(path),
            format_value(before),
            format_value(after)
        )),
    }
}

fn collect_object_changes(
    path: &str,
    before: &Map<String, Value>,
    after: &Map<String, Value>,
    changes: &mut Vec<String>,
) {
    for (key, old) in before {
        let field = join(path, key);
        match after.get(key) {
            Some(new) => collect_changes(&field, old, new, changes),
            None => changes.push(format!("{}: {} -> (removed)", field, format_value(old))),
        }
    }

    for (key, new) in after {
        if !before.contains_key(key) {
            changes.push(format!("{}: (added) -> {}", join(path, key), format_value(new)));
        }
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

fn label(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!("{}: ", path)
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.chars().count() > MAX_STRING_LEN => {
            let head: String = s.chars().take(MAX_STRING_LEN - 3).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(fields) => format!("{{{} fields}}", fields.len()),
    }
}
