// JSON export and validating import of todo collections

use crate::error::{Result, TodoError};
use crate::todo::Todo;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Number, Value};
use std::collections::HashSet;

/// Serialize the full collection as a pretty-printed JSON array
pub fn export(todos: &[Todo]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(todos)
}

/// Parse and validate import text
///
/// Either every element validates and the whole set is returned, or the
/// first failure is returned and nothing is produced. `now` fills in a
/// missing `createdAt`.
pub fn parse_import(text: &str, now: DateTime<Utc>) -> Result<Vec<Todo>> {
    let value: Value = serde_json::from_str(text).map_err(TodoError::Format)?;

    let items = match value {
        Value::Array(items) => items,
        _ => return Err(TodoError::Schema("import must be an array of todos".to_string())),
    };

    let mut seen = HashSet::with_capacity(items.len());
    let mut todos = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let obj = item
            .as_object()
            .ok_or_else(|| TodoError::Schema(format!("todo at index {} must be an object", index)))?;

        let todo = coerce_todo(obj, index, now)?;
        if !seen.insert(todo.id.clone()) {
            return Err(TodoError::Schema(format!(
                "todo at index {} repeats id {}",
                index, todo.id
            )));
        }
        todos.push(todo);
    }

    Ok(todos)
}

fn coerce_todo(obj: &Map<String, Value>, index: usize, now: DateTime<Utc>) -> Result<Todo> {
    let id = truthy_field(obj, "id");
    let title = truthy_field(obj, "title");
    let (Some(id), Some(title)) = (id, title) else {
        return Err(TodoError::Schema(format!(
            "todo at index {} must have id and title",
            index
        )));
    };

    let created_at = match truthy_field(obj, "createdAt") {
        Some(v) => parse_timestamp(v, "createdAt", index)?,
        None => now,
    };
    let updated_at = truthy_field(obj, "updatedAt")
        .map(|v| parse_timestamp(v, "updatedAt", index))
        .transpose()?;

    Ok(Todo {
        id: coerce_string(id),
        title: coerce_string(title),
        description: truthy_field(obj, "description").map(coerce_string),
        completed: obj.get("completed").is_some_and(is_truthy),
        created_at,
        updated_at,
    })
}

fn truthy_field<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| is_truthy(v))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => coerce_number(n),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

// Whole floats print without a fraction, as in a browser: `1.0` is "1"
fn coerce_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
        _ => n.to_string(),
    }
}

// Accepts RFC 3339, a naive date-time or a bare date (both taken as UTC),
// or a number of milliseconds since the epoch.
fn parse_timestamp(value: &Value, field: &str, index: usize) -> Result<DateTime<Utc>> {
    let parsed = match value {
        Value::String(s) => parse_timestamp_str(s.trim()),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    };

    parsed.ok_or_else(|| {
        TodoError::Schema(format!(
            "todo at index {} has an invalid {}: {}",
            index, field, value
        ))
    })
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
