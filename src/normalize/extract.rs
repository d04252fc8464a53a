//! JSON path lookup and type coercion for loosely-shaped upstream items.

use serde_json::Value;

/// Extract a value from nested JSON using dot-notation path.
pub fn extract_path<'a>(data: &'a Value, path: &str) -> &'a Value {
    if path.is_empty() {
        return data;
    }

    let mut current = data;
    for key in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(key).unwrap_or(&Value::Null),
            Value::Array(arr) => {
                if let Ok(idx) = key.parse::<usize>() {
                    arr.get(idx).unwrap_or(&Value::Null)
                } else {
                    &Value::Null
                }
            }
            _ => &Value::Null,
        };
    }

    current
}

/// Parse a decimal written as `1234.56` or in Brazilian form `1.234,56`.
pub fn parse_decimal(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let canonical = if s.contains(',') {
        s.replace('.', "").replace(',', ".")
    } else {
        s.to_string()
    };

    canonical.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|n| n.is_finite()),
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "sim" | "s" | "1" => Some(true),
            "false" | "nao" | "não" | "n" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// First alias that yields a usable value after coercion.
fn first_alias<T>(item: &Value, aliases: &[&str], coerce: fn(&Value) -> Option<T>) -> Option<T> {
    aliases
        .iter()
        .find_map(|alias| coerce(extract_path(item, alias)))
}

/// Text field, or an empty string when no alias matches.
pub fn text_field(item: &Value, aliases: &[&str]) -> String {
    first_alias(item, aliases, as_text).unwrap_or_default()
}

/// Decimal field, or 0 when no alias matches.
pub fn number_field(item: &Value, aliases: &[&str]) -> f64 {
    first_alias(item, aliases, as_number).unwrap_or(0.0)
}

/// Non-negative integer field, or 0 when no alias matches.
pub fn integer_field(item: &Value, aliases: &[&str]) -> u32 {
    first_alias(item, aliases, as_number)
        .filter(|n| *n >= 0.0)
        .map(|n| n as u32)
        .unwrap_or(0)
}

/// Boolean field, or `false` when no alias matches.
pub fn bool_field(item: &Value, aliases: &[&str]) -> bool {
    first_alias(item, aliases, as_bool).unwrap_or(false)
}
