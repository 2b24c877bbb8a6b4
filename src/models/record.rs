use serde_json::{Map, Value};

use super::schema::TAXPAYER_ID;

/// A semi-structured record: companies, officers and output rows alike.
/// A missing key is distinct from a key holding `""` or `null`.
pub type Record = Map<String, Value>;

/// Human-readable location of a record for error messages
pub fn describe_record(kind: &str, index: usize, record: &Record) -> String {
    match record.get(TAXPAYER_ID) {
        Some(Value::String(id)) => format!("{kind} #{index} (taxpayerId {id})"),
        Some(other) => format!("{kind} #{index} (taxpayerId {other})"),
        None => format!("{kind} #{index}"),
    }
}

/// Replace every object-valued field with its leaves, joined by `.`
///
/// `{"a": {"b": 1, "c": {"d": 2}}}` becomes `{"a.b": 1, "a.c.d": 2}`.
/// Arrays and scalars are kept as values.
pub fn flatten_nested(record: Record) -> Record {
    let mut flat = Record::new();
    for (key, value) in record {
        flatten_into(&mut flat, key, value);
    }
    flat
}

fn flatten_into(flat: &mut Record, key: String, value: Value) {
    match value {
        Value::Object(inner) if !inner.is_empty() => {
            for (sub_key, sub_value) in inner {
                flatten_into(flat, format!("{key}.{sub_key}"), sub_value);
            }
        }
        other => {
            flat.insert(key, other);
        }
    }
}

/// Render a value as plain text: strings verbatim, everything else as JSON
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
