use nu_protocol::{LabeledError, PipelineData, Record, Span, Value};

use crate::error::ArchiveError;

/// Convert a nu_protocol::Value to a serde_json::Value.
///
/// Scalars without a JSON counterpart (dates, durations, file sizes) are
/// carried as their string form.
pub fn nu_to_json(val: &Value) -> serde_json::Value {
    match val {
        Value::Nothing { .. } => serde_json::Value::Null,
        Value::Bool { val, .. } => serde_json::Value::Bool(*val),
        Value::Int { val, .. } => serde_json::Value::from(*val),
        Value::Float { val, .. } => serde_json::Number::from_f64(*val)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String { val, .. } => serde_json::Value::String(val.clone()),
        Value::List { vals, .. } => serde_json::Value::Array(vals.iter().map(nu_to_json).collect()),
        Value::Record { val, .. } => {
            let map = val
                .iter()
                .map(|(k, v)| (k.clone(), nu_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
        other => other
            .coerce_string()
            .map(serde_json::Value::String)
            .unwrap_or(serde_json::Value::Null),
    }
}

/// Convert a serde_json::Value to a nu_protocol::Value.
pub fn json_to_nu(val: &serde_json::Value, span: Span) -> Value {
    match val {
        serde_json::Value::Null => Value::nothing(span),
        serde_json::Value::Bool(b) => Value::bool(*b, span),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::int(i, span)
            } else if let Some(f) = n.as_f64() {
                Value::float(f, span)
            } else {
                Value::string(n.to_string(), span)
            }
        }
        serde_json::Value::String(s) => Value::string(s, span),
        serde_json::Value::Array(arr) => {
            Value::list(arr.iter().map(|v| json_to_nu(v, span)).collect(), span)
        }
        serde_json::Value::Object(map) => {
            let mut record = Record::new();
            for (k, v) in map {
                record.push(k, json_to_nu(v, span));
            }
            Value::record(record, span)
        }
    }
}

/// Collect a table input into JSON rows.
pub fn input_rows(input: PipelineData) -> Vec<serde_json::Value> {
    input.into_iter().map(|v| nu_to_json(&v)).collect()
}

/// Attach the call span to a crate error.
pub fn labeled(err: ArchiveError, span: Span) -> LabeledError {
    LabeledError::new(err.to_string()).with_label("case archive error", span)
}
