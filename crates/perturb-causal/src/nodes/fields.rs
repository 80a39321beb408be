//! Typed readers over a node record's kind-specific fields.

use perturb_core::errors::NodeError;
use serde_yaml::{Mapping, Value};

pub(crate) fn optional_f64(fields: &Mapping, node: &str, key: &str) -> Result<Option<f64>, NodeError> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => match v.as_f64() {
            Some(x) if x.is_finite() => Ok(Some(x)),
            Some(x) => Err(NodeError::invalid(node, key, format!("must be finite, got {x}"))),
            None => Err(NodeError::invalid(node, key, format!("expected a number, got {}", describe(v)))),
        },
    }
}

pub(crate) fn required_f64(fields: &Mapping, node: &str, key: &str) -> Result<f64, NodeError> {
    optional_f64(fields, node, key)?.ok_or_else(|| NodeError::missing(node, key))
}

pub(crate) fn required_str<'a>(fields: &'a Mapping, node: &str, key: &str) -> Result<&'a str, NodeError> {
    match fields.get(key) {
        None | Some(Value::Null) => Err(NodeError::missing(node, key)),
        Some(v) => v
            .as_str()
            .ok_or_else(|| NodeError::invalid(node, key, format!("expected a string, got {}", describe(v)))),
    }
}

/// A positive, finite number.
pub(crate) fn required_positive(fields: &Mapping, node: &str, key: &str) -> Result<f64, NodeError> {
    let x = required_f64(fields, node, key)?;
    if x <= 0.0 {
        return Err(NodeError::invalid(node, key, format!("must be positive, got {x}")));
    }
    Ok(x)
}

pub(crate) fn describe(v: &Value) -> String {
    match v {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("\"{s}\""),
        Value::Sequence(_) => "a sequence".to_string(),
        Value::Mapping(_) => "a mapping".to_string(),
        Value::Tagged(t) => format!("tagged value {}", t.tag),
    }
}
