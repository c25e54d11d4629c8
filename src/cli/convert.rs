//! JSON <-> EEL value conversion

use crate::value::Value;

/// Converts a JSON document into a value. Objects keep their key order.
pub fn json_to_eel(v: serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => Value::List(arr.into_iter().map(json_to_eel).collect()),
        serde_json::Value::Object(obj) => {
            Value::Map(obj.into_iter().map(|(k, v)| (k, json_to_eel(v))).collect())
        }
    }
}

/// Converts a value into JSON. Non-finite numbers become `null`, host
/// objects their `[Name]` string form.
pub fn eel_to_json(v: Value) -> serde_json::Value {
    match v {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(b),
        Value::Number(n) if n.fract() == 0.0 && n.abs() < 9.007_199_254_740_992e15 => {
            serde_json::Value::Number((n as i64).into())
        }
        Value::Number(n) => serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s),
        Value::List(items) => {
            serde_json::Value::Array(items.into_iter().map(eel_to_json).collect())
        }
        Value::Map(map) => {
            serde_json::Value::Object(map.into_iter().map(|(k, v)| (k, eel_to_json(v))).collect())
        }
        host @ Value::Host(_) => serde_json::Value::String(host.as_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_keeps_key_order() {
        let value = json_to_eel(json!({"b": 1, "a": [true, null, 2.5]}));
        let keys: Vec<_> = value.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(eel_to_json(value), json!({"b": 1, "a": [true, null, 2.5]}));
    }

    #[test]
    fn test_integral_numbers_render_without_fraction() {
        assert_eq!(eel_to_json(Value::Number(3.0)).to_string(), "3");
        assert_eq!(eel_to_json(Value::Number(f64::NAN)), serde_json::Value::Null);
    }
}
