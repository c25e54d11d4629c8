//! JSON rendering of expression values.
//!
//! Output is deterministic: map entries keep their insertion order. Numbers
//! use their shortest round-trip form, non-finite numbers render as `null`
//! and host objects as their `[Name]` string form.
//!
//! # Examples
//!
//! ```
//! use eel_lang::output::{to_json, to_json_pretty};
//! use eel_lang::value::{Map, Value};
//!
//! let mut map = Map::new();
//! map.insert("name".to_string(), Value::from("Alice"));
//! map.insert("age".to_string(), Value::Number(30.0));
//! let value = Value::Map(map);
//!
//! assert_eq!(to_json(&value), r#"{"name":"Alice","age":30}"#);
//! assert_eq!(to_json_pretty(&value), "{\n  \"name\": \"Alice\",\n  \"age\": 30\n}");
//! ```

use crate::value::{Map, Value, format_number};

pub struct JsonPrinter {
    pretty: bool,
}

impl JsonPrinter {
    pub fn new(pretty: bool) -> Self {
        JsonPrinter { pretty }
    }

    pub fn print(&self, value: &Value) -> String {
        let mut out = String::new();
        self.print_value(&mut out, value, 0);
        out
    }

    fn print_value(&self, out: &mut String, value: &Value, indent: usize) {
        match value {
            Value::Null => out.push_str("null"),
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) if n.is_finite() => out.push_str(&format_number(*n)),
            Value::Number(_) => out.push_str("null"),
            Value::String(s) => self.print_string(out, s),
            Value::List(items) => self.print_list(out, items, indent),
            Value::Map(map) => self.print_map(out, map, indent),
            Value::Host(_) => self.print_string(out, &value.as_string()),
        }
    }

    fn print_list(&self, out: &mut String, items: &[Value], indent: usize) {
        if items.is_empty() {
            out.push_str("[]");
            return;
        }

        out.push('[');
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            self.newline(out, indent + 1);
            self.print_value(out, item, indent + 1);
        }
        self.newline(out, indent);
        out.push(']');
    }

    fn print_map(&self, out: &mut String, map: &Map, indent: usize) {
        if map.is_empty() {
            out.push_str("{}");
            return;
        }

        out.push('{');
        for (i, (key, value)) in map.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            self.newline(out, indent + 1);
            self.print_string(out, key);
            out.push_str(if self.pretty { ": " } else { ":" });
            self.print_value(out, value, indent + 1);
        }
        self.newline(out, indent);
        out.push('}');
    }

    fn newline(&self, out: &mut String, level: usize) {
        if self.pretty {
            out.push('\n');
            out.push_str(&"  ".repeat(level));
        }
    }

    fn print_string(&self, out: &mut String, s: &str) {
        out.push('"');
        for c in s.chars() {
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
                c => out.push(c),
            }
        }
        out.push('"');
    }
}

/// Compact JSON, no whitespace.
pub fn to_json(value: &Value) -> String {
    JsonPrinter::new(false).print(value)
}

/// Pretty JSON with 2-space indentation, one element per line.
pub fn to_json_pretty(value: &Value) -> String {
    JsonPrinter::new(true).print(value)
}
