use regex::Regex;

use super::{integer, text};
use crate::{
    evaluator::EvalError,
    host::{Descriptor, Helper, Param, ParamKind},
    value::Value,
};

/// Text helpers, usually bound as `String`.
///
/// Positions and lengths count characters, not bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct StringHelper;

impl Helper for StringHelper {
    fn descriptor() -> Descriptor<Self> {
        use ParamKind::{Integer, String as Text};

        Descriptor::<Self>::new("String")
            .member("name", |_| Value::from("String"))
            .method(
                "substr",
                vec![
                    Param::required("input", Text),
                    Param::required("start", Integer),
                    Param::optional("length", Integer, -1i64),
                ],
                substr,
            )
            .method("toUpperCase", vec![Param::required("input", Text)], |_, args| {
                Ok(Value::from(text(args, 0).to_uppercase()))
            })
            .method("toLowerCase", vec![Param::required("input", Text)], |_, args| {
                Ok(Value::from(text(args, 0).to_lowercase()))
            })
            .method("trim", vec![Param::required("input", Text)], |_, args| {
                Ok(Value::from(text(args, 0).trim()))
            })
            .method("length", vec![Param::required("input", Text)], |_, args| {
                Ok(Value::from(text(args, 0).chars().count()))
            })
            .method(
                "indexOf",
                vec![Param::required("input", Text), Param::required("search", Text)],
                index_of,
            )
            .method(
                "pregMatch",
                vec![Param::required("input", Text), Param::required("pattern", Text)],
                preg_match,
            )
            .method(
                "pregReplace",
                vec![
                    Param::required("input", Text),
                    Param::required("pattern", Text),
                    Param::required("replacement", Text),
                ],
                preg_replace,
            )
    }

    fn allows_call(&self, method: &str) -> bool {
        matches!(
            method,
            "substr"
                | "toUpperCase"
                | "toLowerCase"
                | "trim"
                | "length"
                | "indexOf"
                | "pregMatch"
                | "pregReplace"
        )
    }
}

/// `length` below zero takes everything from `start`. Out-of-range
/// bounds are clamped.
fn substr(_: &StringHelper, args: &[Value]) -> Result<Value, EvalError> {
    let input = text(args, 0);
    let start = integer(args, 1).max(0) as usize;
    let length = integer(args, 2);

    let rest = input.chars().skip(start);
    let result: String = if length < 0 {
        rest.collect()
    } else {
        rest.take(length as usize).collect()
    };
    Ok(Value::from(result))
}

fn index_of(_: &StringHelper, args: &[Value]) -> Result<Value, EvalError> {
    let input = text(args, 0);
    let index = match input.find(text(args, 1)) {
        Some(byte) => input[..byte].chars().count() as i64,
        None => -1,
    };
    Ok(Value::from(index))
}

fn compile(method: &str, pattern: &str) -> Result<Regex, EvalError> {
    Regex::new(pattern).map_err(|e| EvalError::InvalidArgument {
        method: method.to_string(),
        message: e.to_string(),
    })
}

/// Whole match followed by every capture group of the first match, or null
/// when nothing matches. Groups that did not take part are null.
fn preg_match(_: &StringHelper, args: &[Value]) -> Result<Value, EvalError> {
    let regex = compile("pregMatch", text(args, 1))?;

    let Some(captures) = regex.captures(text(args, 0)) else {
        return Ok(Value::Null);
    };
    let groups = captures
        .iter()
        .map(|group| Value::from(group.map(|m| m.as_str())))
        .collect::<Vec<_>>();
    Ok(Value::List(groups))
}

fn preg_replace(_: &StringHelper, args: &[Value]) -> Result<Value, EvalError> {
    let regex = compile("pregReplace", text(args, 1))?;
    let replaced = regex.replace_all(text(args, 0), text(args, 2));
    Ok(Value::from(replaced.into_owned()))
}
