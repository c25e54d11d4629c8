use super::{arg, list, text};
use crate::{
    evaluator::EvalError,
    host::{Descriptor, Helper, Param, ParamKind},
    value::Value,
};

/// List helpers, usually bound as `Array`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArrayHelper;

impl Helper for ArrayHelper {
    fn descriptor() -> Descriptor<Self> {
        let input = || Param::required("array", ParamKind::List);

        Descriptor::<Self>::new("Array")
            .method(
                "join",
                vec![input(), Param::optional("separator", ParamKind::String, ",")],
                join,
            )
            .method("length", vec![input()], |_, args| {
                Ok(Value::from(list(args, 0).len()))
            })
            .method("first", vec![input()], |_, args| {
                Ok(list(args, 0).first().cloned().into())
            })
            .method("last", vec![input()], |_, args| {
                Ok(list(args, 0).last().cloned().into())
            })
            .method(
                "indexOf",
                vec![input(), Param::required("needle", ParamKind::Any)],
                index_of,
            )
            .method("reverse", vec![input()], |_, args| {
                Ok(Value::List(list(args, 0).iter().rev().cloned().collect()))
            })
    }

    fn allows_call(&self, method: &str) -> bool {
        matches!(
            method,
            "join" | "length" | "first" | "last" | "indexOf" | "reverse"
        )
    }
}

fn join(_: &ArrayHelper, args: &[Value]) -> Result<Value, EvalError> {
    let parts = list(args, 0).iter().map(Value::as_string).collect::<Vec<_>>();
    Ok(Value::from(parts.join(text(args, 1))))
}

fn index_of(_: &ArrayHelper, args: &[Value]) -> Result<Value, EvalError> {
    let needle = arg(args, 1);
    let index = list(args, 0)
        .iter()
        .position(|item| *item == needle)
        .map_or(-1, |i| i as i64);
    Ok(Value::from(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{context::Context, evaluate};

    fn context() -> Context<'static> {
        Context::empty().with("Array", Value::host(ArrayHelper)).with(
            "items",
            Value::List(vec![1.0.into(), "b".into(), Value::Null]),
        )
    }

    #[test]
    fn test_join() {
        let ctx = context();
        assert_eq!(evaluate("Array.join(items)", &ctx).unwrap(), Value::from("1,b,"));
        assert_eq!(
            evaluate("Array.join(items, ' | ')", &ctx).unwrap(),
            Value::from("1 | b | ")
        );
    }

    #[test]
    fn test_first_last_length() {
        let ctx = context();
        assert_eq!(evaluate("Array.first(items)", &ctx).unwrap(), Value::Number(1.0));
        assert_eq!(evaluate("Array.last(items)", &ctx).unwrap(), Value::Null);
        assert_eq!(evaluate("Array.length(items)", &ctx).unwrap(), Value::Number(3.0));
        assert_eq!(evaluate("Array.first([])", &ctx).unwrap(), Value::Null);
    }

    #[test]
    fn test_index_of() {
        let ctx = context();
        assert_eq!(evaluate("Array.indexOf(items, 'b')", &ctx).unwrap(), Value::Number(1.0));
        assert_eq!(evaluate("Array.indexOf(items, '1')", &ctx).unwrap(), Value::Number(-1.0));
    }

    #[test]
    fn test_reverse() {
        let ctx = context();
        assert_eq!(
            evaluate("Array.reverse([1, 2, 3])", &ctx).unwrap(),
            Value::List(vec![3.0.into(), 2.0.into(), 1.0.into()])
        );
    }

    #[test]
    fn test_rejects_non_list() {
        let err = evaluate("Array.length('abc')", &context()).unwrap_err();
        assert!(err.to_string().contains("expects list"));
    }
}
