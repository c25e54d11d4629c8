// Host object protocol: members, capability gate and argument binding.

use eel_lang::host::{Descriptor, Helper, Param, ParamKind};
use eel_lang::value::Map;
use eel_lang::{Context, Error, EvalError, Value, evaluate, to_json};
use pretty_assertions::assert_eq;

struct Account {
    owner: String,
    balance: f64,
    frozen: bool,
}

impl Helper for Account {
    fn descriptor() -> Descriptor<Self> {
        Descriptor::<Self>::new("Account")
            .member("owner", |a| Value::from(a.owner.as_str()))
            .member("balance", |a| Value::Number(a.balance))
            .member("details", |a| {
                let mut map = Map::new();
                map.insert("owner".to_string(), Value::from(a.owner.as_str()));
                map.insert("tags".to_string(), Value::List(vec!["gold".into()]));
                Value::Map(map)
            })
            .method(
                "withdraw",
                vec![Param::required("amount", ParamKind::Number)],
                |a, args| {
                    let amount = args[0].as_number().unwrap_or_default();
                    if amount > a.balance {
                        return Err(EvalError::InvalidArgument {
                            method: "withdraw".into(),
                            message: format!("insufficient funds for {}", amount),
                        });
                    }
                    Ok(Value::Number(a.balance - amount))
                },
            )
            .method(
                "statement",
                vec![
                    Param::required("from", ParamKind::Integer),
                    Param::optional("format", ParamKind::String, "short"),
                ],
                |_, args| {
                    let from = args[0].as_string();
                    Ok(Value::from(format!("{}:{}", from, args[1].as_string())))
                },
            )
            .method("close", vec![], |_, _| Ok(Value::Bool(true)))
    }

    fn allows_call(&self, method: &str) -> bool {
        match method {
            "close" => false,
            "withdraw" => !self.frozen,
            _ => true,
        }
    }
}

fn context(frozen: bool) -> Context<'static> {
    Context::empty().with(
        "account",
        Value::host(Account {
            owner: "ada".into(),
            balance: 100.0,
            frozen,
        }),
    )
}

fn eval_err(code: &str, ctx: &Context<'_>) -> EvalError {
    match evaluate(code, ctx) {
        Err(Error::Eval(e)) => e,
        other => panic!("Expected evaluation error for {}, got {:?}", code, other),
    }
}

#[test]
fn test_member_getters() {
    let ctx = context(false);
    assert_eq!(evaluate("account.owner", &ctx).unwrap(), Value::from("ada"));
    assert_eq!(evaluate("account.balance * 2", &ctx).unwrap(), Value::Number(200.0));
    assert_eq!(evaluate("account['owner']", &ctx).unwrap(), Value::from("ada"));
}

#[test]
fn test_unknown_member_is_null() {
    let ctx = context(false);
    assert_eq!(evaluate("account.password", &ctx).unwrap(), Value::Null);
}

#[test]
fn test_navigating_getter_results() {
    let ctx = context(false);
    assert_eq!(evaluate("account.details.tags[0]", &ctx).unwrap(), Value::from("gold"));
}

#[test]
fn test_method_call() {
    let ctx = context(false);
    assert_eq!(evaluate("account.withdraw(30)", &ctx).unwrap(), Value::Number(70.0));
}

#[test]
fn test_method_errors_abort_evaluation() {
    let ctx = context(false);
    let err = eval_err("'x' + account.withdraw(500)", &ctx);
    assert_eq!(
        err.to_string(),
        "invalid argument for withdraw(): insufficient funds for 500"
    );
}

#[test]
fn test_capability_gate_depends_on_state() {
    let err = eval_err("account.withdraw(1)", &context(true));
    assert!(matches!(err, EvalError::MethodNotAllowed { .. }));
}

#[test]
fn test_gate_is_checked_before_existence() {
    let ctx = context(false);
    assert!(matches!(
        eval_err("account.close()", &ctx),
        EvalError::MethodNotAllowed { .. }
    ));
    assert_eq!(
        eval_err("account.transfer()", &ctx),
        EvalError::UnknownMethod {
            host: "Account".into(),
            method: "transfer".into()
        }
    );
}

#[test]
fn test_defaults_and_integer_parameters() {
    let ctx = context(false);
    assert_eq!(evaluate("account.statement(3.7)", &ctx).unwrap(), Value::from("3:short"));
    assert_eq!(
        evaluate("account.statement(1, 'long')", &ctx).unwrap(),
        Value::from("1:long")
    );
}

#[test]
fn test_missing_argument() {
    let err = eval_err("account.withdraw()", &context(false));
    assert_eq!(
        err,
        EvalError::MissingArgument {
            host: "Account".into(),
            method: "withdraw".into(),
            param: "amount"
        }
    );
}

#[test]
fn test_too_many_arguments() {
    let err = eval_err("account.withdraw(1, 2)", &context(false));
    assert_eq!(err.to_string(), "Account.withdraw() takes at most 1 arguments, got 2");
}

#[test]
fn test_argument_kind_mismatch() {
    let err = eval_err("account.withdraw('ten')", &context(false));
    assert!(matches!(err, EvalError::InvalidArgument { .. }));
}

#[test]
fn test_method_on_plain_value() {
    let ctx = Context::empty().with("name", "ada");
    assert_eq!(
        eval_err("name.toUpperCase()", &ctx),
        EvalError::NotCallable {
            method: "toUpperCase".into(),
            type_name: "string"
        }
    );
}

#[test]
fn test_host_string_form() {
    let ctx = context(false);
    assert_eq!(evaluate("'' + account", &ctx).unwrap(), Value::from("[Account]"));
    let value = evaluate("[account]", &ctx).unwrap();
    assert_eq!(to_json(&value), "[\"[Account]\"]");
}

#[test]
fn test_host_identity() {
    let ctx = context(false).with("other", Value::host(Account {
        owner: "ada".into(),
        balance: 100.0,
        frozen: false,
    }));
    assert_eq!(evaluate("account == account", &ctx).unwrap(), Value::Bool(true));
    assert_eq!(evaluate("account == other", &ctx).unwrap(), Value::Bool(false));
}

#[test]
fn test_host_is_truthy() {
    let ctx = context(false);
    assert_eq!(evaluate("account && 'open'", &ctx).unwrap(), Value::from("open"));
}
