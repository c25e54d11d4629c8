use eel_lang::cli::{CheckOptions, CheckResult, CliError, execute_check};
use pretty_assertions::assert_eq;
use serde_json::json;

fn check(expression: &str, context: Option<&str>) -> Result<CheckResult, CliError> {
    execute_check(&CheckOptions {
        expression: expression.to_string(),
        context: context.map(str::to_string),
        ..Default::default()
    })
}

fn success(result: Result<CheckResult, CliError>) -> serde_json::Value {
    match result {
        Ok(CheckResult::Success(value)) => value,
        other => panic!("Expected success, got {:?}", other),
    }
}

#[test]
fn test_evaluates_against_json_context() {
    let output = success(check(
        "user.name + ' (' + user.age + ')'",
        Some(r#"{"user": {"name": "Ada", "age": 36}}"#),
    ));
    assert_eq!(output, json!("Ada (36)"));
}

#[test]
fn test_missing_context_is_empty() {
    assert_eq!(success(check("missing || 2 * 21", None)), json!(42));
}

#[test]
fn test_object_output_keeps_order() {
    let output = success(check("{z: 1, a: [true, null, 0.5]}", None));
    assert_eq!(output.to_string(), r#"{"z":1,"a":[true,null,0.5]}"#);
}

#[test]
fn test_helpers_are_bound_by_default() {
    assert_eq!(success(check("String.trim('  x ')", None)), json!("x"));
    assert_eq!(success(check("Array.join([1, 2], '+')", None)), json!("1+2"));
}

#[test]
fn test_no_helpers() {
    let result = execute_check(&CheckOptions {
        expression: "String.trim('x')".to_string(),
        no_helpers: true,
        ..Default::default()
    });
    assert_eq!(success(result), json!(null));
}

#[test]
fn test_syntax_only() {
    let result = execute_check(&CheckOptions {
        expression: "a.b(1, 2) ? [1] : {}".to_string(),
        syntax_only: true,
        ..Default::default()
    });
    assert!(matches!(result, Ok(CheckResult::SyntaxValid)));
}

#[test]
fn test_syntax_only_skips_context() {
    let result = execute_check(&CheckOptions {
        expression: "1".to_string(),
        context: Some("not json".to_string()),
        syntax_only: true,
        ..Default::default()
    });
    assert!(matches!(result, Ok(CheckResult::SyntaxValid)));
}

#[test]
fn test_parse_error() {
    let err = check("(1 + 2", None).unwrap_err();
    assert!(matches!(err, CliError::Parse(_)));
    assert!(err.to_string().starts_with("Parse error: missing closing ')'"));
}

#[test]
fn test_eval_error() {
    let err = check("name.first", Some(r#"{"name": "Ada"}"#)).unwrap_err();
    assert!(matches!(err, CliError::Eval(_)));
}

#[test]
fn test_invalid_json_context() {
    let err = check("1", Some("{not json")).unwrap_err();
    assert!(matches!(err, CliError::Json(_)));
}
