// tests/parser_tests.rs

use eel_lang::ast::{ComparisonOp, Expression, PathSegment, ProductOp, Simple, SumOp, Term, Token};
use eel_lang::parser::{MAX_NESTING_DEPTH, ParseError, Parser};
use eel_lang::{Context, Value, evaluate, parse};
use pretty_assertions::assert_eq;

/// The single `Simple` of an expression that has no operators.
fn simple(expr: &Expression) -> &Simple {
    let disjunction = &expr.body.condition;
    assert!(expr.body.branches.is_none());
    assert!(disjunction.rest.is_empty());
    assert!(disjunction.first.rest.is_empty());
    let comparison = &disjunction.first.first;
    assert!(comparison.comparison.is_none());
    assert!(comparison.left.terms.is_empty());
    assert!(comparison.left.left.terms.is_empty());
    &comparison.left.left.left
}

fn path_segments(expr: &Expression) -> &[PathSegment] {
    match simple(expr) {
        Simple::Term(Term::Path(path)) => &path.segments,
        other => panic!("Expected a path, got {:?}", other),
    }
}

// ============================================================================
// Terms
// ============================================================================

#[test]
fn test_literal_terms() {
    let expr = parse("42").unwrap();
    assert_eq!(simple(&expr), &Simple::Term(Term::Number(42.0)));

    let expr = parse("'text'").unwrap();
    assert_eq!(simple(&expr), &Simple::Term(Term::String("text".into())));

    let expr = parse("false").unwrap();
    assert_eq!(simple(&expr), &Simple::Term(Term::Boolean(false)));
}

#[test]
fn test_member_path() {
    let expr = parse("dict.list[0]").unwrap();
    let segments = path_segments(&expr);

    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0], PathSegment::Name("dict".into()));
    assert_eq!(segments[1], PathSegment::Name("list".into()));
    match &segments[2] {
        PathSegment::Offset(key) => {
            assert_eq!(simple(key), &Simple::Term(Term::Number(0.0)))
        }
        other => panic!("Expected offset, got {:?}", other),
    }
}

#[test]
fn test_chained_offsets() {
    let expr = parse("matrix[1][0].value").unwrap();
    let segments = path_segments(&expr);
    assert_eq!(segments.len(), 4);
    assert!(matches!(segments[1], PathSegment::Offset(_)));
    assert!(matches!(segments[2], PathSegment::Offset(_)));
    assert_eq!(segments[3], PathSegment::Name("value".into()));
}

#[test]
fn test_method_call() {
    let expr = parse("String.substr('something', 2, 3)").unwrap();
    let segments = path_segments(&expr);

    assert_eq!(segments[0], PathSegment::Name("String".into()));
    match &segments[1] {
        PathSegment::MethodCall { name, args } => {
            assert_eq!(name, "substr");
            assert_eq!(args.len(), 3);
            assert_eq!(simple(&args[2]), &Simple::Term(Term::Number(3.0)));
        }
        other => panic!("Expected method call, got {:?}", other),
    }
}

#[test]
fn test_method_call_without_arguments() {
    let expr = parse("Counter.tick()").unwrap();
    let segments = path_segments(&expr);
    assert_eq!(
        segments[1],
        PathSegment::MethodCall {
            name: "tick".into(),
            args: vec![]
        }
    );
}

// ============================================================================
// Operators and Precedence
// ============================================================================

#[test]
fn test_product_binds_tighter_than_sum() {
    let expr = parse("2 + 3 * 4").unwrap();
    let sum = &expr.body.condition.first.first.left;

    assert!(sum.left.terms.is_empty());
    assert_eq!(sum.terms.len(), 1);
    let (op, product) = &sum.terms[0];
    assert_eq!(*op, SumOp::Add);
    assert_eq!(product.left, Simple::Term(Term::Number(3.0)));
    assert_eq!(product.terms[0].0, ProductOp::Multiply);
}

#[test]
fn test_sum_chain_is_flat() {
    let expr = parse("1 - 2 + 3").unwrap();
    let sum = &expr.body.condition.first.first.left;
    let ops: Vec<SumOp> = sum.terms.iter().map(|(op, _)| *op).collect();
    assert_eq!(ops, vec![SumOp::Subtract, SumOp::Add]);
}

#[test]
fn test_comparison() {
    let expr = parse("a.price >= 100").unwrap();
    let comparison = &expr.body.condition.first.first;
    let (op, _) = comparison.comparison.as_ref().unwrap();
    assert_eq!(*op, ComparisonOp::GreaterEqual);
}

#[test]
fn test_comparison_is_not_chainable() {
    let err = parse("1 < 2 < 3").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedToken { found: Token::Lt, .. }));
}

#[test]
fn test_and_binds_tighter_than_or() {
    let expr = parse("a || b && c || d").unwrap();
    let disjunction = &expr.body.condition;
    assert_eq!(disjunction.rest.len(), 2);
    assert_eq!(disjunction.rest[0].rest.len(), 1);
}

#[test]
fn test_word_operators() {
    assert_eq!(parse("a and b or c").unwrap(), parse("a && b || c").unwrap());
}

#[test]
fn test_parentheses() {
    let expr = parse("(1 + 2) * 3").unwrap();
    let product = &expr.body.condition.first.first.left.left;
    assert!(matches!(product.left, Simple::Wrapped(_)));
    assert_eq!(product.terms.len(), 1);
}

#[test]
fn test_ternary() {
    let expr = parse("a == 1 ? 'one' : 'other'").unwrap();
    let branches = expr.body.branches.as_ref().unwrap();
    assert_eq!(simple(&branches.yes), &Simple::Term(Term::String("one".into())));
    assert_eq!(simple(&branches.no), &Simple::Term(Term::String("other".into())));
}

#[test]
fn test_nested_ternary_in_else_branch() {
    let expr = parse("a ? 1 : b ? 2 : 3").unwrap();
    let branches = expr.body.branches.as_ref().unwrap();
    assert!(branches.no.body.branches.is_some());
}

#[test]
fn test_not() {
    let expr = parse("!flag").unwrap();
    assert!(matches!(simple(&expr), Simple::Not(_)));

    let expr = parse("!!flag").unwrap();
    match simple(&expr) {
        Simple::Not(inner) => assert!(matches!(**inner, Simple::Not(_))),
        other => panic!("Expected not, got {:?}", other),
    }
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_array_literal() {
    let expr = parse("[1, 'two', [3]]").unwrap();
    match simple(&expr) {
        Simple::Array(array) => assert_eq!(array.items.len(), 3),
        other => panic!("Expected array, got {:?}", other),
    }

    let expr = parse("[]").unwrap();
    assert!(matches!(simple(&expr), Simple::Array(a) if a.items.is_empty()));
}

#[test]
fn test_trailing_comma_ends_list() {
    let expr = parse("[1, 2,]").unwrap();
    assert!(matches!(simple(&expr), Simple::Array(a) if a.items.len() == 2));
}

#[test]
fn test_object_literal() {
    let expr = parse("{name: 'x', 'quoted key': 1 + 1}").unwrap();
    match simple(&expr) {
        Simple::Object(object) => {
            let keys: Vec<&str> = object.properties.iter().map(|(k, _)| k.as_str()).collect();
            assert_eq!(keys, vec!["name", "quoted key"]);
        }
        other => panic!("Expected object, got {:?}", other),
    }
}

#[test]
fn test_arrow_functions() {
    let cases = vec![
        ("(a, b) => a + b", vec!["a", "b"]),
        ("() => 1", vec![]),
        ("x => x * 2", vec!["x"]),
    ];

    for (input, expected) in cases {
        let expr = parse(input).unwrap();
        match simple(&expr) {
            Simple::ArrowFunction(function) => {
                assert_eq!(function.params, expected, "Failed for input: {}", input)
            }
            other => panic!("Expected arrow function for {}, got {:?}", input, other),
        }
    }
}

#[test]
fn test_parenthesized_identifier_is_not_an_arrow() {
    let expr = parse("(a)").unwrap();
    assert!(matches!(simple(&expr), Simple::Wrapped(_)));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unclosed_argument_list() {
    let err = parse("String.substr('x', 2,").unwrap_err();
    assert_eq!(
        err.to_string(),
        "missing closing ')' after argument list, found end of input at position 21"
    );
}

#[test]
fn test_unclosed_parenthesis() {
    let err = parse("(1 + 2").unwrap_err();
    assert!(matches!(
        err,
        ParseError::MissingClosing {
            delimiter: Token::RParen,
            found: Token::Eof,
            ..
        }
    ));
}

#[test]
fn test_unclosed_array() {
    let err = parse("[1, 2").unwrap_err();
    assert!(matches!(
        err,
        ParseError::MissingClosing {
            delimiter: Token::RBracket,
            ..
        }
    ));
}

#[test]
fn test_ternary_without_else() {
    let err = parse("a ? 1").unwrap_err();
    assert!(matches!(
        err,
        ParseError::MissingSeparator {
            separator: Token::Colon,
            ..
        }
    ));
}

#[test]
fn test_object_property_without_colon() {
    let err = parse("{a 1}").unwrap_err();
    assert!(matches!(err, ParseError::MissingSeparator { .. }));
}

#[test]
fn test_detached_not() {
    let err = parse("! flag").unwrap_err();
    assert_eq!(err, ParseError::DetachedNot {
        position: eel_lang::Position::new(0)
    });
}

#[test]
fn test_trailing_tokens() {
    let err = parse("1 2").unwrap_err();
    assert_eq!(err.to_string(), "expected end of input, found number 2 at position 2");
}

#[test]
fn test_dangling_operator() {
    let err = parse("1 +").unwrap_err();
    assert!(matches!(
        err,
        ParseError::UnexpectedToken {
            found: Token::Eof,
            ..
        }
    ));
}

#[test]
fn test_dot_without_member() {
    let err = parse("a.").unwrap_err();
    assert!(err.to_string().starts_with("expected an identifier after '.'"));
}

#[test]
fn test_empty_input() {
    let err = parse("").unwrap_err();
    assert_eq!(err.position().offset, 0);
}

#[test]
fn test_deep_parentheses_are_rejected() {
    let err = parse(&"(".repeat(10_000)).unwrap_err();
    assert!(matches!(err, ParseError::TooDeep { .. }));
    assert_eq!(err.position().offset, MAX_NESTING_DEPTH);
}

#[test]
fn test_deep_not_chain_is_rejected() {
    let input = format!("{}x", "!".repeat(10_000));
    let err = parse(&input).unwrap_err();
    assert!(matches!(err, ParseError::TooDeep { .. }));
}

#[test]
fn test_deep_offsets_are_rejected() {
    let input = format!("{}0{}", "a[".repeat(5_000), "]".repeat(5_000));
    assert!(matches!(parse(&input).unwrap_err(), ParseError::TooDeep { .. }));
}

#[test]
fn test_nesting_within_limit() {
    let depth = MAX_NESTING_DEPTH - 8;
    let input = format!("{}1 + 1{}", "(".repeat(depth), ")".repeat(depth));
    let expr = parse(&input).unwrap();
    assert!(matches!(simple(&expr), Simple::Wrapped(_)));
    assert_eq!(evaluate(&input, &Context::empty()).unwrap(), Value::Number(2.0));
}

#[test]
fn test_parser_from_tokens() {
    let tokens = eel_lang::Lexer::tokenize("1 + 1");
    let mut parser = Parser::new(tokens);
    assert_eq!(parser.parse().unwrap(), parse("1 + 1").unwrap());
}
