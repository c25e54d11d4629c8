//! EEL, a small embeddable expression language.
//!
//! Source text is tokenized by the [`Lexer`], turned into an [`Expression`]
//! tree by the backtracking [`Parser`] and evaluated by the [`Evaluator`]
//! against a [`Context`]. Host code exposes functionality to expressions
//! through capability-gated host objects (see [`host`]).
//!
//! # Examples
//!
//! ```
//! use eel_lang::{evaluate, helpers, Context, Value};
//!
//! let context = helpers::install(Context::empty())
//!     .with("user", Value::Map([("name".to_string(), Value::from("ada"))].into_iter().collect()));
//!
//! let result = evaluate("'Hello ' + String.toUpperCase(user.name || 'guest')", &context).unwrap();
//! assert_eq!(result, Value::from("Hello ADA"));
//!
//! let result = evaluate("user.age == null ? 'unknown' : user.age", &context);
//! assert!(result.is_ok());
//! ```

pub mod ast;
pub mod cli;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod helpers;
pub mod host;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod value;

pub use ast::{Expression, Token};
pub use context::Context;
pub use error::Error;
pub use evaluator::{EvalError, Evaluator};
pub use lexer::{Lexer, Position};
pub use output::{to_json, to_json_pretty};
pub use parser::{ParseError, Parser};
pub use value::Value;

/// Tokenizes and parses `code` into an expression tree.
pub fn parse(code: &str) -> Result<Expression, ParseError> {
    Parser::from_source(code).parse()
}

/// Parses `code` and evaluates it against `context`.
///
/// Nothing is cached; evaluating the same code twice against the same
/// context gives equal results.
pub fn evaluate(code: &str, context: &Context<'_>) -> Result<Value, Error> {
    let expression = parse(code)?;
    Ok(Evaluator::new().evaluate(&expression, context)?)
}
