//! Evaluate expressions against a JSON context

use tracing::debug;

use super::{CliError, eel_to_json, json_to_eel};
use crate::{Context, Evaluator, helpers, parse, value::Value};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The expression to evaluate
    pub expression: String,
    /// JSON context document; an empty map when absent
    pub context: Option<String>,
    /// Pretty-print the output
    pub pretty: bool,
    /// Only validate syntax, don't evaluate
    pub syntax_only: bool,
    /// Don't bind the bundled `String` and `Array` helpers
    pub no_helpers: bool,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Expression evaluated successfully
    Success(serde_json::Value),
}

/// Execute an eel check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let expression = parse(&options.expression)?;
    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid);
    }

    let root = match &options.context {
        Some(json) => json_to_eel(serde_json::from_str(json)?),
        None => Value::Map(Default::default()),
    };
    let mut context = Context::new(root);
    if !options.no_helpers {
        context = helpers::install(context);
    }
    debug!(helpers = !options.no_helpers, "evaluating against context");

    let result = Evaluator::new().evaluate(&expression, &context)?;
    Ok(CheckResult::Success(eel_to_json(result)))
}
