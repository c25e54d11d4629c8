use thiserror::Error;
use tracing::debug;

use crate::{
    ast::{
        Comparison, ComparisonOp, ConditionalExpression, Conjunction, Disjunction, Expression,
        ObjectPath, PathSegment, Product, ProductOp, Simple, Sum, SumOp, Term,
    },
    context::{Context, Key},
    value::{Map, Value, format_number},
};

/// Errors that can occur during evaluation. Any of them aborts the whole
/// evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Operand of the wrong kind for an operator
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// Product operand that has no numeric form
    #[error("cannot use {type_name} '{value}' as a number in '{op}'")]
    NotANumber {
        type_name: &'static str,
        value: String,
        op: ProductOp,
    },

    /// Member lookup on a boolean, number or string
    #[error("cannot read '{member}' of a {type_name}")]
    NotNavigable {
        member: String,
        type_name: &'static str,
    },

    /// Offset that is neither a string nor a number
    #[error("invalid key of type {0}; expected a string or an integer")]
    InvalidKey(&'static str),

    /// Method call on something that is not a host object
    #[error("cannot call method '{method}' on a {type_name}")]
    NotCallable {
        method: String,
        type_name: &'static str,
    },

    /// Rejected by the host's capability gate
    #[error("calling '{method}' on {host} is not allowed")]
    MethodNotAllowed { host: String, method: String },

    #[error("{host} has no method '{method}'")]
    UnknownMethod { host: String, method: String },

    #[error("missing argument '{param}' for {host}.{method}()")]
    MissingArgument {
        host: String,
        method: String,
        param: &'static str,
    },

    #[error("{host}.{method}() takes at most {expected} arguments, got {got}")]
    TooManyArguments {
        host: String,
        method: String,
        expected: usize,
        got: usize,
    },

    /// Argument rejected by the called method
    #[error("invalid argument for {method}(): {message}")]
    InvalidArgument { method: String, message: String },

    /// Construct that parses but cannot be evaluated
    #[error("{0} are not supported")]
    Unsupported(&'static str),
}

/// Running value of a sum chain.
enum Accumulator {
    Numeric(f64),
    Text(String),
}

impl Accumulator {
    fn concat(text: String, op: SumOp, right: &Value) -> Self {
        match op {
            SumOp::Add => Accumulator::Text(text + &right.as_string()),
            // Subtraction on text discards everything accumulated so far.
            SumOp::Subtract => Accumulator::Text(String::new()),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Accumulator::Numeric(n) => Value::Number(n),
            Accumulator::Text(s) => Value::String(s),
        }
    }
}

/// Walks an [`Expression`] against a [`Context`].
///
/// The evaluator holds no state, so the same tree can be evaluated any
/// number of times, from any number of threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluates a parsed expression.
    ///
    /// # Examples
    ///
    /// ```
    /// use eel_lang::{Context, Evaluator, Parser, Value};
    ///
    /// let expression = Parser::from_source("a + b").parse().unwrap();
    /// let context = Context::empty().with("a", 1.0).with("b", 2.0);
    ///
    /// let result = Evaluator::new().evaluate(&expression, &context).unwrap();
    /// assert_eq!(result, Value::Number(3.0));
    /// ```
    pub fn evaluate(
        &self,
        expression: &Expression,
        context: &Context<'_>,
    ) -> Result<Value, EvalError> {
        let result = self.eval_expression(expression, context);
        debug!(ok = result.is_ok(), "evaluated expression");
        result
    }

    fn eval_expression(
        &self,
        expression: &Expression,
        context: &Context<'_>,
    ) -> Result<Value, EvalError> {
        self.eval_conditional(&expression.body, context)
    }

    fn eval_conditional(
        &self,
        expression: &ConditionalExpression,
        context: &Context<'_>,
    ) -> Result<Value, EvalError> {
        let condition = self.eval_disjunction(&expression.condition, context)?;

        let Some(branches) = &expression.branches else {
            return Ok(condition);
        };
        match condition {
            Value::Bool(true) => self.eval_expression(&branches.yes, context),
            Value::Bool(false) => self.eval_expression(&branches.no, context),
            other => Err(EvalError::TypeMismatch(format!(
                "ternary condition must be a boolean, got {}",
                other.type_name()
            ))),
        }
    }

    /// First non-null operand; later operands are not evaluated.
    fn eval_disjunction(
        &self,
        expression: &Disjunction,
        context: &Context<'_>,
    ) -> Result<Value, EvalError> {
        let mut value = self.eval_conjunction(&expression.first, context)?;

        for next in &expression.rest {
            if !value.is_null() {
                return Ok(value);
            }
            value = self.eval_conjunction(next, context)?;
        }
        Ok(value)
    }

    /// Null as soon as an operand is falsy, otherwise the last operand.
    fn eval_conjunction(
        &self,
        expression: &Conjunction,
        context: &Context<'_>,
    ) -> Result<Value, EvalError> {
        let mut value = self.eval_comparison(&expression.first, context)?;
        if expression.rest.is_empty() {
            return Ok(value);
        }

        for next in &expression.rest {
            if !value.is_truthy() {
                return Ok(Value::Null);
            }
            value = self.eval_comparison(next, context)?;
        }

        if value.is_truthy() {
            Ok(value)
        } else {
            Ok(Value::Null)
        }
    }

    fn eval_comparison(
        &self,
        expression: &Comparison,
        context: &Context<'_>,
    ) -> Result<Value, EvalError> {
        let left = self.eval_sum(&expression.left, context)?;

        let Some((op, right)) = &expression.comparison else {
            return Ok(left);
        };
        let right = self.eval_sum(right, context)?;
        Ok(Value::Bool(compare(*op, &left, &right)))
    }

    /// The chain runs in numeric mode while every operand has a numeric
    /// form and the first one is not a string; otherwise it concatenates.
    fn eval_sum(&self, expression: &Sum, context: &Context<'_>) -> Result<Value, EvalError> {
        let left = self.eval_product(&expression.left, context)?;
        if expression.terms.is_empty() {
            return Ok(left);
        }

        let mut acc = match (&left, left.as_number()) {
            (Value::String(s), _) => Accumulator::Text(s.clone()),
            (_, Some(n)) => Accumulator::Numeric(n),
            (other, None) => Accumulator::Text(other.as_string()),
        };

        for (op, term) in &expression.terms {
            let right = self.eval_product(term, context)?;

            acc = match acc {
                Accumulator::Numeric(total) => match right.as_number() {
                    Some(n) => Accumulator::Numeric(match op {
                        SumOp::Add => total + n,
                        SumOp::Subtract => total - n,
                    }),
                    None => Accumulator::concat(format_number(total), *op, &right),
                },
                Accumulator::Text(text) => Accumulator::concat(text, *op, &right),
            };
        }
        Ok(acc.into_value())
    }

    fn eval_product(
        &self,
        expression: &Product,
        context: &Context<'_>,
    ) -> Result<Value, EvalError> {
        let left = self.eval_simple(&expression.left, context)?;
        let Some((first_op, _)) = expression.terms.first() else {
            return Ok(left);
        };

        let mut total = numeric_operand(&left, *first_op)?;
        for (op, term) in &expression.terms {
            let right = self.eval_simple(term, context)?;
            let n = numeric_operand(&right, *op)?;
            total = match op {
                ProductOp::Multiply => total * n,
                ProductOp::Divide => total / n,
                ProductOp::Modulo => total % n,
            };
        }
        Ok(Value::Number(total))
    }

    fn eval_simple(&self, expression: &Simple, context: &Context<'_>) -> Result<Value, EvalError> {
        match expression {
            Simple::ArrowFunction(_) => Err(EvalError::Unsupported("arrow functions")),
            Simple::Wrapped(inner) => self.eval_expression(inner, context),
            Simple::Not(operand) => match self.eval_simple(operand, context)? {
                Value::Bool(b) => Ok(Value::Bool(!b)),
                other => Err(EvalError::TypeMismatch(format!(
                    "'!' requires a boolean, got {}",
                    other.type_name()
                ))),
            },
            Simple::Array(array) => {
                let mut items = Vec::with_capacity(array.items.len());
                for item in &array.items {
                    items.push(self.eval_expression(item, context)?);
                }
                Ok(Value::List(items))
            }
            Simple::Object(object) => {
                let mut map = Map::new();
                for (key, value) in &object.properties {
                    let value = self.eval_expression(value, context)?;
                    map.insert(key.clone(), value);
                }
                Ok(Value::Map(map))
            }
            Simple::Term(term) => self.eval_term(term, context),
        }
    }

    fn eval_term(&self, term: &Term, context: &Context<'_>) -> Result<Value, EvalError> {
        match term {
            Term::Boolean(b) => Ok(Value::Bool(*b)),
            Term::Number(n) => Ok(Value::Number(*n)),
            Term::String(s) => Ok(Value::String(s.clone())),
            Term::Path(path) => self.eval_path(path, context),
        }
    }

    /// Resolves a path segment by segment, starting at the context value.
    /// A null along the way ends the walk with null.
    fn eval_path(&self, path: &ObjectPath, context: &Context<'_>) -> Result<Value, EvalError> {
        let mut current = context.reborrow();

        for segment in &path.segments {
            if current.value().is_null() {
                return Ok(Value::Null);
            }

            current = match segment {
                PathSegment::Name(name) => current.get(Key::Name(name))?,
                PathSegment::Offset(offset) => {
                    let key = self.eval_expression(offset, context)?;
                    current.get(Key::from_value(&key)?)?
                }
                PathSegment::MethodCall { name, args } => {
                    let mut values = Vec::with_capacity(args.len());
                    for arg in args {
                        values.push(self.eval_expression(arg, context)?);
                    }
                    current.call(name, values)?
                }
            };
        }
        Ok(current.into_value())
    }
}

fn compare(op: ComparisonOp, left: &Value, right: &Value) -> bool {
    let ordering = match op {
        ComparisonOp::Equal => return left == right,
        ComparisonOp::NotEqual => return left != right,
        _ => left.compare(right),
    };

    // Unordered operands compare false under every ordering operator.
    let Some(ordering) = ordering else {
        return false;
    };
    match op {
        ComparisonOp::LessThan => ordering.is_lt(),
        ComparisonOp::LessEqual => ordering.is_le(),
        ComparisonOp::GreaterThan => ordering.is_gt(),
        ComparisonOp::GreaterEqual => ordering.is_ge(),
        ComparisonOp::Equal | ComparisonOp::NotEqual => false,
    }
}

fn numeric_operand(value: &Value, op: ProductOp) -> Result<f64, EvalError> {
    value.as_number().ok_or_else(|| EvalError::NotANumber {
        type_name: value.type_name(),
        value: value.as_string(),
        op,
    })
}
