//! Crate-level error type

use thiserror::Error;

use crate::{evaluator::EvalError, parser::ParseError};

/// Failure of a one-shot [`evaluate`](crate::evaluate) call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),
}
