//! # EEL - Abstract Syntax Tree
//!
//! This module defines the tokens and the syntax tree of the embeddable
//! expression language (EEL), a small grammar for arithmetic, string, boolean
//! and path-access expressions evaluated against a host-supplied context.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - The precedence chain from the ternary down to terms
//! - **[operators]** - Comparison, additive and multiplicative operators
//! - **[path]** - Object paths: member names, offsets and method calls
//!
//! ## Precedence
//!
//! From loosest to tightest binding:
//!
//! ```text
//! cond ? yes : no        ConditionalExpression
//! a || b    a or b       Disjunction
//! a && b    a and b      Conjunction
//! a == b    a < b  ...   Comparison (not chainable)
//! a + b     a - b        Sum
//! a * b     a / b  a % b Product
//! (a)  !a  [..]  {..}    Simple
//! true  1.5  'x'  a.b    Term
//! ```
//!
//! Every node owns its children and is never mutated after parsing, so a
//! parsed [`Expression`] can be evaluated any number of times.
//!
//! ## Examples
//!
//! ```text
//! variable + variable2
//! String.substr('something', 2, 3)
//! dict.list[0] == 1 ? 'first' : 'other'
//! ```
pub mod expressions;
pub mod operators;
pub mod path;
pub mod tokens;

pub use expressions::{
    ArrayLiteral, ArrowFunction, Branches, Comparison, ConditionalExpression, Conjunction,
    Disjunction, Expression, ObjectLiteral, Product, Simple, Sum, Term,
};
pub use operators::{ComparisonOp, ProductOp, SumOp};
pub use path::{ObjectPath, PathSegment};
pub use tokens::Token;
