use crate::ast::{ComparisonOp, ObjectPath, ProductOp, SumOp};

/// Top-level expression node.
///
/// Wraps the loosest-binding production so that nested positions (ternary
/// branches, arguments, offsets, literal items) all hold the same node type.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub body: ConditionalExpression,
}

/// Ternary conditional.
///
/// Without branches this is a pass-through of `condition`.
///
/// # Example
/// ```text
/// price > 100 ? 'expensive' : 'cheap'
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpression {
    pub condition: Disjunction,
    pub branches: Option<Branches>,
}

/// Both arms of a ternary. They are either both present or both absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Branches {
    pub yes: Box<Expression>,
    pub no: Box<Expression>,
}

/// Left-associative `||` / `or` chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Disjunction {
    pub first: Conjunction,
    pub rest: Vec<Conjunction>,
}

/// Left-associative `&&` / `and` chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Conjunction {
    pub first: Comparison,
    pub rest: Vec<Comparison>,
}

/// A single, non-chainable comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub left: Sum,
    pub comparison: Option<(ComparisonOp, Sum)>,
}

/// `+` / `-` chain, folded left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Sum {
    pub left: Product,
    pub terms: Vec<(SumOp, Product)>,
}

/// `*` / `/` / `%` chain, folded left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub left: Simple,
    pub terms: Vec<(ProductOp, Simple)>,
}

/// The alternatives of a simple expression, in the order the parser tries them.
#[derive(Debug, Clone, PartialEq)]
pub enum Simple {
    /// Function literal
    ///
    /// # Example
    /// ```text
    /// (a, b) => a + b
    /// ```
    ArrowFunction(ArrowFunction),

    /// Parenthesized expression
    Wrapped(Box<Expression>),

    /// Negation, the operand directly follows the `!`
    ///
    /// # Example
    /// ```text
    /// !enabled
    /// ```
    Not(Box<Simple>),

    /// Array literal
    ///
    /// # Example
    /// ```text
    /// [1, 'two', three]
    /// ```
    Array(ArrayLiteral),

    /// Object literal
    ///
    /// # Example
    /// ```text
    /// {name: user.name, 'total': a + b}
    /// ```
    Object(ObjectLiteral),

    /// Literal or object path
    Term(Term),
}

/// Leaf values of the grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Boolean(bool),
    Number(f64),
    String(String),
    Path(ObjectPath),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLiteral {
    pub items: Vec<Expression>,
}

/// Object literal properties in source order. Later duplicates win at evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectLiteral {
    pub properties: Vec<(String, Expression)>,
}

/// Parsed but not executable.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowFunction {
    pub params: Vec<String>,
    pub body: Box<Expression>,
}
