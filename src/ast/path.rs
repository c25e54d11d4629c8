use crate::ast::Expression;

/// Object path, resolved segment by segment against the context.
///
/// # Examples
/// ```text
/// variable
/// dict.list[0]
/// String.substr('something', 2, 3)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectPath {
    /// Never empty.
    pub segments: Vec<PathSegment>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    /// Member name (`.name`, or the leading identifier)
    Name(String),

    /// Computed key or index (`[expr]`)
    Offset(Expression),

    /// Method call on a host object (`.name(args)`)
    MethodCall { name: String, args: Vec<Expression> },
}
