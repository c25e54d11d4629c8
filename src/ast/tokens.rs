use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Number literal, always a double
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 3.14
    /// -1
    /// ```
    Number(f64),

    /// String literal enclosed in single or double quotes, escapes resolved
    ///
    /// # Examples
    /// ```text
    /// 'hello'
    /// "it\"s"
    /// ```
    String(String),

    /// Boolean literal (`true`, `TRUE`, `false`, `FALSE`)
    Boolean(bool),

    /// Member, helper or method name
    ///
    /// Must start with a letter or underscore, followed by letters, digits or underscores.
    ///
    /// # Examples
    /// ```text
    /// variable
    /// String
    /// _internal
    /// ```
    Identifier(String),

    /// Arrow of a function literal (`=>`)
    Arrow,

    // Comparison
    /// Equality operator
    EqEq,

    /// Inequality operator
    NotEq,

    /// Less than
    Lt,

    /// Less than or equal
    LtEq,

    /// Greater than
    Gt,

    /// Greater than or equal
    GtEq,

    // Arithmetic
    /// Addition or string concatenation
    Plus,

    /// Subtraction
    Minus,

    /// Multiplication
    Star,

    /// Division
    Slash,

    /// Modulo
    Percent,

    // Logical
    /// Logical AND (`&&` or `and`)
    And,

    /// Logical OR (`||` or `or`)
    Or,

    /// Negation (`!`), must touch its operand
    Exclamation,

    // Delimiters
    /// Left brace for object literals
    LBrace,

    /// Right brace
    RBrace,

    /// Left parenthesis for grouping, arguments and arrow parameters
    LParen,

    /// Right parenthesis
    RParen,

    /// Left bracket for array literals and offset access
    LBracket,

    /// Right bracket
    RBracket,

    /// Ternary question mark
    Question,

    /// Ternary and object literal separator
    Colon,

    /// Separator for arguments, items and properties
    Comma,

    /// Path separator
    Dot,

    /// End of input, always the last token
    Eof,
}

impl Token {
    /// Whether an operand can end with this token.
    ///
    /// The lexer uses this to decide if a `-` starts a negative number or is
    /// a binary minus.
    pub fn ends_operand(&self) -> bool {
        matches!(
            self,
            Token::Number(_)
                | Token::String(_)
                | Token::Boolean(_)
                | Token::Identifier(_)
                | Token::RParen
                | Token::RBracket
                | Token::RBrace
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "number {}", n),
            Token::String(s) => write!(f, "string '{}'", s),
            Token::Boolean(b) => write!(f, "'{}'", b),
            Token::Identifier(name) => write!(f, "identifier '{}'", name),
            Token::Arrow => write!(f, "'=>'"),
            Token::EqEq => write!(f, "'=='"),
            Token::NotEq => write!(f, "'!='"),
            Token::Lt => write!(f, "'<'"),
            Token::LtEq => write!(f, "'<='"),
            Token::Gt => write!(f, "'>'"),
            Token::GtEq => write!(f, "'>='"),
            Token::Plus => write!(f, "'+'"),
            Token::Minus => write!(f, "'-'"),
            Token::Star => write!(f, "'*'"),
            Token::Slash => write!(f, "'/'"),
            Token::Percent => write!(f, "'%'"),
            Token::And => write!(f, "'&&'"),
            Token::Or => write!(f, "'||'"),
            Token::Exclamation => write!(f, "'!'"),
            Token::LBrace => write!(f, "'{{'"),
            Token::RBrace => write!(f, "'}}'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::LBracket => write!(f, "'['"),
            Token::RBracket => write!(f, "']'"),
            Token::Question => write!(f, "'?'"),
            Token::Colon => write!(f, "':'"),
            Token::Comma => write!(f, "','"),
            Token::Dot => write!(f, "'.'"),
            Token::Eof => write!(f, "end of input"),
        }
    }
}
