use thiserror::Error;
use tracing::trace;

use crate::{
    ast::{
        ArrayLiteral, ArrowFunction, Branches, Comparison, ComparisonOp, ConditionalExpression,
        Conjunction, Disjunction, Expression, ObjectLiteral, ObjectPath, PathSegment, Product,
        ProductOp, Simple, Sum, SumOp, Term, Token,
    },
    lexer::{Lexer, Position, SpannedToken},
};

/// Maximum nesting of sub-expressions and `!` operands.
pub const MAX_NESTING_DEPTH: usize = 48;

/// Errors produced while parsing. Parsing aborts on the first one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A token that no production accepts here
    #[error("expected {expected}, found {found} at {position}")]
    UnexpectedToken {
        expected: String,
        found: Token,
        position: Position,
    },

    /// A committed production is missing its closing delimiter
    #[error("missing closing {delimiter} after {context}, found {found} at {position}")]
    MissingClosing {
        delimiter: Token,
        context: &'static str,
        found: Token,
        position: Position,
    },

    /// A required separator such as the `:` of a ternary is missing
    #[error("missing {separator} in {context}, found {found} at {position}")]
    MissingSeparator {
        separator: Token,
        context: &'static str,
        found: Token,
        position: Position,
    },

    /// `!` separated from its operand by whitespace
    #[error("'!' must be directly followed by its operand at {position}")]
    DetachedNot { position: Position },

    /// Nesting beyond [`MAX_NESTING_DEPTH`]
    #[error("expression nested deeper than {} levels at {position}", MAX_NESTING_DEPTH)]
    TooDeep { position: Position },
}

impl ParseError {
    pub fn position(&self) -> Position {
        match self {
            ParseError::UnexpectedToken { position, .. }
            | ParseError::MissingClosing { position, .. }
            | ParseError::MissingSeparator { position, .. }
            | ParseError::DetachedNot { position }
            | ParseError::TooDeep { position } => *position,
        }
    }
}

/// Outcome of an alternative that may not apply at the cursor.
///
/// `Ok(None)` means "not applicable": the caller restores the cursor and
/// tries the next alternative. `Err` comes from a production that already
/// committed and is never backtracked.
type Attempt<T> = Result<Option<T>, ParseError>;

/// Recursive-descent parser over a token buffer, one method per grammar rule.
pub struct Parser {
    tokens: Vec<SpannedToken>,
    cursor: usize,
    depth: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<SpannedToken>) -> Self {
        if tokens.last().is_none_or(|t| t.token != Token::Eof) {
            let offset = tokens.last().map_or(0, |t| t.position.offset + 1);
            tokens.push(SpannedToken {
                token: Token::Eof,
                position: Position::new(offset),
            });
        }
        Parser {
            tokens,
            cursor: 0,
            depth: 0,
        }
    }

    /// Tokenizes `input` and prepares a parser over the result.
    pub fn from_source(input: &str) -> Self {
        Parser::new(Lexer::tokenize(input))
    }

    fn current(&self) -> &SpannedToken {
        let last = self.tokens.len() - 1;
        &self.tokens[self.cursor.min(last)]
    }

    fn peek(&self) -> &Token {
        &self.current().token
    }

    fn position(&self) -> Position {
        self.current().position
    }

    /// Consumes the current token. Past the end the `Eof` token repeats.
    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token != Token::Eof {
            self.cursor += 1;
        }
        token
    }

    fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    fn take_identifier(&mut self) -> Option<String> {
        match self.peek() {
            Token::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Some(name)
            }
            _ => None,
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: self.peek().clone(),
            position: self.position(),
        }
    }

    fn expect_closing(
        &mut self,
        delimiter: Token,
        context: &'static str,
    ) -> Result<(), ParseError> {
        if self.check(&delimiter) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::MissingClosing {
                delimiter,
                context,
                found: self.peek().clone(),
                position: self.position(),
            })
        }
    }

    /// Runs `parser` one nesting level deeper.
    fn nested<T>(
        &mut self,
        parser: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::TooDeep {
                position: self.position(),
            });
        }
        self.depth += 1;
        let result = parser(self);
        self.depth -= 1;
        result
    }

    /// Runs `parser` from the current cursor and rewinds if it does not apply.
    fn backtrack<T>(&mut self, parser: impl FnOnce(&mut Self) -> Attempt<T>) -> Attempt<T> {
        let snapshot = self.cursor;
        let result = parser(self)?;
        if result.is_none() && self.cursor != snapshot {
            trace!(from = self.cursor, to = snapshot, "backtracking");
            self.cursor = snapshot;
        }
        Ok(result)
    }

    /// Comma-separated list. Continues only while a comma follows the last
    /// item, so an empty list or a trailing comma just ends the list.
    fn parse_list<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Attempt<T>,
    ) -> Result<Vec<T>, ParseError> {
        let mut items = vec![];

        if let Some(first) = self.backtrack(&mut item)? {
            items.push(first);
            while self.check(&Token::Comma) {
                self.advance();
                match self.backtrack(&mut item)? {
                    Some(next) => items.push(next),
                    None => break,
                }
            }
        }
        Ok(items)
    }

    /// Parses a complete input; trailing tokens are an error.
    pub fn parse(&mut self) -> Result<Expression, ParseError> {
        let expression = self.parse_expression()?;
        if !self.check(&Token::Eof) {
            return Err(self.unexpected("end of input"));
        }
        Ok(expression)
    }

    pub fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        let body = self.nested(Self::parse_conditional)?;
        Ok(Expression { body })
    }

    fn starts_expression(&self) -> bool {
        matches!(
            self.peek(),
            Token::Number(_)
                | Token::String(_)
                | Token::Boolean(_)
                | Token::Identifier(_)
                | Token::LParen
                | Token::LBracket
                | Token::LBrace
                | Token::Exclamation
        )
    }

    fn parse_optional_expression(&mut self) -> Attempt<Expression> {
        if !self.starts_expression() {
            return Ok(None);
        }
        self.parse_expression().map(Some)
    }

    fn parse_conditional(&mut self) -> Result<ConditionalExpression, ParseError> {
        let condition = self.parse_disjunction()?;

        if !self.check(&Token::Question) {
            return Ok(ConditionalExpression {
                condition,
                branches: None,
            });
        }
        self.advance(); // consume '?'

        let yes = self.parse_expression()?;
        if !self.check(&Token::Colon) {
            return Err(ParseError::MissingSeparator {
                separator: Token::Colon,
                context: "ternary expression",
                found: self.peek().clone(),
                position: self.position(),
            });
        }
        self.advance(); // consume ':'
        let no = self.parse_expression()?;

        Ok(ConditionalExpression {
            condition,
            branches: Some(Branches {
                yes: Box::new(yes),
                no: Box::new(no),
            }),
        })
    }

    fn parse_disjunction(&mut self) -> Result<Disjunction, ParseError> {
        let first = self.parse_conjunction()?;
        let mut rest = vec![];

        while self.check(&Token::Or) {
            self.advance();
            rest.push(self.parse_conjunction()?);
        }
        Ok(Disjunction { first, rest })
    }

    fn parse_conjunction(&mut self) -> Result<Conjunction, ParseError> {
        let first = self.parse_comparison()?;
        let mut rest = vec![];

        while self.check(&Token::And) {
            self.advance();
            rest.push(self.parse_comparison()?);
        }
        Ok(Conjunction { first, rest })
    }

    fn parse_comparison(&mut self) -> Result<Comparison, ParseError> {
        let left = self.parse_sum()?;

        let op = match self.peek() {
            Token::EqEq => ComparisonOp::Equal,
            Token::NotEq => ComparisonOp::NotEqual,
            Token::Lt => ComparisonOp::LessThan,
            Token::LtEq => ComparisonOp::LessEqual,
            Token::Gt => ComparisonOp::GreaterThan,
            Token::GtEq => ComparisonOp::GreaterEqual,
            _ => {
                return Ok(Comparison {
                    left,
                    comparison: None,
                });
            }
        };
        self.advance();
        let right = self.parse_sum()?;

        Ok(Comparison {
            left,
            comparison: Some((op, right)),
        })
    }

    fn parse_sum(&mut self) -> Result<Sum, ParseError> {
        let left = self.parse_product()?;
        let mut terms = vec![];

        loop {
            let op = match self.peek() {
                Token::Plus => SumOp::Add,
                Token::Minus => SumOp::Subtract,
                _ => break,
            };
            self.advance();
            terms.push((op, self.parse_product()?));
        }
        Ok(Sum { left, terms })
    }

    fn parse_product(&mut self) -> Result<Product, ParseError> {
        let left = self.parse_simple()?;
        let mut terms = vec![];

        loop {
            let op = match self.peek() {
                Token::Star => ProductOp::Multiply,
                Token::Slash => ProductOp::Divide,
                Token::Percent => ProductOp::Modulo,
                _ => break,
            };
            self.advance();
            terms.push((op, self.parse_simple()?));
        }
        Ok(Product { left, terms })
    }

    fn parse_simple(&mut self) -> Result<Simple, ParseError> {
        match self.try_simple()? {
            Some(simple) => Ok(simple),
            None => Err(self.unexpected("an expression")),
        }
    }

    /// Ordered trial of the simple alternatives; the first that applies wins.
    fn try_simple(&mut self) -> Attempt<Simple> {
        if let Some(function) = self.backtrack(Self::parse_arrow_function)? {
            return Ok(Some(Simple::ArrowFunction(function)));
        }
        if let Some(inner) = self.backtrack(Self::parse_wrapped_expression)? {
            return Ok(Some(Simple::Wrapped(Box::new(inner))));
        }
        if let Some(operand) = self.backtrack(Self::parse_not_expression)? {
            return Ok(Some(Simple::Not(Box::new(operand))));
        }
        if let Some(array) = self.backtrack(Self::parse_array_literal)? {
            return Ok(Some(Simple::Array(array)));
        }
        if let Some(object) = self.backtrack(Self::parse_object_literal)? {
            return Ok(Some(Simple::Object(object)));
        }
        Ok(self.backtrack(Self::parse_term)?.map(Simple::Term))
    }

    fn parse_param(&mut self) -> Attempt<String> {
        Ok(self.take_identifier())
    }

    /// `(a, b) => body` or `a => body`. Commits only once `=>` is seen.
    fn parse_arrow_function(&mut self) -> Attempt<ArrowFunction> {
        let params = if self.check(&Token::LParen) {
            self.advance();
            let params = self.parse_list(Self::parse_param)?;
            if !self.check(&Token::RParen) {
                return Ok(None);
            }
            self.advance();
            params
        } else {
            match self.take_identifier() {
                Some(param) => vec![param],
                None => return Ok(None),
            }
        };

        if !self.check(&Token::Arrow) {
            return Ok(None);
        }
        self.advance();

        let body = self.parse_expression()?;
        Ok(Some(ArrowFunction {
            params,
            body: Box::new(body),
        }))
    }

    fn parse_wrapped_expression(&mut self) -> Attempt<Expression> {
        if !self.check(&Token::LParen) {
            return Ok(None);
        }
        self.advance();

        let inner = self.parse_expression()?;
        self.expect_closing(Token::RParen, "wrapped expression")?;
        Ok(Some(inner))
    }

    fn parse_not_expression(&mut self) -> Attempt<Simple> {
        if !self.check(&Token::Exclamation) {
            return Ok(None);
        }
        let bang = self.position();
        self.advance();

        if self.position().offset != bang.offset + 1 {
            return Err(ParseError::DetachedNot { position: bang });
        }
        self.nested(Self::parse_simple).map(Some)
    }

    fn parse_array_literal(&mut self) -> Attempt<ArrayLiteral> {
        if !self.check(&Token::LBracket) {
            return Ok(None);
        }
        self.advance();

        let items = self.parse_list(Self::parse_optional_expression)?;
        self.expect_closing(Token::RBracket, "array literal")?;
        Ok(Some(ArrayLiteral { items }))
    }

    fn parse_object_literal(&mut self) -> Attempt<ObjectLiteral> {
        if !self.check(&Token::LBrace) {
            return Ok(None);
        }
        self.advance();

        let properties = self.parse_list(Self::parse_object_property)?;
        self.expect_closing(Token::RBrace, "object literal")?;
        Ok(Some(ObjectLiteral { properties }))
    }

    fn parse_object_property(&mut self) -> Attempt<(String, Expression)> {
        let key = match self.peek() {
            Token::String(key) | Token::Identifier(key) => key.clone(),
            _ => return Ok(None),
        };
        self.advance();

        if !self.check(&Token::Colon) {
            return Err(ParseError::MissingSeparator {
                separator: Token::Colon,
                context: "object literal property",
                found: self.peek().clone(),
                position: self.position(),
            });
        }
        self.advance();

        let value = self.parse_expression()?;
        Ok(Some((key, value)))
    }

    fn parse_term(&mut self) -> Attempt<Term> {
        let term = match self.peek() {
            Token::Boolean(b) => Term::Boolean(*b),
            Token::Number(n) => Term::Number(*n),
            Token::String(s) => Term::String(s.clone()),
            Token::Identifier(_) => return self.parse_object_path().map(|p| Some(Term::Path(p))),
            _ => return Ok(None),
        };
        self.advance();
        Ok(Some(term))
    }

    fn parse_object_path(&mut self) -> Result<ObjectPath, ParseError> {
        let mut segments = vec![self.parse_path_step()?];

        loop {
            if self.check(&Token::Dot) {
                self.advance(); // consume '.'
                if !matches!(self.peek(), Token::Identifier(_)) {
                    return Err(self.unexpected("an identifier after '.'"));
                }
                segments.push(self.parse_path_step()?);
            } else if self.check(&Token::LBracket) {
                self.advance(); // consume '['
                let key = self.parse_expression()?;
                self.expect_closing(Token::RBracket, "offset access")?;
                segments.push(PathSegment::Offset(key));
            } else {
                break;
            }
        }
        Ok(ObjectPath { segments })
    }

    /// A named step; an identifier followed by `(` is a method call.
    fn parse_path_step(&mut self) -> Result<PathSegment, ParseError> {
        let name = match self.take_identifier() {
            Some(name) => name,
            None => return Err(self.unexpected("an identifier")),
        };

        if !self.check(&Token::LParen) {
            return Ok(PathSegment::Name(name));
        }
        self.advance(); // consume '('

        let args = self.parse_list(Self::parse_optional_expression)?;
        self.expect_closing(Token::RParen, "argument list")?;
        Ok(PathSegment::MethodCall { name, args })
    }
}
