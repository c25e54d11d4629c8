use std::fmt;

use tracing::{trace, warn};

use crate::ast::Token;

/// Character offset of a token within the expression text (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub offset: usize,
}

impl Position {
    pub fn new(offset: usize) -> Self {
        Position { offset }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "position {}", self.offset)
    }
}

/// A token together with the position of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub position: Position,
}

/// Single-pass scanner over the expression text.
///
/// The lexer never fails: characters that start no token are skipped, and an
/// unterminated string literal is dropped.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    after_operand: bool,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            after_operand: false,
        }
    }

    /// Tokenize the whole input. The result always ends with [`Token::Eof`].
    pub fn tokenize(input: &str) -> Vec<SpannedToken> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        loop {
            let spanned = lexer.next_token();
            let done = spanned.token == Token::Eof;
            tokens.push(spanned);
            if done {
                break;
            }
        }
        trace!(count = tokens.len(), "tokenized expression");
        tokens
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_word(&mut self) -> Token {
        let mut word = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                word.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match word.as_str() {
            "true" | "TRUE" => Token::Boolean(true),
            "false" | "FALSE" => Token::Boolean(false),
            "and" => Token::And,
            "or" => Token::Or,
            _ => Token::Identifier(word),
        }
    }

    /// Reads a quoted string. Returns `None` when the closing quote is missing.
    fn read_string(&mut self, quote: char) -> Option<String> {
        let mut result = String::new();
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Some(result);
                }
                '\\' => {
                    self.advance(); // Consume backslash
                    if let Some(escaped) = self.current_char() {
                        result.push(escaped);
                        self.advance();
                    }
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        warn!(quote = %quote, "dropping unterminated string literal");
        None
    }

    fn read_number(&mut self) -> f64 {
        let mut number = String::new();
        let mut is_float = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.'
                && !is_float
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_float = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        number.parse::<f64>().unwrap_or(0.0)
    }

    fn read_operator(&mut self) -> Option<Token> {
        let ch = self.current_char()?;
        let next = self.peek_char(1);

        let double = match (ch, next) {
            ('=', Some('>')) => Some(Token::Arrow),
            ('=', Some('=')) => Some(Token::EqEq),
            ('!', Some('=')) => Some(Token::NotEq),
            ('<', Some('=')) => Some(Token::LtEq),
            ('>', Some('=')) => Some(Token::GtEq),
            ('&', Some('&')) => Some(Token::And),
            ('|', Some('|')) => Some(Token::Or),
            _ => None,
        };
        if let Some(token) = double {
            self.advance();
            self.advance();
            return Some(token);
        }

        let single = match ch {
            '<' => Token::Lt,
            '>' => Token::Gt,
            '!' => Token::Exclamation,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '%' => Token::Percent,
            '?' => Token::Question,
            ':' => Token::Colon,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            ',' => Token::Comma,
            '.' => Token::Dot,
            _ => return None,
        };
        self.advance();
        Some(single)
    }

    /// Scans one token at the cursor, or `None` if the cursor only moved past
    /// characters that produce nothing.
    fn scan(&mut self) -> Option<Token> {
        let ch = match self.current_char() {
            Some(ch) => ch,
            None => return Some(Token::Eof),
        };

        match ch {
            '"' | '\'' => return self.read_string(ch).map(Token::String),
            c if c.is_alphabetic() || c == '_' => return Some(self.read_word()),
            c if c.is_ascii_digit() => return Some(Token::Number(self.read_number())),
            '-' if !self.after_operand
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) =>
            {
                self.advance(); // Consume sign
                return Some(Token::Number(-self.read_number()));
            }
            _ => {}
        }

        if let Some(token) = self.read_operator() {
            return Some(token);
        }

        warn!(character = %ch, position = self.position, "skipping unrecognized character");
        self.advance();
        None
    }

    pub fn next_token(&mut self) -> SpannedToken {
        loop {
            self.skip_whitespace();
            let start = self.position;
            if let Some(token) = self.scan() {
                self.after_operand = token.ends_operand();
                return SpannedToken {
                    token,
                    position: Position::new(start),
                };
            }
        }
    }
}

#[cfg(test)]
fn kinds(input: &str) -> Vec<Token> {
    Lexer::tokenize(input).into_iter().map(|t| t.token).collect()
}

#[test]
fn test_keywords() {
    assert_eq!(
        kinds("and or true false TRUE FALSE"),
        vec![
            Token::And,
            Token::Or,
            Token::Boolean(true),
            Token::Boolean(false),
            Token::Boolean(true),
            Token::Boolean(false),
            Token::Eof,
        ]
    );
}

#[test]
fn test_keyword_prefix_stays_identifier() {
    assert_eq!(
        kinds("trueish android"),
        vec![
            Token::Identifier("trueish".to_string()),
            Token::Identifier("android".to_string()),
            Token::Eof,
        ]
    );
}

#[test]
fn test_method_call() {
    assert_eq!(
        kinds("String.substr('something', 2, 3)"),
        vec![
            Token::Identifier("String".to_string()),
            Token::Dot,
            Token::Identifier("substr".to_string()),
            Token::LParen,
            Token::String("something".to_string()),
            Token::Comma,
            Token::Number(2.0),
            Token::Comma,
            Token::Number(3.0),
            Token::RParen,
            Token::Eof,
        ]
    );
}

#[test]
fn test_positions() {
    let tokens = Lexer::tokenize("a  == 'b'");
    let offsets: Vec<usize> = tokens.iter().map(|t| t.position.offset).collect();
    assert_eq!(offsets, vec![0, 3, 6, 9]);
}
