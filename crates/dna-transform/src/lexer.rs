//! Tokenizer for command text.

use std::iter::Peekable;
use std::str::Chars;

use crate::error::TransformError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Str(String),
    Int(i64),
    Float(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Dot,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Assign,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Amp,
    Pipe,
    Tilde,
    Bang,
    Semicolon,
}

/// A token and the character offset where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub position: usize,
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    // character offset of the next char
    char_pos: usize,
}

impl Lexer<'_> {
    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.char_pos += 1;
        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn string(&mut self, quote: char, start: usize) -> Result<Token, TransformError> {
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(TransformError::syntax(start, "unterminated string")),
                Some(c) if c == quote => return Ok(Token::Str(out)),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(c) => out.push(c),
                    None => return Err(TransformError::syntax(start, "unterminated string")),
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn number(&mut self, first: char, start: usize) -> Result<Token, TransformError> {
        let mut text = String::from(first);
        let mut is_float = first == '.';
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '_' {
                if c != '_' {
                    text.push(c);
                }
                self.bump();
            } else if c == '.' && !is_float {
                is_float = true;
                text.push(c);
                self.bump();
            } else if (c == 'e' || c == 'E') && !text.contains(['e', 'E']) {
                is_float = true;
                text.push(c);
                self.bump();
                if let Some(sign @ ('+' | '-')) = self.peek() {
                    text.push(sign);
                    self.bump();
                }
            } else {
                break;
            }
        }

        if is_float {
            text.parse()
                .map(Token::Float)
                .map_err(|_| TransformError::syntax(start, format!("invalid number '{text}'")))
        } else {
            text.parse()
                .map(Token::Int)
                .map_err(|_| TransformError::syntax(start, format!("invalid integer '{text}'")))
        }
    }

    fn ident(&mut self, first: char) -> Token {
        let mut name = String::from(first);
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                name.push(c);
                self.bump();
            } else {
                break;
            }
        }
        Token::Ident(name)
    }
}

/// Split command text into tokens.
///
/// # Errors
///
/// Returns [`TransformError::Syntax`] for unterminated strings, malformed
/// numbers, or characters outside the language.
pub fn tokenize(input: &str) -> Result<Vec<Spanned>, TransformError> {
    let mut lexer = Lexer {
        chars: input.chars().peekable(),
        char_pos: 0,
    };
    let mut tokens = Vec::new();

    loop {
        let position = lexer.char_pos;
        let Some(c) = lexer.bump() else { break };
        let token = match c {
            c if c.is_whitespace() => continue,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '%' => Token::Percent,
            ',' => Token::Comma,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            '&' => Token::Amp,
            '|' => Token::Pipe,
            '~' => Token::Tilde,
            ';' => Token::Semicolon,
            '=' if lexer.eat('=') => Token::Eq,
            '=' => Token::Assign,
            '!' if lexer.eat('=') => Token::Ne,
            '!' => Token::Bang,
            '<' if lexer.eat('=') => Token::Le,
            '<' => Token::Lt,
            '>' if lexer.eat('=') => Token::Ge,
            '>' => Token::Gt,
            '"' | '\'' => lexer.string(c, position)?,
            '.' if lexer.peek().is_some_and(|n| n.is_ascii_digit()) => {
                lexer.number(c, position)?
            }
            '.' => Token::Dot,
            c if c.is_ascii_digit() => lexer.number(c, position)?,
            c if c.is_alphabetic() || c == '_' => lexer.ident(c),
            other => {
                return Err(TransformError::syntax(
                    position,
                    format!("unexpected character '{other}'"),
                ));
            }
        };
        tokens.push(Spanned { token, position });
    }

    Ok(tokens)
}
