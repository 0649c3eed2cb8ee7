use std::fmt;
use strum_macros::{Display, EnumIter};

#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum TokenKind {
    // Punctuators.
    #[strum(to_string = "(")] LeftParen,
    #[strum(to_string = ")")] RightParen,
    #[strum(to_string = "[")] LeftBracket,
    #[strum(to_string = "]")] RightBracket,
    #[strum(to_string = "{")] LeftBrace,
    #[strum(to_string = "}")] RightBrace,
    #[strum(to_string = ";")] Semicolon,
    #[strum(to_string = ",")] Comma,
    #[strum(to_string = ".")] Dot,

    // Operators.
    #[strum(to_string = "+")] Plus,
    #[strum(to_string = "-")] Minus,
    #[strum(to_string = "*")] Star,
    #[strum(to_string = "/")] Slash,
    #[strum(to_string = "%")] Percent,
    #[strum(to_string = "!")] Bang,
    #[strum(to_string = "!=")] BangEqual,
    #[strum(to_string = "=")] Equal,
    #[strum(to_string = "==")] EqualEqual,
    #[strum(to_string = "<")] Less,
    #[strum(to_string = "<=")] LessEqual,
    #[strum(to_string = ">")] Greater,
    #[strum(to_string = ">=")] GreaterEqual,

    // Literals.
    #[strum(to_string = "identifier")] Identifier,
    #[strum(to_string = "string")] String,
    #[strum(to_string = "number")] Number,

    // Keywords.
    #[strum(to_string = "and")] And,
    #[strum(to_string = "class")] Class,
    #[strum(to_string = "else")] Else,
    #[strum(to_string = "fun")] Fun,
    #[strum(to_string = "for")] For,
    #[strum(to_string = "if")] If,
    #[strum(to_string = "or")] Or,
    #[strum(to_string = "return")] Return,
    #[strum(to_string = "var")] Var,
    #[strum(to_string = "while")] While,

    // Sentinels.
    #[strum(to_string = "end")] End,
    #[strum(to_string = "error")] Error,
}

impl TokenKind {
    pub fn is_keyword(self) -> bool {
        match self {
            TokenKind::And
            | TokenKind::Class
            | TokenKind::Else
            | TokenKind::Fun
            | TokenKind::For
            | TokenKind::If
            | TokenKind::Or
            | TokenKind::Return
            | TokenKind::Var
            | TokenKind::While => true,
            _ => false,
        }
    }
}

/// Decoded value of a number or string token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal<'a> {
    Number(f64),
    String(&'a str),
}

impl<'a> fmt::Display for Literal<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(x) => write!(f, "{}", x),
            Literal::String(x) => write!(f, "{}", x),
        }
    }
}

/// A lexical unit borrowed from the source text it was scanned from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub value: Option<Literal<'a>>,
    pub line: usize,
}

impl<'a> Token<'a> {
    /// A string whose closing quote never came; the lexer only gives up on a
    /// string at the end of the input.
    pub fn is_unterminated_string(&self) -> bool {
        self.kind == TokenKind::Error && self.text.starts_with('"')
    }
}

impl<'a> fmt::Display for Token<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:4} {:<10} '{}'", self.line, self.kind.to_string(), self.text)?;
        if let Some(value) = &self.value {
            write!(f, " = {}", value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod token_tests {
    use crate::token::{Literal, Token, TokenKind};

    #[test]
    fn kinds_display_as_source_text() {
        assert_eq!(TokenKind::LessEqual.to_string(), "<=");
        assert_eq!(TokenKind::Percent.to_string(), "%");
        assert_eq!(TokenKind::While.to_string(), "while");
        assert_eq!(TokenKind::End.to_string(), "end");
    }

    #[test]
    fn token_display_includes_value() {
        let token = Token {
            kind: TokenKind::Number,
            text: "56.",
            value: Some(Literal::Number(56.0)),
            line: 3,
        };
        assert_eq!(token.to_string(), "   3 number     '56.' = 56");
    }

    #[test]
    fn only_quoted_errors_are_unterminated_strings() {
        let string = Token {
            kind: TokenKind::Error,
            text: "\"abc",
            value: None,
            line: 1,
        };
        assert!(string.is_unterminated_string());
        assert!(!Token { text: "#", ..string }.is_unterminated_string());
    }
}
