use crate::token::{Literal, Token, TokenKind};
use phf::phf_map;
use tracing::trace;

/// Turns source text into tokens, one per call to [`Lexer::next_token`].
///
/// Once the input is exhausted every call returns an `end` token. The lexer
/// is also an iterator that stops right after yielding the first `end`, which
/// is what display code wants.
pub struct Lexer<'a> {
    source: &'a str,
    start: usize,
    current: usize,
    line: usize,
    finished: bool,
}

static PUNCTUATORS: phf::Map<char, TokenKind> = phf_map! {
    '(' => TokenKind::LeftParen,
    ')' => TokenKind::RightParen,
    '[' => TokenKind::LeftBracket,
    ']' => TokenKind::RightBracket,
    '{' => TokenKind::LeftBrace,
    '}' => TokenKind::RightBrace,
    ';' => TokenKind::Semicolon,
    ',' => TokenKind::Comma,
};

static KEYWORDS: phf::Map<&'static str, TokenKind> = phf_map! {
    "and" => TokenKind::And,
    "class" => TokenKind::Class,
    "else" => TokenKind::Else,
    "for" => TokenKind::For,
    "fun" => TokenKind::Fun,
    "if" => TokenKind::If,
    "or" => TokenKind::Or,
    "return" => TokenKind::Return,
    "var" => TokenKind::Var,
    "while" => TokenKind::While,
};

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Lexer<'a> {
        Lexer {
            source,
            start: 0,
            current: 0,
            line: 1,
            finished: false,
        }
    }

    pub fn next_token(&mut self) -> Token<'a> {
        self.skip_whitespace();

        let c = match self.advance() {
            Some(c) => c,
            None => return self.make_token(TokenKind::End),
        };

        if let Some(kind) = PUNCTUATORS.get(&c) {
            return self.make_token(*kind);
        }
        if is_alpha(c) {
            return self.identifier();
        }
        if is_digit(c) {
            return self.number();
        }

        match c {
            '"' => self.string(),
            '.' => {
                if self.peek().map_or(false, is_digit) {
                    self.consume_while(is_digit);
                    self.number_token()
                } else {
                    self.make_token(TokenKind::Dot)
                }
            }
            '+' => self.make_token(TokenKind::Plus),
            '-' => self.make_token(TokenKind::Minus),
            '*' => self.make_token(TokenKind::Star),
            '/' => self.make_token(TokenKind::Slash),
            '%' => self.make_token(TokenKind::Percent),
            '!' => self.one_or_two(TokenKind::Bang, TokenKind::BangEqual),
            '=' => self.one_or_two(TokenKind::Equal, TokenKind::EqualEqual),
            '<' => self.one_or_two(TokenKind::Less, TokenKind::LessEqual),
            '>' => self.one_or_two(TokenKind::Greater, TokenKind::GreaterEqual),
            _ => self.make_token(TokenKind::Error),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\r' => {
                    self.advance();
                }
                '\n' => {
                    self.line += 1;
                    self.advance();
                }
                _ => break,
            }
        }
        self.start = self.current;
    }

    fn one_or_two(&mut self, single: TokenKind, double: TokenKind) -> Token<'a> {
        if self.next_if('=') {
            self.make_token(double)
        } else {
            self.make_token(single)
        }
    }

    fn identifier(&mut self) -> Token<'a> {
        self.consume_while(is_alphanumeric);
        let text = &self.source[self.start..self.current];
        match KEYWORDS.get(text) {
            Some(kind) => self.make_token(*kind),
            None => self.make_token(TokenKind::Identifier),
        }
    }

    fn number(&mut self) -> Token<'a> {
        self.consume_while(is_digit);

        // A trailing "." belongs to the number unless a name follows it, so
        // "56." is a number but "123.name" is a property access.
        if self.peek() == Some('.') && !self.peek_next().map_or(false, is_alpha) {
            self.advance();
            self.consume_while(is_digit);
        }

        self.number_token()
    }

    fn number_token(&mut self) -> Token<'a> {
        let text = &self.source[self.start..self.current];
        match text.parse::<f64>() {
            Ok(value) => self.literal_token(TokenKind::Number, Literal::Number(value)),
            Err(_) => self.make_token(TokenKind::Error),
        }
    }

    fn string(&mut self) -> Token<'a> {
        let line = self.line;
        while let Some(c) = self.peek() {
            if c == '"' {
                break;
            }
            if c == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        // Unterminated.
        if self.advance().is_none() {
            return self.token_at(TokenKind::Error, None, line);
        }

        let value = &self.source[self.start + 1..self.current - 1];
        self.token_at(TokenKind::String, Some(Literal::String(value)), line)
    }

    fn make_token(&mut self, kind: TokenKind) -> Token<'a> {
        let line = self.line;
        self.token_at(kind, None, line)
    }

    fn literal_token(&mut self, kind: TokenKind, value: Literal<'a>) -> Token<'a> {
        let line = self.line;
        self.token_at(kind, Some(value), line)
    }

    fn token_at(&mut self, kind: TokenKind, value: Option<Literal<'a>>, line: usize) -> Token<'a> {
        let token = Token {
            kind,
            text: &self.source[self.start..self.current],
            value,
            line,
        };
        self.start = self.current;
        trace!(kind = %token.kind, text = token.text, line, "token");
        token
    }

    fn consume_while(&mut self, matcher: fn(char) -> bool) {
        while self.peek().map_or(false, matcher) {
            self.advance();
        }
    }

    fn next_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            return true;
        }
        false
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.current += c.len_utf8();
        Some(c)
    }

    fn peek(&self) -> Option<char> {
        self.source[self.current..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        self.source[self.current..].chars().nth(1)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::End {
            self.finished = true;
        }
        Some(token)
    }
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_alphanumeric(c: char) -> bool {
    is_alpha(c) || is_digit(c)
}

#[cfg(test)]
mod lexer_tests {
    use crate::lexer::Lexer;
    use crate::token::{Literal, TokenKind};
    use strum::IntoEnumIterator;

    fn lex(source: &str) -> Vec<(TokenKind, &str)> {
        Lexer::new(source).map(|t| (t.kind, t.text)).collect()
    }

    fn numbers(source: &str) -> Vec<(&str, f64)> {
        Lexer::new(source)
            .filter_map(|t| match t.value {
                Some(Literal::Number(x)) => Some((t.text, x)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn punctuators() {
        assert_eq!(
            lex("([{)]},;.!"),
            vec![
                (TokenKind::LeftParen, "("),
                (TokenKind::LeftBracket, "["),
                (TokenKind::LeftBrace, "{"),
                (TokenKind::RightParen, ")"),
                (TokenKind::RightBracket, "]"),
                (TokenKind::RightBrace, "}"),
                (TokenKind::Comma, ","),
                (TokenKind::Semicolon, ";"),
                (TokenKind::Dot, "."),
                (TokenKind::Bang, "!"),
                (TokenKind::End, ""),
            ]
        );
    }

    #[test]
    fn operators() {
        assert_eq!(
            lex("+-*/% = == != < > <= >="),
            vec![
                (TokenKind::Plus, "+"),
                (TokenKind::Minus, "-"),
                (TokenKind::Star, "*"),
                (TokenKind::Slash, "/"),
                (TokenKind::Percent, "%"),
                (TokenKind::Equal, "="),
                (TokenKind::EqualEqual, "=="),
                (TokenKind::BangEqual, "!="),
                (TokenKind::Less, "<"),
                (TokenKind::Greater, ">"),
                (TokenKind::LessEqual, "<="),
                (TokenKind::GreaterEqual, ">="),
                (TokenKind::End, ""),
            ]
        );
    }

    #[test]
    fn maximal_munch() {
        assert_eq!(
            lex("===>==<==!=="),
            vec![
                (TokenKind::EqualEqual, "=="),
                (TokenKind::Equal, "="),
                (TokenKind::GreaterEqual, ">="),
                (TokenKind::Equal, "="),
                (TokenKind::LessEqual, "<="),
                (TokenKind::Equal, "="),
                (TokenKind::BangEqual, "!="),
                (TokenKind::Equal, "="),
                (TokenKind::End, ""),
            ]
        );
    }

    #[test]
    fn integers() {
        assert_eq!(
            lex("1234 0 000 -123"),
            vec![
                (TokenKind::Number, "1234"),
                (TokenKind::Number, "0"),
                (TokenKind::Number, "000"),
                (TokenKind::Minus, "-"),
                (TokenKind::Number, "123"),
                (TokenKind::End, ""),
            ]
        );
        assert_eq!(numbers("000"), vec![("000", 0.0)]);
    }

    #[test]
    fn fractions() {
        assert_eq!(
            numbers("12.34 .45 56. 1.2.3 4..5"),
            vec![
                ("12.34", 12.34),
                (".45", 0.45),
                ("56.", 56.0),
                ("1.2", 1.2),
                (".3", 0.3),
                ("4.", 4.0),
                (".5", 0.5),
            ]
        );
    }

    #[test]
    fn dot_before_name_is_property_access() {
        assert_eq!(
            lex("123.name 45..name"),
            vec![
                (TokenKind::Number, "123"),
                (TokenKind::Dot, "."),
                (TokenKind::Identifier, "name"),
                (TokenKind::Number, "45."),
                (TokenKind::Dot, "."),
                (TokenKind::Identifier, "name"),
                (TokenKind::End, ""),
            ]
        );
    }

    #[test]
    fn identifiers_and_keywords() {
        assert_eq!(
            lex("_a1 classy class While while"),
            vec![
                (TokenKind::Identifier, "_a1"),
                (TokenKind::Identifier, "classy"),
                (TokenKind::Class, "class"),
                (TokenKind::Identifier, "While"),
                (TokenKind::While, "while"),
                (TokenKind::End, ""),
            ]
        );
    }

    #[test]
    fn every_keyword_is_reserved() {
        for kind in TokenKind::iter().filter(|k| k.is_keyword()) {
            let source = kind.to_string();
            let token = Lexer::new(&source).next_token();
            assert_eq!(token.kind, kind, "{}", source);
        }
    }

    #[test]
    fn strings() {
        let mut lexer = Lexer::new("\"hi there\" \"\"");
        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::String);
        assert_eq!(token.text, "\"hi there\"");
        assert_eq!(token.value, Some(Literal::String("hi there")));
        assert_eq!(lexer.next_token().value, Some(Literal::String("")));
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let mut lexer = Lexer::new("\"oops");
        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::Error);
        assert_eq!(token.value, None);
        assert_eq!(lexer.next_token().kind, TokenKind::End);
    }

    #[test]
    fn unknown_characters_are_errors() {
        assert_eq!(
            lex("# @ é"),
            vec![
                (TokenKind::Error, "#"),
                (TokenKind::Error, "@"),
                (TokenKind::Error, "é"),
                (TokenKind::End, ""),
            ]
        );
    }

    #[test]
    fn end_repeats_forever() {
        let mut lexer = Lexer::new("  x ");
        assert_eq!(lexer.next_token().kind, TokenKind::Identifier);
        for _ in 0..5 {
            assert_eq!(lexer.next_token().kind, TokenKind::End);
        }
    }

    #[test]
    fn iterator_stops_after_end() {
        assert_eq!(Lexer::new("").count(), 1);
        assert_eq!(Lexer::new("a b").count(), 3);
    }

    #[test]
    fn tracks_lines() {
        let lines: Vec<usize> = Lexer::new("a\n\"b\nc\"\n\td").map(|t| t.line).collect();
        assert_eq!(lines, vec![1, 2, 4, 4]);
    }

    #[test]
    fn relexing_is_idempotent() {
        let source = "fun f(a, b) { return a.b(1.5) >= \"x\"; }";
        let first: Vec<_> = Lexer::new(source).collect();
        let second: Vec<_> = Lexer::new(source).collect();
        assert_eq!(first, second);
    }
}
