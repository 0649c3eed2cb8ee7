use crate::ast::{BinaryOp, Expression, FunDecl, LogicalOp, Program, Statement, UnaryOp};
use crate::error::SyntaxError;
use crate::lexer::Lexer;
use crate::token::{Literal, Token, TokenKind};
use std::rc::Rc;
use tracing::{debug, warn};

/// Receives syntax errors as the parser finds them.
pub trait ErrorReporter {
    fn report(&mut self, error: &SyntaxError);
}

impl<F: FnMut(&SyntaxError)> ErrorReporter for F {
    fn report(&mut self, error: &SyntaxError) {
        self(error)
    }
}

/// The reporter used by [`Parser::new`].
pub struct StderrReporter;

impl ErrorReporter for StderrReporter {
    fn report(&mut self, error: &SyntaxError) {
        warn!(line = error.line, "{}", error.message);
        eprintln!("{}", error);
    }
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Option<Token<'a>>,
    reporter: Box<dyn ErrorReporter + 'a>,
    errors: Vec<SyntaxError>,
    needs_more_input: bool,
}

/// Parses a whole program, collecting every syntax error instead of printing.
pub fn parse(source: &str) -> Result<Program, Vec<SyntaxError>> {
    let mut parser = Parser::with_reporter(Lexer::new(source), |_: &SyntaxError| {});
    let program = parser.parse_program();
    if parser.had_error() {
        return Err(parser.into_errors());
    }
    Ok(program)
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Parser<'a> {
        Parser::with_reporter(lexer, StderrReporter)
    }

    pub fn with_reporter<R: ErrorReporter + 'a>(lexer: Lexer<'a>, reporter: R) -> Parser<'a> {
        Parser {
            lexer,
            current: None,
            reporter: Box::new(reporter),
            errors: Vec::new(),
            needs_more_input: false,
        }
    }

    pub fn had_error(&self) -> bool {
        !self.errors.is_empty()
    }

    /// True when the first error was hitting the end of the input while a
    /// statement was still open, so more input could complete it.
    pub fn needs_more_input(&self) -> bool {
        self.needs_more_input
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<SyntaxError> {
        self.errors
    }

    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();
        while !self.check(TokenKind::End) {
            statements.push(self.statement());
        }
        debug!(
            statements = statements.len(),
            errors = self.errors.len(),
            "parsed program"
        );
        statements
    }

    pub fn statement(&mut self) -> Statement {
        match self.peek().kind {
            TokenKind::Class => {
                self.advance();
                self.class_declaration()
            }
            TokenKind::Fun => {
                self.advance();
                Statement::Fun(Rc::new(self.function()))
            }
            TokenKind::If => {
                self.advance();
                self.if_statement()
            }
            TokenKind::Return => {
                self.advance();
                let value = if self.check(TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.expression())
                };
                self.consume(TokenKind::Semicolon, "Expect ';' after return value.");
                Statement::Return(value)
            }
            TokenKind::Var => {
                self.advance();
                self.var_declaration()
            }
            TokenKind::While => {
                self.advance();
                self.consume(TokenKind::LeftParen, "Expect '(' after 'while'.");
                let condition = self.expression();
                self.consume(TokenKind::RightParen, "Expect ')' after while condition.");
                let body = self.statement();
                Statement::While {
                    condition,
                    body: Box::new(body),
                }
            }
            TokenKind::LeftBrace => Statement::Block(self.block()),
            _ => {
                let expr = self.expression();
                self.consume(TokenKind::Semicolon, "Expect ';' after expression.");
                Statement::Expression(expr)
            }
        }
    }

    fn class_declaration(&mut self) -> Statement {
        let name = self.consume(TokenKind::Identifier, "Expect class name.");
        let superclass = if self.matches(TokenKind::Less) {
            Some(self.primary())
        } else {
            None
        };

        self.consume(TokenKind::LeftBrace, "Expect '{' before class body.");
        let mut methods = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.check(TokenKind::End) {
            methods.push(Rc::new(self.function()));
        }
        self.consume(TokenKind::RightBrace, "Expect '}' after class body.");

        Statement::Class {
            name: name.text.to_string(),
            superclass,
            methods,
        }
    }

    fn function(&mut self) -> FunDecl {
        let name = self.consume(TokenKind::Identifier, "Expect function name.");
        self.consume(TokenKind::LeftParen, "Expect '(' after function name.");
        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                let param = self.consume(TokenKind::Identifier, "Expect parameter name.");
                params.push(param.text.to_string());
                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightParen, "Expect ')' after parameters.");
        let body = self.block();
        FunDecl {
            name: name.text.to_string(),
            params,
            body,
        }
    }

    fn if_statement(&mut self) -> Statement {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'if'.");
        let condition = self.expression();
        self.consume(TokenKind::RightParen, "Expect ')' after if condition.");
        let then_branch = self.statement();
        // Greedy: a dangling else belongs to the innermost if.
        let else_branch = if self.matches(TokenKind::Else) {
            Some(Box::new(self.statement()))
        } else {
            None
        };
        Statement::If {
            condition,
            then_branch: Box::new(then_branch),
            else_branch,
        }
    }

    fn var_declaration(&mut self) -> Statement {
        let name = self.consume(TokenKind::Identifier, "Expect variable name.");
        self.consume(TokenKind::Equal, "Expect '=' after variable name.");
        let initializer = self.expression();
        self.consume(TokenKind::Semicolon, "Expect ';' after variable declaration.");
        Statement::Var {
            name: name.text.to_string(),
            initializer,
        }
    }

    fn block(&mut self) -> Vec<Statement> {
        self.consume(TokenKind::LeftBrace, "Expect '{' before block.");
        let mut statements = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.check(TokenKind::End) {
            statements.push(self.statement());
        }
        self.consume(TokenKind::RightBrace, "Expect '}' after block.");
        statements
    }

    pub fn expression(&mut self) -> Expression {
        self.assignment()
    }

    fn assignment(&mut self) -> Expression {
        let expr = self.or();
        let equals = *self.peek();
        if self.matches(TokenKind::Equal) {
            match expr {
                Expression::Variable(_) | Expression::Property { .. } => (),
                _ => self.error_at(&equals, "Invalid assignment target."),
            }
            let value = self.assignment();
            return Expression::Assign {
                target: Box::new(expr),
                value: Box::new(value),
            };
        }
        expr
    }

    fn or(&mut self) -> Expression {
        let mut expr = self.and();
        while self.matches(TokenKind::Or) {
            let right = self.and();
            expr = Expression::logical(expr, LogicalOp::Or, right);
        }
        expr
    }

    fn and(&mut self) -> Expression {
        let mut expr = self.equality();
        while self.matches(TokenKind::And) {
            let right = self.equality();
            expr = Expression::logical(expr, LogicalOp::And, right);
        }
        expr
    }

    fn equality(&mut self) -> Expression {
        let mut expr = self.comparison();
        loop {
            let op = match self.peek().kind {
                TokenKind::EqualEqual => BinaryOp::Equal,
                TokenKind::BangEqual => BinaryOp::NotEqual,
                _ => break,
            };
            self.advance();
            let right = self.comparison();
            expr = Expression::binary(expr, op, right);
        }
        expr
    }

    fn comparison(&mut self) -> Expression {
        let mut expr = self.term();
        loop {
            let op = match self.peek().kind {
                TokenKind::Less => BinaryOp::Less,
                TokenKind::Greater => BinaryOp::Greater,
                TokenKind::LessEqual => BinaryOp::LessEqual,
                TokenKind::GreaterEqual => BinaryOp::GreaterEqual,
                _ => break,
            };
            self.advance();
            let right = self.term();
            expr = Expression::binary(expr, op, right);
        }
        expr
    }

    fn term(&mut self) -> Expression {
        let mut expr = self.factor();
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Subtract,
                _ => break,
            };
            self.advance();
            let right = self.factor();
            expr = Expression::binary(expr, op, right);
        }
        expr
    }

    fn factor(&mut self) -> Expression {
        let mut expr = self.unary();
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Multiply,
                TokenKind::Slash => BinaryOp::Divide,
                TokenKind::Percent => BinaryOp::Remainder,
                _ => break,
            };
            self.advance();
            let right = self.unary();
            expr = Expression::binary(expr, op, right);
        }
        expr
    }

    fn unary(&mut self) -> Expression {
        let op = match self.peek().kind {
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Minus => UnaryOp::Minus,
            TokenKind::Bang => UnaryOp::Not,
            _ => return self.call(),
        };
        self.advance();
        let operand = self.unary();
        Expression::unary(op, operand)
    }

    fn call(&mut self) -> Expression {
        let mut expr = self.primary();
        loop {
            if self.matches(TokenKind::LeftParen) {
                let mut args = Vec::new();
                if !self.matches(TokenKind::RightParen) {
                    loop {
                        args.push(self.expression());
                        if !self.matches(TokenKind::Comma) {
                            break;
                        }
                    }
                    self.consume(TokenKind::RightParen, "Expect ')' after arguments.");
                }
                expr = Expression::Call {
                    callee: Box::new(expr),
                    args,
                };
            } else if self.matches(TokenKind::Dot) {
                let name = self.consume(TokenKind::Identifier, "Expect property name after '.'.");
                expr = Expression::Property {
                    object: Box::new(expr),
                    name: name.text.to_string(),
                };
            } else {
                break;
            }
        }
        expr
    }

    fn primary(&mut self) -> Expression {
        let token = *self.peek();
        match (token.kind, token.value) {
            (TokenKind::Number, Some(Literal::Number(x))) => {
                self.advance();
                Expression::Number(x)
            }
            (TokenKind::String, Some(Literal::String(x))) => {
                self.advance();
                Expression::String(x.to_string())
            }
            (TokenKind::Identifier, _) => {
                self.advance();
                Expression::Variable(token.text.to_string())
            }
            (TokenKind::LeftParen, _) => {
                self.advance();
                let expr = self.expression();
                self.consume(TokenKind::RightParen, "Expect ')' after expression.");
                expr
            }
            _ => {
                // Skip the bad token so it is reported once; `end` must stay
                // for the rules waiting on it.
                self.error_at(&token, "Expect expression.");
                if token.kind != TokenKind::End {
                    self.advance();
                }
                Expression::Variable("<error>".to_string())
            }
        }
    }

    fn peek(&mut self) -> &Token<'a> {
        let lexer = &mut self.lexer;
        self.current.get_or_insert_with(|| lexer.next_token())
    }

    fn check(&mut self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn advance(&mut self) -> Token<'a> {
        match self.current.take() {
            Some(token) => token,
            None => self.lexer.next_token(),
        }
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if !self.check(kind) {
            return false;
        }
        self.advance();
        true
    }

    /// Takes the next token, reporting an error if it is not `kind`. The
    /// token is consumed either way so the parser always makes progress.
    fn consume(&mut self, kind: TokenKind, message: &str) -> Token<'a> {
        let token = self.advance();
        if token.kind != kind {
            self.error_at(&token, message);
        }
        token
    }

    fn error_at(&mut self, token: &Token<'a>, message: &str) {
        self.report(SyntaxError::at(token, message));
    }

    fn report(&mut self, error: SyntaxError) {
        if self.errors.is_empty() && error.at_end {
            self.needs_more_input = true;
        }
        self.reporter.report(&error);
        self.errors.push(error);
    }
}
