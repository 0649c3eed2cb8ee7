pub mod ast;
pub mod callable;
pub mod class;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod print;
pub mod printer;
pub mod token;
pub mod value;

pub use crate::error::{RuntimeError, SyntaxError, VoxError};
pub use crate::interpreter::Interpreter;
pub use crate::parser::parse;

use crate::ast::{Program, Statement};
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::token::Token;
use tracing::debug;

/// Every token of `source`, ending with the `end` token.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    Lexer::new(source).collect()
}

/// Like [`parse`], but tells a statement that merely stops early
/// ([`VoxError::Incomplete`]) apart from malformed source.
pub fn parse_incremental(source: &str) -> Result<Program, VoxError> {
    let mut parser = Parser::with_reporter(Lexer::new(source), |_: &SyntaxError| {});
    let program = parser.parse_program();
    if !parser.had_error() {
        return Ok(program);
    }
    debug!(needs_more_input = parser.needs_more_input(), "syntax error");
    if parser.needs_more_input() {
        Err(VoxError::Incomplete(parser.into_errors()))
    } else {
        Err(VoxError::Syntax(parser.into_errors()))
    }
}

/// An interpreter session: globals defined by one `run` are visible to the next.
pub struct Vox {
    interpreter: Interpreter,
}

impl Vox {
    pub fn new() -> Vox {
        Vox::with_interpreter(Interpreter::new())
    }

    pub fn with_interpreter(interpreter: Interpreter) -> Vox {
        Vox { interpreter }
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Parses and runs `source`. Nothing runs if it has a syntax error; when the
    /// source merely stops early the error is [`VoxError::Incomplete`].
    pub fn run(&mut self, source: &str) -> Result<(), VoxError> {
        let program = parse_incremental(source)?;
        self.execute(&program)
    }

    /// Runs an already parsed program in this session.
    pub fn execute(&mut self, program: &[Statement]) -> Result<(), VoxError> {
        self.interpreter.interpret(program)?;
        Ok(())
    }
}

impl Default for Vox {
    fn default() -> Vox {
        Vox::new()
    }
}
