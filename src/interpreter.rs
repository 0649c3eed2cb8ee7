use crate::ast::{BinaryOp, Expression, LogicalOp, Statement, UnaryOp};
use crate::callable::{Function, NativeFunction};
use crate::class::Class;
use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::print::PrintHandler;
use crate::value::Value;
use std::rc::Rc;
use tracing::{debug, trace};

/// How a statement finished. `Return` unwinds enclosing blocks up to the
/// nearest function call.
#[derive(Debug, Clone)]
pub enum Flow {
    Normal,
    Return(Value),
}

pub struct Interpreter {
    globals: Environment,
    environment: Environment,
    print_handler: PrintHandler,
    call_depth: usize,
}

impl Interpreter {
    pub fn new() -> Interpreter {
        Interpreter::with_print_handler(PrintHandler::Stdout)
    }

    /// An interpreter whose `print` output is kept in memory; see [`Interpreter::output`].
    pub fn with_buffer() -> Interpreter {
        Interpreter::with_print_handler(PrintHandler::buffer())
    }

    pub fn with_print_handler(print_handler: PrintHandler) -> Interpreter {
        let globals = Environment::new();
        let print = NativeFunction {
            name: "print",
            arity: 1,
            call: native_print,
        };
        globals.bind(print.name, Value::Native(print));
        Interpreter {
            environment: globals.clone(),
            globals,
            print_handler,
            call_depth: 0,
        }
    }

    pub fn globals(&self) -> &Environment {
        &self.globals
    }

    pub fn output(&self) -> String {
        self.print_handler.output()
    }

    pub fn clear_output(&self) {
        self.print_handler.clear()
    }

    /// Runs top-level statements against the global scope.
    pub fn interpret(&mut self, statements: &[Statement]) -> Result<(), RuntimeError> {
        debug!(statements = statements.len(), "interpret");
        for stmt in statements {
            if let Flow::Return(_) = self.execute(stmt)? {
                return Err(RuntimeError::new("Cannot return from top-level code."));
            }
        }
        Ok(())
    }

    pub fn execute(&mut self, stmt: &Statement) -> Result<Flow, RuntimeError> {
        match stmt {
            Statement::Expression(e) => {
                self.evaluate(e)?;
                Ok(Flow::Normal)
            }
            Statement::Block(stmts) => {
                let environment = self.environment.new_child();
                self.execute_block(stmts, environment)
            }
            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            }
            Statement::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    if let Flow::Return(value) = self.execute(body)? {
                        return Ok(Flow::Return(value));
                    }
                }
                Ok(Flow::Normal)
            }
            Statement::Var { name, initializer } => {
                let value = self.evaluate(initializer)?;
                self.environment.define(name, value)?;
                Ok(Flow::Normal)
            }
            Statement::Fun(declaration) => {
                let function = Function::new(declaration.clone(), self.environment.clone());
                self.environment
                    .define(&declaration.name, Value::Function(function))?;
                Ok(Flow::Normal)
            }
            Statement::Return(value) => {
                let value = match value {
                    Some(e) => self.evaluate(e)?,
                    None => Value::Nil,
                };
                Ok(Flow::Return(value))
            }
            Statement::Class {
                name,
                superclass,
                methods,
            } => {
                let superclass = match superclass {
                    None => None,
                    Some(e) => match self.evaluate(e)? {
                        Value::Class(class) => Some(class),
                        other => {
                            return Err(RuntimeError::new(format!(
                                "Superclass of '{}' must be a class, not {} '{}'.",
                                name,
                                other.type_name(),
                                other
                            )))
                        }
                    },
                };
                let methods = methods.iter().map(|m| m.name.clone()).collect();
                let class = Class::new(name.clone(), superclass, methods);
                self.environment.define(name, Value::Class(Rc::new(class)))?;
                Ok(Flow::Normal)
            }
        }
    }

    /// Runs `statements` with `environment` as the current scope, restoring
    /// the previous scope afterwards even when a statement fails.
    pub fn execute_block(
        &mut self,
        statements: &[Statement],
        environment: Environment,
    ) -> Result<Flow, RuntimeError> {
        trace!(statements = statements.len(), "enter scope");
        let previous = std::mem::replace(&mut self.environment, environment);
        let result = self.execute_all(statements);
        self.environment = previous;
        result
    }

    fn execute_all(&mut self, statements: &[Statement]) -> Result<Flow, RuntimeError> {
        for stmt in statements {
            if let Flow::Return(value) = self.execute(stmt)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    pub fn evaluate(&mut self, expr: &Expression) -> Result<Value, RuntimeError> {
        match expr {
            Expression::Number(x) => Ok(Value::Number(*x)),
            Expression::String(x) => Ok(Value::String(x.clone())),
            Expression::Variable(name) => self.environment.get(name),
            Expression::Unary { op, operand } => {
                let value = self.evaluate(operand)?;
                unary(*op, value)
            }
            Expression::Binary { left, op, right } => {
                let lv = self.evaluate(left)?;
                let rv = self.evaluate(right)?;
                binary(*op, lv, rv)
            }
            Expression::Logical { left, op, right } => {
                let left = self.evaluate(left)?;
                match op {
                    LogicalOp::Or if left.is_truthy() => Ok(left),
                    LogicalOp::And if !left.is_truthy() => Ok(left),
                    _ => self.evaluate(right),
                }
            }
            Expression::Call { callee, args } => {
                let callee = self.evaluate(callee)?;
                let mut arguments = Vec::with_capacity(args.len());
                for arg in args {
                    arguments.push(self.evaluate(arg)?);
                }
                self.call(callee, arguments)
            }
            Expression::Property { object, name } => {
                let object = self.evaluate(object)?;
                Err(RuntimeError::no_property(&object, name))
            }
            Expression::Assign { target, value } => {
                let value = self.evaluate(value)?;
                match target.as_ref() {
                    Expression::Variable(name) => {
                        self.environment.assign(name, value.clone())?;
                        Ok(value)
                    }
                    Expression::Property { object, name } => {
                        let object = self.evaluate(object)?;
                        Err(RuntimeError::no_property(&object, name))
                    }
                    _ => Err(RuntimeError::new("Invalid assignment target.")),
                }
            }
        }
    }

    fn call(&mut self, callee: Value, arguments: Vec<Value>) -> Result<Value, RuntimeError> {
        match callee {
            Value::Native(native) => {
                check_arity(native.arity, arguments.len())?;
                (native.call)(self, &arguments)
            }
            Value::Function(function) => {
                check_arity(function.arity(), arguments.len())?;
                self.call_depth += 1;
                debug!(function = function.name(), depth = self.call_depth, "call");
                let result = function.call(self, arguments);
                self.call_depth -= 1;
                result
            }
            Value::Class(class) => Err(RuntimeError::new(format!(
                "Cannot instantiate class '{}'.",
                class.name()
            ))),
            other => Err(RuntimeError::not_callable(&other)),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Interpreter {
        Interpreter::new()
    }
}

fn native_print(interpreter: &mut Interpreter, arguments: &[Value]) -> Result<Value, RuntimeError> {
    let value = arguments.first().cloned().unwrap_or(Value::Nil);
    interpreter.print_handler.println(&value.to_string());
    Ok(value)
}

fn check_arity(expected: usize, got: usize) -> Result<(), RuntimeError> {
    if expected != got {
        return Err(RuntimeError::arity(expected, got));
    }
    Ok(())
}

fn unary(op: UnaryOp, value: Value) -> Result<Value, RuntimeError> {
    match (op, value) {
        (UnaryOp::Not, value) => Ok(Value::Boolean(!value.is_truthy())),
        (UnaryOp::Plus, Value::Number(x)) => Ok(Value::Number(x)),
        (UnaryOp::Minus, Value::Number(x)) => Ok(Value::Number(-x)),
        (op, value) => Err(RuntimeError::new(format!(
            "Operand of '{}' must be a number, not {}.",
            op,
            value.type_name()
        ))),
    }
}

fn binary(op: BinaryOp, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match (op, left, right) {
        (BinaryOp::Equal, l, r) => Ok(Value::Boolean(l.equals(&r))),
        (BinaryOp::NotEqual, l, r) => Ok(Value::Boolean(!l.equals(&r))),
        (BinaryOp::Add, Value::String(mut l), Value::String(r)) => {
            l.push_str(&r);
            Ok(Value::String(l))
        }
        (op, Value::Number(l), Value::Number(r)) => Ok(match op {
            BinaryOp::Add => Value::Number(l + r),
            BinaryOp::Subtract => Value::Number(l - r),
            BinaryOp::Multiply => Value::Number(l * r),
            BinaryOp::Divide => Value::Number(l / r),
            BinaryOp::Remainder => Value::Number(l % r),
            _ => Value::Boolean(compare(op, &l, &r)),
        }),
        (op, Value::String(l), Value::String(r)) if is_comparison(op) => {
            Ok(Value::Boolean(compare(op, &l, &r)))
        }
        (BinaryOp::Add, l, r) => Err(RuntimeError::new(format!(
            "Operands of '+' must be two numbers or two strings, not {} and {}.",
            l.type_name(),
            r.type_name()
        ))),
        (op, l, r) => Err(RuntimeError::new(format!(
            "Operands of '{}' must be numbers, not {} and {}.",
            op,
            l.type_name(),
            r.type_name()
        ))),
    }
}

fn is_comparison(op: BinaryOp) -> bool {
    match op {
        BinaryOp::Less | BinaryOp::LessEqual | BinaryOp::Greater | BinaryOp::GreaterEqual => true,
        _ => false,
    }
}

// Only reached with comparison operators; equality is handled before.
fn compare<T: PartialOrd + ?Sized>(op: BinaryOp, l: &T, r: &T) -> bool {
    match op {
        BinaryOp::Less => l < r,
        BinaryOp::LessEqual => l <= r,
        BinaryOp::Greater => l > r,
        _ => l >= r,
    }
}
