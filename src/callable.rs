use crate::ast::FunDecl;
use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::interpreter::{Flow, Interpreter};
use crate::value::Value;
use std::fmt;
use std::rc::Rc;

/// A user function together with the scope it was declared in.
#[derive(Clone)]
pub struct Function {
    declaration: Rc<FunDecl>,
    closure: Environment,
}

impl Function {
    pub fn new(declaration: Rc<FunDecl>, closure: Environment) -> Function {
        Function {
            declaration,
            closure,
        }
    }
    pub fn name(&self) -> &str {
        &self.declaration.name
    }
    pub fn arity(&self) -> usize {
        self.declaration.params.len()
    }
    /// Runs the body in a fresh scope whose parent is the closure, not the
    /// caller's scope. Arity has already been checked by the caller.
    pub fn call(
        &self,
        interpreter: &mut Interpreter,
        arguments: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let environment = self.closure.new_child();
        for (param, argument) in self.declaration.params.iter().zip(arguments) {
            environment.define(param, argument)?;
        }
        match interpreter.execute_block(&self.declaration.body, environment.new_child())? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(Value::Nil),
        }
    }
    pub fn equals(&self, other: &Function) -> bool {
        Rc::ptr_eq(&self.declaration, &other.declaration) && self.closure.equals(&other.closure)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name())
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}/{}>", self.name(), self.arity())
    }
}

pub type NativeFn = fn(&mut Interpreter, &[Value]) -> Result<Value, RuntimeError>;

#[derive(Clone)]
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub call: NativeFn,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}/{}>", self.name, self.arity)
    }
}

impl fmt::Display for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}
