use crate::error::RuntimeError;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// One lexical scope plus a link to the scope it is nested in.
///
/// Cloning an `Environment` shares the scope, so a closure and the
/// interpreter see the same bindings.
#[derive(Clone)]
pub struct Environment {
    scope: Rc<RefCell<Scope>>,
}

struct Scope {
    outer: Option<Environment>,
    bindings: BTreeMap<String, Value>,
}

impl Environment {
    pub fn new() -> Environment {
        Environment::with_outer(None)
    }

    fn with_outer(outer: Option<Environment>) -> Environment {
        Environment {
            scope: Rc::new(RefCell::new(Scope {
                outer,
                bindings: BTreeMap::new(),
            })),
        }
    }

    pub fn new_child(&self) -> Environment {
        Environment::with_outer(Some(self.clone()))
    }

    /// Binds `name` in this scope only. Redeclaring it here is an error;
    /// shadowing an outer binding is not.
    pub fn define(&self, name: &str, value: Value) -> Result<(), RuntimeError> {
        let mut scope = self.scope.borrow_mut();
        if scope.bindings.contains_key(name) {
            return Err(RuntimeError::already_defined(name));
        }
        scope.bindings.insert(name.to_string(), value);
        Ok(())
    }

    /// Binds `name` in this scope, replacing any binding it already has here.
    pub fn bind(&self, name: &str, value: Value) {
        self.scope
            .borrow_mut()
            .bindings
            .insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Result<Value, RuntimeError> {
        let mut current = Some(self.clone());
        while let Some(env) = current {
            let scope = env.scope.borrow();
            if let Some(x) = scope.bindings.get(name) {
                return Ok(x.clone());
            }
            current = scope.outer.clone();
        }
        Err(RuntimeError::undefined_variable(name))
    }

    pub fn assign(&self, name: &str, value: Value) -> Result<(), RuntimeError> {
        let mut current = Some(self.clone());
        while let Some(env) = current {
            let mut scope = env.scope.borrow_mut();
            if let Some(x) = scope.bindings.get_mut(name) {
                *x = value;
                return Ok(());
            }
            current = scope.outer.clone();
        }
        Err(RuntimeError::undefined_variable(name))
    }

    pub fn is_defined_here(&self, name: &str) -> bool {
        self.scope.borrow().bindings.contains_key(name)
    }

    pub fn equals(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.scope, &other.scope)
    }
}

impl Default for Environment {
    fn default() -> Environment {
        Environment::new()
    }
}

// Bindings can hold closures over this very scope, so only the names are shown.
impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.scope.borrow();
        f.debug_struct("Environment")
            .field("bindings", &scope.bindings.keys().collect::<Vec<_>>())
            .field("outer", &scope.outer)
            .finish()
    }
}
