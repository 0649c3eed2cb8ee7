use std::fmt;
use std::rc::Rc;

/// What a `class` declaration evaluates to. Classes are declarations only:
/// they cannot be instantiated and carry no method dispatch.
#[derive(Debug)]
pub struct Class {
    name: String,
    superclass: Option<Rc<Class>>,
    methods: Vec<String>,
}

impl Class {
    pub fn new(name: String, superclass: Option<Rc<Class>>, methods: Vec<String>) -> Class {
        Class {
            name,
            superclass,
            methods,
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn superclass(&self) -> Option<&Rc<Class>> {
        self.superclass.as_ref()
    }
    /// Names of the declared methods, in source order.
    pub fn methods(&self) -> &[String] {
        &self.methods
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.superclass {
            Some(superclass) => write!(f, "<class {} < {}>", self.name, superclass.name),
            None => write!(f, "<class {}>", self.name),
        }
    }
}
