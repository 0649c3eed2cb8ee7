//! Where the native `print` writes.
//!
//! Scripts run from the command line print to stdout; tests and embedders can
//! capture the output in a buffer instead.

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Debug)]
pub enum PrintHandler {
    Stdout,
    Buffer(Rc<RefCell<String>>),
}

impl PrintHandler {
    pub fn buffer() -> PrintHandler {
        PrintHandler::Buffer(Rc::new(RefCell::new(String::new())))
    }

    pub fn println(&self, msg: &str) {
        match self {
            PrintHandler::Stdout => println!("{}", msg),
            PrintHandler::Buffer(buffer) => {
                let mut buffer = buffer.borrow_mut();
                buffer.push_str(msg);
                buffer.push('\n');
            }
        }
    }

    /// Everything captured so far. Always empty for stdout.
    pub fn output(&self) -> String {
        match self {
            PrintHandler::Stdout => String::new(),
            PrintHandler::Buffer(buffer) => buffer.borrow().clone(),
        }
    }

    pub fn clear(&self) {
        if let PrintHandler::Buffer(buffer) = self {
            buffer.borrow_mut().clear();
        }
    }
}

impl Default for PrintHandler {
    fn default() -> PrintHandler {
        PrintHandler::Stdout
    }
}
