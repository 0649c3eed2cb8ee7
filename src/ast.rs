use std::rc::Rc;
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum UnaryOp {
    #[strum(to_string = "+")]
    Plus,
    #[strum(to_string = "-")]
    Minus,
    #[strum(to_string = "!")]
    Not,
}

#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum BinaryOp {
    #[strum(to_string = "+")] Add,
    #[strum(to_string = "-")] Subtract,
    #[strum(to_string = "*")] Multiply,
    #[strum(to_string = "/")] Divide,
    #[strum(to_string = "%")] Remainder,
    #[strum(to_string = "==")] Equal,
    #[strum(to_string = "!=")] NotEqual,
    #[strum(to_string = "<")] Less,
    #[strum(to_string = "<=")] LessEqual,
    #[strum(to_string = ">")] Greater,
    #[strum(to_string = ">=")] GreaterEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LogicalOp {
    #[strum(to_string = "and")]
    And,
    #[strum(to_string = "or")]
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Number(f64),
    String(String),
    Variable(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },
    Binary {
        left: Box<Expression>,
        op: BinaryOp,
        right: Box<Expression>,
    },
    Logical {
        left: Box<Expression>,
        op: LogicalOp,
        right: Box<Expression>,
    },
    Call {
        callee: Box<Expression>,
        args: Vec<Expression>,
    },
    Property {
        object: Box<Expression>,
        name: String,
    },
    Assign {
        target: Box<Expression>,
        value: Box<Expression>,
    },
}

impl Expression {
    pub fn unary(op: UnaryOp, operand: Expression) -> Expression {
        Expression::Unary {
            op,
            operand: Box::new(operand),
        }
    }
    pub fn binary(left: Expression, op: BinaryOp, right: Expression) -> Expression {
        Expression::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }
    pub fn logical(left: Expression, op: LogicalOp, right: Expression) -> Expression {
        Expression::Logical {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }
}

/// A named function: shared between the AST and every closure created from it.
#[derive(Debug, PartialEq)]
pub struct FunDecl {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Expression(Expression),
    Block(Vec<Statement>),
    If {
        condition: Expression,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
    },
    While {
        condition: Expression,
        body: Box<Statement>,
    },
    Var {
        name: String,
        initializer: Expression,
    },
    Fun(Rc<FunDecl>),
    Return(Option<Expression>),
    Class {
        name: String,
        superclass: Option<Expression>,
        methods: Vec<Rc<FunDecl>>,
    },
}

pub type Program = Vec<Statement>;
