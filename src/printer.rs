//! Canonical, fully parenthesized rendering of the AST.
//!
//! Only used to make parser output easy to assert on and to show with
//! `vox --ast`; the interpreter never goes through here.

use crate::ast::{Expression, FunDecl, Statement};

pub fn print_program(statements: &[Statement]) -> String {
    statements
        .iter()
        .map(print_statement)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn print_statement(stmt: &Statement) -> String {
    match stmt {
        Statement::Expression(e) => parenthesize(";", &[print_expression(e)]),
        Statement::Block(stmts) => block(stmts),
        Statement::If {
            condition,
            then_branch,
            else_branch,
        } => {
            let mut parts = vec![
                print_expression(condition),
                "then".to_string(),
                print_statement(then_branch),
            ];
            if let Some(else_branch) = else_branch {
                parts.push("else".to_string());
                parts.push(print_statement(else_branch));
            }
            parenthesize("if", &parts)
        }
        Statement::While { condition, body } => {
            parenthesize("while", &[print_expression(condition), print_statement(body)])
        }
        Statement::Var { name, initializer } => parenthesize(
            "var",
            &[name.clone(), "=".to_string(), print_expression(initializer)],
        ),
        Statement::Fun(declaration) => function(declaration),
        Statement::Return(None) => "(return)".to_string(),
        Statement::Return(Some(value)) => parenthesize("return", &[print_expression(value)]),
        Statement::Class {
            name,
            superclass,
            methods,
        } => {
            let mut parts = vec![name.clone()];
            if let Some(superclass) = superclass {
                parts.push(print_expression(superclass));
            }
            let methods: Vec<String> = methods.iter().map(|m| function(m)).collect();
            parts.push(format!("({})", methods.join(" ")));
            parenthesize("class", &parts)
        }
    }
}

pub fn print_expression(expr: &Expression) -> String {
    match expr {
        Expression::Number(x) => format!("{}", x),
        Expression::String(x) => x.clone(),
        Expression::Variable(name) => name.clone(),
        Expression::Unary { op, operand } => {
            parenthesize(&op.to_string(), &[print_expression(operand)])
        }
        Expression::Binary { left, op, right } => parenthesize(
            &op.to_string(),
            &[print_expression(left), print_expression(right)],
        ),
        Expression::Logical { left, op, right } => parenthesize(
            &op.to_string(),
            &[print_expression(left), print_expression(right)],
        ),
        Expression::Call { callee, args } => {
            let mut parts = vec![print_expression(callee)];
            parts.extend(args.iter().map(print_expression));
            parenthesize("call", &parts)
        }
        Expression::Property { object, name } => {
            parenthesize(&format!(".{}", name), &[print_expression(object)])
        }
        Expression::Assign { target, value } => {
            parenthesize("=", &[print_expression(target), print_expression(value)])
        }
    }
}

fn function(declaration: &FunDecl) -> String {
    parenthesize(
        "fun",
        &[
            declaration.name.clone(),
            format!("({})", declaration.params.join(" ")),
            block(&declaration.body),
        ],
    )
}

fn block(stmts: &[Statement]) -> String {
    let parts: Vec<String> = stmts.iter().map(print_statement).collect();
    parenthesize("block", &parts)
}

fn parenthesize(name: &str, parts: &[String]) -> String {
    let mut x = String::from("(");
    x.push_str(name);
    for part in parts {
        x.push(' ');
        x.push_str(part);
    }
    x.push(')');
    x
}
