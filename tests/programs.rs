use pretty_assertions::assert_eq;
use vox::token::TokenKind;
use vox::{parse_incremental, tokenize, Interpreter, Vox, VoxError};

fn run(source: &str) -> Result<String, VoxError> {
    let mut vox = Vox::with_interpreter(Interpreter::with_buffer());
    vox.run(source)?;
    Ok(vox.interpreter().output())
}

fn output_of(source: &str) -> String {
    run(source).unwrap_or_else(|e| panic!("{:?} failed:\n{}", source, e))
}

fn runtime_error(source: &str) -> String {
    match run(source) {
        Err(VoxError::Runtime(e)) => e.to_string(),
        other => panic!("expected a runtime error from {:?}, got {:?}", source, other),
    }
}

#[test]
fn prints_values() {
    assert_eq!(output_of("print(1 + 2);"), "3\n");
    assert_eq!(output_of("print(\"a\" + \"b\");"), "ab\n");
    assert_eq!(output_of("print(7 % 4); print(1 / 4);"), "3\n0.25\n");
    assert_eq!(output_of("print(1 == 1); print(\"1\" == 1);"), "true\nfalse\n");
}

#[test]
fn recursion() {
    let source = "
        fun fib(n) {
            if (n < 2) return n;
            return fib(n - 1) + fib(n - 2);
        }
        print(fib(15));
    ";
    assert_eq!(output_of(source), "610\n");
}

#[test]
fn closures_keep_their_environment() {
    let source = "
        fun counter() {
            var n = 0;
            fun next() {
                n = n + 1;
                return n;
            }
            return next;
        }
        var a = counter();
        var b = counter();
        a(); a();
        print(a());
        print(b());
    ";
    assert_eq!(output_of(source), "3\n1\n");
}

#[test]
fn while_and_blocks() {
    let source = "
        var i = 0;
        var total = 0;
        while (i < 5) {
            var step = i * 2;
            total = total + step;
            i = i + 1;
        }
        print(total);
    ";
    assert_eq!(output_of(source), "20\n");
}

#[test]
fn logical_operators_return_operands() {
    assert_eq!(output_of("print((1 == 2) or \"x\"); print(1 and 2);"), "x\n2\n");
    assert_eq!(output_of("fun f() {} var n = f(); print(n or 3);"), "3\n");
}

#[test]
fn logical_operators_skip_the_right_side() {
    assert_eq!(output_of("print((1 == 2) and undefined_name);"), "false\n");
    assert_eq!(output_of("fun f() {} print(f() and print(\"no\"));"), "nil\n");
    assert_eq!(output_of("print(1 or print(\"no\"));"), "1\n");
}

#[test]
fn print_returns_its_argument() {
    assert_eq!(output_of("print(print(4) + 1);"), "4\n5\n");
}

#[test]
fn globals_persist_across_runs() {
    let mut vox = Vox::with_interpreter(Interpreter::with_buffer());
    vox.run("var x = 40;").unwrap();
    vox.run("fun add(n) { return x + n; }").unwrap();
    vox.run("print(add(2));").unwrap();
    assert_eq!(vox.interpreter().output(), "42\n");
}

#[test]
fn runtime_errors() {
    assert_eq!(runtime_error("print(y);"), "Undefined variable 'y'.");
    assert_eq!(runtime_error("var a = 1; var a = 2;"), "Variable 'a' is already defined.");
    assert_eq!(runtime_error("fun f(a) {} f(1, 2);"), "Expected 1 arguments but got 2.");
    assert_eq!(runtime_error("1();"), "Can only call functions, not number '1'.");
    assert_eq!(
        runtime_error("1 + \"a\";"),
        "Operands of '+' must be two numbers or two strings, not number and string."
    );
    assert_eq!(runtime_error("return 1;"), "Cannot return from top-level code.");
}

#[test]
fn output_before_a_runtime_error_is_kept() {
    let mut vox = Vox::with_interpreter(Interpreter::with_buffer());
    let result = vox.run("print(1); print(missing); print(2);");
    assert!(matches!(result, Err(VoxError::Runtime(_))));
    assert_eq!(vox.interpreter().output(), "1\n");
}

#[test]
fn syntax_errors_stop_everything() {
    let mut vox = Vox::with_interpreter(Interpreter::with_buffer());
    match vox.run("print(1); var 1 = 2;") {
        Err(VoxError::Syntax(errors)) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].to_string(), "[line 1] Error at '1': Expect variable name.");
        }
        other => panic!("expected a syntax error, got {:?}", other),
    }
    assert_eq!(vox.interpreter().output(), "");
}

#[test]
fn unfinished_source_is_incomplete() {
    for source in &["fun f() {", "print(1", "var x = ", "if (a) b; else"] {
        match parse_incremental(source) {
            Err(VoxError::Incomplete(errors)) => assert!(errors[0].at_end, "{}", source),
            other => panic!("expected {:?} to be incomplete, got {:?}", source, other),
        }
    }
    assert!(matches!(parse_incremental("var = 1"), Err(VoxError::Syntax(_))));
}

#[test]
fn open_string_is_incomplete() {
    match parse_incremental("print(\"abc") {
        Err(VoxError::Incomplete(errors)) => assert!(errors[0].at_end),
        other => panic!("expected an open string to be incomplete, got {:?}", other),
    }

    let mut vox = Vox::with_interpreter(Interpreter::with_buffer());
    let mut source = String::new();
    for line in &["print(\"two", "lines\");"] {
        source.push('\n');
        source.push_str(line);
        match vox.run(&source) {
            Err(VoxError::Incomplete(_)) => continue,
            Ok(()) => source.clear(),
            Err(e) => panic!("{}", e),
        }
    }
    assert_eq!(vox.interpreter().output(), "two\nlines\n");
}

#[test]
fn incomplete_source_runs_once_finished() {
    let mut vox = Vox::with_interpreter(Interpreter::with_buffer());
    let mut source = String::new();
    for line in &["fun twice(x) {", "  return x * 2;", "}", "print(twice(21));"] {
        source.push('\n');
        source.push_str(line);
        match vox.run(&source) {
            Err(VoxError::Incomplete(_)) => continue,
            Ok(()) => source.clear(),
            Err(e) => panic!("{}", e),
        }
    }
    assert_eq!(vox.interpreter().output(), "42\n");
}

#[test]
fn tokenize_ends_with_end() {
    let tokens = tokenize("var x = 1;");
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Var,
            TokenKind::Identifier,
            TokenKind::Equal,
            TokenKind::Number,
            TokenKind::Semicolon,
            TokenKind::End,
        ]
    );
    assert_eq!(tokenize("").len(), 1);
}

#[test]
fn classes_are_declared_not_instantiated() {
    assert_eq!(output_of("class A {} class B < A { f() {} } print(B);"), "<class B < A>\n");
    assert_eq!(runtime_error("class A {} A();"), "Cannot instantiate class 'A'.");
}

#[test]
fn parsed_programs_run_in_the_session() {
    let mut vox = Vox::with_interpreter(Interpreter::with_buffer());
    assert!(matches!(parse_incremental("var a = "), Err(VoxError::Incomplete(_))));
    let program = parse_incremental("var a = 2; print(a * 3);").unwrap();
    vox.execute(&program).unwrap();
    vox.run("print(a);").unwrap();
    assert_eq!(vox.interpreter().output(), "6\n2\n");
}
