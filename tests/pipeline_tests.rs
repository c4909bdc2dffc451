// Whole-pipeline tests over the public compile() entry point

use hlc::parser::{Lexer, Parser, TokenKind};

#[test]
fn test_pipeline_lexer() {
    let source = "\nfunction main() {\n    x := 42;\n    print(x);\n}\n";
    let mut lexer = Lexer::new(source);

    let mut token_count = 0;
    loop {
        let tok = lexer.next_token();
        token_count += 1;
        if tok.kind == TokenKind::Eof {
            break;
        }
        assert_ne!(tok.kind, TokenKind::Illegal, "illegal token: {:?}", tok);
    }

    assert!(token_count >= 10, "expected at least 10 tokens, got {}", token_count);
}

#[test]
fn test_pipeline_parser() {
    let source = "\nfunction main() {\n    x := 42;\n    print(x);\n}\n";
    let lexer = Lexer::new(source);
    let mut parser = Parser::new(lexer);
    let program = parser.parse_program();

    assert!(parser.errors().is_empty(), "parser errors: {:?}", parser.errors());
    assert_eq!(program.statements.len(), 1);
}

#[test]
fn test_compile_produces_c() {
    let source = "\nfunction main() {\n    x := 42;\n}\n";
    let code = hlc::compile(source).expect("compilation failed");

    assert!(code.contains("int x = 42"));
    assert!(code.starts_with("#include <stdio.h>"));
}

#[test]
fn test_compile_reports_diagnostics() {
    let source = "function main() {\n    var = 5;\n}";
    let errors = hlc::compile(source).expect_err("expected diagnostics");

    assert!(!errors.is_empty());
    assert!(
        errors[0].starts_with("line 2:"),
        "diagnostics should carry the source line: {:?}",
        errors[0]
    );
}

#[test]
fn test_compile_reports_illegal_token() {
    let source = "function main() {\n    x := 1 | 2;\n}";
    let errors = hlc::compile(source).expect_err("expected diagnostics");

    assert!(
        errors.iter().any(|e| e.contains("no prefix parse function for ILLEGAL")),
        "unexpected diagnostics: {:?}",
        errors
    );
}

#[test]
fn test_compile_full_program() {
    let source = r#"
public struct User {
    public name string;
    public age int;
}

public function (u *User) greet() string {
    return "Hello, " + u.name;
}

function main() {
    user := alloc(User);
    defer free(user);
    user.name = "Ada";
    user.age = 36;
    print(user.greet());
}
"#;

    let code = hlc::compile(source).expect("compilation failed");

    assert!(code.contains("typedef struct User User;"));
    assert!(code.contains("h_string User_greet(User* u);"));
    assert!(code.contains("int main(void)"));
    assert!(code.contains("user->name"));

    // defer free runs before the implicit function exit
    let assign = code.find("(user->age = 36)").expect("missing assignment");
    let free = code.find("free(user);").expect("missing deferred free");
    assert!(assign < free);
}

#[test]
fn test_compile_is_stateless_between_invocations() {
    let source = "function main() {\n    m := map[string]int{\"a\": 1};\n}";

    let first = hlc::compile(source).expect("compilation failed");
    let second = hlc::compile(source).expect("compilation failed");

    assert_eq!(first, second);
}
