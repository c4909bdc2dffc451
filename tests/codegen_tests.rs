// C emission integration tests

use hlc::parser::{Lexer, Parser};
use hlc::Generator;

fn compile(input: &str) -> String {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer);
    let program = parser.parse_program();

    assert!(
        parser.errors().is_empty(),
        "parser errors: {:?}",
        parser.errors()
    );

    let mut generator = Generator::new();
    generator.generate(&program)
}

fn assert_contains(code: &str, needle: &str) {
    assert!(
        code.contains(needle),
        "expected generated code to contain {:?}\n\nGenerated code:\n{}",
        needle,
        code
    );
}

#[test]
fn test_hello_world() {
    let code = compile("function main() {\n    print(\"Hello, world!\");\n}");

    assert_contains(&code, "#include <stdio.h>");
    assert_contains(&code, "int main(void)");
    assert_contains(&code, "printf");
    assert_contains(&code, "Hello, world!");
}

#[test]
fn test_headers() {
    let code = compile("function main() {}");

    let expected = [
        "#include <stdio.h>",
        "#include <stdlib.h>",
        "#include <string.h>",
        "#include <stdbool.h>",
        "typedef char* h_string;",
    ];

    // The fixed prelude lines appear in order at the top of every output
    let mut last = 0;
    for needle in expected {
        let pos = code[last..]
            .find(needle)
            .unwrap_or_else(|| panic!("missing {:?} after offset {}\n\n{}", needle, last, code));
        last += pos + needle.len();
    }
}

#[test]
fn test_string_concat_helper_is_always_present() {
    let code = compile("function main() {}");

    assert_contains(&code, "h_string h_string_concat(h_string a, h_string b) {");
    assert_contains(&code, "memcpy(result + len_a, b, len_b + 1);");
}

#[test]
fn test_variables() {
    let code = compile("function main() {\n    x := 42;\n    const PI := 3.14;\n    var count int = 0;\n}");

    assert_contains(&code, "int x = 42;");
    assert_contains(&code, "const double PI = 3.14");
    assert_contains(&code, "int count = 0;");
}

#[test]
fn test_struct() {
    let code = compile("public struct User {\n    public name string;\n    public age int;\n}");

    assert_contains(&code, "typedef struct User User;");
    assert_contains(&code, "struct User {");
    assert_contains(&code, "h_string name;");
    assert_contains(&code, "int age;");
}

#[test]
fn test_struct_declarations_precede_bodies() {
    let code = compile(
        "struct A {\n    x int;\n}\n\nstruct B {\n    a *A;\n}\n\nfunction main() {}",
    );

    let fwd_a = code.find("typedef struct A A;").expect("missing forward decl");
    let fwd_b = code.find("typedef struct B B;").expect("missing forward decl");
    let body_a = code.find("struct A {").expect("missing body");
    let main_body = code.find("int main(void) {").expect("missing main");

    assert!(fwd_a < body_a);
    assert!(fwd_b < body_a);
    assert!(body_a < main_body);
}

#[test]
fn test_function() {
    let code = compile("function add(a int, b int) int {\n    return a + b;\n}");

    assert_contains(&code, "int add(int a, int b)");
    assert_contains(&code, "return (a + b);");
}

#[test]
fn test_method() {
    let code = compile(
        "public struct User {\n    public name string;\n}\n\npublic function (u *User) greet() string {\n    return \"hello\";\n}",
    );

    // Methods become free functions with the receiver as first parameter
    assert_contains(&code, "h_string User_greet(User* u)");
}

#[test]
fn test_method_call_mangling() {
    let code = compile(
        r#"
public struct User {
    public name string;
}

public function (u *User) greet() string {
    return "Hello, " + u.name;
}

function main() {
    user := alloc(User);
    print(user.greet());
}
"#,
    );

    assert_contains(&code, "User_greet(user)");
    assert_contains(&code, "printf(\"%s\\n\", User_greet(user))");
    assert_contains(&code, "h_string_concat(\"Hello, \", u->name)");
}

#[test]
fn test_if_statement() {
    let code = compile("function main() {\n    x := 5;\n    if x > 0 {\n        print(\"positive\");\n    }\n}");

    assert_contains(&code, "if ((x > 0))");
}

#[test]
fn test_if_else_statement() {
    let code = compile(
        "function main() {\n    x := 5;\n    if x > 0 {\n        print(\"positive\");\n    } else {\n        print(\"non-positive\");\n    }\n}",
    );

    assert_contains(&code, "if ((x > 0))");
    assert_contains(&code, "} else {");
}

#[test]
fn test_for_loop() {
    let code = compile("function main() {\n    for i := 0; i < 10; i++ {\n        print(i);\n    }\n}");

    assert_contains(&code, "for (int i = 0; (i < 10); (i++))");
}

#[test]
fn test_while_loop() {
    let code = compile("function main() {\n    x := 0;\n    while x < 10 {\n        x++;\n    }\n}");

    assert_contains(&code, "while ((x < 10))");
}

#[test]
fn test_alloc() {
    let code = compile(
        "public struct User {\n    public name string;\n}\n\nfunction main() {\n    user := alloc(User);\n}",
    );

    assert_contains(&code, "(User*)malloc(sizeof(User))");
}

#[test]
fn test_free() {
    let code = compile(
        "public struct User {\n    public name string;\n}\n\nfunction main() {\n    user := alloc(User);\n    free(user);\n}",
    );

    assert_contains(&code, "free(user);");
}

#[test]
fn test_defer_with_return_capture() {
    let code = compile(
        "public struct Data {\n    public value int;\n}\n\nfunction process() int {\n    x := alloc(Data);\n    defer free(x);\n    return 1;\n}",
    );

    // The return value is captured, deferred statements run, then the
    // captured value is returned
    let capture = code.find("int __ret_val = 1;").expect("missing capture");
    let free = code.find("free(x);").expect("missing deferred free");
    let ret = code.find("return __ret_val;").expect("missing return");

    assert!(capture < free);
    assert!(free < ret);
}

#[test]
fn test_defer_lifo_order() {
    let code = compile(
        "function test() {\n    defer print(\"first\");\n    defer print(\"second\");\n    defer print(\"third\");\n}",
    );

    let first = code
        .find("printf(\"%s\\n\", \"first\")")
        .expect("missing first");
    let second = code
        .find("printf(\"%s\\n\", \"second\")")
        .expect("missing second");
    let third = code
        .find("printf(\"%s\\n\", \"third\")")
        .expect("missing third");

    assert!(third < second, "defer should emit in LIFO order");
    assert!(second < first, "defer should emit in LIFO order");
}

#[test]
fn test_defer_without_return_value() {
    let code = compile("function tidy() {\n    defer print(\"done\");\n    return;\n}");

    let printf = code
        .find("printf(\"%s\\n\", \"done\")")
        .expect("missing deferred print");
    let ret = code.find("return;").expect("missing return");

    assert!(printf < ret);
    assert!(!code.contains("__ret_val"));
}

#[test]
fn test_cast() {
    let code = compile("function main() {\n    x := 3.7;\n    y := (int)x;\n}");

    assert_contains(&code, "((int)x)");
}

#[test]
fn test_pointers() {
    let code = compile("function main() {\n    x := 42;\n    ptr := &x;\n    y := *ptr;\n}");

    assert_contains(&code, "(&x)");
    assert_contains(&code, "(*ptr)");
    assert_contains(&code, "int* ptr");
}

#[test]
fn test_pointer_aware_member_access() {
    let code = compile(
        r#"
public struct User {
    public name string;
}

function main() {
    heap := alloc(User);
    heap.name = "a";
    var local User;
    local.name = "b";
}
"#,
    );

    assert_contains(&code, "heap->name");
    assert_contains(&code, "local.name");
}

#[test]
fn test_compound_assignment() {
    let code = compile(
        "function main() {\n    x := 10;\n    x += 5;\n    x -= 2;\n    x *= 3;\n    x /= 2;\n}",
    );

    assert_contains(&code, "(x += 5)");
    assert_contains(&code, "(x -= 2)");
    assert_contains(&code, "(x *= 3)");
    assert_contains(&code, "(x /= 2)");
}

#[test]
fn test_boolean_operators() {
    let code = compile(
        "function main() {\n    x := true && false;\n    y := true || false;\n    z := !true;\n}",
    );

    assert_contains(&code, "(true && false)");
    assert_contains(&code, "(true || false)");
    assert_contains(&code, "(!true)");
}

#[test]
fn test_comparison_operators() {
    let code = compile(
        "function main() {\n    a := 1 == 2;\n    b := 1 != 2;\n    c := 1 < 2;\n    d := 1 <= 2;\n    e := 1 > 2;\n    f := 1 >= 2;\n}",
    );

    assert_contains(&code, "(1 == 2)");
    assert_contains(&code, "(1 != 2)");
    assert_contains(&code, "(1 < 2)");
    assert_contains(&code, "(1 <= 2)");
    assert_contains(&code, "(1 > 2)");
    assert_contains(&code, "(1 >= 2)");
}

#[test]
fn test_null_check() {
    let code = compile(
        "public struct User {\n    public name string;\n}\n\nfunction main() {\n    user := alloc(User);\n    if user != null {\n        print(\"not null\");\n    }\n}",
    );

    assert_contains(&code, "(user != NULL)");
}

#[test]
fn test_increment_decrement() {
    let code = compile("function main() {\n    x := 0;\n    x++;\n    x--;\n}");

    assert_contains(&code, "(x++)");
    assert_contains(&code, "(x--)");
}

#[test]
fn test_string_concat() {
    let code = compile("function main() {\n    name := \"world\";\n    msg := \"hello \" + name;\n}");

    assert_contains(&code, "h_string_concat(\"hello \", name)");
}

#[test]
fn test_print_formats() {
    let code = compile(
        "function main() {\n    s := \"text\";\n    print(s);\n    print(42);\n    print(3.5);\n    print(true);\n}",
    );

    assert_contains(&code, "printf(\"%s\\n\", s)");
    assert_contains(&code, "printf(\"%d\\n\", 42)");
    assert_contains(&code, "printf(\"%f\\n\", 3.5)");
    assert_contains(&code, "printf(\"%s\\n\", true ? \"true\" : \"false\")");
}

#[test]
fn test_print_without_arguments() {
    let code = compile("function main() {\n    print();\n}");

    assert_contains(&code, "printf(\"\\n\")");
}

#[test]
fn test_function_forward_declaration() {
    let code = compile(
        "function main() {\n    x := add(1, 2);\n}\n\nfunction add(a int, b int) int {\n    return a + b;\n}",
    );

    let decl_pos = code
        .find("int add(int a, int b);")
        .expect("missing forward declaration");
    let main_pos = code.find("int main(void) {").expect("missing main");

    assert!(decl_pos < main_pos, "forward declaration should come before main");
}

#[test]
fn test_fixed_array() {
    let code = compile("function main() {\n    arr := [5]int{1, 2, 3, 4, 5};\n}");

    assert_contains(&code, "int arr[5] = {1, 2, 3, 4, 5}");
}

#[test]
fn test_slice_literal() {
    let code = compile("function main() {\n    nums := []int{10, 20, 30};\n}");

    assert_contains(&code, "int nums[] = {10, 20, 30}");
}

#[test]
fn test_empty_slice_literal() {
    let code = compile("function main() {\n    nums := []int{};\n}");

    assert_contains(&code, "int* nums = NULL;");
}

#[test]
fn test_array_indexing() {
    let code = compile(
        "function main() {\n    arr := [3]int{1, 2, 3};\n    x := arr[0];\n    arr[1] = 100;\n}",
    );

    assert_contains(&code, "arr[0]");
    assert_contains(&code, "arr[1]");
}

#[test]
fn test_len_function() {
    let code = compile("function main() {\n    arr := [5]int{1, 2, 3, 4, 5};\n    size := len(arr);\n}");

    assert_contains(&code, "sizeof(arr)/sizeof(arr[0])");
}

#[test]
fn test_len_of_string_literal() {
    let code = compile("function main() {\n    n := len(\"hello\");\n}");

    assert_contains(&code, "strlen(\"hello\")");
}

#[test]
fn test_make_slice() {
    let code = compile("function main() {\n    buf := make([]int, 10);\n}");

    assert_contains(&code, "int* buf");
    assert_contains(&code, "calloc(10, sizeof(int))");
}

#[test]
fn test_for_range_loop() {
    let code = compile(
        "function main() {\n    arr := [5]int{1, 2, 3, 4, 5};\n    for i, v := range arr {\n        print(v);\n    }\n}",
    );

    assert_contains(&code, "for (int i = 0;");
    assert_contains(&code, "sizeof(arr)/sizeof(arr[0])");
    assert_contains(&code, "int v = arr[i];");
}

#[test]
fn test_for_range_index_only() {
    let code = compile(
        "function main() {\n    arr := [3]int{10, 20, 30};\n    for i := range arr {\n        print(i);\n    }\n}",
    );

    assert_contains(&code, "for (int i = 0;");
    assert_contains(&code, "sizeof(arr)/sizeof(arr[0])");
}

#[test]
fn test_for_range_blank_index() {
    let code = compile(
        "function main() {\n    arr := [3]int{10, 20, 30};\n    for _, v := range arr {\n        print(v);\n    }\n}",
    );

    assert_contains(&code, "for (int _i = 0;");
    assert_contains(&code, "int v = arr[_i];");
}

#[test]
fn test_break_statement() {
    let code = compile(
        "function main() {\n    for i := 0; i < 10; i++ {\n        if i == 5 {\n            break;\n        }\n    }\n}",
    );

    assert_contains(&code, "break;");
}

#[test]
fn test_continue_statement() {
    let code = compile(
        "function main() {\n    for i := 0; i < 10; i++ {\n        if i == 5 {\n            continue;\n        }\n    }\n}",
    );

    assert_contains(&code, "continue;");
}

#[test]
fn test_enum() {
    let code = compile("enum Color {\n    Red,\n    Green,\n    Blue\n}");

    assert_contains(&code, "typedef enum {");
    assert_contains(&code, "Color_Red");
    assert_contains(&code, "Color_Green");
    assert_contains(&code, "Color_Blue");
    assert_contains(&code, "} Color;");
}

#[test]
fn test_enum_with_values() {
    let code = compile("enum Status {\n    Pending = 0,\n    Active = 1,\n    Cancelled = 100\n}");

    assert_contains(&code, "Status_Pending = 0");
    assert_contains(&code, "Status_Active = 1");
    assert_contains(&code, "Status_Cancelled = 100");
}

#[test]
fn test_enum_usage() {
    let code = compile(
        "enum Color {\n    Red,\n    Green,\n    Blue\n}\n\nfunction main() {\n    c := Color_Red;\n    if c == Color_Red {\n        print(1);\n    }\n}",
    );

    assert_contains(&code, "int c = Color_Red;");
    assert_contains(&code, "(c == Color_Red)");
}

#[test]
fn test_map_literal() {
    let code = compile(
        "function main() {\n    ages := map[string]int{\"Alice\": 30, \"Bob\": 25};\n    print(ages[\"Alice\"]);\n}",
    );

    assert_contains(&code, "h_map* ages = h_map_new();");
    assert_contains(&code, "h_map_set(ages,");
    assert_contains(&code, "h_map_get(ages,");
}

#[test]
fn test_map_assignment() {
    let code = compile(
        "function main() {\n    ages := map[string]int{};\n    ages[\"Charlie\"] = 35;\n}",
    );

    assert_contains(&code, "h_map* ages = h_map_new();");
    assert_contains(&code, "h_map_set(ages, \"Charlie\", &(int){35});");
}

#[test]
fn test_map_delete() {
    let code = compile(
        "function main() {\n    ages := map[string]int{\"Alice\": 30};\n    delete(ages, \"Alice\");\n}",
    );

    assert_contains(&code, "h_map_delete(ages,");
}

#[test]
fn test_map_len() {
    let code = compile(
        "function main() {\n    ages := map[string]int{\"Alice\": 30, \"Bob\": 25};\n    count := len(ages);\n}",
    );

    assert_contains(&code, "h_map_len(ages)");
}

#[test]
fn test_map_free() {
    let code = compile("function main() {\n    ages := map[string]int{};\n    free(ages);\n}");

    assert_contains(&code, "h_map_free(ages);");
}

#[test]
fn test_map_helpers() {
    let code = compile("function main() {\n    m := map[string]int{};\n}");

    assert_contains(&code, "typedef struct h_map_entry");
    assert_contains(&code, "typedef struct {");
    assert_contains(&code, "h_map* h_map_new()");
    assert_contains(&code, "void h_map_set(h_map* m,");
    assert_contains(&code, "void* h_map_get(h_map* m,");
    assert_contains(&code, "void h_map_delete(h_map* m,");
    assert_contains(&code, "int h_map_len(h_map* m)");
    assert_contains(&code, "void h_map_free(h_map* m)");
}

#[test]
fn test_map_runtime_only_when_used() {
    let code = compile("function main() {\n    x := 1;\n}");

    assert!(
        !code.contains("h_map_new"),
        "map runtime should not be emitted without map usage"
    );
}

#[test]
fn test_global_declarations() {
    let code = compile("var limit int = 100;\n\nfunction main() {\n    print(limit);\n}");

    let global = code.find("int limit = 100;").expect("missing global");
    let main_pos = code.find("int main(void)").expect("missing main");

    assert!(global < main_pos);
}

#[test]
fn test_import_emits_nothing() {
    let code = compile("import \"math.hl\";\n\nfunction main() {}");

    assert!(!code.contains("math.hl"));
}

#[test]
fn test_void_function_without_return_type() {
    let code = compile("function helper() {\n    print(1);\n}\n\nfunction main() {}");

    assert_contains(&code, "void helper(void)");
}
