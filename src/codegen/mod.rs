//! C code generation
//!
//! Walks a parsed [`Program`] and produces a single self-contained C99
//! translation unit as text:
//! - [`runtime`]: the fixed prelude (headers, `h_string`, map runtime)
//! - [`types`]: type lowering and the shallow per-expression inference
//! - [`statements`] / [`expressions`]: the lowering of each AST node
//!
//! The generator performs a two-pass walk. Pass one registers struct,
//! enum, and function declarations so later lowering can resolve member
//! access, method mangling, and call return types. Pass two emits, in
//! order: headers and helpers, struct forward declarations, enum
//! definitions, struct bodies, global variables, function forward
//! declarations, and function bodies.
//!
//! The generator has no recoverable errors: callers must not invoke it
//! when the parser reported diagnostics.

mod expressions;
mod runtime;
mod statements;
mod types;

use rustc_hash::FxHashMap;

use crate::parser::ast::{EnumDecl, FunctionDecl, Program, Statement, StructDecl};

/// Generates C code from an H program AST.
pub struct Generator<'a> {
    output: String,
    indent: usize,

    structs: FxHashMap<&'a str, &'a StructDecl>,
    functions: FxHashMap<&'a str, &'a FunctionDecl>,
    enums: FxHashMap<&'a str, &'a EnumDecl>,

    // Lowered C types of global declarations, used to seed each function's
    // symbol table.
    globals: FxHashMap<String, String>,
    global_map_values: FxHashMap<String, String>,

    // Per-function state, reset at each function entry.
    pub(crate) variables: FxHashMap<String, String>,
    pub(crate) map_value_types: FxHashMap<String, String>,
    deferred: Vec<&'a Statement>,
}

impl<'a> Default for Generator<'a> {
    fn default() -> Self {
        Generator::new()
    }
}

impl<'a> Generator<'a> {
    pub fn new() -> Self {
        Generator {
            output: String::new(),
            indent: 0,
            structs: FxHashMap::default(),
            functions: FxHashMap::default(),
            enums: FxHashMap::default(),
            globals: FxHashMap::default(),
            global_map_values: FxHashMap::default(),
            variables: FxHashMap::default(),
            map_value_types: FxHashMap::default(),
            deferred: Vec::new(),
        }
    }

    /// Produce the C translation unit for a well-formed program.
    pub fn generate(&mut self, program: &'a Program) -> String {
        // First pass: collect struct, enum, and function declarations
        for stmt in &program.statements {
            match stmt {
                Statement::Struct(s) => {
                    self.structs.insert(s.name.value.as_str(), s);
                }
                Statement::Function(f) => {
                    self.functions.insert(f.name.value.as_str(), f);
                }
                Statement::Enum(e) => {
                    self.enums.insert(e.name.value.as_str(), e);
                }
                _ => {}
            }
        }

        self.write_prelude();

        if program_uses_maps(program) {
            self.write_map_runtime();
        }

        // Struct forward declarations, in declaration order
        for stmt in &program.statements {
            if let Statement::Struct(s) = stmt {
                self.write_line(&format!("typedef struct {} {};", s.name.value, s.name.value));
            }
        }
        if !self.structs.is_empty() {
            self.write_line("");
        }

        // Enum definitions
        for stmt in &program.statements {
            if let Statement::Enum(e) = stmt {
                self.generate_enum(e);
            }
        }

        // Struct definitions
        for stmt in &program.statements {
            if let Statement::Struct(s) = stmt {
                self.generate_struct(s);
            }
        }

        // Global variable declarations
        let mut has_globals = false;
        for stmt in &program.statements {
            if matches!(
                stmt,
                Statement::Var { .. } | Statement::Const { .. } | Statement::Infer { .. }
            ) {
                self.generate_statement(stmt);
                has_globals = true;
            }
        }
        if has_globals {
            self.write_line("");
        }
        self.globals = std::mem::take(&mut self.variables);
        self.global_map_values = std::mem::take(&mut self.map_value_types);

        // Function forward declarations
        for stmt in &program.statements {
            if let Statement::Function(f) = stmt {
                self.generate_function_declaration(f);
            }
        }
        if !self.functions.is_empty() {
            self.write_line("");
        }

        // Function implementations
        for stmt in &program.statements {
            if let Statement::Function(f) = stmt {
                self.generate_function(f);
            }
        }

        std::mem::take(&mut self.output)
    }

    pub(crate) fn write_line(&mut self, s: &str) {
        for _ in 0..self.indent {
            self.output.push_str("    ");
        }
        self.output.push_str(s);
        self.output.push('\n');
    }

    pub(crate) fn indent(&mut self) {
        self.indent += 1;
    }

    pub(crate) fn dedent(&mut self) {
        self.indent -= 1;
    }

    fn generate_struct(&mut self, s: &'a StructDecl) {
        self.write_line(&format!("struct {} {{", s.name.value));
        self.indent();

        for field in &s.fields {
            let c_type = self.type_to_c(&field.ty);
            let decl = declare(&c_type, &field.name.value);
            self.write_line(&format!("{};", decl));
        }

        self.dedent();
        self.write_line("};");
        self.write_line("");
    }

    fn generate_enum(&mut self, e: &'a EnumDecl) {
        self.write_line("typedef enum {");
        self.indent();

        for value in &e.values {
            let mangled = format!("{}_{}", e.name.value, value.name.value);
            match &value.value {
                Some(expr) => {
                    let expr = self.generate_expression(expr);
                    self.write_line(&format!("{} = {},", mangled, expr));
                }
                None => self.write_line(&format!("{},", mangled)),
            }
        }

        self.dedent();
        self.write_line(&format!("}} {};", e.name.value));
        self.write_line("");
    }

    /// Resolved C return type: methods and functions default to `void` when
    /// no annotation is given, except `main` which lowers to `int main`.
    fn return_type_of(&self, f: &FunctionDecl) -> String {
        match &f.return_type {
            Some(ty) => self.type_to_c(ty),
            None if f.name.value == "main" => "int".to_string(),
            None => "void".to_string(),
        }
    }

    /// Mangled C name: methods become `ReceiverType_name` with the
    /// receiver's pointer stripped from the prefix.
    fn function_name_of(&self, f: &FunctionDecl) -> String {
        match &f.receiver {
            Some(recv) => {
                let type_name = recv.ty.name.trim_start_matches('*');
                format!("{}_{}", type_name, f.name.value)
            }
            None => f.name.value.clone(),
        }
    }

    fn generate_function_declaration(&mut self, f: &'a FunctionDecl) {
        let return_type = self.return_type_of(f);
        let func_name = self.function_name_of(f);
        let params = self.generate_params(f);
        self.write_line(&format!("{} {}({});", return_type, func_name, params));
    }

    fn generate_function(&mut self, f: &'a FunctionDecl) {
        let return_type = self.return_type_of(f);
        let func_name = self.function_name_of(f);
        let params = self.generate_params(f);
        self.write_line(&format!("{} {}({}) {{", return_type, func_name, params));
        self.indent();

        // Fresh deferred stack and variable scope for this function
        self.deferred.clear();
        self.variables = self.globals.clone();
        self.map_value_types = self.global_map_values.clone();

        if let Some(recv) = &f.receiver {
            let c_type = self.type_to_c(&recv.ty);
            self.variables.insert(recv.name.value.clone(), c_type);
        }

        for param in &f.parameters {
            let c_type = self.type_to_c(&param.ty);
            self.variables.insert(param.name.value.clone(), c_type);
        }

        self.generate_block(&f.body);

        // Any deferred statements left over run at function end
        self.emit_deferred_statements();
        self.deferred.clear();

        self.dedent();
        self.write_line("}");
        self.write_line("");
    }

    fn generate_params(&mut self, f: &FunctionDecl) -> String {
        let mut params = Vec::new();

        // The receiver becomes the first parameter of a method
        if let Some(recv) = &f.receiver {
            let c_type = self.type_to_c(&recv.ty);
            params.push(declare(&c_type, &recv.name.value));
        }

        for param in &f.parameters {
            let c_type = self.type_to_c(&param.ty);
            params.push(declare(&c_type, &param.name.value));
        }

        if params.is_empty() {
            return "void".to_string();
        }
        params.join(", ")
    }

    pub(crate) fn generate_block(&mut self, block: &'a crate::parser::ast::BlockStatement) {
        for stmt in &block.statements {
            self.generate_statement(stmt);
        }
    }

    /// Emits the deferred statements in reverse registration order (LIFO).
    pub(crate) fn emit_deferred_statements(&mut self) {
        for i in (0..self.deferred.len()).rev() {
            let stmt = self.deferred[i];
            self.generate_statement_direct(stmt);
        }
    }

    pub(crate) fn push_deferred(&mut self, stmt: &'a Statement) {
        self.deferred.push(stmt);
    }

    pub(crate) fn has_deferred(&self) -> bool {
        !self.deferred.is_empty()
    }

    pub(crate) fn lookup_function(&self, name: &str) -> Option<&'a FunctionDecl> {
        self.functions.get(name).copied()
    }

    pub(crate) fn functions_iter(&self) -> impl Iterator<Item = &'a FunctionDecl> + '_ {
        self.functions.values().copied()
    }
}

/// Forms a C declarator from a lowered type and a name, moving any array
/// suffix after the name (`int[5]` + `arr` → `int arr[5]`).
pub(crate) fn declare(c_type: &str, name: &str) -> String {
    match c_type.find('[') {
        Some(i) => format!("{} {}{}", &c_type[..i], name, &c_type[i..]),
        None => format!("{} {}", c_type, name),
    }
}

/// True when any map feature appears in the program: a map literal, a map
/// type annotation, or a `delete` statement. The map runtime is emitted
/// only in that case.
fn program_uses_maps(program: &Program) -> bool {
    use crate::parser::ast::{Expression, TypeAnnotation};

    fn type_uses_maps(ty: &TypeAnnotation) -> bool {
        ty.is_map
    }

    fn expr_uses_maps(expr: &Expression) -> bool {
        match expr {
            Expression::MapLiteral { .. } => true,
            Expression::Prefix { right, .. } => expr_uses_maps(right),
            Expression::Infix { left, right, .. } => {
                expr_uses_maps(left) || expr_uses_maps(right)
            }
            Expression::Postfix { left, .. } => expr_uses_maps(left),
            Expression::Assign { left, value, .. } => {
                expr_uses_maps(left) || expr_uses_maps(value)
            }
            Expression::Call {
                function,
                arguments,
                ..
            } => expr_uses_maps(function) || arguments.iter().any(expr_uses_maps),
            Expression::Index { left, index, .. } => {
                expr_uses_maps(left) || expr_uses_maps(index)
            }
            Expression::Member { object, .. } => expr_uses_maps(object),
            Expression::Cast {
                target_type, value, ..
            } => type_uses_maps(target_type) || expr_uses_maps(value),
            Expression::Alloc { ty, .. } => type_uses_maps(ty),
            Expression::Make {
                ty,
                length,
                capacity,
                ..
            } => {
                type_uses_maps(ty)
                    || length.as_deref().map(expr_uses_maps).unwrap_or(false)
                    || capacity.as_deref().map(expr_uses_maps).unwrap_or(false)
            }
            Expression::ArrayLiteral { ty, elements, .. } => {
                ty.as_ref().map(type_uses_maps).unwrap_or(false)
                    || elements.iter().any(expr_uses_maps)
            }
            _ => false,
        }
    }

    fn stmt_uses_maps(stmt: &Statement) -> bool {
        match stmt {
            Statement::Delete { .. } => true,
            Statement::Var { ty, value, .. } => {
                type_uses_maps(ty) || value.as_ref().map(expr_uses_maps).unwrap_or(false)
            }
            Statement::Const { value, .. } | Statement::Infer { value, .. } => {
                expr_uses_maps(value)
            }
            Statement::Return { value, .. } => {
                value.as_ref().map(expr_uses_maps).unwrap_or(false)
            }
            Statement::If {
                condition,
                consequence,
                alternative,
                ..
            } => {
                expr_uses_maps(condition)
                    || consequence.statements.iter().any(stmt_uses_maps)
                    || alternative
                        .as_ref()
                        .map(|b| b.statements.iter().any(stmt_uses_maps))
                        .unwrap_or(false)
            }
            Statement::For {
                init,
                condition,
                post,
                body,
                ..
            } => {
                init.as_deref().map(stmt_uses_maps).unwrap_or(false)
                    || condition.as_ref().map(expr_uses_maps).unwrap_or(false)
                    || post.as_deref().map(stmt_uses_maps).unwrap_or(false)
                    || body.statements.iter().any(stmt_uses_maps)
            }
            Statement::ForRange { iterable, body, .. } => {
                expr_uses_maps(iterable) || body.statements.iter().any(stmt_uses_maps)
            }
            Statement::While {
                condition, body, ..
            } => expr_uses_maps(condition) || body.statements.iter().any(stmt_uses_maps),
            Statement::Free { value, .. } => expr_uses_maps(value),
            Statement::Defer { statement, .. } => stmt_uses_maps(statement),
            Statement::Expression { expression, .. } => expr_uses_maps(expression),
            Statement::Function(f) => {
                f.receiver
                    .as_ref()
                    .map(|r| type_uses_maps(&r.ty))
                    .unwrap_or(false)
                    || f.parameters.iter().any(|p| type_uses_maps(&p.ty))
                    || f.return_type.as_ref().map(type_uses_maps).unwrap_or(false)
                    || f.body.statements.iter().any(stmt_uses_maps)
            }
            Statement::Struct(s) => s.fields.iter().any(|f| type_uses_maps(&f.ty)),
            _ => false,
        }
    }

    program.statements.iter().any(stmt_uses_maps)
}
