//! AST node definitions for the H language
//!
//! Pure data produced by the parser and observed by the code generator.
//! Every node keeps its originating [`Token`] so diagnostics can report a
//! line number. The [`Display`](fmt::Display) implementations render a node
//! back to source form with full parenthesization of compound expressions;
//! the precedence tests rely on that exact bracketing.

use std::fmt;

use super::lexer::Token;

/// A variable, function, or member name.
#[derive(Debug, Clone)]
pub struct Identifier {
    pub token: Token,
    pub value: String,
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// A surface-syntax type.
///
/// `array_len` uses sentinels: `0` = not an array, `-1` = slice (`[]T`),
/// `> 0` = fixed array (`[N]T`). `is_map` is mutually exclusive with both
/// `array_len != 0` and `is_ptr`; the map key and value types are nested
/// annotations.
#[derive(Debug, Clone)]
pub struct TypeAnnotation {
    pub token: Token,
    pub name: String,
    pub is_ptr: bool,
    pub array_len: i64,
    pub is_map: bool,
    pub key_type: Option<Box<TypeAnnotation>>,
    pub value_type: Option<Box<TypeAnnotation>>,
}

impl TypeAnnotation {
    /// A bare named type with no pointer, array, or map structure.
    pub fn named(token: Token, name: impl Into<String>) -> Self {
        TypeAnnotation {
            token,
            name: name.into(),
            is_ptr: false,
            array_len: 0,
            is_map: false,
            key_type: None,
            value_type: None,
        }
    }
}

impl fmt::Display for TypeAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ptr {
            f.write_str("*")?;
        }
        if self.is_map {
            f.write_str("map[")?;
            if let Some(key) = &self.key_type {
                write!(f, "{}", key)?;
            }
            f.write_str("]")?;
            if let Some(value) = &self.value_type {
                write!(f, "{}", value)?;
            }
            return Ok(());
        }
        if self.array_len == -1 {
            f.write_str("[]")?;
        } else if self.array_len > 0 {
            write!(f, "[{}]", self.array_len)?;
        }
        f.write_str(&self.name)
    }
}

/// A function parameter (or method receiver).
#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: Identifier,
    pub ty: TypeAnnotation,
}

/// A field in a struct declaration.
#[derive(Debug, Clone)]
pub struct StructField {
    pub public: bool,
    pub name: Identifier,
    pub ty: TypeAnnotation,
}

/// A value in an enum declaration, optionally with an explicit expression.
#[derive(Debug, Clone)]
pub struct EnumValue {
    pub name: Identifier,
    pub value: Option<Expression>,
}

/// A key/value entry of a map literal.
#[derive(Debug, Clone)]
pub struct MapPair {
    pub key: Expression,
    pub value: Expression,
}

/// `{ ... }` — a braced sequence of statements.
#[derive(Debug, Clone)]
pub struct BlockStatement {
    pub token: Token,
    pub statements: Vec<Statement>,
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{\n")?;
        for stmt in &self.statements {
            write!(f, "  {}\n", stmt)?;
        }
        f.write_str("}")
    }
}

/// `[public] function [(recv *T)] name(params) [RetType] { ... }`
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub token: Token,
    pub public: bool,
    pub receiver: Option<Parameter>,
    pub name: Identifier,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeAnnotation>,
    pub body: BlockStatement,
}

impl fmt::Display for FunctionDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.public {
            f.write_str("public ")?;
        }
        f.write_str("function ")?;
        if let Some(recv) = &self.receiver {
            write!(f, "({} {}) ", recv.name, recv.ty)?;
        }
        write!(f, "{}(", self.name)?;
        let params: Vec<String> = self
            .parameters
            .iter()
            .map(|p| format!("{} {}", p.name, p.ty))
            .collect();
        f.write_str(&params.join(", "))?;
        f.write_str(")")?;
        if let Some(ret) = &self.return_type {
            write!(f, " {}", ret)?;
        }
        write!(f, " {}", self.body)
    }
}

/// `[public] struct Name { fields }`
#[derive(Debug, Clone)]
pub struct StructDecl {
    pub token: Token,
    pub public: bool,
    pub name: Identifier,
    pub fields: Vec<StructField>,
}

impl fmt::Display for StructDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.public {
            f.write_str("public ")?;
        }
        write!(f, "struct {} {{\n", self.name)?;
        for field in &self.fields {
            if field.public {
                f.write_str("  public ")?;
            } else {
                f.write_str("  ")?;
            }
            write!(f, "{} {};\n", field.name, field.ty)?;
        }
        f.write_str("}")
    }
}

/// `[public] enum Name { Ident [= expr], ... }`
#[derive(Debug, Clone)]
pub struct EnumDecl {
    pub token: Token,
    pub public: bool,
    pub name: Identifier,
    pub values: Vec<EnumValue>,
}

impl fmt::Display for EnumDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.public {
            f.write_str("public ")?;
        }
        write!(f, "enum {} {{\n", self.name)?;
        for value in &self.values {
            write!(f, "  {}", value.name)?;
            if let Some(expr) = &value.value {
                write!(f, " = {}", expr)?;
            }
            f.write_str(",\n")?;
        }
        f.write_str("}")
    }
}

/// An expression node.
#[derive(Debug, Clone)]
pub enum Expression {
    Identifier(Identifier),
    Integer {
        token: Token,
        value: i64,
    },
    Float {
        token: Token,
        value: f64,
    },
    String {
        token: Token,
        value: String,
    },
    Char {
        token: Token,
        value: u8,
    },
    Boolean {
        token: Token,
        value: bool,
    },
    Null {
        token: Token,
    },
    Prefix {
        token: Token,
        operator: String,
        right: Box<Expression>,
    },
    Infix {
        token: Token,
        left: Box<Expression>,
        operator: String,
        right: Box<Expression>,
    },
    Postfix {
        token: Token,
        left: Box<Expression>,
        operator: String,
    },
    Assign {
        token: Token,
        left: Box<Expression>,
        operator: String,
        value: Box<Expression>,
    },
    Call {
        token: Token,
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },
    Index {
        token: Token,
        left: Box<Expression>,
        index: Box<Expression>,
    },
    Member {
        token: Token,
        object: Box<Expression>,
        member: Identifier,
    },
    Cast {
        token: Token,
        target_type: TypeAnnotation,
        value: Box<Expression>,
    },
    Alloc {
        token: Token,
        ty: TypeAnnotation,
    },
    Make {
        token: Token,
        ty: TypeAnnotation,
        length: Option<Box<Expression>>,
        capacity: Option<Box<Expression>>,
    },
    ArrayLiteral {
        token: Token,
        ty: Option<TypeAnnotation>,
        elements: Vec<Expression>,
    },
    MapLiteral {
        token: Token,
        ty: TypeAnnotation,
        pairs: Vec<MapPair>,
    },
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(ident) => write!(f, "{}", ident),
            Expression::Integer { token, .. } => f.write_str(&token.literal),
            Expression::Float { token, .. } => f.write_str(&token.literal),
            Expression::String { value, .. } => write!(f, "\"{}\"", value),
            Expression::Char { token, .. } => write!(f, "'{}'", token.literal),
            Expression::Boolean { value, .. } => {
                f.write_str(if *value { "true" } else { "false" })
            }
            Expression::Null { .. } => f.write_str("null"),
            Expression::Prefix {
                operator, right, ..
            } => write!(f, "({}{})", operator, right),
            Expression::Infix {
                left,
                operator,
                right,
                ..
            } => write!(f, "({} {} {})", left, operator, right),
            Expression::Postfix { left, operator, .. } => write!(f, "({}{})", left, operator),
            Expression::Assign {
                left,
                operator,
                value,
                ..
            } => write!(f, "({} {} {})", left, operator, value),
            Expression::Call {
                function,
                arguments,
                ..
            } => {
                let args: Vec<String> = arguments.iter().map(|a| a.to_string()).collect();
                write!(f, "{}({})", function, args.join(", "))
            }
            Expression::Index { left, index, .. } => write!(f, "({}[{}])", left, index),
            Expression::Member { object, member, .. } => write!(f, "({}.{})", object, member),
            Expression::Cast {
                target_type, value, ..
            } => write!(f, "(({}){})", target_type, value),
            Expression::Alloc { ty, .. } => write!(f, "alloc({})", ty),
            Expression::Make {
                ty,
                length,
                capacity,
                ..
            } => {
                write!(f, "make({}", ty)?;
                if let Some(len) = length {
                    write!(f, ", {}", len)?;
                }
                if let Some(cap) = capacity {
                    write!(f, ", {}", cap)?;
                }
                f.write_str(")")
            }
            Expression::ArrayLiteral { ty, elements, .. } => {
                if let Some(ty) = ty {
                    write!(f, "{}", ty)?;
                }
                let elems: Vec<String> = elements.iter().map(|e| e.to_string()).collect();
                write!(f, "{{{}}}", elems.join(", "))
            }
            Expression::MapLiteral { ty, pairs, .. } => {
                write!(f, "{}", ty)?;
                let entries: Vec<String> = pairs
                    .iter()
                    .map(|p| format!("{}: {}", p.key, p.value))
                    .collect();
                write!(f, "{{{}}}", entries.join(", "))
            }
        }
    }
}

/// A statement node.
#[derive(Debug, Clone)]
pub enum Statement {
    Var {
        token: Token,
        name: Identifier,
        ty: TypeAnnotation,
        value: Option<Expression>,
    },
    Const {
        token: Token,
        name: Identifier,
        value: Expression,
    },
    Infer {
        token: Token,
        name: Identifier,
        value: Expression,
    },
    Return {
        token: Token,
        value: Option<Expression>,
    },
    If {
        token: Token,
        condition: Expression,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
    For {
        token: Token,
        init: Option<Box<Statement>>,
        condition: Option<Expression>,
        post: Option<Box<Statement>>,
        body: BlockStatement,
    },
    ForRange {
        token: Token,
        index: Option<Identifier>,
        value: Option<Identifier>,
        iterable: Expression,
        body: BlockStatement,
    },
    While {
        token: Token,
        condition: Expression,
        body: BlockStatement,
    },
    Break {
        token: Token,
    },
    Continue {
        token: Token,
    },
    Free {
        token: Token,
        value: Expression,
    },
    Defer {
        token: Token,
        statement: Box<Statement>,
    },
    Delete {
        token: Token,
        map: Expression,
        key: Expression,
    },
    Expression {
        token: Token,
        expression: Expression,
    },
    Function(FunctionDecl),
    Struct(StructDecl),
    Enum(EnumDecl),
    Import {
        token: Token,
        path: String,
    },
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Var {
                name, ty, value, ..
            } => {
                write!(f, "var {} {}", name, ty)?;
                if let Some(value) = value {
                    write!(f, " = {}", value)?;
                }
                f.write_str(";")
            }
            Statement::Const { name, value, .. } => write!(f, "const {} := {};", name, value),
            Statement::Infer { name, value, .. } => write!(f, "{} := {};", name, value),
            Statement::Return { value, .. } => {
                f.write_str("return")?;
                if let Some(value) = value {
                    write!(f, " {}", value)?;
                }
                f.write_str(";")
            }
            Statement::If {
                condition,
                consequence,
                alternative,
                ..
            } => {
                write!(f, "if {} {}", condition, consequence)?;
                if let Some(alt) = alternative {
                    write!(f, " else {}", alt)?;
                }
                Ok(())
            }
            Statement::For {
                init,
                condition,
                post,
                body,
                ..
            } => {
                f.write_str("for ")?;
                if let Some(init) = init {
                    write!(f, "{} ", init)?;
                }
                if let Some(cond) = condition {
                    write!(f, "{}", cond)?;
                }
                f.write_str("; ")?;
                if let Some(post) = post {
                    write!(f, "{}", post)?;
                }
                write!(f, " {}", body)
            }
            Statement::ForRange {
                index,
                value,
                iterable,
                body,
                ..
            } => {
                f.write_str("for ")?;
                match index {
                    Some(index) => write!(f, "{}", index)?,
                    None => f.write_str("_")?,
                }
                if let Some(value) = value {
                    write!(f, ", {}", value)?;
                }
                write!(f, " := range {} {}", iterable, body)
            }
            Statement::While {
                condition, body, ..
            } => write!(f, "while {} {}", condition, body),
            Statement::Break { .. } => f.write_str("break;"),
            Statement::Continue { .. } => f.write_str("continue;"),
            Statement::Free { value, .. } => write!(f, "free({});", value),
            Statement::Defer { statement, .. } => write!(f, "defer {}", statement),
            Statement::Delete { map, key, .. } => write!(f, "delete({}, {});", map, key),
            Statement::Expression { expression, .. } => write!(f, "{};", expression),
            Statement::Function(decl) => write!(f, "{}", decl),
            Statement::Struct(decl) => write!(f, "{}", decl),
            Statement::Enum(decl) => write!(f, "{}", decl),
            Statement::Import { path, .. } => write!(f, "import \"{}\";", path),
        }
    }
}

/// The root node: an ordered sequence of top-level statements.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}
