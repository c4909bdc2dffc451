//! Type lowering and shallow inference
//!
//! Lowers surface type annotations to C declarator strings and performs
//! the purely syntactic inference used by `:=` and `const` declarations,
//! `print` format selection, and pointer-aware member access. The
//! inference never consults more than the expression shape, the
//! per-function symbol table, and declared function signatures.

use crate::parser::ast::{Expression, TypeAnnotation};

use super::Generator;

impl<'a> Generator<'a> {
    /// Lowers a type annotation to its C spelling. Composition order:
    /// element type first, then the array suffix, then the pointer suffix.
    pub(crate) fn type_to_c(&self, ty: &TypeAnnotation) -> String {
        if ty.is_map {
            return "h_map*".to_string();
        }

        let mut c_type = match ty.name.as_str() {
            "int" => "int".to_string(),
            "float" => "double".to_string(),
            "string" => "h_string".to_string(),
            "char" => "char".to_string(),
            "bool" => "bool".to_string(),
            "void" => "void".to_string(),
            // User-defined type (struct)
            other => other.to_string(),
        };

        if ty.array_len == -1 {
            c_type.push('*'); // slice becomes pointer
        } else if ty.array_len > 0 {
            c_type = format!("{}[{}]", c_type, ty.array_len);
        }

        if ty.is_ptr {
            c_type.push('*');
        }

        c_type
    }

    /// The lowered C type of a map's value annotation, defaulting to `int`
    /// when the annotation carries none.
    pub(crate) fn map_value_c_type(&self, ty: &TypeAnnotation) -> String {
        match &ty.value_type {
            Some(value) => self.type_to_c(value),
            None => "int".to_string(),
        }
    }

    /// Shallow syntactic inference for `:=` and `const` declarations.
    pub(crate) fn infer_type(&self, expr: &Expression) -> String {
        match expr {
            Expression::Integer { .. } => "int".to_string(),
            Expression::Float { .. } => "double".to_string(),
            Expression::String { .. } => "h_string".to_string(),
            Expression::Char { .. } => "char".to_string(),
            Expression::Boolean { .. } => "bool".to_string(),
            Expression::Null { .. } => "void*".to_string(),
            Expression::Alloc { ty, .. } => format!("{}*", ty.name),
            Expression::Prefix {
                operator, right, ..
            } => match operator.as_str() {
                "&" => format!("{}*", self.infer_type(right)),
                "*" => {
                    let inner = self.infer_type(right);
                    inner.strip_suffix('*').unwrap_or(&inner).to_string()
                }
                _ => self.infer_type(right),
            },
            Expression::Infix { left, .. } => self.infer_type(left),
            Expression::Call { function, .. } => {
                if let Expression::Identifier(ident) = function.as_ref() {
                    if let Some(f) = self.lookup_function(&ident.value) {
                        if let Some(ret) = &f.return_type {
                            return self.type_to_c(ret);
                        }
                    }
                }
                "int".to_string()
            }
            _ => "int".to_string(),
        }
    }

    /// String concatenation applies only when an operand is a string
    /// literal; string-typed variables on both sides are not detected.
    pub(crate) fn is_string_expr(&self, expr: &Expression) -> bool {
        matches!(expr, Expression::String { .. })
    }

    /// Whether member access on this expression goes through `->`.
    /// Only a few expression shapes are examined; a member access whose
    /// result is itself pointer-typed is not detected.
    pub(crate) fn is_pointer_expr(&self, expr: &Expression) -> bool {
        match expr {
            Expression::Identifier(ident) => self
                .variables
                .get(&ident.value)
                .map(|ty| ty.ends_with('*'))
                .unwrap_or(false),
            Expression::Alloc { .. } => true,
            Expression::Prefix { operator, .. } => operator == "&",
            Expression::Call { function, .. } => {
                if let Expression::Identifier(ident) = function.as_ref() {
                    if let Some(f) = self.lookup_function(&ident.value) {
                        return f.return_type.as_ref().map(|t| t.is_ptr).unwrap_or(false);
                    }
                }
                false
            }
            _ => false,
        }
    }

    /// True when the expression is a variable recorded with a map type.
    pub(crate) fn is_map_expr(&self, expr: &Expression) -> bool {
        match expr {
            Expression::Identifier(ident) => self
                .variables
                .get(&ident.value)
                .map(|ty| ty == "h_map*")
                .unwrap_or(false),
            _ => false,
        }
    }

    /// The struct name behind an expression, used for method mangling.
    /// Derived from the symbol table with any trailing `*` stripped.
    pub(crate) fn expr_type_name(&self, expr: &Expression) -> String {
        match expr {
            Expression::Identifier(ident) => match self.variables.get(&ident.value) {
                Some(var_type) => var_type
                    .strip_suffix('*')
                    .unwrap_or(var_type)
                    .to_string(),
                None => "Unknown".to_string(),
            },
            Expression::Alloc { ty, .. } => ty.name.clone(),
            Expression::Call { function, .. } => {
                if let Expression::Identifier(ident) = function.as_ref() {
                    if let Some(f) = self.lookup_function(&ident.value) {
                        if let Some(ret) = &f.return_type {
                            return ret.name.clone();
                        }
                    }
                }
                "Unknown".to_string()
            }
            _ => "Unknown".to_string(),
        }
    }

    /// The lowered return type of a call, consulting method receivers when
    /// the callee is a member expression. Defaults to `int`.
    pub(crate) fn call_return_type(&self, function: &Expression) -> String {
        if let Expression::Member { object, member, .. } = function {
            let struct_name = self.expr_type_name(object);

            for f in self.functions_iter() {
                if f.name.value != member.value {
                    continue;
                }
                let (receiver, ret) = match (&f.receiver, &f.return_type) {
                    (Some(receiver), Some(ret)) => (receiver, ret),
                    _ => continue,
                };
                let receiver_type = receiver.ty.name.trim_start_matches('*');
                if receiver_type == struct_name {
                    return self.type_to_c(ret);
                }
            }
        }

        if let Expression::Identifier(ident) = function {
            if let Some(f) = self.lookup_function(&ident.value) {
                if let Some(ret) = &f.return_type {
                    return self.type_to_c(ret);
                }
            }
        }

        "int".to_string()
    }

    /// Element type of an iterable for range lowering, derived from the
    /// recorded declarator by stripping the array or pointer suffix.
    pub(crate) fn element_type_of(&self, expr: &Expression) -> String {
        if let Expression::Identifier(ident) = expr {
            if let Some(var_type) = self.variables.get(&ident.value) {
                if let Some(i) = var_type.find('[') {
                    return var_type[..i].to_string();
                }
                if let Some(stripped) = var_type.strip_suffix('*') {
                    return stripped.to_string();
                }
                return var_type.clone();
            }
        }
        "int".to_string()
    }
}
