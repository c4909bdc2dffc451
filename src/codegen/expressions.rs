//! Expression lowering and built-in expansion
//!
//! Compound expressions are fully parenthesized so the emitted C never
//! depends on C precedence matching the source language's. Calls are
//! special-cased for the built-ins (`print`, `len`) and for method calls,
//! which are rewritten to their mangled free-function form.

use crate::parser::ast::Expression;

use super::Generator;

impl<'a> Generator<'a> {
    pub(crate) fn generate_expression(&mut self, expr: &Expression) -> String {
        match expr {
            Expression::Identifier(ident) => ident.value.clone(),
            Expression::Integer { token, .. } => token.literal.clone(),
            Expression::Float { token, .. } => token.literal.clone(),
            Expression::String { value, .. } => format!("\"{}\"", value),
            Expression::Char { token, .. } => format!("'{}'", token.literal),
            Expression::Boolean { value, .. } => {
                if *value { "true" } else { "false" }.to_string()
            }
            Expression::Null { .. } => "NULL".to_string(),
            Expression::Prefix {
                operator, right, ..
            } => {
                let right = self.generate_expression(right);
                format!("({}{})", operator, right)
            }
            Expression::Infix {
                left,
                operator,
                right,
                ..
            } => {
                let left_str = self.generate_expression(left);
                let right_str = self.generate_expression(right);
                // String concatenation
                if operator == "+" && (self.is_string_expr(left) || self.is_string_expr(right)) {
                    return format!("h_string_concat({}, {})", left_str, right_str);
                }
                format!("({} {} {})", left_str, operator, right_str)
            }
            Expression::Postfix { left, operator, .. } => {
                let left = self.generate_expression(left);
                format!("({}{})", left, operator)
            }
            Expression::Assign {
                left,
                operator,
                value,
                ..
            } => self.generate_assign_expression(left, operator, value),
            Expression::Call {
                function,
                arguments,
                ..
            } => self.generate_call_expression(function, arguments),
            Expression::Index { left, index, .. } => {
                // Reads through a map-typed variable go through the runtime
                if self.is_map_expr(left) {
                    let value_type = self.map_value_type_of(left);
                    let map = self.generate_expression(left);
                    let key = self.generate_expression(index);
                    return format!("(*({}*)h_map_get({}, {}))", value_type, map, key);
                }
                let left = self.generate_expression(left);
                let index = self.generate_expression(index);
                format!("{}[{}]", left, index)
            }
            Expression::Member { object, member, .. } => {
                let obj = self.generate_expression(object);
                if self.is_pointer_expr(object) {
                    format!("{}->{}", obj, member.value)
                } else {
                    format!("{}.{}", obj, member.value)
                }
            }
            Expression::Cast {
                target_type, value, ..
            } => {
                let c_type = self.type_to_c(target_type);
                let value = self.generate_expression(value);
                format!("(({}){})", c_type, value)
            }
            Expression::Alloc { ty, .. } => {
                format!("({}*)malloc(sizeof({}))", ty.name, ty.name)
            }
            Expression::Make { ty, length, .. } => {
                let elem = crate::parser::ast::TypeAnnotation::named(ty.token.clone(), ty.name.clone());
                let elem = self.type_to_c(&elem);
                match length {
                    Some(length) => {
                        let length = self.generate_expression(length);
                        format!("({}*)calloc({}, sizeof({}))", elem, length, elem)
                    }
                    None => format!("({}*)calloc(0, sizeof({}))", elem, elem),
                }
            }
            Expression::ArrayLiteral { elements, .. } => {
                let elements: Vec<String> = elements
                    .iter()
                    .map(|e| self.generate_expression(e))
                    .collect();
                format!("{{{}}}", elements.join(", "))
            }
            Expression::MapLiteral { .. } => "h_map_new()".to_string(),
        }
    }

    /// Writes into a map variable are rewritten to `h_map_set` with the
    /// value boxed through a compound literal.
    fn generate_assign_expression(
        &mut self,
        left: &Expression,
        operator: &str,
        value: &Expression,
    ) -> String {
        if operator == "=" {
            if let Expression::Index {
                left: map, index, ..
            } = left
            {
                if self.is_map_expr(map) {
                    let value_type = self.map_value_type_of(map);
                    let map = self.generate_expression(map);
                    let key = self.generate_expression(index);
                    let value = self.generate_expression(value);
                    return format!("h_map_set({}, {}, &({}){{{}}})", map, key, value_type, value);
                }
            }
        }

        let left = self.generate_expression(left);
        let value = self.generate_expression(value);
        format!("({} {} {})", left, operator, value)
    }

    fn generate_call_expression(
        &mut self,
        function: &Expression,
        arguments: &[Expression],
    ) -> String {
        let func_name = self.generate_expression(function);

        if func_name == "print" {
            return self.generate_print_call(arguments);
        }

        if func_name == "len" {
            return self.generate_len_call(arguments);
        }

        // Method call: obj.m(a, b) becomes TypeOfObj_m(obj, a, b)
        if let Expression::Member { object, member, .. } = function {
            let obj = self.generate_expression(object);
            let type_name = self.expr_type_name(object);

            let mut args = vec![obj];
            for arg in arguments {
                args.push(self.generate_expression(arg));
            }

            return format!("{}_{}({})", type_name, member.value, args.join(", "));
        }

        let args: Vec<String> = arguments
            .iter()
            .map(|a| self.generate_expression(a))
            .collect();
        format!("{}({})", func_name, args.join(", "))
    }

    /// `print(x)` picks a printf format from the shape and recorded type of
    /// its argument, defaulting to `%d`.
    fn generate_print_call(&mut self, arguments: &[Expression]) -> String {
        let arg = match arguments.first() {
            Some(arg) => arg,
            None => return "printf(\"\\n\")".to_string(),
        };
        let arg_str = self.generate_expression(arg);

        match arg {
            Expression::String { .. } => format!("printf(\"%s\\n\", {})", arg_str),
            Expression::Integer { .. } => format!("printf(\"%d\\n\", {})", arg_str),
            Expression::Float { .. } => format!("printf(\"%f\\n\", {})", arg_str),
            Expression::Boolean { .. } => {
                format!("printf(\"%s\\n\", {} ? \"true\" : \"false\")", arg_str)
            }
            Expression::Call { function, .. } => {
                if self.call_return_type(function) == "h_string" {
                    format!("printf(\"%s\\n\", {})", arg_str)
                } else {
                    format!("printf(\"%d\\n\", {})", arg_str)
                }
            }
            Expression::Identifier(ident) => {
                if self.variables.get(&ident.value).map(String::as_str) == Some("h_string") {
                    format!("printf(\"%s\\n\", {})", arg_str)
                } else {
                    format!("printf(\"%d\\n\", {})", arg_str)
                }
            }
            _ => format!("printf(\"%d\\n\", {})", arg_str),
        }
    }

    /// `len(x)`: strlen for string literals, the map runtime for map
    /// variables, and the sizeof ratio for everything else.
    fn generate_len_call(&mut self, arguments: &[Expression]) -> String {
        let arg = match arguments.first() {
            Some(arg) => arg,
            None => return "0".to_string(),
        };
        let arg_str = self.generate_expression(arg);

        match arg {
            Expression::String { .. } => format!("strlen({})", arg_str),
            Expression::Identifier(_) if self.is_map_expr(arg) => {
                format!("h_map_len({})", arg_str)
            }
            _ => format!("(sizeof({})/sizeof({}[0]))", arg_str, arg_str),
        }
    }

    /// The recorded value type of a map variable, defaulting to `int`.
    fn map_value_type_of(&self, expr: &Expression) -> String {
        if let Expression::Identifier(ident) = expr {
            if let Some(value_type) = self.map_value_types.get(&ident.value) {
                return value_type.clone();
            }
        }
        "int".to_string()
    }
}
