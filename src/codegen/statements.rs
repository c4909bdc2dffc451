//! Statement lowering

use crate::parser::ast::{BlockStatement, Expression, Identifier, Statement, TypeAnnotation};

use super::{declare, Generator};

impl<'a> Generator<'a> {
    pub(crate) fn generate_statement(&mut self, stmt: &'a Statement) {
        match stmt {
            Statement::Var {
                name, ty, value, ..
            } => self.generate_var_statement(name, ty, value),
            Statement::Const { name, value, .. } => self.generate_const_statement(name, value),
            Statement::Infer { name, value, .. } => self.generate_infer_statement(name, value),
            Statement::Return { value, .. } => self.generate_return_statement(value),
            Statement::If {
                condition,
                consequence,
                alternative,
                ..
            } => self.generate_if_statement(condition, consequence, alternative),
            Statement::For {
                init,
                condition,
                post,
                body,
                ..
            } => self.generate_for_statement(init, condition, post, body),
            Statement::ForRange {
                index,
                value,
                iterable,
                body,
                ..
            } => self.generate_for_range_statement(index, value, iterable, body),
            Statement::While {
                condition, body, ..
            } => self.generate_while_statement(condition, body),
            Statement::Break { .. } => self.write_line("break;"),
            Statement::Continue { .. } => self.write_line("continue;"),
            Statement::Free { value, .. } => self.generate_free_statement(value),
            Statement::Defer { statement, .. } => {
                // Registered for emission at return or function end
                self.push_deferred(statement);
            }
            Statement::Delete { map, key, .. } => {
                let map = self.generate_expression(map);
                let key = self.generate_expression(key);
                self.write_line(&format!("h_map_delete({}, {});", map, key));
            }
            Statement::Expression { expression, .. } => {
                let expr = self.generate_expression(expression);
                self.write_line(&format!("{};", expr));
            }
            // Declarations and imports are handled by the top-level walk
            Statement::Function(_)
            | Statement::Struct(_)
            | Statement::Enum(_)
            | Statement::Import { .. } => {}
        }
    }

    /// Lowers a deferred statement at its emission point.
    pub(crate) fn generate_statement_direct(&mut self, stmt: &'a Statement) {
        match stmt {
            Statement::Expression { expression, .. } => {
                let expr = self.generate_expression(expression);
                self.write_line(&format!("{};", expr));
            }
            Statement::Free { value, .. } => self.generate_free_statement(value),
            _ => self.generate_statement(stmt),
        }
    }

    fn generate_var_statement(
        &mut self,
        name: &Identifier,
        ty: &TypeAnnotation,
        value: &Option<Expression>,
    ) {
        let c_type = self.type_to_c(ty);
        self.variables.insert(name.value.clone(), c_type.clone());
        if ty.is_map {
            let value_type = self.map_value_c_type(ty);
            self.map_value_types.insert(name.value.clone(), value_type);
        }

        let decl = declare(&c_type, &name.value);
        match value {
            Some(value) => {
                let expr = self.generate_expression(value);
                self.write_line(&format!("{} = {};", decl, expr));
            }
            None => self.write_line(&format!("{};", decl)),
        }
    }

    fn generate_const_statement(&mut self, name: &Identifier, value: &Expression) {
        let c_type = self.infer_type(value);
        self.variables.insert(name.value.clone(), c_type.clone());
        let expr = self.generate_expression(value);
        self.write_line(&format!("const {} {} = {};", c_type, name.value, expr));
    }

    fn generate_infer_statement(&mut self, name: &Identifier, value: &Expression) {
        // Typed array literals declare real C arrays
        if let Expression::ArrayLiteral {
            ty: Some(ty),
            elements,
            ..
        } = value
        {
            let elem_ann = TypeAnnotation::named(ty.token.clone(), ty.name.clone());
            let elem = self.type_to_c(&elem_ann);

            if ty.array_len > 0 {
                self.variables
                    .insert(name.value.clone(), format!("{}[{}]", elem, ty.array_len));
                let expr = self.generate_expression(value);
                self.write_line(&format!(
                    "{} {}[{}] = {};",
                    elem, name.value, ty.array_len, expr
                ));
            } else if !elements.is_empty() {
                self.variables
                    .insert(name.value.clone(), format!("{}[]", elem));
                let expr = self.generate_expression(value);
                self.write_line(&format!("{} {}[] = {};", elem, name.value, expr));
            } else {
                self.variables
                    .insert(name.value.clone(), format!("{}*", elem));
                self.write_line(&format!("{}* {} = NULL;", elem, name.value));
            }
            return;
        }

        // make() allocates a heap slice
        if let Expression::Make { ty, .. } = value {
            let elem_ann = TypeAnnotation::named(ty.token.clone(), ty.name.clone());
            let elem = self.type_to_c(&elem_ann);
            self.variables
                .insert(name.value.clone(), format!("{}*", elem));
            let expr = self.generate_expression(value);
            self.write_line(&format!("{}* {} = {};", elem, name.value, expr));
            return;
        }

        // Map literals declare the map and set each pair
        if let Expression::MapLiteral { ty, pairs, .. } = value {
            self.variables
                .insert(name.value.clone(), "h_map*".to_string());
            let value_type = self.map_value_c_type(ty);
            self.map_value_types
                .insert(name.value.clone(), value_type.clone());

            self.write_line(&format!("h_map* {} = h_map_new();", name.value));
            for pair in pairs {
                let key = self.generate_expression(&pair.key);
                let val = self.generate_expression(&pair.value);
                self.write_line(&format!(
                    "h_map_set({}, {}, &({}){{{}}});",
                    name.value, key, value_type, val
                ));
            }
            return;
        }

        let c_type = self.infer_type(value);
        self.variables.insert(name.value.clone(), c_type.clone());
        let expr = self.generate_expression(value);
        self.write_line(&format!("{} {} = {};", c_type, name.value, expr));
    }

    fn generate_return_statement(&mut self, value: &'a Option<Expression>) {
        match value {
            // Save the return value before running deferred statements
            Some(value) if self.has_deferred() => {
                let ret_type = self.infer_type(value);
                let expr = self.generate_expression(value);
                self.write_line(&format!("{} __ret_val = {};", ret_type, expr));
                self.emit_deferred_statements();
                self.write_line("return __ret_val;");
            }
            Some(value) => {
                self.emit_deferred_statements();
                let expr = self.generate_expression(value);
                self.write_line(&format!("return {};", expr));
            }
            None => {
                self.emit_deferred_statements();
                self.write_line("return;");
            }
        }
    }

    fn generate_if_statement(
        &mut self,
        condition: &'a Expression,
        consequence: &'a BlockStatement,
        alternative: &'a Option<BlockStatement>,
    ) {
        let cond = self.generate_expression(condition);
        self.write_line(&format!("if ({}) {{", cond));
        self.indent();
        self.generate_block(consequence);
        self.dedent();

        if let Some(alternative) = alternative {
            self.write_line("} else {");
            self.indent();
            self.generate_block(alternative);
            self.dedent();
        }
        self.write_line("}");
    }

    fn generate_for_statement(
        &mut self,
        init: &'a Option<Box<Statement>>,
        condition: &'a Option<Expression>,
        post: &'a Option<Box<Statement>>,
        body: &'a BlockStatement,
    ) {
        let init = init
            .as_deref()
            .map(|s| self.generate_statement_inline(s))
            .unwrap_or_default();
        let cond = condition
            .as_ref()
            .map(|e| self.generate_expression(e))
            .unwrap_or_default();
        let post = post
            .as_deref()
            .map(|s| self.generate_statement_inline(s))
            .unwrap_or_default();

        self.write_line(&format!("for ({}; {}; {}) {{", init, cond, post));
        self.indent();
        self.generate_block(body);
        self.dedent();
        self.write_line("}");
    }

    /// Range loops lower to an index loop over `sizeof(arr)/sizeof(arr[0])`
    /// with an optional body-scoped element binding.
    fn generate_for_range_statement(
        &mut self,
        index: &Option<Identifier>,
        value: &Option<Identifier>,
        iterable: &'a Expression,
        body: &'a BlockStatement,
    ) {
        let iter = self.generate_expression(iterable);
        let idx = index
            .as_ref()
            .map(|i| i.value.clone())
            .unwrap_or_else(|| "_i".to_string());
        let size = format!("(sizeof({})/sizeof({}[0]))", iter, iter);

        self.write_line(&format!("for (int {} = 0; {} < {}; {}++) {{", idx, idx, size, idx));
        self.indent();

        if let Some(value) = value {
            let elem = self.element_type_of(iterable);
            self.variables.insert(value.value.clone(), elem.clone());
            self.write_line(&format!("{} {} = {}[{}];", elem, value.value, iter, idx));
        }

        self.generate_block(body);
        self.dedent();
        self.write_line("}");
    }

    fn generate_while_statement(&mut self, condition: &'a Expression, body: &'a BlockStatement) {
        let cond = self.generate_expression(condition);
        self.write_line(&format!("while ({}) {{", cond));
        self.indent();
        self.generate_block(body);
        self.dedent();
        self.write_line("}");
    }

    fn generate_free_statement(&mut self, value: &Expression) {
        let is_map = self.is_map_expr(value);
        let expr = self.generate_expression(value);
        if is_map {
            self.write_line(&format!("h_map_free({});", expr));
        } else {
            self.write_line(&format!("free({});", expr));
        }
    }

    /// Renders a statement without a trailing semicolon for `for` headers.
    fn generate_statement_inline(&mut self, stmt: &Statement) -> String {
        match stmt {
            Statement::Infer { name, value, .. } => {
                let c_type = self.infer_type(value);
                let expr = self.generate_expression(value);
                format!("{} {} = {}", c_type, name.value, expr)
            }
            Statement::Expression { expression, .. } => self.generate_expression(expression),
            _ => String::new(),
        }
    }
}
