//! Statement productions
//!
//! Hand-rolled statement parsing, dispatched on the current token kind.
//! Every production follows the same recovery contract: on an unexpected
//! token it records a diagnostic and returns `None`, leaving the top-level
//! loop to advance and continue.

use super::ast::*;
use super::lexer::{Token, TokenKind};
use super::parse::{Parser, Precedence};

impl Parser {
    pub(crate) fn parse_statement(&mut self) -> Option<Statement> {
        // Skip comments at statement level
        while self.cur_is(TokenKind::Comment) {
            self.next_token();
        }

        match self.cur.kind {
            TokenKind::Import => self.parse_import_statement(),
            TokenKind::Public => self.parse_public_statement(),
            TokenKind::Function => self.parse_function_statement(false).map(Statement::Function),
            TokenKind::Struct => self.parse_struct_statement(false).map(Statement::Struct),
            TokenKind::Enum => self.parse_enum_statement(false).map(Statement::Enum),
            TokenKind::Var => self.parse_var_statement(),
            TokenKind::Const => self.parse_const_statement(),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::If => self.parse_if_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::Free => self.parse_free_statement(),
            TokenKind::Defer => self.parse_defer_statement(),
            TokenKind::Break => self.parse_break_statement(),
            TokenKind::Continue => self.parse_continue_statement(),
            TokenKind::Delete => self.parse_delete_statement(),
            TokenKind::Ident if self.peek_is(TokenKind::Walrus) => self.parse_infer_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_import_statement(&mut self) -> Option<Statement> {
        let token = self.cur.clone();

        if !self.expect_peek(TokenKind::String) {
            return None;
        }

        let path = self.cur.literal.clone();

        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(Statement::Import { token, path })
    }

    fn parse_public_statement(&mut self) -> Option<Statement> {
        self.next_token(); // consume 'public'

        match self.cur.kind {
            TokenKind::Function => self.parse_function_statement(true).map(Statement::Function),
            TokenKind::Struct => self.parse_struct_statement(true).map(Statement::Struct),
            TokenKind::Enum => self.parse_enum_statement(true).map(Statement::Enum),
            _ => {
                let msg = format!(
                    "line {}: unexpected token after 'public': {}",
                    self.cur.line, self.cur.kind
                );
                self.error(msg);
                None
            }
        }
    }

    fn parse_function_statement(&mut self, public: bool) -> Option<FunctionDecl> {
        let token = self.cur.clone();

        // Optional receiver: function (r *Type) name() { }
        let receiver = if self.peek_is(TokenKind::LParen) {
            self.next_token(); // consume 'function'
            self.next_token(); // consume '('

            let name = Identifier {
                token: self.cur.clone(),
                value: self.cur.literal.clone(),
            };
            self.next_token();
            let ty = self.parse_type_annotation()?;

            if !self.expect_peek(TokenKind::RParen) {
                return None;
            }
            self.next_token();
            Some(Parameter { name, ty })
        } else {
            self.next_token(); // consume 'function'
            None
        };

        if !self.cur_is(TokenKind::Ident) {
            let msg = format!(
                "line {}: expected function name, got {}",
                self.cur.line, self.cur.kind
            );
            self.error(msg);
            return None;
        }
        let name = Identifier {
            token: self.cur.clone(),
            value: self.cur.literal.clone(),
        };

        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        let parameters = self.parse_function_parameters().unwrap_or_default();

        // Return type (optional): anything before the opening brace
        let return_type = if !self.peek_is(TokenKind::LBrace) {
            self.next_token();
            Some(self.parse_type_annotation()?)
        } else {
            None
        };

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block_statement();

        Some(FunctionDecl {
            token,
            public,
            receiver,
            name,
            parameters,
            return_type,
            body,
        })
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Parameter>> {
        let mut params = Vec::new();

        if self.peek_is(TokenKind::RParen) {
            self.next_token();
            return Some(params);
        }

        self.next_token();

        let name = Identifier {
            token: self.cur.clone(),
            value: self.cur.literal.clone(),
        };
        self.next_token();
        let ty = self.parse_type_annotation()?;
        params.push(Parameter { name, ty });

        while self.peek_is(TokenKind::Comma) {
            self.next_token(); // comma
            self.next_token(); // param name

            let name = Identifier {
                token: self.cur.clone(),
                value: self.cur.literal.clone(),
            };
            self.next_token();
            let ty = self.parse_type_annotation()?;
            params.push(Parameter { name, ty });
        }

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }

        Some(params)
    }

    fn parse_struct_statement(&mut self, public: bool) -> Option<StructDecl> {
        let token = self.cur.clone();

        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = Identifier {
            token: self.cur.clone(),
            value: self.cur.literal.clone(),
        };

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }

        let fields = self.parse_struct_fields()?;

        Some(StructDecl {
            token,
            public,
            name,
            fields,
        })
    }

    fn parse_struct_fields(&mut self) -> Option<Vec<StructField>> {
        let mut fields = Vec::new();

        while !self.peek_is(TokenKind::RBrace) && !self.peek_is(TokenKind::Eof) {
            self.next_token();

            let public = if self.cur_is(TokenKind::Public) {
                self.next_token();
                true
            } else {
                false
            };

            let name = Identifier {
                token: self.cur.clone(),
                value: self.cur.literal.clone(),
            };
            self.next_token();
            let ty = self.parse_type_annotation()?;

            if self.peek_is(TokenKind::Semicolon) {
                self.next_token();
            }

            fields.push(StructField { public, name, ty });
        }

        self.next_token(); // consume }
        Some(fields)
    }

    fn parse_enum_statement(&mut self, public: bool) -> Option<EnumDecl> {
        let token = self.cur.clone();

        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = Identifier {
            token: self.cur.clone(),
            value: self.cur.literal.clone(),
        };

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }

        let values = self.parse_enum_values()?;

        Some(EnumDecl {
            token,
            public,
            name,
            values,
        })
    }

    fn parse_enum_values(&mut self) -> Option<Vec<EnumValue>> {
        let mut values = Vec::new();

        while !self.peek_is(TokenKind::RBrace) && !self.peek_is(TokenKind::Eof) {
            self.next_token();

            let name = Identifier {
                token: self.cur.clone(),
                value: self.cur.literal.clone(),
            };

            // Optional explicit value: Red = 1
            let value = if self.peek_is(TokenKind::Assign) {
                self.next_token(); // consume =
                self.next_token(); // move to value
                Some(self.parse_expression(Precedence::Lowest)?)
            } else {
                None
            };

            values.push(EnumValue { name, value });

            if self.peek_is(TokenKind::Comma) {
                self.next_token();
            }
        }

        self.next_token(); // consume }
        Some(values)
    }

    pub(crate) fn parse_block_statement(&mut self) -> BlockStatement {
        let token = self.cur.clone();
        let mut statements = Vec::new();

        self.next_token();

        while !self.cur_is(TokenKind::RBrace) && !self.cur_is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.next_token();
        }

        BlockStatement { token, statements }
    }

    fn parse_var_statement(&mut self) -> Option<Statement> {
        let token = self.cur.clone();

        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = Identifier {
            token: self.cur.clone(),
            value: self.cur.literal.clone(),
        };

        // Type annotation is required for var
        self.next_token();
        let ty = self.parse_type_annotation()?;

        let value = if self.peek_is(TokenKind::Assign) {
            self.next_token();
            self.next_token();
            Some(self.parse_expression(Precedence::Lowest)?)
        } else {
            None
        };

        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(Statement::Var {
            token,
            name,
            ty,
            value,
        })
    }

    fn parse_const_statement(&mut self) -> Option<Statement> {
        let token = self.cur.clone();

        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = Identifier {
            token: self.cur.clone(),
            value: self.cur.literal.clone(),
        };

        if !self.expect_peek(TokenKind::Walrus) {
            return None;
        }

        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(Statement::Const { token, name, value })
    }

    fn parse_infer_statement(&mut self) -> Option<Statement> {
        let token = self.cur.clone();
        let name = Identifier {
            token: self.cur.clone(),
            value: self.cur.literal.clone(),
        };

        if !self.expect_peek(TokenKind::Walrus) {
            return None;
        }

        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(Statement::Infer { token, name, value })
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        let token = self.cur.clone();

        self.next_token();

        let value = if !self.cur_is(TokenKind::Semicolon) {
            Some(self.parse_expression(Precedence::Lowest)?)
        } else {
            None
        };

        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(Statement::Return { token, value })
    }

    fn parse_if_statement(&mut self) -> Option<Statement> {
        let token = self.cur.clone();

        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let consequence = self.parse_block_statement();

        let alternative = if self.peek_is(TokenKind::Else) {
            self.next_token();

            if !self.expect_peek(TokenKind::LBrace) {
                return None;
            }
            Some(self.parse_block_statement())
        } else {
            None
        };

        Some(Statement::If {
            token,
            condition,
            consequence,
            alternative,
        })
    }

    /// Four `for` shapes are distinguished from the first two significant
    /// tokens after the keyword: `i := range`, `i, v := range`,
    /// `_, v := range`, and the classic `init; cond; post` form. The first
    /// identifier must be consumed before range and C-style can be told
    /// apart, so the non-range path re-enters through
    /// [`parse_for_statement_with_init`](Self::parse_for_statement_with_init).
    fn parse_for_statement(&mut self) -> Option<Statement> {
        let for_token = self.cur.clone();
        self.next_token();

        if self.cur_is(TokenKind::Ident) {
            let first = self.cur.clone();

            if self.peek_is(TokenKind::Walrus) {
                // Single variable: for i := range arr
                self.next_token(); // consume :=
                if self.peek_is(TokenKind::Range) {
                    self.next_token(); // consume range
                    let index = Identifier {
                        token: first.clone(),
                        value: first.literal.clone(),
                    };
                    return self.parse_for_range_body(for_token, Some(index), None);
                }
                // Not a range, continue parsing as init statement
                return self.parse_for_statement_with_init(for_token, first);
            } else if self.peek_is(TokenKind::Comma) {
                // Two variables: for i, v := range arr (or for _, v := range arr)
                self.next_token(); // consume ,
                if !self.expect_peek(TokenKind::Ident) {
                    return None;
                }
                let second = self.cur.clone();
                if !self.expect_peek(TokenKind::Walrus) {
                    return None;
                }
                if !self.expect_peek(TokenKind::Range) {
                    return None;
                }

                let index = if first.literal == "_" {
                    None
                } else {
                    Some(Identifier {
                        token: first.clone(),
                        value: first.literal.clone(),
                    })
                };
                let value = Some(Identifier {
                    token: second.clone(),
                    value: second.literal.clone(),
                });
                return self.parse_for_range_body(for_token, index, value);
            }
        }

        self.parse_regular_for_statement(for_token)
    }

    /// Body of a range loop; the current token is `range` on entry.
    fn parse_for_range_body(
        &mut self,
        token: Token,
        index: Option<Identifier>,
        value: Option<Identifier>,
    ) -> Option<Statement> {
        self.next_token(); // move to iterable
        let iterable = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block_statement();

        Some(Statement::ForRange {
            token,
            index,
            value,
            iterable,
            body,
        })
    }

    /// `for ident := expr; cond; post { ... }` — entered after the `:=` has
    /// been consumed and range has been ruled out. A semicolon must follow
    /// the initializer value.
    fn parse_for_statement_with_init(
        &mut self,
        token: Token,
        first: Token,
    ) -> Option<Statement> {
        let name = Identifier {
            token: first.clone(),
            value: first.literal.clone(),
        };

        self.next_token(); // move past :=
        let value = self.parse_expression(Precedence::Lowest)?;
        let init = Some(Box::new(Statement::Infer {
            token: first,
            name,
            value,
        }));

        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }
        if self.cur_is(TokenKind::Semicolon) {
            self.next_token();
        }

        let condition = if !self.cur_is(TokenKind::Semicolon) {
            Some(self.parse_expression(Precedence::Lowest)?)
        } else {
            None
        };
        if !self.expect_peek(TokenKind::Semicolon) {
            return None;
        }
        self.next_token();

        let post = if !self.cur_is(TokenKind::LBrace) {
            self.parse_statement().map(Box::new)
        } else {
            None
        };

        if !self.cur_is(TokenKind::LBrace) && !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block_statement();

        Some(Statement::For {
            token,
            init,
            condition,
            post,
            body,
        })
    }

    fn parse_regular_for_statement(&mut self, token: Token) -> Option<Statement> {
        let init = if !self.cur_is(TokenKind::Semicolon) {
            self.parse_statement().map(Box::new)
        } else {
            None
        };
        if self.cur_is(TokenKind::Semicolon) {
            self.next_token();
        }

        let condition = if !self.cur_is(TokenKind::Semicolon) {
            Some(self.parse_expression(Precedence::Lowest)?)
        } else {
            None
        };
        if !self.expect_peek(TokenKind::Semicolon) {
            return None;
        }
        self.next_token();

        let post = if !self.cur_is(TokenKind::LBrace) {
            self.parse_statement().map(Box::new)
        } else {
            None
        };

        if !self.cur_is(TokenKind::LBrace) && !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block_statement();

        Some(Statement::For {
            token,
            init,
            condition,
            post,
            body,
        })
    }

    fn parse_while_statement(&mut self) -> Option<Statement> {
        let token = self.cur.clone();

        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block_statement();

        Some(Statement::While {
            token,
            condition,
            body,
        })
    }

    fn parse_free_statement(&mut self) -> Option<Statement> {
        let token = self.cur.clone();

        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }

        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(Statement::Free { token, value })
    }

    fn parse_defer_statement(&mut self) -> Option<Statement> {
        let token = self.cur.clone();

        self.next_token();

        let statement = Box::new(self.parse_statement()?);

        Some(Statement::Defer { token, statement })
    }

    fn parse_break_statement(&mut self) -> Option<Statement> {
        let token = self.cur.clone();

        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(Statement::Break { token })
    }

    fn parse_continue_statement(&mut self) -> Option<Statement> {
        let token = self.cur.clone();

        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(Statement::Continue { token })
    }

    fn parse_delete_statement(&mut self) -> Option<Statement> {
        let token = self.cur.clone();

        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        self.next_token();

        let map = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::Comma) {
            return None;
        }
        self.next_token();

        let key = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }

        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(Statement::Delete { token, map, key })
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let token = self.cur.clone();
        let expression = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(Statement::Expression { token, expression })
    }
}
