//! Pratt expression parsing
//!
//! Each token kind that can begin an expression has a prefix parse arm, and
//! each infix operator has an infix arm; [`Parser::parse_expression`] drives
//! the two dispatch tables until the requested precedence exceeds the
//! binding power of the next operator. The tables are ordinary `match`
//! statements rather than function maps, so dispatch is static.

use super::ast::*;
use super::lexer::TokenKind;
use super::parse::{Parser, Precedence};

impl Parser {
    pub(crate) fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let mut left = self.parse_prefix()?;

        while !self.peek_is(TokenKind::Semicolon) && precedence < self.peek_precedence() {
            if !has_infix(self.peek.kind) {
                return Some(left);
            }

            self.next_token();
            left = self.parse_infix(left)?;
        }

        Some(left)
    }

    /// Prefix dispatch table.
    fn parse_prefix(&mut self) -> Option<Expression> {
        match self.cur.kind {
            TokenKind::Ident => Some(Expression::Identifier(Identifier {
                token: self.cur.clone(),
                value: self.cur.literal.clone(),
            })),
            TokenKind::Int => self.parse_integer_literal(),
            TokenKind::Float => self.parse_float_literal(),
            TokenKind::String => Some(Expression::String {
                token: self.cur.clone(),
                value: self.cur.literal.clone(),
            }),
            TokenKind::Char => Some(Expression::Char {
                token: self.cur.clone(),
                value: self.cur.literal.bytes().next().unwrap_or(0),
            }),
            TokenKind::True | TokenKind::False => Some(Expression::Boolean {
                token: self.cur.clone(),
                value: self.cur_is(TokenKind::True),
            }),
            TokenKind::Null => Some(Expression::Null {
                token: self.cur.clone(),
            }),
            TokenKind::Bang | TokenKind::Minus | TokenKind::Ampersand | TokenKind::Asterisk => {
                self.parse_prefix_expression()
            }
            TokenKind::LParen => self.parse_grouped_or_cast(),
            TokenKind::LBracket => self.parse_array_or_slice_literal(),
            TokenKind::Alloc => self.parse_alloc_expression(),
            TokenKind::Len => self.parse_len_expression(),
            TokenKind::Make => self.parse_make_expression(),
            TokenKind::Map => self.parse_map_literal(),
            _ => {
                let msg = format!(
                    "line {}: no prefix parse function for {}",
                    self.cur.line, self.cur.kind
                );
                self.error(msg);
                None
            }
        }
    }

    /// Infix dispatch table; the current token is the operator.
    fn parse_infix(&mut self, left: Expression) -> Option<Expression> {
        match self.cur.kind {
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Asterisk
            | TokenKind::Slash
            | TokenKind::Percent
            | TokenKind::Eq
            | TokenKind::NotEq
            | TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::Lte
            | TokenKind::Gte
            | TokenKind::And
            | TokenKind::Or => self.parse_infix_expression(left),
            TokenKind::Assign
            | TokenKind::PlusAssign
            | TokenKind::MinusAssign
            | TokenKind::MulAssign
            | TokenKind::DivAssign => self.parse_assign_expression(left),
            TokenKind::Increment | TokenKind::Decrement => Some(Expression::Postfix {
                token: self.cur.clone(),
                operator: self.cur.literal.clone(),
                left: Box::new(left),
            }),
            TokenKind::LParen => self.parse_call_expression(left),
            TokenKind::LBracket => self.parse_index_expression(left),
            TokenKind::Dot => self.parse_member_expression(left),
            _ => Some(left),
        }
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        let token = self.cur.clone();

        match token.literal.parse::<i64>() {
            Ok(value) => Some(Expression::Integer { token, value }),
            Err(_) => {
                let msg = format!(
                    "line {}: could not parse {:?} as integer",
                    token.line, token.literal
                );
                self.error(msg);
                None
            }
        }
    }

    fn parse_float_literal(&mut self) -> Option<Expression> {
        let token = self.cur.clone();

        match token.literal.parse::<f64>() {
            Ok(value) => Some(Expression::Float { token, value }),
            Err(_) => {
                let msg = format!(
                    "line {}: could not parse {:?} as float",
                    token.line, token.literal
                );
                self.error(msg);
                None
            }
        }
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let token = self.cur.clone();
        let operator = self.cur.literal.clone();

        self.next_token();
        let right = Box::new(self.parse_expression(Precedence::Prefix)?);

        Some(Expression::Prefix {
            token,
            operator,
            right,
        })
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.cur.clone();
        let operator = self.cur.literal.clone();

        let precedence = self.cur_precedence();
        self.next_token();
        let right = Box::new(self.parse_expression(precedence)?);

        Some(Expression::Infix {
            token,
            left: Box::new(left),
            operator,
            right,
        })
    }

    fn parse_assign_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.cur.clone();
        let operator = self.cur.literal.clone();

        self.next_token();
        let value = Box::new(self.parse_expression(Precedence::Lowest)?);

        Some(Expression::Assign {
            token,
            left: Box::new(left),
            operator,
            value,
        })
    }

    /// On `(`: a built-in type name or `*` starts a cast, anything else is a
    /// grouped expression. User-defined names never start a cast here, so
    /// `(user)` stays a grouped expression.
    fn parse_grouped_or_cast(&mut self) -> Option<Expression> {
        self.next_token();

        if self.is_type() {
            let target_type = self.parse_type_annotation()?;
            if !self.expect_peek(TokenKind::RParen) {
                return None;
            }
            self.next_token();
            let token = self.cur.clone();
            let value = Box::new(self.parse_expression(Precedence::Prefix)?);
            return Some(Expression::Cast {
                token,
                target_type,
                value,
            });
        }

        let exp = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }

        Some(exp)
    }

    fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
        let token = self.cur.clone();
        let arguments = self
            .parse_expression_list(TokenKind::RParen)
            .unwrap_or_default();

        Some(Expression::Call {
            token,
            function: Box::new(function),
            arguments,
        })
    }

    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expression>> {
        let mut list = Vec::new();

        if self.peek_is(end) {
            self.next_token();
            return Some(list);
        }

        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(end) {
            return None;
        }

        Some(list)
    }

    fn parse_index_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.cur.clone();

        self.next_token();
        let index = Box::new(self.parse_expression(Precedence::Lowest)?);

        if !self.expect_peek(TokenKind::RBracket) {
            return None;
        }

        Some(Expression::Index {
            token,
            left: Box::new(left),
            index,
        })
    }

    fn parse_member_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.cur.clone();

        self.next_token();
        let member = Identifier {
            token: self.cur.clone(),
            value: self.cur.literal.clone(),
        };

        Some(Expression::Member {
            token,
            object: Box::new(left),
            member,
        })
    }

    /// `[N]T{...}`, `[]T{...}`, or the untyped `[e1, e2, ...]` form.
    fn parse_array_or_slice_literal(&mut self) -> Option<Expression> {
        let token = self.cur.clone();

        self.next_token(); // move past [

        if self.cur_is(TokenKind::RBracket) {
            // Slice type: []type{...}
            self.next_token(); // move past ]
            if self.cur_is(TokenKind::Ident) || self.is_type() {
                let mut ty = TypeAnnotation::named(self.cur.clone(), self.cur.literal.clone());
                ty.array_len = -1;
                self.next_token(); // move past type
                let elements = if self.cur_is(TokenKind::LBrace) {
                    self.parse_expression_list_brace().unwrap_or_default()
                } else {
                    Vec::new()
                };
                return Some(Expression::ArrayLiteral {
                    token,
                    ty: Some(ty),
                    elements,
                });
            }
            // Bare empty brackets
            return Some(Expression::ArrayLiteral {
                token,
                ty: None,
                elements: Vec::new(),
            });
        }

        if self.cur_is(TokenKind::Int) && self.peek_is(TokenKind::RBracket) {
            // Fixed array: [5]type{...}
            let length: i64 = self.cur.literal.parse().unwrap_or(0);
            self.next_token(); // move past number
            self.next_token(); // move past ]
            if self.cur_is(TokenKind::Ident) || self.is_type() {
                let mut ty = TypeAnnotation::named(self.cur.clone(), self.cur.literal.clone());
                ty.array_len = length;
                self.next_token(); // move past type
                let elements = if self.cur_is(TokenKind::LBrace) {
                    self.parse_expression_list_brace().unwrap_or_default()
                } else {
                    Vec::new()
                };
                return Some(Expression::ArrayLiteral {
                    token,
                    ty: Some(ty),
                    elements,
                });
            }
            return None;
        }

        // Untyped array literal: [1, 2, 3]
        let mut elements = Vec::new();
        elements.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_is(TokenKind::Comma) {
            self.next_token(); // comma
            self.next_token(); // next element
            elements.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(TokenKind::RBracket) {
            return None;
        }

        Some(Expression::ArrayLiteral {
            token,
            ty: None,
            elements,
        })
    }

    fn parse_expression_list_brace(&mut self) -> Option<Vec<Expression>> {
        let mut list = Vec::new();

        if !self.cur_is(TokenKind::LBrace) {
            return Some(list);
        }

        if self.peek_is(TokenKind::RBrace) {
            self.next_token();
            return Some(list);
        }

        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(TokenKind::RBrace) {
            return None;
        }

        Some(list)
    }

    /// `len(x)` parses as a call to the identifier `len`; the code generator
    /// expands it.
    fn parse_len_expression(&mut self) -> Option<Expression> {
        let token = self.cur.clone();
        let function = Box::new(Expression::Identifier(Identifier {
            token: token.clone(),
            value: "len".to_string(),
        }));

        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        let arguments = self
            .parse_expression_list(TokenKind::RParen)
            .unwrap_or_default();

        Some(Expression::Call {
            token,
            function,
            arguments,
        })
    }

    fn parse_make_expression(&mut self) -> Option<Expression> {
        let token = self.cur.clone();

        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        self.next_token();

        let ty = self.parse_type_annotation()?;

        let mut length = None;
        let mut capacity = None;
        if self.peek_is(TokenKind::Comma) {
            self.next_token(); // comma
            self.next_token();
            length = Some(Box::new(self.parse_expression(Precedence::Lowest)?));

            if self.peek_is(TokenKind::Comma) {
                self.next_token(); // comma
                self.next_token();
                capacity = Some(Box::new(self.parse_expression(Precedence::Lowest)?));
            }
        }

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }

        Some(Expression::Make {
            token,
            ty,
            length,
            capacity,
        })
    }

    fn parse_alloc_expression(&mut self) -> Option<Expression> {
        let token = self.cur.clone();

        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        self.next_token();

        let ty = self.parse_type_annotation()?;

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }

        Some(Expression::Alloc { token, ty })
    }

    fn parse_map_literal(&mut self) -> Option<Expression> {
        let token = self.cur.clone();

        // Parse the type: map[KeyType]ValueType
        let mut ty = TypeAnnotation::named(token.clone(), "");
        ty.is_map = true;

        if !self.expect_peek(TokenKind::LBracket) {
            return None;
        }
        self.next_token(); // move to key type
        ty.key_type = Some(Box::new(self.parse_type_annotation()?));

        if !self.expect_peek(TokenKind::RBracket) {
            return None;
        }
        self.next_token(); // move to value type
        ty.value_type = Some(Box::new(self.parse_type_annotation()?));

        // Parse the literal body { key: value, ... }
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }

        let pairs = self.parse_map_pairs().unwrap_or_default();

        Some(Expression::MapLiteral { token, ty, pairs })
    }

    fn parse_map_pairs(&mut self) -> Option<Vec<MapPair>> {
        let mut pairs = Vec::new();

        if self.peek_is(TokenKind::RBrace) {
            self.next_token();
            return Some(pairs);
        }

        self.next_token();

        let key = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::Colon) {
            return None;
        }
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        pairs.push(MapPair { key, value });

        while self.peek_is(TokenKind::Comma) {
            self.next_token(); // comma
            self.next_token(); // next key

            let key = self.parse_expression(Precedence::Lowest)?;
            if !self.expect_peek(TokenKind::Colon) {
                return None;
            }
            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push(MapPair { key, value });
        }

        if !self.expect_peek(TokenKind::RBrace) {
            return None;
        }

        Some(pairs)
    }
}

/// True for token kinds registered as infix operators.
fn has_infix(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Asterisk
            | TokenKind::Slash
            | TokenKind::Percent
            | TokenKind::Eq
            | TokenKind::NotEq
            | TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::Lte
            | TokenKind::Gte
            | TokenKind::And
            | TokenKind::Or
            | TokenKind::Assign
            | TokenKind::PlusAssign
            | TokenKind::MinusAssign
            | TokenKind::MulAssign
            | TokenKind::DivAssign
            | TokenKind::Increment
            | TokenKind::Decrement
            | TokenKind::LParen
            | TokenKind::LBracket
            | TokenKind::Dot
    )
}
