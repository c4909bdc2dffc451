//! Parser core: lookahead window, precedence table, and diagnostics
//!
//! The parser is a Pratt parser with two tokens of lookahead. It never
//! aborts: every failed production records a diagnostic and returns `None`,
//! and the top-level statement loop advances one token and continues, so a
//! program AST is always produced alongside the accumulated error list.

use super::ast::{Program, TypeAnnotation};
use super::lexer::{Lexer, Token, TokenKind};

/// Operator precedence levels, lowest binding power first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Assign,      // =, +=, -=, *=, /=
    Or,          // ||
    And,         // &&
    Equals,      // ==, !=
    LessGreater, // <, >, <=, >=
    Sum,         // +, -
    Product,     // *, /, %
    Prefix,      // -x, !x, &x, *x
    Postfix,     // x++, x--
    Call,        // foo()
    Index,       // arr[0]
    Member,      // obj.field
}

/// Binding power of an infix operator token; [`Precedence::Lowest`] for
/// anything that is not an infix operator.
pub fn precedence_of(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::Assign
        | TokenKind::PlusAssign
        | TokenKind::MinusAssign
        | TokenKind::MulAssign
        | TokenKind::DivAssign => Precedence::Assign,
        TokenKind::Or => Precedence::Or,
        TokenKind::And => Precedence::And,
        TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
        TokenKind::Lt | TokenKind::Gt | TokenKind::Lte | TokenKind::Gte => Precedence::LessGreater,
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        TokenKind::Asterisk | TokenKind::Slash | TokenKind::Percent => Precedence::Product,
        TokenKind::Increment | TokenKind::Decrement => Precedence::Postfix,
        TokenKind::LParen => Precedence::Call,
        TokenKind::LBracket => Precedence::Index,
        TokenKind::Dot => Precedence::Member,
        _ => Precedence::Lowest,
    }
}

/// Parser for H source, producing a [`Program`] plus diagnostics.
pub struct Parser {
    lexer: Lexer,
    errors: Vec<String>,

    pub(crate) cur: Token,
    pub(crate) peek: Token,
}

impl Parser {
    /// Create a parser and prime the two-token lookahead window.
    pub fn new(lexer: Lexer) -> Self {
        let mut p = Parser {
            lexer,
            errors: Vec::new(),
            cur: Token::empty(),
            peek: Token::empty(),
        };

        p.next_token();
        p.next_token();

        p
    }

    /// Advance the lookahead window, filtering comment tokens.
    pub(crate) fn next_token(&mut self) {
        self.cur = std::mem::replace(&mut self.peek, self.lexer.next_token());
        while self.peek.kind == TokenKind::Comment {
            self.peek = self.lexer.next_token();
        }
    }

    pub(crate) fn cur_is(&self, kind: TokenKind) -> bool {
        self.cur.kind == kind
    }

    pub(crate) fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    /// Advance if the peek token matches, otherwise record a diagnostic.
    pub(crate) fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_is(kind) {
            self.next_token();
            true
        } else {
            self.peek_error(kind);
            false
        }
    }

    fn peek_error(&mut self, kind: TokenKind) {
        let msg = format!(
            "line {}: expected {}, got {} instead",
            self.peek.line, kind, self.peek.kind
        );
        self.errors.push(msg);
    }

    pub(crate) fn error(&mut self, msg: String) {
        self.errors.push(msg);
    }

    /// Diagnostics accumulated so far.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub(crate) fn cur_precedence(&self) -> Precedence {
        precedence_of(self.cur.kind)
    }

    pub(crate) fn peek_precedence(&self) -> Precedence {
        precedence_of(self.peek.kind)
    }

    /// Parse the entire program. Always returns a [`Program`]; check
    /// [`errors`](Parser::errors) before trusting it.
    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::new();

        while !self.cur_is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement() {
                program.statements.push(stmt);
            }
            self.next_token();
        }

        program
    }

    /// True when the current token can begin a type in cast position.
    /// User-defined names are deliberately excluded so `(ident)` stays a
    /// grouped expression.
    pub(crate) fn is_type(&self) -> bool {
        matches!(
            self.cur.kind,
            TokenKind::TypeInt
                | TokenKind::TypeFloat
                | TokenKind::TypeString
                | TokenKind::TypeChar
                | TokenKind::TypeBool
                | TokenKind::TypeVoid
                | TokenKind::Asterisk
        )
    }

    /// Parse a type annotation starting at the current token. On return the
    /// current token is the final token of the annotation (the type name, or
    /// the map value type's final token).
    pub(crate) fn parse_type_annotation(&mut self) -> Option<TypeAnnotation> {
        let token = self.cur.clone();
        let mut ty = TypeAnnotation::named(token, "");

        if self.cur_is(TokenKind::Asterisk) {
            ty.is_ptr = true;
            self.next_token();
        }

        // map[KeyType]ValueType
        if self.cur_is(TokenKind::Map) {
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
            return Some(ty);
        }

        // Array or slice prefix
        if self.cur_is(TokenKind::LBracket) {
            self.next_token();
            if self.cur_is(TokenKind::RBracket) {
                ty.array_len = -1; // slice
            } else if self.cur_is(TokenKind::Int) {
                ty.array_len = self.cur.literal.parse().unwrap_or(0);
                self.next_token(); // consume number
            }
            self.next_token(); // consume ]
        }

        ty.name = self.cur.literal.clone();
        Some(ty)
    }
}
