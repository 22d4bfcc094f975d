use std::fmt;
use std::mem;

use crate::sql::lexer::{Lexer, Token, TokenKind};

pub use ast::{Expression, JoinClause, JoinKind, Literal, SelectStatement, Statement, TableRef};
pub use keyword::Keyword;
pub use operators::Operator;

pub mod ast;
pub mod keyword;
pub mod operators;

/// Recursive descent SQL parser with one token of lookahead.
///
/// The parser never aborts on the first problem: each failed production
/// records a positioned diagnostic and yields nothing, so a caller decides
/// whether to proceed by checking [`Parser::errors`] rather than catching a
/// failure.
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    cur: Token<'src>,
    peek: Token<'src>,
    errors: Vec<String>,
}

impl<'src> Parser<'src> {
    pub fn new(query: &'src str) -> Self {
        let mut lexer = Lexer::new(query);
        let cur = lexer.next_token();
        let peek = lexer.next_token();

        Self {
            lexer,
            cur,
            peek,
            errors: Vec::new(),
        }
    }

    /// Accumulated diagnostics, in the order they were recorded.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Parses a single statement. A `None` result, or a non-empty error
    /// list, means the query must not be planned.
    pub fn parse(&mut self) -> Option<Statement<'src>> {
        if self.cur_is(TokenKind::Keyword(Keyword::Select)) {
            return self.parse_select_statement().map(Statement::Select);
        }

        let kind = self.cur.kind;
        self.add_error(format_args!("unexpected token {kind}"));
        None
    }

    fn parse_select_statement(&mut self) -> Option<SelectStatement<'src>> {
        if !(self.peek_is(TokenKind::Asterisk) || self.peek_is(TokenKind::Ident)) {
            self.add_error(format_args!("expected column name or '*'"));
            return None;
        }

        self.bump();
        let columns = self.parse_projection_list();

        if !self.expect_peek(TokenKind::Keyword(Keyword::From)) {
            return None;
        }

        self.bump();
        let from = self.parse_table_ref()?;

        let mut joins = Vec::new();
        while matches!(
            self.peek.kind,
            TokenKind::Keyword(Keyword::Join | Keyword::Inner | Keyword::Left | Keyword::Right)
        ) {
            self.bump();
            if let Some(join) = self.parse_join_clause() {
                joins.push(join);
            }
        }

        let mut where_clause = None;
        if self.peek_is(TokenKind::Keyword(Keyword::Where)) {
            self.bump();
            self.bump();
            where_clause = self.parse_expression();
        }

        Some(SelectStatement {
            columns,
            from,
            joins,
            where_clause,
        })
    }

    fn parse_projection_list(&mut self) -> Vec<Expression<'src>> {
        let mut columns = Vec::new();

        if self.cur_is(TokenKind::Asterisk) {
            columns.push(Expression::Star { table: None });
            return columns;
        }

        if let Some(column) = self.parse_column_ref() {
            columns.push(column);
        }

        while self.peek_is(TokenKind::Comma) {
            self.bump();
            self.bump();

            if let Some(column) = self.parse_column_ref() {
                columns.push(column);
            }
        }

        columns
    }

    fn parse_column_ref(&mut self) -> Option<Expression<'src>> {
        if !self.cur_is(TokenKind::Ident) {
            let kind = self.cur.kind;
            self.add_error(format_args!("expected column name, got {kind}"));
            return None;
        }

        let first = self.cur.literal;

        if self.peek_is(TokenKind::Dot) {
            self.bump();

            // 'table.*' is a star scoped to one table
            if self.peek_is(TokenKind::Asterisk) {
                self.bump();
                return Some(Expression::Star { table: Some(first) });
            }

            if !self.expect_peek(TokenKind::Ident) {
                return None;
            }

            return Some(Expression::Column {
                table: Some(first),
                column: self.cur.literal,
            });
        }

        Some(Expression::Column {
            table: None,
            column: first,
        })
    }

    fn parse_table_ref(&mut self) -> Option<TableRef<'src>> {
        if !self.cur_is(TokenKind::Ident) {
            let kind = self.cur.kind;
            self.add_error(format_args!("expected table name, got {kind}"));
            return None;
        }

        let name = self.cur.literal;

        // alias via explicit AS or a bare trailing identifier
        let alias = if self.peek_is(TokenKind::Keyword(Keyword::As)) {
            self.bump();
            if !self.expect_peek(TokenKind::Ident) {
                return None;
            }
            Some(self.cur.literal)
        } else if self.peek_is(TokenKind::Ident) {
            self.bump();
            Some(self.cur.literal)
        } else {
            None
        };

        Some(TableRef { name, alias })
    }

    fn parse_join_clause(&mut self) -> Option<JoinClause<'src>> {
        let kind = match self.cur.kind {
            TokenKind::Keyword(Keyword::Inner) => {
                if !self.expect_peek(TokenKind::Keyword(Keyword::Join)) {
                    return None;
                }
                JoinKind::Inner
            }
            TokenKind::Keyword(Keyword::Left) => {
                if !self.expect_peek(TokenKind::Keyword(Keyword::Join)) {
                    return None;
                }
                JoinKind::Left
            }
            TokenKind::Keyword(Keyword::Right) => {
                if !self.expect_peek(TokenKind::Keyword(Keyword::Join)) {
                    return None;
                }
                JoinKind::Right
            }
            _ => JoinKind::Inner,
        };

        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let table = self.parse_table_ref()?;

        if !self.expect_peek(TokenKind::Keyword(Keyword::On)) {
            return None;
        }
        self.bump();
        let condition = self.parse_expression()?;

        Some(JoinClause {
            kind,
            table,
            condition,
        })
    }

    // Precedence climbing, lowest to highest: OR, AND, comparison, primary.

    fn parse_expression(&mut self) -> Option<Expression<'src>> {
        self.parse_or_expression()
    }

    fn parse_or_expression(&mut self) -> Option<Expression<'src>> {
        let mut left = self.parse_and_expression();

        while self.peek_is(TokenKind::Keyword(Keyword::Or)) {
            self.bump();
            self.bump();
            let right = self.parse_and_expression();
            left = combine(left, Operator::Or, right);
        }

        left
    }

    fn parse_and_expression(&mut self) -> Option<Expression<'src>> {
        let mut left = self.parse_comparison_expression();

        while self.peek_is(TokenKind::Keyword(Keyword::And)) {
            self.bump();
            self.bump();
            let right = self.parse_comparison_expression();
            left = combine(left, Operator::And, right);
        }

        left
    }

    /// Comparisons are non-chaining: at most one comparison per level.
    fn parse_comparison_expression(&mut self) -> Option<Expression<'src>> {
        let left = self.parse_primary_expression();

        if let Some(op) = self.peek_comparison_op() {
            self.bump();
            self.bump();
            let right = self.parse_primary_expression();
            return combine(left, op, right);
        }

        left
    }

    fn parse_primary_expression(&mut self) -> Option<Expression<'src>> {
        match self.cur.kind {
            TokenKind::Ident => self.parse_column_ref(),
            TokenKind::Int => match self.cur.literal.parse::<i64>() {
                Ok(value) => Some(Expression::Literal(Literal::Int(value))),
                Err(_) => {
                    let literal = self.cur.literal;
                    self.add_error(format_args!("integer literal out of range: {literal}"));
                    None
                }
            },
            TokenKind::Str => Some(Expression::Literal(Literal::Text(self.cur.literal))),
            TokenKind::LParen => {
                self.bump();
                let expression = self.parse_expression();
                if !self.expect_peek(TokenKind::RParen) {
                    return None;
                }
                expression
            }
            _ => {
                let kind = self.cur.kind;
                self.add_error(format_args!("unexpected token in expression: {kind}"));
                None
            }
        }
    }

    fn peek_comparison_op(&self) -> Option<Operator> {
        match self.peek.kind {
            TokenKind::Eq => Some(Operator::Equal),
            TokenKind::NotEq => Some(Operator::NotEqual),
            TokenKind::Lt => Some(Operator::LessThan),
            TokenKind::LtEq => Some(Operator::LessThanEqual),
            TokenKind::Gt => Some(Operator::GreaterThan),
            TokenKind::GtEq => Some(Operator::GreaterThanEqual),
            _ => None,
        }
    }

    fn bump(&mut self) {
        self.cur = mem::replace(&mut self.peek, self.lexer.next_token());
    }

    fn cur_is(&self, kind: TokenKind) -> bool {
        self.cur.kind == kind
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    /// Advances when the next token matches, otherwise records a diagnostic
    /// naming the expected and actual token kinds.
    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_is(kind) {
            self.bump();
            return true;
        }

        let peek_kind = self.peek.kind;
        self.add_error(format_args!("expected {kind}, got {peek_kind}"));
        false
    }

    fn add_error(&mut self, message: fmt::Arguments<'_>) {
        self.errors.push(format!(
            "line {}, col {}: {message}",
            self.cur.line, self.cur.column
        ));
    }
}

fn combine<'src>(
    left: Option<Expression<'src>>,
    op: Operator,
    right: Option<Expression<'src>>,
) -> Option<Expression<'src>> {
    match (left, right) {
        (Some(left), Some(right)) => Some(Expression::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }),
        _ => None,
    }
}
