use crate::sql::parser::operators::Operator;

/// A SQL statement (top-level AST node).
#[derive(Debug, Clone, PartialEq)]
pub enum Statement<'src> {
    Select(SelectStatement<'src>),
}

/// A parsed `SELECT` statement.
///
/// The AST borrows identifier and string literal text from the query string;
/// it only lives for the duration of one parse.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement<'src> {
    /// Projected expressions, in source order.
    pub columns: Vec<Expression<'src>>,
    pub from: TableRef<'src>,
    /// Join clauses in source order; planning applies them left-deep.
    pub joins: Vec<JoinClause<'src>>,
    pub where_clause: Option<Expression<'src>>,
}

/// A table reference with an optional alias (`users AS u` or `users u`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRef<'src> {
    pub name: &'src str,
    pub alias: Option<&'src str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
}

impl std::fmt::Display for JoinKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JoinKind::Inner => "INNER",
            JoinKind::Left => "LEFT",
            JoinKind::Right => "RIGHT",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause<'src> {
    pub kind: JoinKind,
    pub table: TableRef<'src>,
    pub condition: Expression<'src>,
}

/// An expression in a projection list, WHERE clause or join condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression<'src> {
    /// Column reference, optionally qualified (`age`, `users.age`)
    Column {
        table: Option<&'src str>,
        column: &'src str,
    },

    Literal(Literal<'src>),

    BinaryOp {
        left: Box<Expression<'src>>,
        op: Operator,
        right: Box<Expression<'src>>,
    },

    /// `*` or `table.*`; only valid directly in the projection list.
    Star { table: Option<&'src str> },
}

/// A literal value in SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal<'src> {
    Int(i64),
    Text(&'src str),
}
