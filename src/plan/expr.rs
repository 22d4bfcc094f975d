use std::fmt;

use crate::catalog::DataType;
use crate::exec::row::Value;
use crate::sql::parser::Operator;

/// A planned expression, decoupled from the parse-time AST so planning can
/// rewrite names without touching parser types.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanExpr {
    /// Column reference, resolved at evaluation time against the row.
    Column {
        table: Option<String>,
        column: String,
    },

    /// A constant with the catalog type tag it was planned as.
    Literal { value: Value, data_type: DataType },

    BinaryOp {
        left: Box<PlanExpr>,
        op: Operator,
        right: Box<PlanExpr>,
    },
}

impl fmt::Display for PlanExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanExpr::Column {
                table: Some(table),
                column,
            } => write!(f, "{table}.{column}"),
            PlanExpr::Column {
                table: None,
                column,
            } => write!(f, "{column}"),
            PlanExpr::Literal { value, data_type } => match data_type {
                DataType::Text => write!(f, "'{value}'"),
                _ => write!(f, "{value}"),
            },
            PlanExpr::BinaryOp { left, op, right } => write!(f, "({left} {op} {right})"),
        }
    }
}
