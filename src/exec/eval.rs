use std::cmp::Ordering;

use thiserror::Error;

use crate::exec::row::{Row, Value};
use crate::plan::expr::PlanExpr;
use crate::sql::parser::Operator;

/// A row-local evaluation failure.
///
/// These are caught and discarded at the iterator boundary (a filtered row
/// is skipped, a projection is dropped from its output row); they never
/// abort a query.
#[derive(Debug, Error, PartialEq)]
pub enum EvalError {
    #[error("column '{0}' not found in row")]
    ColumnNotFound(String),
}

/// Evaluates a planned expression against one in-flight row.
pub fn evaluate(expression: &PlanExpr, row: &Row) -> Result<Value, EvalError> {
    match expression {
        PlanExpr::Column { column, .. } => row
            .get(column)
            .cloned()
            .ok_or_else(|| EvalError::ColumnNotFound(column.clone())),
        PlanExpr::Literal { value, .. } => Ok(value.clone()),
        PlanExpr::BinaryOp { left, op, right } => {
            let left = evaluate(left, row)?;
            let right = evaluate(right, row)?;
            Ok(apply_operator(&left, *op, &right))
        }
    }
}

fn apply_operator(left: &Value, op: Operator, right: &Value) -> Value {
    let result = match op {
        // structural equality, no coercion between cross-type operands
        Operator::Equal => left == right,
        Operator::NotEqual => left != right,
        Operator::LessThan => compare_values(left, right) == Ordering::Less,
        Operator::LessThanEqual => compare_values(left, right) != Ordering::Greater,
        Operator::GreaterThan => compare_values(left, right) == Ordering::Greater,
        Operator::GreaterThanEqual => compare_values(left, right) != Ordering::Less,
        // both sides are already evaluated; non-boolean operands count as false
        Operator::And => truthy(left) && truthy(right),
        Operator::Or => truthy(left) || truthy(right),
    };

    Value::Boolean(result)
}

/// Three-way comparison keyed on the left operand's type. A mismatched
/// right operand degrades to `Equal` instead of failing.
fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Integer(l), Value::Integer(r)) => l.cmp(r),
        (Value::Float(l), Value::Float(r)) => l.partial_cmp(r).unwrap_or(Ordering::Equal),
        (Value::Text(l), Value::Text(r)) => l.cmp(r),
        _ => Ordering::Equal,
    }
}

fn truthy(value: &Value) -> bool {
    matches!(value, Value::Boolean(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DataType;

    fn column(name: &str) -> PlanExpr {
        PlanExpr::Column {
            table: None,
            column: name.to_owned(),
        }
    }

    fn literal(value: Value) -> PlanExpr {
        let data_type = match &value {
            Value::Integer(_) => DataType::Integer,
            Value::Float(_) => DataType::Float,
            Value::Text(_) => DataType::Text,
            Value::Boolean(_) => DataType::Boolean,
        };
        PlanExpr::Literal { value, data_type }
    }

    fn binary(left: PlanExpr, op: Operator, right: PlanExpr) -> PlanExpr {
        PlanExpr::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    fn test_row() -> Row {
        let mut row = Row::new();
        row.insert("id", Value::Integer(7));
        row.insert("name", Value::Text("Alice".to_owned()));
        row.insert("score", Value::Float(2.5));
        row
    }

    #[test]
    fn test_column_lookup() {
        let row = test_row();
        assert_eq!(evaluate(&column("id"), &row), Ok(Value::Integer(7)));
    }

    #[test]
    fn test_missing_column_is_not_found() {
        let row = test_row();
        assert_eq!(
            evaluate(&column("missing"), &row),
            Err(EvalError::ColumnNotFound("missing".to_owned()))
        );
    }

    #[test]
    fn test_equality_has_no_cross_type_coercion() {
        let row = test_row();

        let expr = binary(column("id"), Operator::Equal, literal(Value::Integer(7)));
        assert_eq!(evaluate(&expr, &row), Ok(Value::Boolean(true)));

        // int vs string is simply unequal
        let expr = binary(
            column("id"),
            Operator::Equal,
            literal(Value::Text("7".to_owned())),
        );
        assert_eq!(evaluate(&expr, &row), Ok(Value::Boolean(false)));

        let expr = binary(
            column("id"),
            Operator::NotEqual,
            literal(Value::Text("7".to_owned())),
        );
        assert_eq!(evaluate(&expr, &row), Ok(Value::Boolean(true)));
    }

    #[test]
    fn test_ordered_comparisons() {
        let row = test_row();

        let expr = binary(column("id"), Operator::GreaterThan, literal(Value::Integer(3)));
        assert_eq!(evaluate(&expr, &row), Ok(Value::Boolean(true)));

        let expr = binary(column("id"), Operator::LessThanEqual, literal(Value::Integer(7)));
        assert_eq!(evaluate(&expr, &row), Ok(Value::Boolean(true)));

        let expr = binary(
            column("name"),
            Operator::LessThan,
            literal(Value::Text("Bob".to_owned())),
        );
        assert_eq!(evaluate(&expr, &row), Ok(Value::Boolean(true)));
    }

    #[test]
    fn test_mismatched_comparison_degrades_to_equal() {
        let row = test_row();

        // int vs text: the comparator reports Equal, so > is false and >= is true
        let gt = binary(
            column("id"),
            Operator::GreaterThan,
            literal(Value::Text("zzz".to_owned())),
        );
        assert_eq!(evaluate(&gt, &row), Ok(Value::Boolean(false)));

        let gte = binary(
            column("id"),
            Operator::GreaterThanEqual,
            literal(Value::Text("zzz".to_owned())),
        );
        assert_eq!(evaluate(&gte, &row), Ok(Value::Boolean(true)));
    }

    #[test]
    fn test_and_or_coerce_non_booleans_to_false() {
        let row = test_row();

        let both = binary(
            binary(column("id"), Operator::Equal, literal(Value::Integer(7))),
            Operator::And,
            binary(column("score"), Operator::GreaterThan, literal(Value::Float(1.0))),
        );
        assert_eq!(evaluate(&both, &row), Ok(Value::Boolean(true)));

        // a bare integer operand is not boolean true
        let and = binary(column("id"), Operator::And, literal(Value::Boolean(true)));
        assert_eq!(evaluate(&and, &row), Ok(Value::Boolean(false)));

        let or = binary(column("id"), Operator::Or, literal(Value::Boolean(true)));
        assert_eq!(evaluate(&or, &row), Ok(Value::Boolean(true)));
    }

    #[test]
    fn test_missing_column_inside_binary_propagates() {
        let row = test_row();
        let expr = binary(column("missing"), Operator::Equal, literal(Value::Integer(1)));
        assert!(evaluate(&expr, &row).is_err());
    }
}
