use log::debug;
use miette::{Result, miette};

use crate::catalog::{Catalog, DataType};
use crate::exec::row::Value;
use crate::plan::expr::PlanExpr;
use crate::plan::logical::LogicalPlan;
use crate::sql::parser::{Expression, Literal, SelectStatement, Statement};

/// Translates an AST into a logical plan, resolving table names against the
/// catalog and building the operator tree bottom-up.
pub struct Planner<'cat> {
    catalog: &'cat Catalog,
}

impl<'cat> Planner<'cat> {
    pub fn new(catalog: &'cat Catalog) -> Self {
        Self { catalog }
    }

    pub fn create_logical_plan(&self, statement: &Statement<'_>) -> Result<LogicalPlan<'cat>> {
        let Statement::Select(select) = statement;
        self.plan_select(select)
    }

    fn plan_select(&self, select: &SelectStatement<'_>) -> Result<LogicalPlan<'cat>> {
        let table = self.catalog.get_table(select.from.name)?;
        let mut plan = LogicalPlan::Scan {
            table_name: select.from.name.to_owned(),
            table,
            alias: select.from.alias.map(str::to_owned),
        };

        // joins are applied strictly left-deep, in clause order
        for join in &select.joins {
            let right_table = self.catalog.get_table(join.table.name)?;
            let right = LogicalPlan::Scan {
                table_name: join.table.name.to_owned(),
                table: right_table,
                alias: join.table.alias.map(str::to_owned),
            };

            let condition = convert_expr(&join.condition)?;
            plan = LogicalPlan::Join {
                left: Box::new(plan),
                right: Box::new(right),
                kind: join.kind,
                condition,
            };
        }

        if let Some(where_clause) = &select.where_clause {
            let predicate = convert_expr(where_clause)?;
            plan = LogicalPlan::Filter {
                input: Box::new(plan),
                predicate,
            };
        }

        let (projections, column_names) = convert_projections(&select.columns, &plan)?;
        let plan = LogicalPlan::Project {
            input: Box::new(plan),
            projections,
            column_names,
        };

        debug!("planned: {plan}");
        Ok(plan)
    }
}

/// Expands the projection list against the schema of the plan built so far:
/// a star becomes one column expression per schema column, explicit column
/// references pass through.
fn convert_projections(
    columns: &[Expression<'_>],
    input: &LogicalPlan<'_>,
) -> Result<(Vec<PlanExpr>, Vec<String>)> {
    let mut projections = Vec::new();
    let mut column_names = Vec::new();

    for column in columns {
        match column {
            Expression::Star { table } => {
                for schema_column in input.schema() {
                    projections.push(PlanExpr::Column {
                        table: table.map(str::to_owned),
                        column: schema_column.name.clone(),
                    });
                    column_names.push(schema_column.name);
                }
            }
            Expression::Column { table, column } => {
                projections.push(PlanExpr::Column {
                    table: table.map(str::to_owned),
                    column: (*column).to_owned(),
                });
                column_names.push((*column).to_owned());
            }
            other => return Err(miette!("unsupported projection: {other:?}")),
        }
    }

    Ok((projections, column_names))
}

/// Structural conversion of an AST expression into a plan expression.
/// Stars are rejected here: they are only legal in the projection list.
fn convert_expr(expression: &Expression<'_>) -> Result<PlanExpr> {
    match expression {
        Expression::Column { table, column } => Ok(PlanExpr::Column {
            table: table.map(str::to_owned),
            column: (*column).to_owned(),
        }),
        Expression::Literal(Literal::Int(value)) => Ok(PlanExpr::Literal {
            value: Value::Integer(*value),
            data_type: DataType::Integer,
        }),
        Expression::Literal(Literal::Text(value)) => Ok(PlanExpr::Literal {
            value: Value::Text((*value).to_owned()),
            data_type: DataType::Text,
        }),
        Expression::BinaryOp { left, op, right } => Ok(PlanExpr::BinaryOp {
            left: Box::new(convert_expr(left)?),
            op: *op,
            right: Box::new(convert_expr(right)?),
        }),
        Expression::Star { .. } => Err(miette!("'*' is not allowed in this expression position")),
    }
}
