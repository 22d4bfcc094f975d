use std::fmt::{self, Write};

use crate::catalog::{Column, DataType, TableInfo};
use crate::plan::expr::PlanExpr;
use crate::sql::parser::JoinKind;

/// A logical query plan: a tree of relational operators describing what to
/// compute, independent of execution strategy.
///
/// Each interior node exclusively owns its children; the tree is immutable
/// once the planner builds it and lives for a single execute call.
#[derive(Debug)]
pub enum LogicalPlan<'cat> {
    Scan {
        table_name: String,
        table: &'cat TableInfo,
        alias: Option<String>,
    },
    Filter {
        input: Box<LogicalPlan<'cat>>,
        predicate: PlanExpr,
    },
    Join {
        left: Box<LogicalPlan<'cat>>,
        right: Box<LogicalPlan<'cat>>,
        kind: JoinKind,
        condition: PlanExpr,
    },
    Project {
        input: Box<LogicalPlan<'cat>>,
        projections: Vec<PlanExpr>,
        column_names: Vec<String>,
    },
}

impl<'cat> LogicalPlan<'cat> {
    /// The ordered output schema of this node.
    ///
    /// Filter passes its input through unchanged; Join concatenates left
    /// then right (duplicate names are not reconciled); Project emits one
    /// column per output name with a text placeholder type, since projected
    /// expression types are not tracked.
    pub fn schema(&self) -> Vec<Column> {
        match self {
            LogicalPlan::Scan { table, .. } => table.columns.clone(),
            LogicalPlan::Filter { input, .. } => input.schema(),
            LogicalPlan::Join { left, right, .. } => {
                let mut columns = left.schema();
                columns.extend(right.schema());
                columns
            }
            LogicalPlan::Project { column_names, .. } => column_names
                .iter()
                .map(|name| Column {
                    name: name.clone(),
                    data_type: DataType::Text,
                })
                .collect(),
        }
    }

    pub fn children(&self) -> Vec<&LogicalPlan<'cat>> {
        match self {
            LogicalPlan::Scan { .. } => Vec::new(),
            LogicalPlan::Filter { input, .. } | LogicalPlan::Project { input, .. } => {
                vec![input]
            }
            LogicalPlan::Join { left, right, .. } => vec![left, right],
        }
    }

    /// Renders the plan tree pre-order, children indented one level deeper.
    pub fn explain(&self) -> String {
        let mut out = String::new();
        self.render(&mut out, 0);
        out
    }

    fn render(&self, out: &mut String, depth: usize) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        let _ = writeln!(out, "{self}");

        for child in self.children() {
            child.render(out, depth + 1);
        }
    }
}

impl fmt::Display for LogicalPlan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalPlan::Scan {
                table_name,
                alias: Some(alias),
                ..
            } => write!(f, "Scan({table_name} AS {alias})"),
            LogicalPlan::Scan { table_name, .. } => write!(f, "Scan({table_name})"),
            LogicalPlan::Filter { predicate, .. } => write!(f, "Filter({predicate})"),
            LogicalPlan::Join {
                kind, condition, ..
            } => write!(f, "Join({kind}, {condition})"),
            LogicalPlan::Project { column_names, .. } => {
                write!(f, "Project({})", column_names.join(", "))
            }
        }
    }
}
