use std::path::PathBuf;

use log::debug;
use miette::Result;

use crate::plan::expr::PlanExpr;
use crate::plan::logical::LogicalPlan;

pub mod eval;
pub mod row;
pub mod source;

pub use eval::{EvalError, evaluate};
pub use row::{Row, Value};

/// Pull-based result set iterator (Volcano model).
///
/// `next` yields one row per call until the source is exhausted; `close`
/// releases resources and is invoked once the caller is done, including
/// when it stops early.
pub trait RowIterator {
    fn next(&mut self) -> Option<Row>;
    fn close(&mut self) {}
}

/// Executes logical plans by instantiating one iterator per plan node and
/// draining the root.
pub struct Executor {
    /// Directory table data files are resolved against.
    data_dir: PathBuf,
}

impl Executor {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Runs the plan to completion and collects every row in pull order.
    ///
    /// The only fatal failures are iterator construction failures
    /// (unreadable table data); per-row evaluation failures are absorbed
    /// by the iterators themselves.
    pub fn execute(&self, plan: &LogicalPlan<'_>) -> Result<Vec<Row>> {
        let mut iterator = self.build_iterator(plan)?;

        let mut results = Vec::new();
        while let Some(row) = iterator.next() {
            results.push(row);
        }
        iterator.close();

        Ok(results)
    }

    fn build_iterator(&self, node: &LogicalPlan<'_>) -> Result<Box<dyn RowIterator>> {
        match node {
            LogicalPlan::Scan {
                table_name, table, ..
            } => {
                // the whole table is materialized up front, not streamed
                let path = self.data_dir.join(&table.data_file);
                let rows = source::read_table_rows(&path)?;
                debug!("scan of '{table_name}' materialized {} rows", rows.len());
                Ok(Box::new(ScanIterator { rows, index: 0 }))
            }
            LogicalPlan::Filter { input, predicate } => Ok(Box::new(FilterIterator {
                input: self.build_iterator(input)?,
                predicate: predicate.clone(),
            })),
            LogicalPlan::Join {
                left,
                right,
                condition,
                ..
            } => {
                let left = self.build_iterator(left)?;
                let mut right = self.build_iterator(right)?;

                let mut right_rows = Vec::new();
                while let Some(row) = right.next() {
                    right_rows.push(row);
                }
                right.close();
                debug!("join materialized {} right rows", right_rows.len());

                Ok(Box::new(JoinIterator {
                    left,
                    condition: condition.clone(),
                    left_row: None,
                    right_rows,
                    right_index: 0,
                }))
            }
            LogicalPlan::Project {
                input,
                projections,
                column_names,
            } => Ok(Box::new(ProjectIterator {
                input: self.build_iterator(input)?,
                projections: projections.clone(),
                column_names: column_names.clone(),
            })),
        }
    }
}

/// Serves a fully materialized table by index.
struct ScanIterator {
    rows: Vec<Row>,
    index: usize,
}

impl RowIterator for ScanIterator {
    fn next(&mut self) -> Option<Row> {
        let row = self.rows.get(self.index).cloned()?;
        self.index += 1;
        Some(row)
    }
}

struct FilterIterator {
    input: Box<dyn RowIterator>,
    predicate: PlanExpr,
}

impl RowIterator for FilterIterator {
    fn next(&mut self) -> Option<Row> {
        // rows whose predicate fails to evaluate, or evaluates to anything
        // but boolean true, are skipped rather than propagated
        loop {
            let row = self.input.next()?;
            if matches!(
                evaluate(&self.predicate, &row),
                Ok(Value::Boolean(true))
            ) {
                return Some(row);
            }
        }
    }

    fn close(&mut self) {
        self.input.close();
    }
}

struct ProjectIterator {
    input: Box<dyn RowIterator>,
    projections: Vec<PlanExpr>,
    column_names: Vec<String>,
}

impl RowIterator for ProjectIterator {
    fn next(&mut self) -> Option<Row> {
        let row = self.input.next()?;

        let mut output = Row::new();
        for (expression, name) in self.projections.iter().zip(&self.column_names) {
            // a projection that fails to evaluate is dropped from the
            // output row; the rest of the row still goes out
            if let Ok(value) = evaluate(expression, &row) {
                output.insert(name, value);
            }
        }

        Some(output)
    }

    fn close(&mut self) {
        self.input.close();
    }
}

/// Nested-loop join over a lazy left input and a fully materialized right
/// buffer. The right input is drained and closed at construction.
///
/// The parsed join kind is carried in the plan but not enforced here: every
/// kind currently runs as an inner join, and unmatched left rows are
/// discarded rather than null-padded.
struct JoinIterator {
    left: Box<dyn RowIterator>,
    condition: PlanExpr,
    left_row: Option<Row>,
    right_rows: Vec<Row>,
    right_index: usize,
}

impl RowIterator for JoinIterator {
    fn next(&mut self) -> Option<Row> {
        loop {
            let combined = if let Some(left_row) = &self.left_row {
                if self.right_index >= self.right_rows.len() {
                    // right side exhausted for this left row; pull the next
                    self.left_row = None;
                    continue;
                }

                let right_row = &self.right_rows[self.right_index];
                self.right_index += 1;

                // left row's columns first, right overwriting on collision
                let mut combined = left_row.clone();
                for (name, value) in right_row.iter() {
                    combined.insert(name, value.clone());
                }
                combined
            } else {
                self.left_row = Some(self.left.next()?);
                self.right_index = 0;
                continue;
            };

            if matches!(
                evaluate(&self.condition, &combined),
                Ok(Value::Boolean(true))
            ) {
                return Some(combined);
            }
        }
    }

    fn close(&mut self) {
        self.left.close();
    }
}
