//! A learning project: compiling SQL `SELECT` queries into logical plans
//! and running them on a Volcano-style iterator engine.
//!
//! The pipeline runs in four stages, each its own module:
//!
//! - [`sql::lexer`] turns query text into positioned tokens
//! - [`sql::parser`] builds an AST, accumulating errors instead of bailing
//! - [`plan`] resolves the AST against the [`catalog`] into a logical plan
//! - [`exec`] pulls rows through an iterator tree built from that plan

pub mod catalog;
pub mod exec;
pub mod plan;
pub mod sql;

pub use catalog::Catalog;
pub use exec::{Executor, Row, Value};
pub use plan::{LogicalPlan, Planner};
pub use sql::parser::Parser;
