pub mod expr;
pub mod logical;
pub mod planner;

pub use expr::PlanExpr;
pub use logical::LogicalPlan;
pub use planner::Planner;
