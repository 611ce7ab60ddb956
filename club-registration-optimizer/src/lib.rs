//! Who may join which club, and the batch that fills the remaining seats.

pub mod auto_assign;
pub mod eligibility;

pub use auto_assign::{auto_assign, AutoAssignSummary};
pub use eligibility::{is_eligible, is_grade_allowed, parse_grade_level, GradeLevel};
