pub mod athletes;
pub mod guardians;
pub mod plan_assignments;
pub mod plans;
pub mod receivables;
