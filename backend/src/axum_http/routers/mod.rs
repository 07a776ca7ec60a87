pub mod billing;
pub mod collection;
pub mod plans;
pub mod receivables;
