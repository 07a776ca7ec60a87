pub mod billing_generation;
pub mod calendar;
pub mod collection;
pub mod plans;
pub mod receivables;
