pub mod collection;
pub mod enums;
pub mod iam;
pub mod plans;
pub mod receivables;
