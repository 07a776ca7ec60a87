pub mod billing_periods;
pub mod payment_methods;
pub mod receivable_origins;
pub mod receivable_statuses;
pub mod user_roles;
