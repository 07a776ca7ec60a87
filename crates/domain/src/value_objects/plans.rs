use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value_objects::enums::{
    billing_periods::BillingPeriod, payment_methods::PaymentMethod,
};

#[derive(Debug, Clone, Serialize)]
pub struct PlanDto {
    pub id: Uuid,
    pub name: String,
    pub amount_minor: i64,
    pub due_day: i32,
    pub default_payment_method: PaymentMethod,
    pub billing_period: BillingPeriod,
    pub description: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPlan {
    pub name: String,
    pub amount_minor: i64,
    pub due_day: i32,
    pub default_payment_method: PaymentMethod,
    pub billing_period: BillingPeriod,
    pub description: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanAssignmentDto {
    pub id: Uuid,
    pub athlete_id: Uuid,
    pub plan_id: Uuid,
    pub starts_on: NaiveDate,
    pub ends_on: Option<NaiveDate>,
    pub is_active: bool,
}
