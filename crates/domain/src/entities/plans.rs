use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::plans;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = plans)]
pub struct PlanEntity {
    pub id: Uuid,
    pub name: String,
    pub amount_minor: i32,
    pub due_day: i32,
    pub default_payment_method: String,
    pub billing_period: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = plans)]
pub struct InsertPlanEntity {
    pub name: String,
    pub amount_minor: i32,
    pub due_day: i32,
    pub default_payment_method: String,
    pub billing_period: String,
    pub description: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = plans)]
pub struct UpdatePlanEntity {
    pub name: String,
    pub amount_minor: i32,
    pub due_day: i32,
    pub default_payment_method: String,
    pub billing_period: String,
    pub description: Option<String>,
    pub is_active: bool,
}
