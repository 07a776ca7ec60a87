use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::receivables;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = receivables)]
pub struct ReceivableEntity {
    pub id: Uuid,
    pub athlete_id: Uuid,
    pub description: String,
    pub competency: NaiveDate,
    pub due_date: NaiveDate,
    pub amount_minor: i32,
    pub status: String,
    pub payment_method: String,
    pub origin: String,
    pub external_payment_ref: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = receivables)]
pub struct InsertReceivableEntity {
    pub athlete_id: Uuid,
    pub description: String,
    pub competency: NaiveDate,
    pub due_date: NaiveDate,
    pub amount_minor: i32,
    pub status: String,
    pub payment_method: String,
    pub origin: String,
}
