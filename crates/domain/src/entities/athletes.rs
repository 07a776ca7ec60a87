use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::athletes;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = athletes)]
pub struct AthleteEntity {
    pub id: Uuid,
    pub name: String,
    pub birth_date: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = athletes)]
pub struct InsertAthleteEntity {
    pub name: String,
    pub birth_date: NaiveDate,
    pub status: String,
}
