use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::guardians;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = guardians)]
pub struct GuardianEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}
