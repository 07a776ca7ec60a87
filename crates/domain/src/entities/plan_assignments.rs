use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::plan_assignments;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = plan_assignments)]
pub struct PlanAssignmentEntity {
    pub id: Uuid,
    pub athlete_id: Uuid,
    pub plan_id: Uuid,
    pub starts_on: NaiveDate,
    pub ends_on: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
