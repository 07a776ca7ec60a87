use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, prelude::*};
use std::sync::Arc;

use crate::db::postgres::postgres_connection::PgPoolSquad;
use domain::{
    entities::plan_assignments::PlanAssignmentEntity,
    repositories::plan_assignments::PlanAssignmentRepository, schema::plan_assignments,
};

pub struct PlanAssignmentPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PlanAssignmentPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PlanAssignmentRepository for PlanAssignmentPostgres {
    async fn list_active(&self) -> Result<Vec<PlanAssignmentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = plan_assignments::table
            .filter(plan_assignments::is_active.eq(true))
            .select(PlanAssignmentEntity::as_select())
            .load::<PlanAssignmentEntity>(&mut conn)?;

        Ok(rows)
    }
}
