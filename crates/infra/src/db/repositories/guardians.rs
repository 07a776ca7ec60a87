use anyhow::Result;
use async_trait::async_trait;
use diesel::{OptionalExtension, RunQueryDsl, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::postgres::postgres_connection::PgPoolSquad;
use domain::{
    entities::guardians::GuardianEntity,
    repositories::guardians::GuardianRepository,
    schema::{guardian_athletes, guardians},
};

pub struct GuardianPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl GuardianPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl GuardianRepository for GuardianPostgres {
    async fn find_for_athlete(&self, athlete_id: Uuid) -> Result<Option<GuardianEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let guardian = guardian_athletes::table
            .inner_join(guardians::table)
            .filter(guardian_athletes::athlete_id.eq(athlete_id))
            .select(GuardianEntity::as_select())
            .first::<GuardianEntity>(&mut conn)
            .optional()?;

        Ok(guardian)
    }

    async fn list_athlete_ids_for_user(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let athlete_ids = guardian_athletes::table
            .inner_join(guardians::table)
            .filter(guardians::user_id.eq(user_id))
            .select(guardian_athletes::athlete_id)
            .load::<Uuid>(&mut conn)?;

        Ok(athlete_ids)
    }
}
