use anyhow::Result;
use async_trait::async_trait;
use diesel::{OptionalExtension, RunQueryDsl, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::postgres::postgres_connection::PgPoolSquad;
use domain::{
    entities::athletes::AthleteEntity, repositories::athletes::AthleteRepository,
    schema::athletes,
};

pub struct AthletePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl AthletePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl AthleteRepository for AthletePostgres {
    async fn find_by_id(&self, athlete_id: Uuid) -> Result<Option<AthleteEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let athlete = athletes::table
            .filter(athletes::id.eq(athlete_id))
            .select(AthleteEntity::as_select())
            .first::<AthleteEntity>(&mut conn)
            .optional()?;

        Ok(athlete)
    }
}
