use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::{
    Connection, OptionalExtension, RunQueryDsl,
    dsl::{count_star, sum},
    insert_into,
    prelude::*,
    update,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::postgres::postgres_connection::PgPoolSquad;
use domain::{
    entities::receivables::{InsertReceivableEntity, ReceivableEntity},
    repositories::receivables::ReceivableRepository,
    schema::{athletes, receivables},
    value_objects::{
        enums::{receivable_origins::ReceivableOrigin, receivable_statuses::ReceivableStatus},
        receivables::{ReceivableQuery, ReceivableTotals, ReceivableWithAthlete},
    },
};

const QUERY_LIMIT: i64 = 100;

const DELINQUENT_STATUSES: [&str; 2] = ["pending", "overdue"];

pub struct ReceivablePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ReceivablePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ReceivableRepository for ReceivablePostgres {
    async fn create_many(&self, rows: Vec<InsertReceivableEntity>) -> Result<Vec<Uuid>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // All or nothing: a failed insert rolls back every installment of
        // the series.
        let ids = conn.transaction::<Vec<Uuid>, anyhow::Error, _>(|conn| {
            let mut ids = Vec::with_capacity(rows.len());
            for row in &rows {
                let id = insert_into(receivables::table)
                    .values(row)
                    .returning(receivables::id)
                    .get_result::<Uuid>(conn)?;
                ids.push(id);
            }
            Ok(ids)
        })?;

        Ok(ids)
    }

    async fn create_batch(&self, rows: Vec<InsertReceivableEntity>) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // One transaction for the whole batch: a failure rolls every insert
        // back, never leaving a partially generated month behind. The
        // ON CONFLICT target is the partial unique index on
        // (athlete_id, competency) WHERE origin = 'auto'.
        let inserted = conn.transaction::<usize, anyhow::Error, _>(|conn| {
            let mut inserted = 0;
            for row in &rows {
                inserted += insert_into(receivables::table)
                    .values(row)
                    .on_conflict_do_nothing()
                    .execute(conn)?;
            }
            Ok(inserted)
        })?;

        Ok(inserted)
    }

    async fn exists_auto_for_competency(
        &self,
        athlete_id: Uuid,
        competency: NaiveDate,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let found = receivables::table
            .filter(receivables::athlete_id.eq(athlete_id))
            .filter(receivables::competency.eq(competency))
            .filter(receivables::origin.eq(ReceivableOrigin::Auto.as_str()))
            .select(receivables::id)
            .first::<Uuid>(&mut conn)
            .optional()?;

        Ok(found.is_some())
    }

    async fn find_by_id(&self, receivable_id: Uuid) -> Result<Option<ReceivableEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let receivable = receivables::table
            .filter(receivables::id.eq(receivable_id))
            .select(ReceivableEntity::as_select())
            .first::<ReceivableEntity>(&mut conn)
            .optional()?;

        Ok(receivable)
    }

    async fn query_with_athlete(
        &self,
        filter: ReceivableQuery,
    ) -> Result<Vec<ReceivableWithAthlete>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = receivables::table
            .inner_join(athletes::table)
            .select((ReceivableEntity::as_select(), athletes::name))
            .into_boxed();

        if filter.delinquent_only {
            query = query.filter(receivables::status.eq_any(DELINQUENT_STATUSES));
        } else if let Some(status) = filter.status {
            query = query.filter(receivables::status.eq(status.as_str()));
        }

        if let Some(method) = filter.payment_method {
            query = query.filter(receivables::payment_method.eq(method.as_str()));
        }

        if let Some(name) = filter.athlete_name.as_deref() {
            let name = name.trim();
            if !name.is_empty() {
                query = query.filter(athletes::name.ilike(format!("%{}%", name)));
            }
        }

        let rows = query
            .order(receivables::due_date.desc())
            .limit(QUERY_LIMIT)
            .load::<(ReceivableEntity, String)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(receivable, athlete_name)| ReceivableWithAthlete {
                receivable,
                athlete_name,
            })
            .collect())
    }

    async fn list_for_athletes(
        &self,
        athlete_ids: Vec<Uuid>,
    ) -> Result<Vec<ReceivableWithAthlete>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = receivables::table
            .inner_join(athletes::table)
            .filter(receivables::athlete_id.eq_any(&athlete_ids))
            .order(receivables::due_date.desc())
            .select((ReceivableEntity::as_select(), athletes::name))
            .load::<(ReceivableEntity, String)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(receivable, athlete_name)| ReceivableWithAthlete {
                receivable,
                athlete_name,
            })
            .collect())
    }

    async fn list_delinquent_for_athlete(
        &self,
        athlete_id: Uuid,
    ) -> Result<Vec<ReceivableEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = receivables::table
            .filter(receivables::athlete_id.eq(athlete_id))
            .filter(receivables::status.eq_any(DELINQUENT_STATUSES))
            .order(receivables::due_date.asc())
            .select(ReceivableEntity::as_select())
            .load::<ReceivableEntity>(&mut conn)?;

        Ok(rows)
    }

    async fn totals_global(&self) -> Result<ReceivableTotals> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let outstanding_minor = receivables::table
            .filter(receivables::status.ne(ReceivableStatus::Paid.as_str()))
            .select(sum(receivables::amount_minor))
            .first::<Option<i64>>(&mut conn)?
            .unwrap_or(0);

        let collected_minor = receivables::table
            .filter(receivables::status.eq(ReceivableStatus::Paid.as_str()))
            .select(sum(receivables::amount_minor))
            .first::<Option<i64>>(&mut conn)?
            .unwrap_or(0);

        let delinquent_count = receivables::table
            .filter(receivables::status.eq_any(DELINQUENT_STATUSES))
            .select(count_star())
            .first::<i64>(&mut conn)?;

        Ok(ReceivableTotals {
            outstanding_minor,
            collected_minor,
            delinquent_count,
        })
    }

    async fn totals_for_athletes(&self, athlete_ids: Vec<Uuid>) -> Result<ReceivableTotals> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let outstanding_minor = receivables::table
            .filter(receivables::athlete_id.eq_any(&athlete_ids))
            .filter(receivables::status.ne(ReceivableStatus::Paid.as_str()))
            .select(sum(receivables::amount_minor))
            .first::<Option<i64>>(&mut conn)?
            .unwrap_or(0);

        let collected_minor = receivables::table
            .filter(receivables::athlete_id.eq_any(&athlete_ids))
            .filter(receivables::status.eq(ReceivableStatus::Paid.as_str()))
            .select(sum(receivables::amount_minor))
            .first::<Option<i64>>(&mut conn)?
            .unwrap_or(0);

        let delinquent_count = receivables::table
            .filter(receivables::athlete_id.eq_any(&athlete_ids))
            .filter(receivables::status.eq_any(DELINQUENT_STATUSES))
            .select(count_star())
            .first::<i64>(&mut conn)?;

        Ok(ReceivableTotals {
            outstanding_minor,
            collected_minor,
            delinquent_count,
        })
    }

    async fn set_status(
        &self,
        receivable_id: Uuid,
        status: ReceivableStatus,
        paid_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(receivables::table.filter(receivables::id.eq(receivable_id)))
            .set((
                receivables::status.eq(status.as_str()),
                receivables::paid_at.eq(paid_at),
            ))
            .execute(&mut conn)?;

        Ok(())
    }
}
