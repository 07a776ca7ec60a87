use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::{
    entities::receivables::{InsertReceivableEntity, ReceivableEntity},
    value_objects::{
        enums::receivable_statuses::ReceivableStatus,
        receivables::{ReceivableQuery, ReceivableTotals, ReceivableWithAthlete},
    },
};

#[async_trait]
#[automock]
pub trait ReceivableRepository {
    /// Inserts all rows in one transaction and returns their ids in input
    /// order. Any failure rolls the whole set back; no partial series is ever
    /// left behind.
    async fn create_many(&self, receivables: Vec<InsertReceivableEntity>) -> Result<Vec<Uuid>>;

    /// Inserts the whole batch in one transaction. Rows colliding with the
    /// auto-generation unique index are silently dropped; the return value is
    /// the number of rows actually inserted.
    async fn create_batch(&self, receivables: Vec<InsertReceivableEntity>) -> Result<usize>;

    async fn exists_auto_for_competency(
        &self,
        athlete_id: Uuid,
        competency: NaiveDate,
    ) -> Result<bool>;

    async fn find_by_id(&self, receivable_id: Uuid) -> Result<Option<ReceivableEntity>>;

    async fn query_with_athlete(
        &self,
        filter: ReceivableQuery,
    ) -> Result<Vec<ReceivableWithAthlete>>;

    async fn list_for_athletes(&self, athlete_ids: Vec<Uuid>)
    -> Result<Vec<ReceivableWithAthlete>>;

    async fn list_delinquent_for_athlete(&self, athlete_id: Uuid)
    -> Result<Vec<ReceivableEntity>>;

    async fn totals_global(&self) -> Result<ReceivableTotals>;

    async fn totals_for_athletes(&self, athlete_ids: Vec<Uuid>) -> Result<ReceivableTotals>;

    async fn set_status(
        &self,
        receivable_id: Uuid,
        status: ReceivableStatus,
        paid_at: Option<DateTime<Utc>>,
    ) -> Result<()>;
}
