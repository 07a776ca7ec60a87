use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::entities::athletes::AthleteEntity;

#[async_trait]
#[automock]
pub trait AthleteRepository {
    async fn find_by_id(&self, athlete_id: Uuid) -> Result<Option<AthleteEntity>>;
}
