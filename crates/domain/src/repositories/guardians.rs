use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::entities::guardians::GuardianEntity;

#[async_trait]
#[automock]
pub trait GuardianRepository {
    /// First guardian linked to the athlete, if any.
    async fn find_for_athlete(&self, athlete_id: Uuid) -> Result<Option<GuardianEntity>>;

    /// Athlete ids a guardian user account is linked to. Used to scope
    /// PARENT-role queries at the repository boundary.
    async fn list_athlete_ids_for_user(&self, user_id: Uuid) -> Result<Vec<Uuid>>;
}
