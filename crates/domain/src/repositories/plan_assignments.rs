use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::entities::plan_assignments::PlanAssignmentEntity;

#[async_trait]
#[automock]
pub trait PlanAssignmentRepository {
    /// Every assignment the billing generator considers billable.
    async fn list_active(&self) -> Result<Vec<PlanAssignmentEntity>>;
}
