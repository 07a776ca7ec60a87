use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use chrono::{Datelike, NaiveDate};
use thiserror::Error;
use tracing::{info, warn};

use domain::{
    entities::receivables::InsertReceivableEntity,
    repositories::{
        athletes::AthleteRepository, plan_assignments::PlanAssignmentRepository,
        plans::PlanRepository, receivables::ReceivableRepository,
    },
    value_objects::enums::{
        receivable_origins::ReceivableOrigin, receivable_statuses::ReceivableStatus,
    },
};

use crate::usecases::calendar;

#[derive(Debug, Error)]
pub enum BillingError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl BillingError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        match self {
            BillingError::InvalidArgument(_) => axum::http::StatusCode::BAD_REQUEST,
            BillingError::Internal(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type BillingResult<T> = Result<T, BillingError>;

/// Generates the month's receivables from active plan assignments.
///
/// Idempotence is enforced in two layers: a pre-check per assignment, and a
/// partial unique index on `(athlete_id, competency)` for auto-generated rows
/// that drops any row a concurrent run already inserted.
pub struct BillingGenerationUseCase<As, P, A, R>
where
    As: PlanAssignmentRepository + Send + Sync,
    P: PlanRepository + Send + Sync,
    A: AthleteRepository + Send + Sync,
    R: ReceivableRepository + Send + Sync,
{
    assignment_repository: Arc<As>,
    plan_repository: Arc<P>,
    athlete_repository: Arc<A>,
    receivable_repository: Arc<R>,
    // Process-local fast path for the request-triggered run; the unique index
    // remains the actual guarantee.
    last_generated: Mutex<Option<NaiveDate>>,
}

impl<As, P, A, R> BillingGenerationUseCase<As, P, A, R>
where
    As: PlanAssignmentRepository + Send + Sync,
    P: PlanRepository + Send + Sync,
    A: AthleteRepository + Send + Sync,
    R: ReceivableRepository + Send + Sync,
{
    pub fn new(
        assignment_repository: Arc<As>,
        plan_repository: Arc<P>,
        athlete_repository: Arc<A>,
        receivable_repository: Arc<R>,
    ) -> Self {
        Self {
            assignment_repository,
            plan_repository,
            athlete_repository,
            receivable_repository,
            last_generated: Mutex::new(None),
        }
    }

    /// Builds and inserts the receivables for `(year, month)`; returns how
    /// many rows were actually created.
    pub async fn generate_for_month(&self, year: i32, month: u32) -> BillingResult<usize> {
        if !(1..=12).contains(&month) {
            return Err(BillingError::InvalidArgument(format!(
                "Month must be between 1 and 12, got {}",
                month
            )));
        }
        if !(2000..=2100).contains(&year) {
            return Err(BillingError::InvalidArgument(format!(
                "Year {} is out of range",
                year
            )));
        }

        let competency = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| anyhow!("Invalid competency {}-{}", year, month))?;

        let assignments = self.assignment_repository.list_active().await?;
        info!(
            year,
            month,
            assignments = assignments.len(),
            "billing: starting generation run"
        );

        let mut rows: Vec<InsertReceivableEntity> = Vec::new();

        for assignment in assignments {
            let Some(plan) = self.plan_repository.find_by_id(assignment.plan_id).await? else {
                warn!(
                    assignment_id = %assignment.id,
                    plan_id = %assignment.plan_id,
                    "billing: assignment references a missing plan, skipping"
                );
                continue;
            };

            let Some(athlete) = self
                .athlete_repository
                .find_by_id(assignment.athlete_id)
                .await?
            else {
                warn!(
                    assignment_id = %assignment.id,
                    athlete_id = %assignment.athlete_id,
                    "billing: assignment references a missing athlete, skipping"
                );
                continue;
            };

            if self
                .receivable_repository
                .exists_auto_for_competency(athlete.id, competency)
                .await?
            {
                continue;
            }

            let due_date = calendar::clamped_date(year, month, plan.due_day as u32)
                .ok_or_else(|| anyhow!("Invalid due date for plan {}", plan.id))?;

            rows.push(InsertReceivableEntity {
                athlete_id: athlete.id,
                description: format!("{} - {:02}/{}", plan.name, month, year),
                competency,
                due_date,
                amount_minor: plan.amount_minor,
                status: ReceivableStatus::Pending.as_str().to_string(),
                payment_method: plan.default_payment_method,
                origin: ReceivableOrigin::Auto.as_str().to_string(),
            });
        }

        if rows.is_empty() {
            info!(year, month, "billing: nothing to generate");
            return Ok(0);
        }

        let inserted = self.receivable_repository.create_batch(rows).await?;
        info!(year, month, inserted, "billing: generation run finished");

        Ok(inserted)
    }

    /// Request-triggered entry point: runs the month's generation once we are
    /// at or past the first business day, at most once per competency for this
    /// process. Returns `None` when nothing was attempted.
    pub async fn maybe_generate_for_today(
        &self,
        today: NaiveDate,
    ) -> BillingResult<Option<usize>> {
        let competency = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
            .ok_or_else(|| anyhow!("Invalid competency for {}", today))?;

        let first_business_day = calendar::first_business_day(today.year(), today.month())
            .ok_or_else(|| anyhow!("Invalid month for {}", today))?;

        if today < first_business_day {
            return Ok(None);
        }

        {
            let marker = self
                .last_generated
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if *marker == Some(competency) {
                return Ok(None);
            }
        }

        let inserted = self
            .generate_for_month(today.year(), today.month())
            .await?;

        let mut marker = self
            .last_generated
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *marker = Some(competency);

        Ok(Some(inserted))
    }
}
