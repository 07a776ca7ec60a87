use std::sync::Arc;

use axum::{extract::State, middleware::Next, response::Response};
use chrono::Utc;
use tracing::{error, info};

use infra::db::repositories::{
    athletes::AthletePostgres, plan_assignments::PlanAssignmentPostgres, plans::PlanPostgres,
    receivables::ReceivablePostgres,
};

use crate::usecases::{billing_generation::BillingGenerationUseCase, calendar};

pub type SharedBillingGeneration = Arc<
    BillingGenerationUseCase<
        PlanAssignmentPostgres,
        PlanPostgres,
        AthletePostgres,
        ReceivablePostgres,
    >,
>;

#[derive(Clone)]
pub struct BillingTriggerState {
    pub billing: SharedBillingGeneration,
    pub utc_offset_hours: i32,
}

impl BillingTriggerState {
    /// The current date on the school's calendar, per the configured offset.
    pub fn today(&self) -> chrono::NaiveDate {
        calendar::local_today(Utc::now(), self.utc_offset_hours)
    }
}

/// Piggybacks the month's billing run on incoming traffic. The use case
/// decides whether anything actually happens; a failed run never fails the
/// request that triggered it.
pub async fn run(
    State(state): State<BillingTriggerState>,
    request: axum::extract::Request,
    next: Next,
) -> Response {
    match state.billing.maybe_generate_for_today(state.today()).await {
        Ok(Some(inserted)) => {
            info!(inserted, "billing trigger: generation run completed");
        }
        Ok(None) => {}
        Err(err) => {
            error!(billing_error = ?err, "billing trigger: generation run failed");
        }
    }

    next.run(request).await
}
