use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post,
};
use chrono::Datelike;
use serde::Deserialize;
use tracing::{error, info};

use crate::{auth::AuthUser, axum_http::billing_trigger::BillingTriggerState};

#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    year: i32,
    month: u32,
}

pub fn routes(state: BillingTriggerState) -> Router {
    Router::new()
        .route("/generate", post(generate))
        .with_state(state)
}

/// Manual generation trigger. Defaults to the current month on the school's
/// calendar when no body is supplied; safe to call repeatedly.
pub async fn generate(
    State(state): State<BillingTriggerState>,
    auth: AuthUser,
    body: Option<Json<GenerateBody>>,
) -> impl IntoResponse {
    if !auth.role.is_admin() {
        return (
            StatusCode::FORBIDDEN,
            "Not allowed for this role".to_string(),
        )
            .into_response();
    }

    let (year, month) = match body {
        Some(Json(body)) => (body.year, body.month),
        None => {
            let today = state.today();
            (today.year(), today.month())
        }
    };

    match state.billing.generate_for_month(year, month).await {
        Ok(inserted) => {
            info!(
                user_id = %auth.user_id,
                year,
                month,
                inserted,
                "billing: manual generation request handled"
            );
            Json(serde_json::json!({ "inserted": inserted })).into_response()
        }
        Err(err) => {
            let status = err.status_code();
            if status == StatusCode::INTERNAL_SERVER_ERROR {
                error!(billing_error = ?err, "billing: manual generation failed");
                return (status, "Failed to generate receivables".to_string()).into_response();
            }
            (status, err.to_string()).into_response()
        }
    }
}
