use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use domain::{
    repositories::{guardians::GuardianRepository, receivables::ReceivableRepository},
    value_objects::{
        enums::{payment_methods::PaymentMethod, receivable_statuses::ReceivableStatus},
        receivables::{NewManualReceivable, ReceivableQuery},
    },
};
use infra::db::{
    postgres::postgres_connection::PgPoolSquad,
    repositories::{guardians::GuardianPostgres, receivables::ReceivablePostgres},
};

use crate::{
    auth::AuthUser,
    usecases::receivables::{ReceivablesError, ReceivablesUseCase},
};

#[derive(Debug, Deserialize)]
pub struct ReceivablesListQuery {
    athlete_name: Option<String>,
    status: Option<String>,
    delinquent_only: Option<bool>,
    payment_method: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateBody {
    status: ReceivableStatus,
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let receivable_repository = ReceivablePostgres::new(Arc::clone(&db_pool));
    let guardian_repository = GuardianPostgres::new(Arc::clone(&db_pool));
    let receivables_usecase =
        ReceivablesUseCase::new(Arc::new(receivable_repository), Arc::new(guardian_repository));

    Router::new()
        .route("/", get(list_receivables).post(create_manual_receivable))
        .route("/:receivable_id/status", patch(update_status))
        .route("/:receivable_id/pay", post(mark_paid))
        .with_state(Arc::new(receivables_usecase))
}

pub async fn list_receivables<R, G>(
    State(receivables_usecase): State<Arc<ReceivablesUseCase<R, G>>>,
    auth: AuthUser,
    Query(query): Query<ReceivablesListQuery>,
) -> impl IntoResponse
where
    R: ReceivableRepository + Send + Sync + 'static,
    G: GuardianRepository + Send + Sync + 'static,
{
    let status = match query.status.as_deref() {
        None => None,
        Some(raw) => match ReceivableStatus::from_str(raw) {
            Some(parsed) => Some(parsed),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    format!("Unknown status filter: {}", raw),
                )
                    .into_response();
            }
        },
    };

    let payment_method = match query.payment_method.as_deref() {
        None => None,
        Some(raw) => match PaymentMethod::from_str(raw) {
            Some(parsed) => Some(parsed),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    format!("Unknown payment method filter: {}", raw),
                )
                    .into_response();
            }
        },
    };

    let filter = ReceivableQuery {
        athlete_name: query.athlete_name,
        status,
        delinquent_only: query.delinquent_only.unwrap_or(false),
        payment_method,
    };

    match receivables_usecase.query(auth.principal(), filter).await {
        Ok(summary) => Json(summary).into_response(),
        Err(err) => receivables_error_response(err, "Failed to load receivables"),
    }
}

pub async fn create_manual_receivable<R, G>(
    State(receivables_usecase): State<Arc<ReceivablesUseCase<R, G>>>,
    auth: AuthUser,
    Json(new_receivable): Json<NewManualReceivable>,
) -> impl IntoResponse
where
    R: ReceivableRepository + Send + Sync + 'static,
    G: GuardianRepository + Send + Sync + 'static,
{
    match receivables_usecase
        .create_manual(auth.principal(), new_receivable)
        .await
    {
        Ok(ids) => {
            info!(
                user_id = %auth.user_id,
                created = ids.len(),
                "receivables: manual create request handled"
            );
            (StatusCode::CREATED, Json(serde_json::json!({ "ids": ids }))).into_response()
        }
        Err(err) => receivables_error_response(err, "Failed to create receivable"),
    }
}

pub async fn update_status<R, G>(
    State(receivables_usecase): State<Arc<ReceivablesUseCase<R, G>>>,
    auth: AuthUser,
    Path(receivable_id): Path<Uuid>,
    Json(body): Json<StatusUpdateBody>,
) -> impl IntoResponse
where
    R: ReceivableRepository + Send + Sync + 'static,
    G: GuardianRepository + Send + Sync + 'static,
{
    match receivables_usecase
        .update_status(auth.principal(), receivable_id, body.status)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => receivables_error_response(err, "Failed to update receivable"),
    }
}

pub async fn mark_paid<R, G>(
    State(receivables_usecase): State<Arc<ReceivablesUseCase<R, G>>>,
    auth: AuthUser,
    Path(receivable_id): Path<Uuid>,
) -> impl IntoResponse
where
    R: ReceivableRepository + Send + Sync + 'static,
    G: GuardianRepository + Send + Sync + 'static,
{
    match receivables_usecase
        .mark_paid(auth.principal(), receivable_id)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => receivables_error_response(err, "Failed to update receivable"),
    }
}

fn receivables_error_response(err: ReceivablesError, generic: &str) -> axum::response::Response {
    let status = err.status_code();
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!(receivables_error = ?err, "receivables: request failed");
        return (status, generic.to_string()).into_response();
    }

    (status, err.to_string()).into_response()
}
