use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use tracing::{error, info};
use uuid::Uuid;

use domain::{repositories::plans::PlanRepository, value_objects::plans::NewPlan};
use infra::db::{
    postgres::postgres_connection::PgPoolSquad, repositories::plans::PlanPostgres,
};

use crate::{
    auth::AuthUser,
    usecases::plans::{PlanError, PlanUseCase},
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let plan_repository = PlanPostgres::new(Arc::clone(&db_pool));
    let plan_usecase = PlanUseCase::new(Arc::new(plan_repository));

    Router::new()
        .route("/", get(list_plans).post(create_plan))
        .route("/:plan_id", put(update_plan))
        .with_state(Arc::new(plan_usecase))
}

pub async fn list_plans<P>(
    State(plan_usecase): State<Arc<PlanUseCase<P>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
{
    match plan_usecase.list(auth.principal()).await {
        Ok(plans) => Json(plans).into_response(),
        Err(err) => plan_error_response(err, "Failed to load plans"),
    }
}

pub async fn create_plan<P>(
    State(plan_usecase): State<Arc<PlanUseCase<P>>>,
    auth: AuthUser,
    Json(new_plan): Json<NewPlan>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
{
    match plan_usecase.create(auth.principal(), new_plan).await {
        Ok(plan_id) => {
            info!(user_id = %auth.user_id, %plan_id, "plans: create request handled");
            (StatusCode::CREATED, Json(serde_json::json!({ "id": plan_id }))).into_response()
        }
        Err(err) => plan_error_response(err, "Failed to create plan"),
    }
}

pub async fn update_plan<P>(
    State(plan_usecase): State<Arc<PlanUseCase<P>>>,
    auth: AuthUser,
    Path(plan_id): Path<Uuid>,
    Json(new_plan): Json<NewPlan>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
{
    match plan_usecase.update(auth.principal(), plan_id, new_plan).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => plan_error_response(err, "Failed to update plan"),
    }
}

fn plan_error_response(err: PlanError, generic: &str) -> axum::response::Response {
    let status = err.status_code();
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!(plan_error = ?err, "plans: request failed");
        return (status, generic.to_string()).into_response();
    }

    (status, err.to_string()).into_response()
}
