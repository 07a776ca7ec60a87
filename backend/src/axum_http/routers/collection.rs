use std::{sync::Arc, time::Duration};

use anyhow::Result;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use tracing::error;
use uuid::Uuid;

use domain::repositories::{
    athletes::AthleteRepository, guardians::GuardianRepository,
    receivables::ReceivableRepository,
};
use infra::{
    db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{
            athletes::AthletePostgres, guardians::GuardianPostgres,
            receivables::ReceivablePostgres,
        },
    },
    payments::pix_client::PixClient,
};

use crate::{
    auth::AuthUser,
    config::config_model::DotEnvyConfig,
    usecases::collection::{CollectionSettings, CollectionUseCase, PixGateway},
};

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Result<Router> {
    let receivable_repository = ReceivablePostgres::new(Arc::clone(&db_pool));
    let athlete_repository = AthletePostgres::new(Arc::clone(&db_pool));
    let guardian_repository = GuardianPostgres::new(Arc::clone(&db_pool));

    let pix_client = PixClient::new(
        config.pix.api_url.clone(),
        config.pix.api_key.clone(),
        Duration::from_secs(config.pix.timeout_seconds),
    )?;

    let collection_usecase = CollectionUseCase::new(
        Arc::new(receivable_repository),
        Arc::new(athlete_repository),
        Arc::new(guardian_repository),
        Arc::new(pix_client),
        CollectionSettings {
            whatsapp_base_url: config.collection.whatsapp_base_url.clone(),
            country_code: config.collection.country_code.clone(),
        },
    );

    Ok(Router::new()
        .route("/athletes/:athlete_id/link", post(build_collection_link))
        .with_state(Arc::new(collection_usecase)))
}

pub async fn build_collection_link<R, A, G, Px>(
    State(collection_usecase): State<Arc<CollectionUseCase<R, A, G, Px>>>,
    auth: AuthUser,
    Path(athlete_id): Path<Uuid>,
) -> impl IntoResponse
where
    R: ReceivableRepository + Send + Sync + 'static,
    A: AthleteRepository + Send + Sync + 'static,
    G: GuardianRepository + Send + Sync + 'static,
    Px: PixGateway + 'static,
{
    match collection_usecase
        .build_collection_link(auth.principal(), athlete_id)
        .await
    {
        Ok(link) => Json(link).into_response(),
        Err(err) => {
            let status = err.status_code();
            if status == StatusCode::INTERNAL_SERVER_ERROR {
                error!(collection_error = ?err, "collection: request failed");
                return (status, "Failed to build collection link".to_string()).into_response();
            }
            (status, err.to_string()).into_response()
        }
    }
}
