use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Result;
use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware,
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use infra::db::{
    postgres::postgres_connection::PgPoolSquad,
    repositories::{
        athletes::AthletePostgres, plan_assignments::PlanAssignmentPostgres, plans::PlanPostgres,
        receivables::ReceivablePostgres,
    },
};

use crate::{
    axum_http::{billing_trigger, default_routers, routers},
    config::config_model::DotEnvyConfig,
    usecases::billing_generation::BillingGenerationUseCase,
};

pub async fn start(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Result<()> {
    let billing_usecase: billing_trigger::SharedBillingGeneration =
        Arc::new(BillingGenerationUseCase::new(
            Arc::new(PlanAssignmentPostgres::new(Arc::clone(&db_pool))),
            Arc::new(PlanPostgres::new(Arc::clone(&db_pool))),
            Arc::new(AthletePostgres::new(Arc::clone(&db_pool))),
            Arc::new(ReceivablePostgres::new(Arc::clone(&db_pool))),
        ));
    let billing_state = billing_trigger::BillingTriggerState {
        billing: billing_usecase,
        utc_offset_hours: config.billing.utc_offset_hours,
    };

    let api = Router::new()
        .nest("/api/v1/plans", routers::plans::routes(Arc::clone(&db_pool)))
        .nest(
            "/api/v1/receivables",
            routers::receivables::routes(Arc::clone(&db_pool)),
        )
        .nest(
            "/api/v1/billing",
            routers::billing::routes(billing_state.clone()),
        )
        .nest(
            "/api/v1/collection",
            routers::collection::routes(Arc::clone(&db_pool), Arc::clone(&config))?,
        )
        // The trigger only wraps business routes; health checks must not
        // kick off a generation run.
        .layer(middleware::from_fn_with_state(
            billing_state,
            billing_trigger::run,
        ));

    let app = Router::new()
        .fallback(default_routers::not_found)
        .merge(api)
        .route("/api/v1/health-check", get(default_routers::health_check))
        .layer(TimeoutLayer::new(Duration::from_secs(config.server.timeout)))
        .layer(RequestBodyLimitLayer::new(
            (config.server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::PUT,
                    Method::DELETE,
                ])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server is running on port {}", config.server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
    };

    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
