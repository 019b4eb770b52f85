mod config;
mod domain;
mod services;
mod state;
mod web;

use crate::config::AppConfig;
use crate::state::SharedState;
use axum::Router;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    if !config.simulated_latency {
        tracing::info!("Simulated latency disabled");
    }
    let addr = config.bind_addr.clone();
    let shared: SharedState = Arc::new(state::AppState::new(config));

    let summary = shared.catalog.summary();
    tracing::info!(
        "Loaded {} phases ({} in progress, {} AI implementations)",
        summary.total_phases,
        summary.in_progress_phases,
        summary.total_ai_implementations
    );

    let scheduler = JobScheduler::new().await?;

    // Workspace cleanup - drop idle workspaces every hour
    let shared_for_cleanup = shared.clone();
    scheduler
        .add(Job::new_async("0 0 * * * *", move |_uuid, _l| {
            let state = shared_for_cleanup.clone();
            Box::pin(async move {
                let removed = state.purge_idle(chrono::Utc::now()).await;
                if removed > 0 {
                    tracing::info!("Cleaned up {} idle workspaces", removed);
                }
            })
        })?)
        .await?;

    scheduler.start().await?;
    tracing::info!("Scheduler started: workspace cleanup hourly");

    let app = Router::new()
        .merge(web::routes(shared.clone()))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    tracing::info!("Listening on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
