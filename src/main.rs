use anyhow::Result;
use dotenvy::dotenv;
use mockable::{DefaultClock, DefaultEnv};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod clock;
mod config;
mod controllers;
mod db;
mod db_ops;
mod errors;
mod extractors;
mod middleware;
mod models;
mod routes;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_tracing();

    let config = config::Config::from_env(&DefaultEnv::new())?;

    let storage = db::Storage::new(&config.db_path);
    storage.init().await?;
    info!(path = %storage.path().display(), "database ready");

    let notes = db_ops::Notes::new(storage, Arc::new(DefaultClock));
    let state = models::AppState { notes };
    let app = routes::get_routes()
        .layer(middleware::cors(&config.cors_origins)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("listening on {}", config.addr);
    axum::Server::bind(&config.addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "notes=debug,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
