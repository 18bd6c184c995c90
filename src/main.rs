use rocket::fairing::AdHoc;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, ConfigError};
use crate::cors::Cors;
use crate::database::{requests, ErrorBody, ScoreStore, StoreError};

mod config;
mod cors;
mod database;
mod leaderboard;
mod record_id;

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to prepare the score store: {0}")]
    Store(#[from] StoreError),
    #[error("server failed: {0}")]
    Launch(#[from] rocket::Error),
}

#[rocket::main]
async fn main() -> Result<(), StartupError> {
    init_logging();

    let config = Config::from_env()?;
    let store = ScoreStore::connect(&config.database_url).await?;
    store.ensure_schema().await?;
    info!(
        max_scores_limit = config.max_scores_limit,
        cors = ?config.cors_origins,
        "connected to the score store"
    );

    build(store, config).launch().await?;
    Ok(())
}

fn init_logging() {
    // Rocket's own `log` records are forwarded into this subscriber
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Assembles the server around an already connected store.
pub fn build(store: ScoreStore, config: Config) -> Rocket<Build> {
    rocket::build()
        .mount(
            "/api",
            routes![
                requests::index,
                requests::submit_score,
                requests::list_top_scores,
                requests::get_stats,
            ],
        )
        .register("/", catchers![default_catcher])
        .attach(Cors::new(config.cors_origins.clone()))
        .attach(AdHoc::on_shutdown("Close score store", |rocket| {
            Box::pin(async move {
                if let Some(store) = rocket.state::<ScoreStore>() {
                    store.close().await;
                }
            })
        }))
        .manage::<ScoreStore>(store)
        .manage::<Config>(config)
}

#[catch(default)]
fn default_catcher(status: Status, _request: &Request<'_>) -> status::Custom<Json<ErrorBody>> {
    let detail = status.reason().unwrap_or("request failed");
    status::Custom(status, Json(ErrorBody::new(detail)))
}
