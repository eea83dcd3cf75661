mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use waypost_api::auth::{AppState, AppStateInner};
use waypost_api::weather::WeatherClient;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "waypost=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Init database
    let db = waypost_db::Database::open(&config.db_path)?;

    let weather = match &config.weather_url {
        Some(url) => {
            info!("Weather lookups via {}", url);
            WeatherClient::new(url.as_str(), config.weather_timeout)?
        }
        None => {
            info!("Weather lookups disabled");
            WeatherClient::disabled()
        }
    };

    let state: AppState = Arc::new(AppStateInner { db, weather });

    let app = waypost_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Waypost server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
