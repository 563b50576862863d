//! Tour platform server.
//!
//! Run from repo root: `cargo run -p tour-platform-server`
//! `DATABASE_URL=memory://` runs without PostgreSQL.

use tokio::net::TcpListener;
use tour_platform::{app, build_state, Settings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tour_platform=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let bind_addr = settings.bind_addr.clone();
    let state = build_state(settings).await?;

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
