use anyhow::Context;
use speakcheck_api::{build_router, logging, state::AppState};
use speakcheck_config::Settings;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let settings = Settings::load().context("failed to load settings")?;
    logging::init(&settings.logging);
    settings.validate().context("invalid configuration")?;

    let addr = settings.bind_addr();
    let state = AppState::new(settings);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(address = %addr, "speakcheck API listening");

    axum::serve(listener, app)
        .await
        .context("server error")?;
    Ok(())
}
