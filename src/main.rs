use signup_service::{
    app,
    config::{AppConfig, RunMode},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "signup_service=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;

    if config.run_mode == RunMode::Embedded {
        tracing::info!("RUN_MODE=embedded; not starting a listener (hosts use app::router_from_env)");
        return Ok(());
    }

    let state = AppState::from_config(&config);
    tracing::info!(mode = ?state.store.mode(), "initialising store connector");
    // fatal in connect-once mode, a no-op in reconnect mode
    state.store.init().await?;

    let app = app::build_app(state.clone(), config.static_dir.as_deref());
    app::serve(app, &config, &state).await
}
