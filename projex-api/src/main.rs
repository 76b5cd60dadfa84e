/// ProjeX API server entry point
///
/// Boots in order: tracing, configuration, database pool, migrations,
/// router, listener. A failure in any step aborts startup with a logged
/// error rather than serving in a half-initialized state.
use anyhow::Context;
use projex_api::{
    app::{build_router, AppState},
    config::Config,
};
use projex_shared::db::{migrations, pool};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "projex_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("failed to load configuration")?;

    tracing::info!(
        host = %config.api.host,
        port = config.api.port,
        "starting projex-api v{}",
        env!("CARGO_PKG_VERSION")
    );

    migrations::ensure_database_exists(&config.database.url)
        .await
        .context("failed to ensure database exists")?;

    let db = pool::create_pool(config.database.pool_config())
        .await
        .context("failed to connect to database")?;

    migrations::run_migrations(&db)
        .await
        .context("failed to run database migrations")?;

    tracing::info!("database ready");

    let bind_address = config.bind_address();
    let state = AppState::new(db, config);
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;

    tracing::info!(%bind_address, "listening");

    axum::serve(listener, router)
        .await
        .context("server error")?;

    Ok(())
}
