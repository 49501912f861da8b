use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = workforce_api::AppConfig::from_env().context("failed to load configuration")?;
    workforce_observability::init(&config.log_level);
    tracing::debug!(?config, "configuration loaded");

    let app = workforce_api::app::build_app(&config)
        .await
        .context("failed to initialize stores")?;

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
