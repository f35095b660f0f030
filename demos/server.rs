//! Demo server: builds the entity registry (built-ins, samples, optional JSON file),
//! connects to PostgreSQL and mounts common and entity list routes.

use query_options::{
    app, load_from_path, register_default_configs, register_example_configs, AppState, RegistryBuilder, Settings,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("query_options=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;

    let mut builder = RegistryBuilder::new();
    register_default_configs(&mut builder)?;
    register_example_configs(&mut builder)?;
    if let Some(path) = &settings.entity_config_path {
        load_from_path(&mut builder, path).await?;
    }
    let registry = builder.build();

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.database_url)
        .await?;

    let state = AppState::new(pool, registry);
    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state, "/api/v1")).await?;
    Ok(())
}
