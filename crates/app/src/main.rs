use migration::{Migrator, MigratorTrait};

mod settings;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "diezmo={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    serve(settings.server).await
}

/// Connects, migrates and serves until the listener fails.
async fn serve(config: settings::Server) -> Result<(), BoxError> {
    let db = connect(&config.database).await?;
    let engine = engine::Engine::builder().database(db).build().await?;

    let bind = config.bind.unwrap_or_else(|| "127.0.0.1".to_string());
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", bind, config.port)).await?;
    server::run_with_listener(engine, listener).await?;
    Ok(())
}

async fn connect(config: &settings::Database) -> Result<sea_orm::DatabaseConnection, BoxError> {
    let database = sea_orm::Database::connect(config.url()).await?;
    Migrator::up(&database, None).await?;
    tracing::info!("database ready");
    Ok(database)
}
