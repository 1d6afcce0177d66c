use dioxus_logger::tracing;

use crate::{config::Config, error::AppError, router, state::AppState};

/// Connects to the Sqlite database and runs pending migrations.
///
/// # Arguments
/// - `config` - Application configuration containing the database URL
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(AppError::DbErr)` - Failed to connect to database or run migrations
pub async fn connect_to_database(config: &Config) -> Result<sea_orm::DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Serves the health router until the process exits.
///
/// # Returns
/// - `Err(AppError::Io)` - Listener could not be bound or the server failed
pub async fn serve_health(port: u16, state: AppState) -> Result<(), AppError> {
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Health endpoint listening on {}", addr);

    axum::serve(listener, router::router().with_state(state)).await?;

    Ok(())
}
