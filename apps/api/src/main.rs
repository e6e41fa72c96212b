//! Todo API - REST server for the Tasks domain

use axum::Router;
use axum_helpers::http::create_cors_layer;
use axum_helpers::server::{create_app, create_router, health_router};
use core_config::FromEnv;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::{
    PostgresConfig, check_health, connect_from_config_with_retry, run_migrations,
};
use domain_tasks::{ApiDoc, MemoryTaskRepository, PgTaskRepository, TaskService, handlers};
use migration::Migrator;
use tracing::info;

mod config;

use config::{Config, TaskStore};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let task_routes = match config.task_store {
        TaskStore::Postgres => {
            let db_config = PostgresConfig::from_env()?;
            info!("Connecting to PostgreSQL");
            let db = connect_from_config_with_retry(db_config, None).await?;
            check_health(&db).await?;
            run_migrations::<Migrator>(&db, config.app.name).await?;

            handlers::router(TaskService::new(PgTaskRepository::new(db)))
        }
        TaskStore::Memory => {
            info!("Using in-memory task store");
            handlers::router(TaskService::new(MemoryTaskRepository::new()))
        }
    };

    let api_routes = Router::new().nest("/tasks", task_routes);
    let cors = create_cors_layer(config.cors_origin.parse()?);

    let app = create_router::<ApiDoc>(api_routes, cors).merge(health_router(config.app));

    info!(
        "Starting {} on port {}",
        config.app.name, config.server.port
    );

    create_app(app, &config.server).await?;

    info!("Todo API shutdown complete");
    Ok(())
}
