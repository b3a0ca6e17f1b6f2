use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;

mod api;
mod clock;
mod config;
mod db;
mod docs;
mod export;
mod jobs;
mod model;
mod models;
mod registry;
mod routes;
mod utils;

use crate::api::Machine;
use crate::docs::ApiDoc;
use crate::registry::sqlite::SqliteRegistry;
use crate::utils::time::Clock;
use config::Config;
use db::init_db;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    info!(
        addr = %config.server_addr,
        offset = %config.utc_offset,
        window = %config.gate().describe(),
        "Server starting..."
    );

    let pool = init_db(&config.database_url).await?;
    let registry = SqliteRegistry::new(pool, config.utc_offset);
    let clock = Clock::System(config.utc_offset);

    actix_web::rt::spawn(jobs::backup::run_backups(
        registry.clone(),
        config.backup_dir.clone(),
        config.backup_interval,
        config.backup_keep,
        clock,
    ));

    if let Some(url) = config.keepalive_url.clone() {
        actix_web::rt::spawn(jobs::keepalive::run_keepalive(url, config.keepalive_interval));
    }

    let machine = Data::new(Machine::new(registry, config.gate(), config.debounce));
    let clock = Data::new(clock);
    let config_data = Data::new(config.clone());
    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                // wildcard {_:.*} so the UI's JS/CSS assets resolve
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(machine.clone())
            .app_data(clock.clone())
            .app_data(config_data.clone())
            .configure(|cfg| routes::configure(cfg, &config))
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .run()
    .await?;

    Ok(())
}
