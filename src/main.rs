use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, App, HttpServer};

use taskdesk::config::Config;
use taskdesk::store::{CredentialStore, MemoryCredentialStore, MemoryTaskStore, PgStore, TaskStore};
use taskdesk::{AppError, AppState};

fn startup_error(error: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, error.to_string())
}

async fn open_stores(
    config: &Config,
) -> Result<(Arc<dyn CredentialStore>, Arc<dyn TaskStore>), AppError> {
    match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url).await?;
            store.migrate().await?;
            log::info!("Connected to PostgreSQL");
            let store = Arc::new(store);
            let credentials: Arc<dyn CredentialStore> = store.clone();
            let tasks: Arc<dyn TaskStore> = store;
            Ok((credentials, tasks))
        }
        None => {
            log::warn!("DATABASE_URL not set; using in-memory storage, data is lost on exit");
            let credentials: Arc<dyn CredentialStore> = Arc::new(MemoryCredentialStore::new());
            let tasks: Arc<dyn TaskStore> = Arc::new(MemoryTaskStore::new());
            Ok((credentials, tasks))
        }
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        startup_error(e)
    })?;

    let (credentials, tasks) = open_stores(&config).await.map_err(startup_error)?;
    let state = AppState::new(&config, credentials, tasks).map_err(startup_error)?;

    let outcome = state
        .auth
        .bootstrap_admin(config.admin_email.as_deref(), config.admin_password.as_deref())
        .await
        .map_err(startup_error)?;
    log::debug!("Admin bootstrap: {:?}", outcome);

    log::info!("Starting server at {}", config.server_url());
    HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(move |cfg| state.configure(cfg))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
