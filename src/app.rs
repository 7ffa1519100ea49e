//! Shared application state and the service factory used by `main` and the
//! integration tests.

use std::sync::Arc;

use actix_web::{error, web, HttpRequest};
use chrono::Duration;

use crate::auth::{AuthService, PasswordHasher, TokenKeys};
use crate::config::Config;
use crate::error::AppError;
use crate::routes::{self, health};
use crate::store::{CredentialStore, TaskStore};

/// Everything the handlers need, built once at startup and cloned into each
/// worker.
#[derive(Clone)]
pub struct AppState {
    pub auth: web::Data<AuthService>,
    pub keys: web::Data<TokenKeys>,
    pub tasks: web::Data<dyn TaskStore>,
}

impl AppState {
    /// Fails on unusable settings (empty signing secret, bcrypt cost out of
    /// range), so misconfiguration stops startup instead of failing requests.
    pub fn new(
        config: &Config,
        credentials: Arc<dyn CredentialStore>,
        tasks: Arc<dyn TaskStore>,
    ) -> Result<Self, AppError> {
        let keys = Arc::new(
            TokenKeys::new(&config.jwt_secret, Duration::seconds(i64::from(config.token_ttl_secs)))
                .map_err(|e| AppError::InternalServerError(e.to_string()))?,
        );
        let hasher = PasswordHasher::new(config.bcrypt_cost)?;
        let auth = AuthService::new(
            credentials,
            hasher,
            keys.clone(),
            config.allow_role_selection,
        );

        Ok(Self {
            auth: web::Data::new(auth),
            keys: web::Data::from(keys),
            tasks: web::Data::from(tasks),
        })
    }

    /// Registers state, extractor configs and every route.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.auth.clone())
            .app_data(self.keys.clone())
            .app_data(self.tasks.clone())
            .app_data(json_config())
            .app_data(path_config())
            .service(health::index)
            .service(health::health)
            .service(web::scope("/api").configure(routes::config));
    }
}

/// Malformed or mistyped JSON bodies become a 400 with the usual error body.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: error::JsonPayloadError, _req: &HttpRequest| {
        log::debug!("Rejected JSON payload: {}", err);
        AppError::BadRequest("Invalid request body".into()).into()
    })
}

/// Path segments that fail to parse (a task id that is not a UUID) cannot
/// name an existing task.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req: &HttpRequest| {
        log::debug!("Rejected path: {}", err);
        AppError::NotFound("Task not found".into()).into()
    })
}
