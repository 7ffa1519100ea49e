//! Registration, login and operator bootstrap.
//!
//! [`AuthService`] owns everything these flows need (credential store, hasher,
//! token keys and the registration role policy), all injected at construction.

use std::sync::Arc;

use validator::Validate;

use super::password::PasswordHasher;
use super::token::TokenKeys;
use super::{AuthResponse, LoginRequest, RegisterRequest};
use crate::error::{AppError, INVALID_CREDENTIALS};
use crate::models::{NewUser, Role, User, UserSummary};
use crate::store::CredentialStore;

const MISSING_CREDENTIALS: &str = "Email and password are required";

/// Result of [`AuthService::bootstrap_admin`].
#[derive(Debug, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// No operator credentials were configured.
    Skipped,
    /// A user with the operator email already exists; nothing was changed.
    AlreadyPresent,
    Created(UserSummary),
}

pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    keys: Arc<TokenKeys>,
    allow_role_selection: bool,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: PasswordHasher,
        keys: Arc<TokenKeys>,
        allow_role_selection: bool,
    ) -> Self {
        Self {
            store,
            hasher,
            keys,
            allow_role_selection,
        }
    }

    pub fn keys(&self) -> &TokenKeys {
        &self.keys
    }

    /// Creates an account and returns a session for it.
    ///
    /// Fails with `BadRequest` on missing fields or a disallowed role, and with
    /// `Conflict` when the email is taken, including when a concurrent
    /// registration wins the race between lookup and insert.
    pub async fn register(&self, input: RegisterRequest) -> Result<AuthResponse, AppError> {
        input
            .validate()
            .map_err(|_| AppError::BadRequest(MISSING_CREDENTIALS.into()))?;

        let role = match input.role {
            Some(Role::Admin) if !self.allow_role_selection => {
                return Err(AppError::BadRequest(
                    "Role cannot be chosen at registration".into(),
                ))
            }
            Some(role) => role,
            None => Role::default(),
        };

        if self.store.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict("User already exists".into()));
        }

        let password_hash = self.hasher.hash(input.password).await?;
        let user = self
            .store
            .create(NewUser {
                email: input.email,
                password_hash,
                role,
            })
            .await?;

        log::info!("Registered user {} with role {:?}", user.id, user.role);
        self.session_for(&user)
    }

    /// Authenticates by email and password.
    ///
    /// An unknown email and a wrong password produce the same error: the
    /// password is always checked (against a decoy hash when there is no
    /// user) and both outcomes collapse into a single `Option` before anything
    /// is returned.
    pub async fn login(&self, input: LoginRequest) -> Result<AuthResponse, AppError> {
        input
            .validate()
            .map_err(|_| AppError::BadRequest(MISSING_CREDENTIALS.into()))?;

        let user = self.store.find_by_email(&input.email).await?;
        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        let matches = self.hasher.verify(input.password, stored_hash).await?;

        match user.filter(|_| matches) {
            Some(user) => self.session_for(&user),
            None => Err(AppError::Unauthorized(INVALID_CREDENTIALS.into())),
        }
    }

    /// Seeds the operator account. Safe to call on every startup: absent
    /// credentials skip it and an existing account is left untouched.
    pub async fn bootstrap_admin(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<BootstrapOutcome, AppError> {
        let (email, password) = match (email, password) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                (email, password)
            }
            _ => {
                log::warn!("ADMIN_EMAIL or ADMIN_PASSWORD not set. Skipping admin seeding.");
                return Ok(BootstrapOutcome::Skipped);
            }
        };

        if self.store.find_by_email(email).await?.is_some() {
            return Ok(BootstrapOutcome::AlreadyPresent);
        }

        let password_hash = self.hasher.hash(password.to_string()).await?;
        let created = self
            .store
            .create(NewUser {
                email: email.to_string(),
                password_hash,
                role: Role::Admin,
            })
            .await;

        match created {
            Ok(user) => {
                log::info!("Seeded admin user: {}", user.email);
                Ok(BootstrapOutcome::Created(user.summary()))
            }
            Err(AppError::Conflict(_)) => Ok(BootstrapOutcome::AlreadyPresent),
            Err(e) => Err(e),
        }
    }

    fn session_for(&self, user: &User) -> Result<AuthResponse, AppError> {
        Ok(AuthResponse {
            token: self.keys.issue(user)?,
            user: user.summary(),
        })
    }
}
