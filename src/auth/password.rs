use std::sync::Arc;

use actix_web::web;
use bcrypt::{hash, verify};

use crate::error::AppError;

const DECOY_PASSWORD: &str = "decoy-password-never-matches";

/// bcrypt only reads this many bytes of input; anything past it is ignored.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Rejects passwords bcrypt would silently truncate.
pub fn check_password_length(password: &str) -> Result<(), AppError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::BadRequest(format!(
            "Password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    Ok(())
}

pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost)
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
}

/// Checks `password` against a bcrypt record. A record that cannot be parsed
/// fails verification instead of erroring.
pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    match verify(password, hashed_password) {
        Ok(matches) => matches,
        Err(e) => {
            log::warn!("Stored password hash could not be verified: {}", e);
            false
        }
    }
}

/// bcrypt hasher with a fixed cost, offloading the work to actix's
/// blocking pool.
#[derive(Clone)]
pub struct PasswordHasher {
    cost: u32,
    /// Verified in place of a real hash when the account does not exist,
    /// so both login failures take the same time.
    decoy_hash: Arc<str>,
}

impl PasswordHasher {
    /// Fails when `cost` is outside bcrypt's accepted range.
    pub fn new(cost: u32) -> Result<Self, AppError> {
        let decoy_hash = hash_password(DECOY_PASSWORD, cost)?;
        Ok(Self {
            cost,
            decoy_hash: decoy_hash.into(),
        })
    }

    /// Hashes a new password. Passwords longer than [`MAX_PASSWORD_BYTES`]
    /// are refused as a bad request.
    pub async fn hash(&self, password: String) -> Result<String, AppError> {
        check_password_length(&password)?;
        let cost = self.cost;
        web::block(move || hash_password(&password, cost)).await?
    }

    /// Verifies against `hashed_password`, or against the decoy when there is
    /// no stored record. Without a record the result is always `false`. A
    /// failed blocking task is an internal error, not a mismatch.
    pub async fn verify(
        &self,
        password: String,
        hashed_password: Option<String>,
    ) -> Result<bool, AppError> {
        let has_record = hashed_password.is_some();
        let target = hashed_password.unwrap_or_else(|| self.decoy_hash.to_string());

        let matches = web::block(move || verify_password(&password, &target)).await?;
        Ok(has_record && matches)
    }
}
