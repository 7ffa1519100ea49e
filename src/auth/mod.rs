pub mod extractors;
pub mod gateway;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Role, UserSummary};

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use gateway::{AuthService, BootstrapOutcome};
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password, PasswordHasher};
pub use token::{Claims, TokenError, TokenKeys};

/// Represents the payload for a user login request.
///
/// Missing fields deserialize as empty strings so that presence is reported
/// by validation rather than by the JSON extractor.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login identifier, matched exactly as stored.
    #[serde(default)]
    #[validate(length(min = 1))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub password: String,
    /// Requested role. `admin` is only honoured when role selection is enabled.
    #[serde(default)]
    pub role: Option<Role>,
}

/// Response structure after successful authentication (login or registration).
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The signed session token.
    pub token: String,
    pub user: UserSummary,
}
