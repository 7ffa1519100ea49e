use crate::{
    auth::{AuthService, LoginRequest, RegisterRequest},
    error::AppError,
};
use actix_web::{post, web, HttpResponse, Responder};

/// Register a new user
///
/// Creates a new user account and returns an authentication token.
///
/// ## Responses:
/// - `201 Created`: `{token, user: {email, role}}`.
/// - `400 Bad Request`: missing email/password, malformed JSON, or a role that may not be chosen.
/// - `409 Conflict`: the email is already registered.
/// - `500 Internal Server Error`: store or signing failure.
#[post("/register")]
pub async fn register(
    auth: web::Data<AuthService>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let session = auth.register(register_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(session))
}

/// Login user
///
/// Authenticates a user and returns an authentication token. Unknown emails and
/// wrong passwords both answer `401 {"message": "Invalid credentials"}`.
#[post("/login")]
pub async fn login(
    auth: web::Data<AuthService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let session = auth.login(login_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(session))
}
