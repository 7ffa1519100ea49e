use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use lazy_static::lazy_static;
use regex::Regex;

use super::extractors::AuthenticatedUser;
use super::token::TokenKeys;
use crate::error::{AppError, NOT_AUTHORIZED};

lazy_static! {
    // `Bearer <token>`, scheme case-insensitive, token without whitespace
    static ref BEARER: Regex = Regex::new(r"^(?i:bearer) +(\S+)$").unwrap();
}

/// Extracts the token from an `Authorization` header value.
pub fn bearer_token(value: &str) -> Option<&str> {
    BEARER
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Guards the wrapped scope: every request must carry a valid bearer token.
///
/// Verification keys come from the `web::Data<TokenKeys>` registered on the
/// app. On success the caller's [`AuthenticatedUser`] is inserted into the
/// request extensions; any failure short-circuits with a uniform 401 response.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S> AuthMiddlewareService<S> {
    fn authenticate(req: &ServiceRequest) -> Result<AuthenticatedUser, AppError> {
        let keys = req.app_data::<web::Data<TokenKeys>>().ok_or_else(|| {
            AppError::InternalServerError("TokenKeys are not registered as app data".into())
        })?;

        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| AppError::Unauthorized(NOT_AUTHORIZED.into()))?;

        let claims = keys.verify(token)?;
        Ok(claims.into())
    }
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match Self::authenticate(&req) {
            Ok(user) => {
                req.extensions_mut().insert(user);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(|res| res.map_into_left_body()) })
            }
            Err(app_err) => {
                let res = req.error_response(app_err).map_into_right_body();
                Box::pin(ready(Ok(res)))
            }
        }
    }
}
