use std::future::{ready, Ready};

use actix_web::{http::header::AUTHORIZATION, FromRequest, HttpRequest};

use crate::{
    auth::{Claims, JwtService},
    errors::AppError,
};

fn claims_from_request(req: &HttpRequest) -> Option<Claims> {
    let jwt_service = req.app_data::<actix_web::web::Data<JwtService>>()?;

    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?;
    let token = auth_header.strip_prefix("Bearer ")?;

    jwt_service.validate_token(token).ok()
}

/// Extractor for handlers that require a signed-in caller: validates the
/// bearer token and yields its claims, failing the request with 401 when the
/// header is missing, malformed, or expired.
pub struct AuthenticatedUser(pub Claims);

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let claims = claims_from_request(req)
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()));

        ready(claims.map(AuthenticatedUser))
    }
}

/// Extractor for routes readable both anonymously and signed-in (the course
/// catalog): yields claims when a valid bearer token is present, None
/// otherwise. Never fails the request.
pub struct MaybeAuthenticated(pub Option<Claims>);

impl FromRequest for MaybeAuthenticated {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(Ok(MaybeAuthenticated(claims_from_request(req))))
    }
}
