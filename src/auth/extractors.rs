use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::auth::token::Claims;
use crate::error::AppError;

/// The authenticated caller's identity id, taken from the verified claims
/// that [`AuthMiddleware`](crate::auth::AuthMiddleware) placed in request
/// extensions.
///
/// Using this extractor on a route outside a guarded scope yields a 401: the
/// claims are only ever present when the middleware has verified a token.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub Uuid);

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>() {
            Some(claims) => ready(Ok(AuthenticatedUser(claims.sub))),
            None => {
                let err = AppError::Unauthorized("Missing authentication context".into());
                ready(Err(err.into()))
            }
        }
    }
}
