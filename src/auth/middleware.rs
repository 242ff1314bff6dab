use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::token::{TokenKind, TokenManager};
use crate::error::AppError;

/// Bearer-token guard for protected scopes.
///
/// Holds its own verifier handle, built from the injected signing secret at
/// startup. Every request through a wrapped scope must present
/// `Authorization: Bearer <token>` carrying a valid **access** token; the
/// class is asserted explicitly, so a refresh token is never accepted as a
/// bearer credential. Verified claims land in request extensions for the
/// [`AuthenticatedUser`](crate::auth::AuthenticatedUser) extractor.
pub struct AuthMiddleware {
    tokens: TokenManager,
}

impl AuthMiddleware {
    pub fn new(tokens: TokenManager) -> Self {
        Self { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            tokens: self.tokens.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    tokens: TokenManager,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let bearer = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        let token = match bearer {
            Some(token) => token,
            None => {
                let err = AppError::Unauthorized("Missing bearer token".into());
                return Box::pin(async move { Err(err.into()) });
            }
        };

        match self.tokens.verify(token, TokenKind::Access) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(fut)
            }
            Err(cause) => {
                // The specific cause stays in the logs; the caller sees a
                // uniform 401.
                log::debug!("bearer token rejected: {}", cause);
                let err: AppError = cause.into();
                Box::pin(async move { Err(err.into()) })
            }
        }
    }
}
