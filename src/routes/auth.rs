use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

use crate::auth::{AuthService, LoginRequest, RefreshRequest, RegisterRequest};
use crate::error::AppError;
use crate::models::UserResponse;

/// Register a new user.
///
/// Returns the created identity without its credential. No tokens are
/// issued; the client logs in as a separate step.
#[post("/register")]
pub async fn register(
    service: web::Data<AuthService>,
    payload: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let user = service.register(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Exchange email + password for an access/refresh token pair.
#[post("/login")]
pub async fn login(
    service: web::Data<AuthService>,
    payload: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let pair = service.login(&payload.email, &payload.password).await?;
    Ok(HttpResponse::Ok().json(pair))
}

/// Exchange a refresh token for a freshly rotated pair.
#[post("/refresh")]
pub async fn refresh(
    service: web::Data<AuthService>,
    payload: web::Json<RefreshRequest>,
) -> Result<impl Responder, AppError> {
    let pair = service.refresh(&payload.refresh_token).await?;
    Ok(HttpResponse::Ok().json(pair))
}
