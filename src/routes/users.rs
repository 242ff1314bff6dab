use actix_web::{get, put, web, HttpResponse, Responder};
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::{UserResponse, UserUpdate};
use crate::store::Store;

/// Returns the authenticated user's profile, without the credential.
#[get("/me")]
pub async fn get_me(
    store: web::Data<dyn Store>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let identity = store
        .find_identity_by_id(user.0)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(identity)))
}

/// Updates the authenticated user's profile (full name and/or email).
///
/// An email change is re-checked against the uniqueness invariant; taking
/// another identity's address fails with the same conflict registration
/// reports.
#[put("/me")]
pub async fn update_me(
    store: web::Data<dyn Store>,
    user: AuthenticatedUser,
    payload: web::Json<UserUpdate>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let mut identity = store
        .find_identity_by_id(user.0)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if let Some(new_email) = &payload.email {
        let taken = store
            .find_identity_by_email(new_email)
            .await?
            .map_or(false, |existing| existing.id != identity.id);
        if taken {
            return Err(AppError::DuplicateEmail);
        }
    }

    identity.apply_update(payload.into_inner());
    let updated = store.update_identity(identity).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}
