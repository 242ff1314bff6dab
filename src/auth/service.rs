use std::sync::Arc;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::{TokenKind, TokenManager, TokenPair};
use crate::auth::RegisterRequest;
use crate::error::AppError;
use crate::models::User;
use crate::store::Store;

/// Orchestrates registration, login, and refresh exchanges over the store,
/// the password hasher, and the token manager. Tokens are only ever minted
/// here; the task routes never issue credentials.
pub struct AuthService {
    store: Arc<dyn Store>,
    tokens: TokenManager,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, tokens: TokenManager) -> Self {
        Self { store, tokens }
    }

    /// Creates a new active identity. Does not issue tokens; the caller logs
    /// in separately.
    ///
    /// The duplicate pre-checks give precise conflict errors on the common
    /// path, but the store's own uniqueness guard is the authority: two
    /// concurrent registrations racing past the pre-check still end with
    /// exactly one row and one conflict error, and a failed registration
    /// leaves nothing behind.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, AppError> {
        if self
            .store
            .find_identity_by_email(&request.email)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateEmail);
        }
        if self
            .store
            .find_identity_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateUsername);
        }

        let password_hash = hash_password(&request.password)?;
        let user = User::new(
            &request.email,
            &request.username,
            &request.full_name,
            password_hash,
        );
        self.store.insert_identity(user).await
    }

    /// Exchanges email + password for an access/refresh pair.
    ///
    /// Unknown email, wrong password, and a deactivated identity all collapse
    /// into the same `InvalidCredentials` error so a caller cannot probe
    /// which part was wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AppError> {
        let user = self
            .store
            .find_identity_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash) {
            return Err(AppError::InvalidCredentials);
        }
        if !user.is_active {
            return Err(AppError::InvalidCredentials);
        }

        self.tokens.issue_pair(user.id)
    }

    /// Exchanges a valid refresh token for a freshly minted pair.
    ///
    /// The presented token must carry the refresh class tag; access tokens
    /// are rejected here exactly as refresh tokens are rejected as bearer
    /// credentials. The subject must still exist and be active. The new pair
    /// replaces the old one (rotation), though with no server-side denylist
    /// the predecessor stays cryptographically valid until its own expiry.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let claims = self
            .tokens
            .verify(refresh_token, TokenKind::Refresh)
            .map_err(|cause| {
                log::debug!("refresh token rejected: {}", cause);
                AppError::InvalidToken
            })?;

        let user = self
            .store
            .find_identity_by_id(claims.sub)
            .await?
            .filter(|u| u.is_active)
            .ok_or(AppError::InvalidToken)?;

        self.tokens.issue_pair(user.id)
    }
}
