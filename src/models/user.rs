use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A registered identity as stored in the database.
///
/// Deliberately does not derive `Serialize`: the row carries the password hash,
/// and handing a `User` to a JSON responder must not compile. API responses go
/// through [`UserResponse`] instead. Rows are never hard-deleted; deactivation
/// flips `is_active`.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Builds a new active identity with a fresh id and timestamps.
    /// `password_hash` must already be hashed; plaintext never reaches this type.
    pub fn new(email: &str, username: &str, full_name: &str, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            username: username.to_string(),
            full_name: full_name.to_string(),
            password_hash,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a profile patch in place. Unset fields keep their values.
    pub fn apply_update(&mut self, update: UserUpdate) {
        if let Some(full_name) = update.full_name {
            self.full_name = full_name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        self.updated_at = Utc::now();
    }
}

/// The serializable projection of a [`User`], without the credential.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            full_name: user.full_name,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Partial profile update for the authenticated identity.
/// Username and password changes are not part of this surface.
#[derive(Debug, Deserialize, Validate)]
pub struct UserUpdate {
    #[validate(length(min = 2, max = 100))]
    pub full_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use validator::Validate;

    #[test]
    fn test_new_user_is_active_with_matching_timestamps() {
        let user = User::new("a@example.com", "alice", "Alice A", "hash".to_string());

        assert!(user.is_active);
        assert_eq!(user.created_at, user.updated_at);
        assert_eq!(user.email, "a@example.com");
        assert_eq!(user.username, "alice");
    }

    #[test]
    fn test_user_response_omits_the_credential() {
        let user = User::new("a@example.com", "alice", "Alice A", "hash".to_string());
        let response = UserResponse::from(user);

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("password").is_none());
        assert_eq!(json["username"], "alice");
        assert_eq!(json["is_active"], true);
    }

    #[test]
    fn test_apply_update_keeps_unset_fields() {
        let mut user = User::new("a@example.com", "alice", "Alice A", "hash".to_string());
        let created_at = user.created_at;

        user.apply_update(UserUpdate {
            full_name: Some("Alice B".to_string()),
            email: None,
        });

        assert_eq!(user.full_name, "Alice B");
        assert_eq!(user.email, "a@example.com");
        assert_eq!(user.created_at, created_at);
        assert!(user.updated_at >= created_at);
    }

    #[test]
    fn test_user_update_validation() {
        let valid = UserUpdate {
            full_name: Some("Alice B".to_string()),
            email: Some("b@example.com".to_string()),
        };
        assert!(valid.validate().is_ok());

        // Unset fields are not validated
        let empty = UserUpdate {
            full_name: None,
            email: None,
        };
        assert!(empty.validate().is_ok());

        let short_name = UserUpdate {
            full_name: Some("A".to_string()),
            email: None,
        };
        assert!(short_name.validate().is_err());

        let bad_email = UserUpdate {
            full_name: None,
            email: Some("not-an-email".to_string()),
        };
        assert!(bad_email.validate().is_err());
    }
}
