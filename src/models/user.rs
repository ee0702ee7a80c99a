//! Dashboard user model.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::UserId;

/// Access role of a dashboard user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full access, including clearing history.
    Admin,
    /// Read and score transactions.
    Analyst,
}

impl UserRole {
    /// Lowercase wire name.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Analyst => "analyst",
        }
    }
}

impl core::fmt::Display for UserRole {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dashboard user as exposed to callers. Never carries the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Login email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Access role.
    pub role: UserRole,
    /// Registration date (ISO-8601).
    pub created_at: String,
}

/// A user record as held by a [`crate::storage::UserStore`].
#[derive(Debug, Clone)]
pub struct StoredUser {
    /// Public part of the record.
    pub user: User,
    /// Login password.
    pub password: SecretString,
}

/// Result of a successful login or signup.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// Authenticated user.
    pub user: User,
    /// Opaque session token.
    pub token: SecretString,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_serde_camel_case() {
        let user = User {
            id: UserId::from("1"),
            email: "admin@fraudshield.com".to_owned(),
            name: "Admin User".to_owned(),
            role: UserRole::Admin,
            created_at: "2024-01-01".to_owned(),
        };
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["createdAt"], "2024-01-01");
        assert_eq!(value["role"], "admin");
        assert!(value.get("password").is_none());
        let back: User = serde_json::from_value(value).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn stored_user_debug_redacts_password() {
        let stored = StoredUser {
            user: User {
                id: UserId::from("9"),
                email: "x@y.z".to_owned(),
                name: "X".to_owned(),
                role: UserRole::Analyst,
                created_at: "2024-02-01".to_owned(),
            },
            password: SecretString::from("hunter2"),
        };
        assert!(!format!("{stored:?}").contains("hunter2"));
    }
}
