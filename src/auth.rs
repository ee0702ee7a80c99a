//! Demo authentication over a [`UserStore`].
//!
//! Passwords are compared in plain text and tokens are opaque strings of
//! the form `mock_token_<id>_<epoch millis>`. Suitable for demos only.

use chrono::Utc;
use secrecy::{ExposeSecret as _, SecretString};

use crate::error::{FraudShieldError, Result};
use crate::models::{AuthSession, StoredUser, User, UserRole};
use crate::storage::UserStore;

/// Login and signup against a user store.
#[derive(Debug)]
pub struct Authenticator<S: UserStore> {
    /// Registered users.
    store: S,
}

impl<S: UserStore> Authenticator<S> {
    /// Creates an authenticator over `store`.
    #[inline]
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    #[inline]
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Checks credentials and opens a session.
    ///
    /// # Errors
    ///
    /// Returns [`FraudShieldError::InvalidCredentials`] if no user has this
    /// email or the password does not match, or a storage error.
    #[tracing::instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession> {
        let Some(stored) = self.store.find_by_email(email).await? else {
            tracing::debug!("login for unknown email");
            return Err(FraudShieldError::InvalidCredentials);
        };
        if stored.password.expose_secret() != password {
            tracing::debug!(user = %stored.user.id, "login with wrong password");
            return Err(FraudShieldError::InvalidCredentials);
        }
        tracing::info!(user = %stored.user.id, "logged in");
        Ok(open_session(stored.user))
    }

    /// Registers a new analyst and opens a session for them.
    ///
    /// The new user's id is the store size plus one, assigned by the store
    /// together with the email check.
    ///
    /// # Errors
    ///
    /// Returns [`FraudShieldError::EmailTaken`] if the email is already
    /// registered, [`FraudShieldError::InvalidInput`] if any argument is
    /// blank, or a storage error.
    #[tracing::instrument(skip_all)]
    pub async fn signup(&self, email: &str, password: &str, name: &str) -> Result<AuthSession> {
        let address = email.trim();
        if address.is_empty() || password.is_empty() || name.trim().is_empty() {
            return Err(FraudShieldError::InvalidInput(
                "email, password and name are required".to_owned(),
            ));
        }
        let user = self
            .store
            .register(|id| StoredUser {
                user: User {
                    id,
                    email: address.to_owned(),
                    name: name.trim().to_owned(),
                    role: UserRole::Analyst,
                    created_at: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
                },
                password: SecretString::from(password),
            })
            .await?;
        tracing::info!(user = %user.id, "signed up");
        Ok(open_session(user))
    }
}

/// Issues a session token for `user`.
fn open_session(user: User) -> AuthSession {
    let token = format!("mock_token_{}_{}", user.id, Utc::now().timestamp_millis());
    AuthSession {
        user,
        token: SecretString::from(token),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserId;
    use crate::storage::InMemoryUserStore;
    use std::sync::Arc;

    fn demo() -> Authenticator<InMemoryUserStore> {
        Authenticator::new(InMemoryUserStore::with_demo_users())
    }

    #[tokio::test]
    async fn login_with_demo_credentials() {
        let session = demo()
            .login("analyst@fraudshield.com", "analyst123")
            .await
            .unwrap();
        assert_eq!(session.user.name, "Security Analyst");
        assert_eq!(session.user.role, UserRole::Analyst);
        assert!(session.token.expose_secret().starts_with("mock_token_2_"));
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let err = demo()
            .login("admin@fraudshield.com", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, FraudShieldError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_rejects_unknown_email() {
        let err = demo().login("nobody@example.com", "x").await.unwrap_err();
        assert!(matches!(err, FraudShieldError::InvalidCredentials));
    }

    #[tokio::test]
    async fn signup_registers_analyst() {
        let auth = demo();
        let session = auth
            .signup("new@example.com", "pw", "New Person")
            .await
            .unwrap();
        assert_eq!(session.user.id, UserId::from("4"));
        assert_eq!(session.user.role, UserRole::Analyst);
        assert!(session.token.expose_secret().starts_with("mock_token_4_"));
        assert_eq!(auth.store().len().await.unwrap(), 4);

        let again = auth.login("new@example.com", "pw").await.unwrap();
        assert_eq!(again.user, session.user);
    }

    #[tokio::test]
    async fn signup_rejects_registered_email() {
        let err = demo()
            .signup("demo@fraudshield.com", "pw", "Someone")
            .await
            .unwrap_err();
        assert!(matches!(err, FraudShieldError::EmailTaken(ref email) if email == "demo@fraudshield.com"));
        assert_eq!(err.to_string(), "email already registered: demo@fraudshield.com");
    }

    #[tokio::test]
    async fn signup_rejects_blank_fields() {
        let err = demo().signup(" ", "pw", "Name").await.unwrap_err();
        assert!(matches!(err, FraudShieldError::InvalidInput(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_signups_for_one_email_register_once() {
        let auth = Arc::new(demo());
        let handles: Vec<_> = (0..16)
            .map(|n| {
                let auth = Arc::clone(&auth);
                tokio::spawn(async move {
                    auth.signup("race@example.com", "pw", &format!("Racer {n}"))
                        .await
                })
            })
            .collect();

        let mut registered = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => registered += 1,
                Err(err) => assert!(matches!(err, FraudShieldError::EmailTaken(_))),
            }
        }
        assert_eq!(registered, 1);
        assert_eq!(auth.store().len().await.unwrap(), 4);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_signups_get_distinct_ids() {
        let auth = Arc::new(demo());
        let handles: Vec<_> = (0..16)
            .map(|n| {
                let auth = Arc::clone(&auth);
                tokio::spawn(async move {
                    auth.signup(&format!("user{n}@example.com"), "pw", "Someone")
                        .await
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().user.id);
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 16);
        assert_eq!(auth.store().len().await.unwrap(), 19);
    }
}
