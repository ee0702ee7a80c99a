//! In-memory user store.
//!
//! Provides [`InMemoryUserStore`], a thread-safe in-memory implementation
//! of [`super::UserStore`]. Nothing survives the process.

use core::convert;
use core::future::{self, Future};
use std::sync::Mutex;

use secrecy::SecretString;

use crate::error::{FraudShieldError, Result};
use crate::models::{StoredUser, User, UserId, UserRole};

/// Demo accounts: id, email, password, name, role, registration date.
const DEMO_USERS: [(&str, &str, &str, &str, UserRole, &str); 3] = [
    (
        "1",
        "admin@fraudshield.com",
        "admin123",
        "Admin User",
        UserRole::Admin,
        "2024-01-01",
    ),
    (
        "2",
        "analyst@fraudshield.com",
        "analyst123",
        "Security Analyst",
        UserRole::Analyst,
        "2024-01-15",
    ),
    (
        "3",
        "demo@fraudshield.com",
        "demo123",
        "Demo User",
        UserRole::Analyst,
        "2024-02-01",
    ),
];

/// Thread-safe in-memory user store.
///
/// # Example
///
/// ```rust
/// use fraudshield::auth::Authenticator;
/// use fraudshield::storage::InMemoryUserStore;
///
/// let auth = Authenticator::new(InMemoryUserStore::with_demo_users());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    /// Registered users in registration order.
    users: Mutex<Vec<StoredUser>>,
}

impl InMemoryUserStore {
    /// Creates an empty store.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the three demo accounts.
    #[must_use]
    pub fn with_demo_users() -> Self {
        let users = DEMO_USERS
            .into_iter()
            .map(|(id, email, password, name, role, created_at)| StoredUser {
                user: User {
                    id: UserId::from(id),
                    email: email.to_owned(),
                    name: name.to_owned(),
                    role,
                    created_at: created_at.to_owned(),
                },
                password: SecretString::from(password),
            })
            .collect();
        Self {
            users: Mutex::new(users),
        }
    }

    /// Acquires the lock and applies a closure.
    fn with_lock<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Vec<StoredUser>) -> R,
    {
        let mut users = self.users.lock().map_err(|err| lock_error(&err))?;
        Ok(f(&mut users))
    }
}

/// Appends `candidate` unless its email is already registered.
fn push_unique(users: &mut Vec<StoredUser>, candidate: StoredUser) -> Result<User> {
    let email = candidate.user.email.trim();
    if users
        .iter()
        .any(|stored| stored.user.email.trim().eq_ignore_ascii_case(email))
    {
        return Err(FraudShieldError::EmailTaken(email.to_owned()));
    }
    let user = candidate.user.clone();
    users.push(candidate);
    Ok(user)
}

/// Converts a mutex poison error into a storage error.
fn lock_error<T>(err: &std::sync::PoisonError<T>) -> FraudShieldError {
    FraudShieldError::Storage(err.to_string().into())
}

impl super::UserStore for InMemoryUserStore {
    #[inline]
    fn find_by_email(&self, email: &str) -> impl Future<Output = Result<Option<StoredUser>>> + Send {
        let wanted = email.trim();
        future::ready(self.with_lock(|users| {
            users
                .iter()
                .find(|stored| stored.user.email.eq_ignore_ascii_case(wanted))
                .cloned()
        }))
    }

    #[inline]
    fn insert(&self, user: StoredUser) -> impl Future<Output = Result<()>> + Send {
        let outcome = self
            .with_lock(|users| push_unique(users, user).map(drop))
            .and_then(convert::identity);
        future::ready(outcome)
    }

    #[inline]
    fn register<F>(&self, build: F) -> impl Future<Output = Result<User>> + Send
    where
        F: FnOnce(UserId) -> StoredUser,
    {
        let outcome = self
            .with_lock(|users| {
                let candidate = build(UserId::sequential(users.len() + 1));
                push_unique(users, candidate)
            })
            .and_then(convert::identity);
        future::ready(outcome)
    }

    #[inline]
    fn len(&self) -> impl Future<Output = Result<usize>> + Send {
        future::ready(self.with_lock(|users| users.len()))
    }
}
