//! Pluggable user stores backing dashboard authentication.
//!
//! The [`UserStore`] trait is what [`crate::auth::Authenticator`] talks to.
//! [`InMemoryUserStore`] is the bundled implementation, seeded with the
//! demo accounts when built through
//! [`InMemoryUserStore::with_demo_users`].

mod memory;

pub use memory::InMemoryUserStore;

use core::future::Future;

use crate::error::Result;
use crate::models::{StoredUser, User, UserId};

/// Async store of registered dashboard users.
///
/// All methods take `&self`; implementations should use interior
/// mutability (e.g. `Mutex`) for thread-safe mutation.
pub trait UserStore: core::fmt::Debug + Send + Sync {
    /// Looks a user up by email, compared case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails to read.
    fn find_by_email(&self, email: &str) -> impl Future<Output = Result<Option<StoredUser>>> + Send;

    /// Appends a user whose email is not registered yet.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FraudShieldError::EmailTaken`] if the email is
    /// already registered, or an error if the storage backend fails to write.
    fn insert(&self, user: StoredUser) -> impl Future<Output = Result<()>> + Send;

    /// Registers a user under the next sequential id.
    ///
    /// `build` receives the id (store size plus one) and returns the record
    /// to store. Id assignment, the email uniqueness check and the append
    /// happen as one step, so concurrent registrations never share an id
    /// or an email.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FraudShieldError::EmailTaken`] if the email is
    /// already registered, or an error if the storage backend fails to write.
    fn register<F>(&self, build: F) -> impl Future<Output = Result<User>> + Send
    where
        F: FnOnce(UserId) -> StoredUser;

    /// Number of registered users.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails to read.
    fn len(&self) -> impl Future<Output = Result<usize>> + Send;
}
