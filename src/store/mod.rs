//! Local Data Store — per-user document persistence behind an async trait.
//!
//! The backing store is synchronous SQLite, but the public contract is
//! async so a networked backend can replace [`LocalStore`] without caller
//! changes. Three conceptual keyspaces live in one blob table: the account
//! table, the session record, and one UserData document per account.

pub mod local;
pub mod sqlite;

pub use local::LocalStore;
pub use sqlite::{open_database, open_memory_database};

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{User, UserData};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("A user with this email already exists")]
    DuplicateUser,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Corrupt stored document: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Internal lock error")]
    LockPoisoned,
}

/// Account, session, and document operations.
///
/// Every method is async even though [`LocalStore`] resolves immediately;
/// callers must not assume synchronous local access.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Create an account. Fails with [`StoreError::DuplicateUser`] when the
    /// email is already taken (case-sensitive exact match). On success the
    /// new account gets a default UserData document and becomes the
    /// current session.
    async fn register(&self, email: &str, password: &str, name: &str)
        -> Result<User, StoreError>;

    /// Authenticate and establish the session. Fails with
    /// [`StoreError::InvalidCredentials`] unless an account matches the
    /// `(email, password)` pair exactly.
    async fn login(&self, email: &str, password: &str) -> Result<User, StoreError>;

    /// Clear the session. Idempotent.
    async fn logout(&self) -> Result<(), StoreError>;

    /// Pure read of the session record.
    async fn current_user(&self) -> Result<Option<User>, StoreError>;

    /// Read a user's document. Total: absent rows yield the default
    /// document and legacy documents are deep-merged against it, so every
    /// field the current schema knows is always present.
    async fn get_user_data(&self, user_id: &str) -> Result<UserData, StoreError>;

    /// Full-document overwrite. Callers supply the complete merged
    /// document with every mutation; this is not a patch.
    async fn save_user_data(&self, user_id: &str, data: &UserData) -> Result<(), StoreError>;
}
