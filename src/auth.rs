//! Registration and login orchestration over the data store.
//!
//! Owns no state of its own: the store holds the durable session record
//! and the coordinator owns the loaded in-memory data. Errors here are
//! form errors — the caller renders `Display` text next to the field.

use std::sync::Arc;

use thiserror::Error;

use crate::models::User;
use crate::store::{DataStore, StoreError};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Name is required")]
    NameRequired,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct AuthManager {
    store: Arc<dyn DataStore>,
}

impl AuthManager {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Create an account and establish its session.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<User, AuthError> {
        if name.is_empty() {
            return Err(AuthError::NameRequired);
        }
        Ok(self.store.register(email, password, name).await?)
    }

    /// Authenticate and establish the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        Ok(self.store.login(email, password).await?)
    }

    /// Clear the session. Idempotent.
    pub async fn logout(&self) -> Result<(), AuthError> {
        Ok(self.store.logout().await?)
    }

    /// Read the session record, e.g. on process start.
    pub async fn current_user(&self) -> Result<Option<User>, AuthError> {
        Ok(self.store.current_user().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LocalStore;

    fn manager() -> AuthManager {
        AuthManager::new(Arc::new(LocalStore::open_in_memory().unwrap()))
    }

    #[tokio::test]
    async fn register_requires_a_name() {
        let auth = manager();
        let result = auth.register("alice@example.com", "pw", "").await;
        assert!(matches!(result, Err(AuthError::NameRequired)));
    }

    #[tokio::test]
    async fn register_then_restore_session() {
        let auth = manager();
        let user = auth
            .register("alice@example.com", "pw", "Alice Mensah")
            .await
            .unwrap();
        assert_eq!(auth.current_user().await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn store_errors_pass_through_as_form_errors() {
        let auth = manager();
        auth.register("alice@example.com", "pw", "Alice Mensah")
            .await
            .unwrap();

        let dup = auth
            .register("alice@example.com", "pw2", "Alice Again")
            .await
            .unwrap_err();
        assert_eq!(dup.to_string(), "A user with this email already exists");

        let bad = auth.login("alice@example.com", "wrong").await.unwrap_err();
        assert_eq!(bad.to_string(), "Invalid email or password");
    }

    #[tokio::test]
    async fn logout_clears_session() {
        let auth = manager();
        auth.register("alice@example.com", "pw", "Alice Mensah")
            .await
            .unwrap();
        auth.logout().await.unwrap();
        assert_eq!(auth.current_user().await.unwrap(), None);
    }
}
