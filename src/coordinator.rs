//! Application state coordinator.
//!
//! Owns the authoritative in-memory snapshot (the signed-in user, their
//! UserData document, the active view) and routes every mutation through
//! the same pattern: transform the sub-collection, update the snapshot,
//! write the whole document through to the store. Persistence failures
//! are logged and absorbed — the snapshot stays authoritative — but each
//! save reports a [`PersistOutcome`] so callers and tests can observe the
//! result instead of guessing from side-effect timing.

use std::sync::Arc;

use crate::auth::{AuthError, AuthManager};
use crate::journal;
use crate::models::{JournalEntry, Medication, PatientInfo, User, UserData, ViewState};
use crate::regimen;
use crate::store::DataStore;

/// Observable result of one write-through save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    Saved,
    /// The change is in memory but not on disk. Already logged.
    Failed,
}

pub struct AppCoordinator {
    store: Arc<dyn DataStore>,
    auth: AuthManager,
    user: Option<User>,
    data: UserData,
    view: ViewState,
}

impl AppCoordinator {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            auth: AuthManager::new(store.clone()),
            store,
            user: None,
            data: UserData::default(),
            view: ViewState::default(),
        }
    }

    // ── Session lifecycle ────────────────────────────────────

    /// Re-adopt a persisted session on process start and load its data.
    pub async fn restore_session(&mut self) -> Result<Option<User>, AuthError> {
        if let Some(user) = self.auth.current_user().await? {
            self.load_user(user).await;
        }
        Ok(self.user.clone())
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = self.auth.login(email, password).await?;
        self.load_user(user.clone()).await;
        Ok(user)
    }

    pub async fn register(
        &mut self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<User, AuthError> {
        let user = self.auth.register(email, password, name).await?;
        self.load_user(user.clone()).await;
        Ok(user)
    }

    /// Clear the session and reset every in-memory field to defaults,
    /// returning to the default view.
    pub async fn logout(&mut self) {
        if let Err(e) = self.auth.logout().await {
            tracing::warn!(error = %e, "Logout failed to clear the stored session");
        }
        self.user = None;
        self.data = UserData::default();
        self.view = ViewState::default();
    }

    async fn load_user(&mut self, user: User) {
        let data = match self.store.get_user_data(&user.id).await {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(user_id = %user.id, error = %e, "Failed to load user data");
                UserData::default()
            }
        };
        self.user = Some(user);
        self.data = data;
    }

    // ── Snapshot access ──────────────────────────────────────

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn data(&self) -> &UserData {
        &self.data
    }

    pub fn medications(&self) -> &[Medication] {
        &self.data.medications
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.data.entries
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    /// Pure state change; switching views cancels nothing. An operation
    /// started from a previous view applies its result to the
    /// then-current snapshot when it resolves.
    pub fn set_view(&mut self, view: ViewState) {
        self.view = view;
    }

    // ── Mutations ────────────────────────────────────────────

    pub async fn add_medication(&mut self, medication: Medication) -> PersistOutcome {
        self.data.medications = regimen::add_medication(&self.data.medications, medication);
        self.persist().await
    }

    pub async fn remove_medication(&mut self, id: &str) -> PersistOutcome {
        self.data.medications = regimen::remove_medication(&self.data.medications, id);
        self.persist().await
    }

    pub async fn toggle_medication(&mut self, id: &str) -> PersistOutcome {
        self.data.medications = regimen::toggle_taken(&self.data.medications, id);
        self.persist().await
    }

    pub async fn upsert_entry(&mut self, entry: JournalEntry) -> PersistOutcome {
        self.data.entries = journal::upsert_entry(&self.data.entries, entry);
        self.persist().await
    }

    pub async fn set_sickle_cell_type(&mut self, code: &str) -> PersistOutcome {
        self.data.sickle_cell_type = code.to_string();
        self.persist().await
    }

    pub async fn set_patient_info(&mut self, info: PatientInfo) -> PersistOutcome {
        self.data.patient_info = info;
        self.persist().await
    }

    /// Write the whole document through to the store.
    ///
    /// Signed out, there is nothing to persist against: the change stays
    /// in memory and the save reports `Failed`. Store errors never
    /// propagate to the caller.
    async fn persist(&self) -> PersistOutcome {
        let Some(user) = &self.user else {
            tracing::warn!("No signed-in user — change kept in memory only");
            return PersistOutcome::Failed;
        };
        match self.store.save_user_data(&user.id, &self.data).await {
            Ok(()) => PersistOutcome::Saved,
            Err(e) => {
                tracing::error!(user_id = %user.id, error = %e, "Failed to save user data");
                PersistOutcome::Failed
            }
        }
    }
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::store::{DataStore, LocalStore, StoreError};

    fn coordinator() -> AppCoordinator {
        AppCoordinator::new(Arc::new(LocalStore::open_in_memory().unwrap()))
    }

    async fn signed_in() -> AppCoordinator {
        let mut app = coordinator();
        app.register("alice@example.com", "pw", "Alice Mensah")
            .await
            .unwrap();
        app
    }

    fn med(id: &str, name: &str) -> Medication {
        Medication {
            id: id.into(),
            name: name.into(),
            dosage: "500mg".into(),
            frequency: "Daily".into(),
            taken_today: false,
        }
    }

    fn entry(date: &str, pain_level: u8) -> JournalEntry {
        JournalEntry {
            id: format!("entry-{date}"),
            date: date.into(),
            pain_level,
            ..Default::default()
        }
    }

    /// Store whose saves always fail; everything else delegates.
    struct FailingSaveStore {
        inner: LocalStore,
    }

    #[async_trait]
    impl DataStore for FailingSaveStore {
        async fn register(
            &self,
            email: &str,
            password: &str,
            name: &str,
        ) -> Result<User, StoreError> {
            self.inner.register(email, password, name).await
        }

        async fn login(&self, email: &str, password: &str) -> Result<User, StoreError> {
            self.inner.login(email, password).await
        }

        async fn logout(&self) -> Result<(), StoreError> {
            self.inner.logout().await
        }

        async fn current_user(&self) -> Result<Option<User>, StoreError> {
            self.inner.current_user().await
        }

        async fn get_user_data(&self, user_id: &str) -> Result<UserData, StoreError> {
            self.inner.get_user_data(user_id).await
        }

        async fn save_user_data(&self, _: &str, _: &UserData) -> Result<(), StoreError> {
            Err(StoreError::LockPoisoned)
        }
    }

    // ───────────────────────────────────────
    // session lifecycle
    // ───────────────────────────────────────

    #[tokio::test]
    async fn register_loads_default_snapshot() {
        let app = signed_in().await;
        assert!(app.user().is_some());
        assert_eq!(*app.data(), UserData::default());
        assert_eq!(app.view(), ViewState::Dashboard);
    }

    #[tokio::test]
    async fn restore_session_reloads_user_and_data() {
        let store = Arc::new(LocalStore::open_in_memory().unwrap());

        let mut first = AppCoordinator::new(store.clone());
        first
            .register("alice@example.com", "pw", "Alice Mensah")
            .await
            .unwrap();
        first.upsert_entry(entry("2025-03-01", 4)).await;

        let mut second = AppCoordinator::new(store);
        let restored = second.restore_session().await.unwrap();
        assert_eq!(restored.unwrap().email, "alice@example.com");
        assert_eq!(second.entries().len(), 1);
    }

    #[tokio::test]
    async fn restore_session_without_stored_session_is_none() {
        let mut app = coordinator();
        assert_eq!(app.restore_session().await.unwrap(), None);
        assert!(app.user().is_none());
    }

    #[tokio::test]
    async fn logout_resets_snapshot_and_view() {
        let mut app = signed_in().await;
        app.upsert_entry(entry("2025-03-01", 4)).await;
        app.set_view(ViewState::Journal);

        app.logout().await;
        assert!(app.user().is_none());
        assert_eq!(*app.data(), UserData::default());
        assert_eq!(app.view(), ViewState::Dashboard);
    }

    #[tokio::test]
    async fn login_after_logout_reloads_persisted_data() {
        let mut app = signed_in().await;
        app.add_medication(med("m1", "Hydroxyurea")).await;
        app.logout().await;
        assert!(app.medications().is_empty());

        app.login("alice@example.com", "pw").await.unwrap();
        assert_eq!(app.medications().len(), 1);
    }

    // ───────────────────────────────────────
    // write-through mutations
    // ───────────────────────────────────────

    #[tokio::test]
    async fn mutations_update_snapshot_and_persist() {
        let store = Arc::new(LocalStore::open_in_memory().unwrap());
        let mut app = AppCoordinator::new(store.clone());
        let user = app
            .register("alice@example.com", "pw", "Alice Mensah")
            .await
            .unwrap();

        assert_eq!(
            app.add_medication(med("m1", "Hydroxyurea")).await,
            PersistOutcome::Saved
        );
        assert_eq!(app.toggle_medication("m1").await, PersistOutcome::Saved);
        assert_eq!(
            app.upsert_entry(entry("2025-03-01", 4)).await,
            PersistOutcome::Saved
        );
        assert_eq!(app.set_sickle_cell_type("SC").await, PersistOutcome::Saved);

        // The whole document reached the store, not a patch.
        let stored = store.get_user_data(&user.id).await.unwrap();
        assert_eq!(stored.medications.len(), 1);
        assert!(stored.medications[0].taken_today);
        assert_eq!(stored.entries.len(), 1);
        assert_eq!(stored.sickle_cell_type, "SC");
    }

    #[tokio::test]
    async fn upsert_by_date_replaces_in_snapshot() {
        let mut app = signed_in().await;
        app.upsert_entry(entry("2025-03-01", 4)).await;
        app.upsert_entry(entry("2025-03-01", 9)).await;

        assert_eq!(app.entries().len(), 1);
        assert_eq!(app.entries()[0].pain_level, 9);
    }

    #[tokio::test]
    async fn remove_unknown_medication_is_noop_but_still_saves() {
        let mut app = signed_in().await;
        app.add_medication(med("m1", "Hydroxyurea")).await;

        assert_eq!(app.remove_medication("m9").await, PersistOutcome::Saved);
        assert_eq!(app.medications().len(), 1);
    }

    #[tokio::test]
    async fn set_patient_info_replaces_whole_struct() {
        let mut app = signed_in().await;
        let info = PatientInfo {
            doctor_name: "Dr. Okafor".into(),
            blood_type: "O+".into(),
            ..Default::default()
        };
        assert_eq!(app.set_patient_info(info.clone()).await, PersistOutcome::Saved);
        assert_eq!(app.data().patient_info, info);
    }

    // ───────────────────────────────────────
    // failure and stale-view behavior
    // ───────────────────────────────────────

    #[tokio::test]
    async fn persist_failure_is_observable_but_snapshot_updates() {
        let store = Arc::new(FailingSaveStore {
            inner: LocalStore::open_in_memory().unwrap(),
        });
        let mut app = AppCoordinator::new(store);
        app.register("alice@example.com", "pw", "Alice Mensah")
            .await
            .unwrap();

        let outcome = app.add_medication(med("m1", "Hydroxyurea")).await;
        assert_eq!(outcome, PersistOutcome::Failed);
        // Optimistic local-first: the in-memory snapshot keeps the change.
        assert_eq!(app.medications().len(), 1);
    }

    #[tokio::test]
    async fn signed_out_mutation_does_not_panic_and_reports_failed() {
        let mut app = coordinator();
        let outcome = app.upsert_entry(entry("2025-03-01", 4)).await;
        assert_eq!(outcome, PersistOutcome::Failed);
        assert_eq!(app.entries().len(), 1);
    }

    #[tokio::test]
    async fn stale_view_updates_apply_to_current_state() {
        let mut app = signed_in().await;

        // An operation started from the journal view resolves after the
        // user has switched away; its result still lands.
        app.set_view(ViewState::Journal);
        app.set_view(ViewState::Immersive);
        let outcome = app.upsert_entry(entry("2025-03-02", 5)).await;

        assert_eq!(outcome, PersistOutcome::Saved);
        assert_eq!(app.view(), ViewState::Immersive);
        assert_eq!(app.entries().len(), 1);
    }
}
