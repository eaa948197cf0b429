//! SQLite-backed implementation of [`DataStore`].
//!
//! Simulates a remote backend on the local disk: accounts, the session
//! record, and per-user documents are JSON blobs in `kv_store`, mirroring
//! the shapes a networked store would exchange. Reads back-fill missing
//! document fields; an unreadable document degrades to the default shape
//! rather than failing the caller.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{User, UserData};

use super::{sqlite, DataStore, StoreError};

const USERS_KEY: &str = "users";
const SESSION_KEY: &str = "session";

fn data_key(user_id: &str) -> String {
    format!("data_{user_id}")
}

/// Account row as persisted in the user-table blob. The password never
/// leaves this module.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredUser {
    id: String,
    email: String,
    password: String,
    name: String,
}

impl StoredUser {
    fn public(&self) -> User {
        User {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

/// Local key-value document store over a single SQLite connection.
pub struct LocalStore {
    conn: Mutex<Connection>,
}

impl LocalStore {
    /// Open (and migrate) the store at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Ok(Self {
            conn: Mutex::new(sqlite::open_database(path)?),
        })
    }

    /// In-memory store, for tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self {
            conn: Mutex::new(sqlite::open_memory_database()?),
        })
    }

    fn with_conn<T>(
        &self,
        op: impl FnOnce(&Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        op(&conn)
    }
}

// ── Keyspace helpers ─────────────────────────────────────────

fn kv_get(conn: &Connection, key: &str) -> Result<Option<String>, StoreError> {
    let value = conn
        .query_row(
            "SELECT value FROM kv_store WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

fn kv_put(conn: &Connection, key: &str, value: &str) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

fn kv_delete(conn: &Connection, key: &str) -> Result<(), StoreError> {
    conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
    Ok(())
}

fn read_users(conn: &Connection) -> Result<Vec<StoredUser>, StoreError> {
    match kv_get(conn, USERS_KEY)? {
        Some(blob) => Ok(serde_json::from_str(&blob)?),
        None => Ok(Vec::new()),
    }
}

fn write_users(conn: &Connection, users: &[StoredUser]) -> Result<(), StoreError> {
    kv_put(conn, USERS_KEY, &serde_json::to_string(users)?)
}

fn read_session(conn: &Connection) -> Result<Option<User>, StoreError> {
    match kv_get(conn, SESSION_KEY)? {
        Some(blob) => match serde_json::from_str(&blob) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                tracing::warn!(error = %e, "Unreadable session record — treating as signed out");
                Ok(None)
            }
        },
        None => Ok(None),
    }
}

fn write_session(conn: &Connection, user: &User) -> Result<(), StoreError> {
    kv_put(conn, SESSION_KEY, &serde_json::to_string(user)?)
}

// ── DataStore implementation ─────────────────────────────────

#[async_trait]
impl DataStore for LocalStore {
    async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<User, StoreError> {
        self.with_conn(|conn| {
            let mut users = read_users(conn)?;
            if users.iter().any(|u| u.email == email) {
                return Err(StoreError::DuplicateUser);
            }

            let new_user = StoredUser {
                id: Uuid::new_v4().to_string(),
                email: email.to_string(),
                password: password.to_string(),
                name: name.to_string(),
            };
            let public = new_user.public();
            users.push(new_user);
            write_users(conn, &users)?;

            // Fresh accounts start from the fully-populated default document.
            kv_put(
                conn,
                &data_key(&public.id),
                &serde_json::to_string(&UserData::default())?,
            )?;

            write_session(conn, &public)?;
            tracing::debug!(user_id = %public.id, "Registered new account");
            Ok(public)
        })
    }

    async fn login(&self, email: &str, password: &str) -> Result<User, StoreError> {
        self.with_conn(|conn| {
            let users = read_users(conn)?;
            let matched = users
                .iter()
                .find(|u| u.email == email && u.password == password)
                .ok_or(StoreError::InvalidCredentials)?;

            let public = matched.public();
            write_session(conn, &public)?;
            Ok(public)
        })
    }

    async fn logout(&self) -> Result<(), StoreError> {
        self.with_conn(|conn| kv_delete(conn, SESSION_KEY))
    }

    async fn current_user(&self) -> Result<Option<User>, StoreError> {
        self.with_conn(read_session)
    }

    async fn get_user_data(&self, user_id: &str) -> Result<UserData, StoreError> {
        self.with_conn(|conn| {
            match kv_get(conn, &data_key(user_id))? {
                None => Ok(UserData::default()),
                Some(blob) => match serde_json::from_str(&blob) {
                    Ok(value) => Ok(UserData::merged_with_defaults(value)),
                    Err(e) => {
                        tracing::warn!(
                            %user_id,
                            error = %e,
                            "Unreadable user document — serving defaults"
                        );
                        Ok(UserData::default())
                    }
                },
            }
        })
    }

    async fn save_user_data(&self, user_id: &str, data: &UserData) -> Result<(), StoreError> {
        let blob = serde_json::to_string(data)?;
        self.with_conn(|conn| kv_put(conn, &data_key(user_id), &blob))
    }
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
