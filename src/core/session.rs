//! # Session Store
//!
//! Simulated accounts and the active session, persisted through
//! [`LocalStore`]. Prototype auth model: the registry keeps plaintext
//! passwords and is not a security boundary.
//!
//! Two persisted collections back the store:
//! - `users`: the global account registry.
//! - `user_info`: the active session's account snapshot, favorites included.
//!
//! Favorites also mirror to a derived per-account key (`favorites_{id}`),
//! written on every favorites change and deleted at logout. The snapshot is
//! authoritative; nothing reads the mirror back.

use std::fmt;
use std::io;

use chrono::Utc;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::core::storage::LocalStore;

pub const USERS_KEY: &str = "users";
pub const SESSION_KEY: &str = "user_info";

fn favorites_key(account_id: &str) -> String {
    format!("favorites_{account_id}")
}

// ============================================================================
// Records
// ============================================================================

/// One registered account.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Account {
    /// Opaque id, distinct per registration.
    pub id: String,
    pub name: String,
    /// Unique key across the registry, compared case-insensitively.
    pub email: String,
    /// Plaintext: prototype auth model, see module docs.
    pub password: String,
    /// Favorite country codes. Set semantics, insertion order kept.
    #[serde(default)]
    pub favorites: Vec<String>,
    pub created_at: i64,
}

/// Registration input.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum SessionError {
    /// No account matches the email + password pair.
    InvalidCredentials,
    /// The email is already registered.
    DuplicateEmail,
    /// Profile storage failed underneath a session operation.
    Io(io::Error),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::InvalidCredentials => write!(f, "invalid credentials"),
            SessionError::DuplicateEmail => write!(f, "email already in use"),
            SessionError::Io(e) => write!(f, "storage error: {e}"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<io::Error> for SessionError {
    fn from(e: io::Error) -> Self {
        SessionError::Io(e)
    }
}

// ============================================================================
// Store
// ============================================================================

pub struct SessionStore {
    store: LocalStore,
    user: Option<Account>,
    loading: bool,
}

impl SessionStore {
    /// A fresh store is unauthenticated and `loading` until the first
    /// rehydration attempt completes.
    pub fn new(store: LocalStore) -> Self {
        Self {
            store,
            user: None,
            loading: true,
        }
    }

    /// Restores the persisted session snapshot, if any. Favorites are
    /// normalized to set semantics (legacy records may carry duplicates; a
    /// missing field deserializes as empty). A malformed record is discarded
    /// and the store stays unauthenticated; this is never surfaced, only
    /// logged.
    pub fn rehydrate(&mut self) {
        match self.store.read::<Account>(SESSION_KEY) {
            Ok(Some(mut account)) => {
                dedup_in_place(&mut account.favorites);
                debug!("session restored for {}", account.email);
                self.user = Some(account);
            }
            Ok(None) => {}
            Err(e) => {
                warn!("discarding corrupt session record: {}", e);
                let _ = self.store.remove(SESSION_KEY);
            }
        }
        self.loading = false;
    }

    /// True only before the first rehydration attempt completes.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True iff an account is loaded.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn user(&self) -> Option<&Account> {
        self.user.as_ref()
    }

    pub fn favorites(&self) -> &[String] {
        self.user.as_ref().map(|u| u.favorites.as_slice()).unwrap_or(&[])
    }

    fn registry(&self) -> Result<Vec<Account>, SessionError> {
        Ok(self.store.read::<Vec<Account>>(USERS_KEY)?.unwrap_or_default())
    }

    /// Write-through: the session snapshot plus the derived favorites mirror.
    fn persist_session(&self) -> Result<(), SessionError> {
        if let Some(user) = &self.user {
            self.store.write(SESSION_KEY, user)?;
            self.store.write(&favorites_key(&user.id), &user.favorites)?;
        }
        Ok(())
    }

    /// Creates an account with empty favorites, appends it to the registry,
    /// and signs it in. Fails with [`SessionError::DuplicateEmail`] when the
    /// email is already registered (case-insensitive).
    pub fn register(&mut self, input: NewAccount) -> Result<(), SessionError> {
        let mut users = self.registry()?;
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&input.email)) {
            return Err(SessionError::DuplicateEmail);
        }

        let account = Account {
            id: uuid::Uuid::new_v4().to_string(),
            name: input.username,
            email: input.email,
            password: input.password,
            favorites: Vec::new(),
            created_at: Utc::now().timestamp(),
        };

        users.push(account.clone());
        self.store.write(USERS_KEY, &users)?;
        debug!("registered {}", account.email);
        self.user = Some(account);
        self.persist_session()?;
        Ok(())
    }

    /// Signs in the account matching email (case-insensitive) + password
    /// (exact). Favorites accumulated in the current in-memory session are
    /// merged with the account's stored favorites, deduplicated, first
    /// occurrence wins.
    pub fn login(&mut self, credentials: Credentials) -> Result<(), SessionError> {
        let users = self.registry()?;
        let found = users
            .into_iter()
            .find(|u| {
                u.email.eq_ignore_ascii_case(&credentials.email)
                    && u.password == credentials.password
            })
            .ok_or(SessionError::InvalidCredentials)?;

        // A pre-login session may carry transient favorites; keep them.
        let current = self.user.take().map(|u| u.favorites).unwrap_or_default();
        let mut account = found;
        account.favorites = merge_favorites(current, account.favorites);

        self.user = Some(account);
        self.persist_session()?;
        Ok(())
    }

    /// Writes the current favorites back into the matching registry entry so
    /// they survive across sessions, then clears the persisted snapshot and
    /// the favorites mirror. A no-op when unauthenticated.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        let Some(user) = self.user.take() else {
            return Ok(());
        };

        let mut users = self.registry()?;
        if let Some(entry) = users.iter_mut().find(|u| u.id == user.id) {
            entry.favorites = user.favorites.clone();
        }
        self.store.write(USERS_KEY, &users)?;
        self.store.remove(SESSION_KEY)?;
        self.store.remove(&favorites_key(&user.id))?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Favorites
    // ------------------------------------------------------------------

    /// Flips membership of `code` in the active account's favorites and
    /// persists immediately. A no-op when unauthenticated.
    pub fn toggle_favorite(&mut self, code: &str) -> Result<(), SessionError> {
        let Some(user) = self.user.as_mut() else {
            return Ok(());
        };
        match user.favorites.iter().position(|c| c == code) {
            Some(index) => {
                user.favorites.remove(index);
            }
            None => user.favorites.push(code.to_string()),
        }
        self.persist_session()
    }

    /// Adds `code` if absent. A no-op when already present or unauthenticated.
    pub fn add_favorite(&mut self, code: &str) -> Result<(), SessionError> {
        let Some(user) = self.user.as_mut() else {
            return Ok(());
        };
        if !user.favorites.iter().any(|c| c == code) {
            user.favorites.push(code.to_string());
            self.persist_session()?;
        }
        Ok(())
    }

    /// Removes `code` if present.
    pub fn remove_favorite(&mut self, code: &str) -> Result<(), SessionError> {
        let Some(user) = self.user.as_mut() else {
            return Ok(());
        };
        if let Some(index) = user.favorites.iter().position(|c| c == code) {
            user.favorites.remove(index);
            self.persist_session()?;
        }
        Ok(())
    }

    pub fn clear_favorites(&mut self) -> Result<(), SessionError> {
        let Some(user) = self.user.as_mut() else {
            return Ok(());
        };
        if !user.favorites.is_empty() {
            user.favorites.clear();
            self.persist_session()?;
        }
        Ok(())
    }

    /// Membership test against the active account's favorites; false when
    /// unauthenticated.
    pub fn is_favorite(&self, code: &str) -> bool {
        self.user
            .as_ref()
            .is_some_and(|u| u.favorites.iter().any(|c| c == code))
    }
}

/// Session favorites first, then stored ones; first occurrence wins.
fn merge_favorites(current: Vec<String>, stored: Vec<String>) -> Vec<String> {
    let mut merged = current;
    dedup_in_place(&mut merged);
    for code in stored {
        if !merged.contains(&code) {
            merged.push(code);
        }
    }
    merged
}

/// Removes duplicates, keeping the first occurrence of each code.
fn dedup_in_place(codes: &mut Vec<String>) {
    let mut seen = Vec::with_capacity(codes.len());
    codes.retain(|code| {
        if seen.contains(code) {
            false
        } else {
            seen.push(code.clone());
            true
        }
    });
}
