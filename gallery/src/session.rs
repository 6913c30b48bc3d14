//! Token session shared by the route guard and the workspace.
//!
//! SYSTEM CONTEXT
//! ==============
//! A [`Session`] is the only reader and writer of the persisted token. Every
//! mutation writes the persisted copy and the in-memory copy in the same
//! synchronous step, so no consumer can observe them disagreeing.
//!
//! The persisted copy is read once, by [`Session::restore`]. Frontends that
//! render on the server construct an unrestored session and restore it once
//! they are running where the store is reachable.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::fmt;
use std::sync::{Arc, Mutex};

/// Key under which frontends persist the token.
pub const TOKEN_KEY: &str = "token";

/// Opaque bearer credential issued by `/api/login`.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// Wrap a raw token. Blank input is not a token.
    #[must_use]
    pub fn parse(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() { None } else { Some(Self(raw)) }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// Error returned by a [`TokenStore`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No backing storage exists in this environment.
    #[error("token storage unavailable")]
    Unavailable,
    #[error("failed to read stored token: {0}")]
    Read(String),
    #[error("failed to write stored token: {0}")]
    Write(String),
}

/// Durable slot holding at most one token.
pub trait TokenStore {
    /// Read the persisted token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn load(&self) -> Result<Option<String>, StoreError>;

    /// Replace the persisted token.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn save(&self, token: &str) -> Result<(), StoreError>;

    /// Remove the persisted token. Removing an absent token succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn clear(&self) -> Result<(), StoreError>;
}

/// In-process store. Clones share one slot, so a test can keep a handle and
/// inspect what the session persisted.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    /// Store pre-seeded with a token, as if left by an earlier run.
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(token.to_owned()))),
        }
    }

    /// Current persisted value.
    #[must_use]
    pub fn peek(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl TokenStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        let slot = self.slot.lock().map_err(|e| StoreError::Read(e.to_string()))?;
        Ok(slot.clone())
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        let mut slot = self.slot.lock().map_err(|e| StoreError::Write(e.to_string()))?;
        *slot = Some(token.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut slot = self.slot.lock().map_err(|e| StoreError::Write(e.to_string()))?;
        *slot = None;
        Ok(())
    }
}

/// The client's authentication state.
#[derive(Clone, Debug)]
pub struct Session<S> {
    token: Option<Token>,
    store: S,
    restored: bool,
}

impl<S: TokenStore> Session<S> {
    /// Session over `store` that has not read the persisted token yet.
    pub fn new(store: S) -> Self {
        Self {
            token: None,
            store,
            restored: false,
        }
    }

    /// Session over `store`, restored immediately.
    pub fn restored(store: S) -> Self {
        let mut session = Self::new(store);
        session.restore();
        session
    }

    /// Read the persisted token into memory. Only the first call reads; a
    /// missing, blank or unreadable token leaves the session logged out.
    pub fn restore(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;
        self.token = match self.store.load() {
            Ok(raw) => raw.and_then(Token::parse),
            Err(e) => {
                log::warn!("session restore failed: {e}");
                None
            }
        };
        log::debug!("session restored (authenticated: {})", self.token.is_some());
    }

    /// Store `token` as the current session.
    ///
    /// The persisted copy is written first; if that fails neither copy
    /// changes.
    ///
    /// # Errors
    ///
    /// Returns the store error when the token could not be persisted.
    pub fn login(&mut self, token: Token) -> Result<(), StoreError> {
        self.store.save(token.as_str())?;
        self.token = Some(token);
        self.restored = true;
        Ok(())
    }

    /// Clear the current session.
    ///
    /// The in-memory token is always dropped.
    ///
    /// # Errors
    ///
    /// Returns the store error when the persisted copy could not be removed.
    pub fn logout(&mut self) -> Result<(), StoreError> {
        self.token = None;
        self.restored = true;
        self.store.clear()
    }

    #[must_use]
    pub fn current_token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Whether the persisted token has been read (or superseded by a login
    /// or logout).
    #[must_use]
    pub fn is_restored(&self) -> bool {
        self.restored
    }
}
