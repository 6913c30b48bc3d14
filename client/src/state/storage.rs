//! Browser `localStorage` token store.
//!
//! SYSTEM CONTEXT
//! ==============
//! Only the session touches this store. Outside the browser there is no
//! storage at all and every call reports `Unavailable`.

#[cfg(all(test, not(feature = "hydrate")))]
#[path = "storage_test.rs"]
mod storage_test;

use gallery::{StoreError, TokenStore};
#[cfg(feature = "hydrate")]
use gallery::session::TOKEN_KEY;

/// `localStorage["token"]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStore;

#[cfg(feature = "hydrate")]
fn local_storage() -> Result<web_sys::Storage, StoreError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or(StoreError::Unavailable)
}

impl TokenStore for BrowserStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?
                .get_item(TOKEN_KEY)
                .map_err(|e| StoreError::Read(format!("{e:?}")))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(StoreError::Unavailable)
        }
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?
                .set_item(TOKEN_KEY, token)
                .map_err(|e| StoreError::Write(format!("{e:?}")))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = token;
            Err(StoreError::Unavailable)
        }
    }

    fn clear(&self) -> Result<(), StoreError> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?
                .remove_item(TOKEN_KEY)
                .map_err(|e| StoreError::Write(format!("{e:?}")))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(StoreError::Unavailable)
        }
    }
}
