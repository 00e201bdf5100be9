//! Browser localStorage helpers for JSON-encoded records.
//!
//! SYSTEM CONTEXT
//! ==============
//! These helpers centralize browser-only read/write behavior so the auth
//! session and the questionnaire history can persist JSON without repeating
//! web-sys glue. Reads degrade to `None`; writes report `CacheError`.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::util::profile_cache::CacheError;

#[cfg(feature = "csr")]
pub(crate) fn storage() -> Result<web_sys::Storage, CacheError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or(CacheError::Unavailable)
}

/// Load a JSON value from `localStorage` for `key`.
pub fn load_json<T: DeserializeOwned>(key: &str) -> Option<T> {
    #[cfg(feature = "csr")]
    {
        let raw = storage().ok()?.get_item(key).ok().flatten()?;
        serde_json::from_str(&raw).ok()
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = key;
        None
    }
}

/// Save a JSON value to `localStorage` for `key`.
///
/// # Errors
///
/// Fails when storage is unavailable or the value cannot be written.
pub fn save_json<T: Serialize>(key: &str, value: &T) -> Result<(), CacheError> {
    #[cfg(feature = "csr")]
    {
        let raw = serde_json::to_string(value).map_err(|_| CacheError::Write { key: key.to_owned() })?;
        storage()?
            .set_item(key, &raw)
            .map_err(|_| CacheError::Write { key: key.to_owned() })
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (key, value);
        Err(CacheError::Unavailable)
    }
}

/// Remove `key` from `localStorage`.
///
/// # Errors
///
/// Fails when storage is unavailable or rejects the removal.
pub fn remove(key: &str) -> Result<(), CacheError> {
    #[cfg(feature = "csr")]
    {
        storage()?
            .remove_item(key)
            .map_err(|_| CacheError::Write { key: key.to_owned() })
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = key;
        Err(CacheError::Unavailable)
    }
}
