//! Per-identity profile cache backed by a string key-value store.
//!
//! SYSTEM CONTEXT
//! ==============
//! Role and names are kept client-side under `<field>_<identityId>` keys so
//! a returning user can be resolved without a profile service. Entries never
//! expire and are never removed.

#[cfg(test)]
#[path = "profile_cache_test.rs"]
mod profile_cache_test;

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

use crate::state::session::{Profile, Role};

const ROLE_FIELD: &str = "user_role";
const GIVEN_NAME_FIELD: &str = "user_name";
const FAMILY_NAME_FIELD: &str = "user_surname";

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error("local storage is not available")]
    Unavailable,

    #[error("local storage read failed for {key}")]
    Read { key: String },

    #[error("local storage write failed for {key}")]
    Write { key: String },
}

/// String key-value store holding cached profile fields.
pub trait ProfileCache: Send + Sync + 'static {
    /// # Errors
    ///
    /// Returns an error when the underlying store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// # Errors
    ///
    /// Returns an error when the underlying store rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;
}

pub fn role_key(identity_id: &str) -> String {
    format!("{ROLE_FIELD}_{identity_id}")
}

pub fn given_name_key(identity_id: &str) -> String {
    format!("{GIVEN_NAME_FIELD}_{identity_id}")
}

pub fn family_name_key(identity_id: &str) -> String {
    format!("{FAMILY_NAME_FIELD}_{identity_id}")
}

/// Read the cached profile for `identity_id`; missing entries take defaults.
///
/// # Errors
///
/// Propagates the first store fault.
pub fn read_profile<C: ProfileCache + ?Sized>(cache: &C, identity_id: &str) -> Result<Profile, CacheError> {
    let role = cache.get(&role_key(identity_id))?;
    let given_name = cache.get(&given_name_key(identity_id))?;
    let family_name = cache.get(&family_name_key(identity_id))?;
    Ok(Profile {
        role: Role::from_stored(role.as_deref()),
        given_name: given_name.unwrap_or_default(),
        family_name: family_name.unwrap_or_default(),
    })
}

/// Write all three profile entries for `identity_id`.
///
/// # Errors
///
/// Propagates the first store fault; earlier entries stay written.
pub fn write_profile<C: ProfileCache + ?Sized>(
    cache: &C,
    identity_id: &str,
    profile: &Profile,
) -> Result<(), CacheError> {
    cache.set(&role_key(identity_id), profile.role.as_str())?;
    cache.set(&given_name_key(identity_id), &profile.given_name)?;
    cache.set(&family_name_key(identity_id), &profile.family_name)?;
    Ok(())
}

/// Browser `localStorage` cache. Every call fails outside the browser build.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageCache;

impl ProfileCache for LocalStorageCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        #[cfg(feature = "csr")]
        {
            crate::util::ui_persistence::storage()?
                .get_item(key)
                .map_err(|_| CacheError::Read { key: key.to_owned() })
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
            Err(CacheError::Unavailable)
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        #[cfg(feature = "csr")]
        {
            crate::util::ui_persistence::storage()?
                .set_item(key, value)
                .map_err(|_| CacheError::Write { key: key.to_owned() })
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (key, value);
            Err(CacheError::Unavailable)
        }
    }
}

/// In-process cache for native builds and tests.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProfileCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
