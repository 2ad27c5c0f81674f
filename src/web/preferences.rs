//! `localStorage`-backed [`PreferenceStore`].

use crate::theme::PreferenceStore;
use web_sys::{Storage, Window};

/// Persists preferences in `window.localStorage`.
///
/// When storage is unavailable (disabled cookies, sandboxed frames) loads return
/// nothing and saves are dropped.
#[derive(Debug, Clone)]
pub struct LocalStoragePreferences {
    storage: Option<Storage>,
}

impl LocalStoragePreferences {
    #[must_use]
    pub fn new(window: &Window) -> Self {
        let storage = window.local_storage().ok().flatten();
        if storage.is_none() {
            tracing::debug!("localStorage unavailable, theme will not persist");
        }
        Self { storage }
    }
}

impl PreferenceStore for LocalStoragePreferences {
    fn load(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn save(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.set_item(key, value) {
                tracing::debug!(%key, error = ?e, "preference not saved");
            }
        }
    }
}
