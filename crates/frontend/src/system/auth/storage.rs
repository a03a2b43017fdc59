//! Client-side session storage.
//!
//! Everything the session layer persists goes through [`SessionStorage`], so the
//! guard and the context can run against an in-memory store in tests.

use std::collections::HashMap;
use std::sync::Mutex;

use contracts::system::auth::UserInfo;
use web_sys::window;

/// Serialized `UserInfo` of the signed-in user
pub const USER_KEY: &str = "utilisateur";
pub const ACCESS_TOKEN_KEY: &str = "auth_access_token";
pub const REFRESH_TOKEN_KEY: &str = "auth_refresh_token";
pub const SELECTED_PROJECT_KEY: &str = "selected_project";

pub trait SessionStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str);
    fn remove_item(&self, key: &str);
}

/// `window.localStorage`. Any browser failure reads as an absent value.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn local_storage() -> Option<web_sys::Storage> {
        window()?.local_storage().ok()?
    }
}

impl SessionStorage for BrowserStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        Self::local_storage()?.get_item(key).ok()?
    }

    fn set_item(&self, key: &str, value: &str) {
        if let Some(storage) = Self::local_storage() {
            let _ = storage.set_item(key, value);
        }
    }

    fn remove_item(&self, key: &str) {
        if let Some(storage) = Self::local_storage() {
            let _ = storage.remove_item(key);
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage.set_item(key, value);
        storage
    }

    fn items(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.items().insert(key.to_string(), value.to_string());
    }

    fn remove_item(&self, key: &str) {
        self.items().remove(key);
    }
}

/// Raw session record as stored, without any validation
pub fn read_user(storage: &dyn SessionStorage) -> Option<String> {
    storage.get_item(USER_KEY)
}

pub fn write_user(storage: &dyn SessionStorage, user: &UserInfo) {
    match serde_json::to_string(user) {
        Ok(json) => storage.set_item(USER_KEY, &json),
        Err(e) => log::error!("Failed to serialize session record: {}", e),
    }
}

pub fn write_tokens(storage: &dyn SessionStorage, access_token: &str, refresh_token: &str) {
    storage.set_item(ACCESS_TOKEN_KEY, access_token);
    storage.set_item(REFRESH_TOKEN_KEY, refresh_token);
}

pub fn access_token(storage: &dyn SessionStorage) -> Option<String> {
    storage.get_item(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty())
}

pub fn refresh_token(storage: &dyn SessionStorage) -> Option<String> {
    storage.get_item(REFRESH_TOKEN_KEY).filter(|t| !t.is_empty())
}

/// Removes the session record, both tokens and the selected project
pub fn clear_session(storage: &dyn SessionStorage) {
    for key in [USER_KEY, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, SELECTED_PROJECT_KEY] {
        storage.remove_item(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::system::auth::{AccountStatus, Role};

    fn user() -> UserInfo {
        UserInfo {
            id: "7".into(),
            nom: "Haddad".into(),
            prenom: "Karim".into(),
            email: "karim@petro.dz".into(),
            role: Role::Expert,
            date_creation: "2024-01-10T09:00:00Z".into(),
            statut: AccountStatus::Active,
        }
    }

    #[test]
    fn test_write_then_read_user_record() {
        let storage = MemoryStorage::new();
        assert!(read_user(&storage).is_none());

        write_user(&storage, &user());
        let raw = read_user(&storage).unwrap();
        let parsed: UserInfo = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, user());
    }

    #[test]
    fn test_clear_session_removes_every_key() {
        let storage = MemoryStorage::new();
        write_user(&storage, &user());
        write_tokens(&storage, "access", "refresh");
        storage.set_item(SELECTED_PROJECT_KEY, "p-1");

        clear_session(&storage);

        for key in [USER_KEY, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, SELECTED_PROJECT_KEY] {
            assert!(storage.get_item(key).is_none(), "{} still present", key);
        }
    }

    #[test]
    fn test_empty_tokens_read_as_absent() {
        let storage = MemoryStorage::new();
        write_tokens(&storage, "", "");
        assert!(access_token(&storage).is_none());
        assert!(refresh_token(&storage).is_none());
    }
}
