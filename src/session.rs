//! Session store
//!
//! One `Session` lives for the whole run of the portal. It is loaded from
//! storage at startup and writes each key back as soon as it changes.
//! Storage failures are logged and otherwise ignored; a broken store
//! degrades to a guest session with default settings.

use serde::{Deserialize, Serialize};

use crate::nav::Route;
use crate::settings::{Settings, SettingsUpdate};
use crate::storage::KeyValueStore;

/// Storage keys
pub const USER_KEY: &str = "gp_user";
pub const NICKNAME_KEY: &str = "gp_nickname";
pub const SETTINGS_KEY: &str = "gp_settings";

/// Name shown when no nickname is set
pub const GUEST_NAME: &str = "Guest";

/// The single local account.
///
/// The password is kept in plaintext so sign-in can compare it locally.
/// That is only acceptable because nothing leaves the browser; it is not a
/// credential store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Read and decode the stored account, if any
pub fn load_user<S: KeyValueStore + ?Sized>(store: &S) -> Option<User> {
    let raw = match store.get(USER_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("Failed to read stored user: {}", e);
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(user) => Some(user),
        Err(e) => {
            log::warn!("Ignoring malformed stored user: {}", e);
            None
        }
    }
}

/// Process-wide session state
#[derive(Debug)]
pub struct Session<S: KeyValueStore> {
    store: S,
    user: Option<User>,
    nickname: String,
    settings: Settings,
    game_active: bool,
    pending_navigation: Option<Route>,
}

impl<S: KeyValueStore> Session<S> {
    /// Restore the session from storage, falling back to defaults
    pub fn load(store: S) -> Self {
        let user = load_user(&store);

        let nickname = match store.get(NICKNAME_KEY) {
            Ok(Some(nick)) if !nick.is_empty() => nick,
            Ok(_) => user.as_ref().map(|u| u.username.clone()).unwrap_or_default(),
            Err(e) => {
                log::warn!("Failed to read nickname: {}", e);
                String::new()
            }
        };

        let settings = match store.get(SETTINGS_KEY) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring malformed settings: {}", e);
                Settings::default()
            }),
            Ok(None) => Settings::default(),
            Err(e) => {
                log::warn!("Failed to read settings: {}", e);
                Settings::default()
            }
        };

        log::info!(
            "Session loaded ({})",
            if user.is_some() { "signed in" } else { "guest" }
        );

        Self {
            store,
            user,
            nickname,
            settings,
            game_active: false,
            pending_navigation: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// Name to show in the score bar
    pub fn display_name(&self) -> &str {
        if self.nickname.is_empty() {
            GUEST_NAME
        } else {
            &self.nickname
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_game_active(&self) -> bool {
        self.game_active
    }

    pub fn pending_navigation(&self) -> Option<Route> {
        self.pending_navigation
    }

    pub fn set_user(&mut self, user: Option<User>) {
        self.user = user;
        self.persist_user();
    }

    pub fn set_nickname(&mut self, nickname: impl Into<String>) {
        self.nickname = nickname.into();
        self.persist_nickname();
    }

    pub fn update_settings(&mut self, update: &SettingsUpdate) {
        self.settings.apply(update);
        self.persist_settings();
    }

    pub fn toggle_theme(&mut self) {
        self.settings.theme = self.settings.theme.toggled();
        self.persist_settings();
    }

    pub fn set_game_active(&mut self, active: bool) {
        if self.game_active != active {
            log::debug!("Game active: {}", active);
        }
        self.game_active = active;
    }

    pub fn set_pending_navigation(&mut self, target: Option<Route>) {
        self.pending_navigation = target;
    }

    pub fn take_pending_navigation(&mut self) -> Option<Route> {
        self.pending_navigation.take()
    }

    /// Forget the account and nickname; settings are kept
    pub fn logout(&mut self) {
        self.user = None;
        self.nickname.clear();
        self.game_active = false;
        self.persist_user();
        self.persist_nickname();
        log::info!("Logged out");
    }

    fn persist_user(&mut self) {
        let result = match &self.user {
            Some(user) => match serde_json::to_string(user) {
                Ok(json) => self.store.set(USER_KEY, &json),
                Err(e) => {
                    log::warn!("Failed to encode user: {}", e);
                    return;
                }
            },
            None => self.store.remove(USER_KEY),
        };
        if let Err(e) = result {
            log::warn!("Failed to persist user: {}", e);
        }
    }

    fn persist_nickname(&mut self) {
        let result = if self.nickname.is_empty() {
            self.store.remove(NICKNAME_KEY)
        } else {
            self.store.set(NICKNAME_KEY, &self.nickname)
        };
        if let Err(e) = result {
            log::warn!("Failed to persist nickname: {}", e);
        }
    }

    fn persist_settings(&mut self) {
        match serde_json::to_string(&self.settings) {
            Ok(json) => {
                if let Err(e) = self.store.set(SETTINGS_KEY, &json) {
                    log::warn!("Failed to persist settings: {}", e);
                }
            }
            Err(e) => log::warn!("Failed to encode settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Theme;
    use crate::storage::{MemoryStore, StorageError};

    /// Store whose every operation fails
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable)
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    fn ada() -> User {
        User {
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "hunter2".to_string(),
        }
    }

    #[test]
    fn test_fresh_session_is_guest() {
        let session = Session::load(MemoryStore::new());
        assert!(!session.is_authenticated());
        assert_eq!(session.display_name(), "Guest");
        assert_eq!(session.settings(), &Settings::default());
        assert!(!session.is_game_active());
        assert_eq!(session.pending_navigation(), None);
    }

    #[test]
    fn test_mutations_persist() {
        let mut session = Session::load(MemoryStore::new());
        session.set_user(Some(ada()));
        session.set_nickname("Countess");
        session.toggle_theme();

        let restored = Session::load(session.store().clone());
        assert_eq!(restored.user(), Some(&ada()));
        assert_eq!(restored.display_name(), "Countess");
        assert_eq!(restored.settings().theme, Theme::Dark);
    }

    #[test]
    fn test_nickname_falls_back_to_username() {
        let mut store = MemoryStore::new();
        let json = serde_json::to_string(&ada()).expect("encode");
        store.set(USER_KEY, &json).expect("set");

        let session = Session::load(store);
        assert!(session.is_authenticated());
        assert_eq!(session.nickname(), "ada");
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let mut store = MemoryStore::new();
        store.set(USER_KEY, "{not json").expect("set");
        store.set(SETTINGS_KEY, "[1, 2").expect("set");

        let session = Session::load(store);
        assert!(!session.is_authenticated());
        assert_eq!(session.settings(), &Settings::default());
        assert_eq!(session.display_name(), "Guest");
    }

    #[test]
    fn test_broken_store_degrades_to_guest() {
        let mut session = Session::load(BrokenStore);
        assert!(!session.is_authenticated());

        // Writes fail quietly and in-memory state still updates
        session.set_nickname("ada");
        session.update_settings(&SettingsUpdate {
            sound_enabled: Some(false),
            ..Default::default()
        });
        assert_eq!(session.display_name(), "ada");
        assert!(!session.settings().sound_enabled);
    }

    #[test]
    fn test_logout_clears_account() {
        let mut session = Session::load(MemoryStore::new());
        session.set_user(Some(ada()));
        session.set_nickname("ada");
        session.set_game_active(true);

        session.logout();
        assert!(!session.is_authenticated());
        assert!(!session.is_game_active());
        assert_eq!(session.display_name(), "Guest");
        assert_eq!(session.store().get(USER_KEY), Ok(None));
        assert_eq!(session.store().get(NICKNAME_KEY), Ok(None));
    }
}
