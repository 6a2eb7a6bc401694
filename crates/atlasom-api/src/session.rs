// Session-scoped key/value store
//
// Holds the handful of values that live for one operator session: the auth
// token, the Redfish session id, the active locale, the device model and the
// extension-module flag. Clearing the session drops everything except the
// locale, so a forced re-login keeps the operator's language.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator};

/// Keys understood by [`SessionStorage`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SessionKey {
    Token,
    SessionId,
    Locale,
    Model,
    HasExtension,
}

/// Thread-safe session store shared between the client and its callers.
///
/// Lock guards are never held across an `.await`.
#[derive(Debug, Default)]
pub struct SessionStorage {
    entries: RwLock<HashMap<SessionKey, String>>,
}

/// Serializable copy of a [`SessionStorage`], used to persist a session
/// between CLI invocations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_extension: Option<String>,
}

impl SessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a persisted snapshot.
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        let storage = Self::new();
        storage.restore(snapshot);
        storage
    }

    // ── Generic access ───────────────────────────────────────────────

    pub fn get(&self, key: SessionKey) -> Option<String> {
        self.entries
            .read()
            .expect("session lock poisoned")
            .get(&key)
            .cloned()
    }

    pub fn set(&self, key: SessionKey, value: impl Into<String>) {
        self.entries
            .write()
            .expect("session lock poisoned")
            .insert(key, value.into());
    }

    pub fn remove(&self, key: SessionKey) -> Option<String> {
        self.entries
            .write()
            .expect("session lock poisoned")
            .remove(&key)
    }

    /// Drop every entry except the locale.
    pub fn clear(&self) {
        self.entries
            .write()
            .expect("session lock poisoned")
            .retain(|key, _| *key == SessionKey::Locale);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().expect("session lock poisoned").is_empty()
    }

    // ── Typed accessors ──────────────────────────────────────────────

    pub fn token(&self) -> Option<String> {
        self.get(SessionKey::Token)
    }

    pub fn session_id(&self) -> Option<String> {
        self.get(SessionKey::SessionId)
    }

    pub fn locale(&self) -> Option<String> {
        self.get(SessionKey::Locale)
    }

    pub fn model(&self) -> Option<String> {
        self.get(SessionKey::Model)
    }

    /// `true` once an extension module has been detected on the device.
    pub fn has_extension(&self) -> bool {
        self.get(SessionKey::HasExtension)
            .is_some_and(|v| v == "true")
    }

    pub fn set_has_extension(&self, present: bool) {
        self.set(SessionKey::HasExtension, present.to_string());
    }

    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    // ── Persistence ──────────────────────────────────────────────────

    pub fn snapshot(&self) -> SessionSnapshot {
        let entries = self.entries.read().expect("session lock poisoned");
        SessionSnapshot {
            token: entries.get(&SessionKey::Token).cloned(),
            session_id: entries.get(&SessionKey::SessionId).cloned(),
            locale: entries.get(&SessionKey::Locale).cloned(),
            model: entries.get(&SessionKey::Model).cloned(),
            has_extension: entries.get(&SessionKey::HasExtension).cloned(),
        }
    }

    /// Replace the store's contents with `snapshot`.
    pub fn restore(&self, snapshot: SessionSnapshot) {
        let values = [
            (SessionKey::Token, snapshot.token),
            (SessionKey::SessionId, snapshot.session_id),
            (SessionKey::Locale, snapshot.locale),
            (SessionKey::Model, snapshot.model),
            (SessionKey::HasExtension, snapshot.has_extension),
        ];
        let mut entries = self.entries.write().expect("session lock poisoned");
        entries.clear();
        for (key, value) in values {
            if let Some(value) = value {
                entries.insert(key, value);
            }
        }
    }

    /// Every key currently set, in declaration order.
    pub fn keys(&self) -> Vec<SessionKey> {
        let entries = self.entries.read().expect("session lock poisoned");
        SessionKey::iter().filter(|k| entries.contains_key(k)).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;

    use super::*;

    fn populated() -> SessionStorage {
        let storage = SessionStorage::new();
        storage.set(SessionKey::Token, "tok");
        storage.set(SessionKey::SessionId, "abc");
        storage.set(SessionKey::Locale, "zh");
        storage.set(SessionKey::Model, "Atlas 500");
        storage.set_has_extension(true);
        storage
    }

    #[test]
    fn clear_preserves_locale_only() {
        let storage = populated();
        storage.clear();
        assert_eq!(storage.keys(), vec![SessionKey::Locale]);
        assert_eq!(storage.locale().as_deref(), Some("zh"));
        assert!(!storage.is_logged_in());
        assert!(!storage.has_extension());
    }

    #[test]
    fn clear_on_store_without_locale_empties_it() {
        let storage = SessionStorage::new();
        storage.set(SessionKey::Token, "tok");
        storage.clear();
        assert!(storage.is_empty());
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let storage = populated();
        let json = serde_json::to_string(&storage.snapshot()).unwrap();
        let restored = SessionStorage::from_snapshot(serde_json::from_str(&json).unwrap());
        assert_eq!(restored.snapshot(), storage.snapshot());
        assert_eq!(restored.model().as_deref(), Some("Atlas 500"));
    }

    #[test]
    fn restore_replaces_existing_entries() {
        let storage = populated();
        storage.restore(SessionSnapshot {
            locale: Some("en".into()),
            ..SessionSnapshot::default()
        });
        assert_eq!(storage.keys(), vec![SessionKey::Locale]);
    }

    #[test]
    fn key_names_are_snake_case() {
        assert_eq!(SessionKey::HasExtension.as_ref(), "has_extension");
        assert_eq!(SessionKey::from_str("session_id").unwrap(), SessionKey::SessionId);
    }
}
