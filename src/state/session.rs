use crate::ui::theme::Theme;
use anyhow::{Context, Result};
use log::{debug, warn};
use pitchside_api::User;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const USER_KEY: &str = "pitchside.currentUser";
pub const THEME_KEY: &str = "pitchside.theme";

/// Durable key/value storage for the current-user snapshot and the theme
/// preference. Values are stored as serialized strings in a single JSON file
/// so a corrupted entry never poisons its neighbour.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist the user snapshot, or clear it when `None`.
    pub fn save_user(&self, user: Option<&User>) -> Result<()> {
        let Some(user) = user else {
            return self.clear();
        };
        let snapshot = serde_json::to_string(user).context("Failed to serialize user snapshot")?;
        let mut entries = self.read_entries();
        entries.insert(USER_KEY.to_string(), snapshot);
        self.write_entries(&entries)
    }

    /// Last saved snapshot. Missing or undecodable data is treated as absent.
    pub fn saved_user(&self) -> Option<User> {
        let raw = self.read_entries().remove(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("ignoring unreadable session snapshot: {e}");
                None
            }
        }
    }

    pub fn has_saved_user(&self) -> bool {
        self.saved_user().is_some()
    }

    /// Remove the user snapshot. Other keys survive.
    pub fn clear(&self) -> Result<()> {
        let mut entries = self.read_entries();
        if entries.remove(USER_KEY).is_none() {
            return Ok(());
        }
        self.write_entries(&entries)
    }

    pub fn theme(&self) -> Option<Theme> {
        self.read_entries().get(THEME_KEY).and_then(|raw| Theme::parse(raw))
    }

    pub fn save_theme(&self, theme: Theme) -> Result<()> {
        let mut entries = self.read_entries();
        entries.insert(THEME_KEY.to_string(), theme.as_str().to_string());
        self.write_entries(&entries)
    }

    fn read_entries(&self) -> BTreeMap<String, String> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!("no session file at {}: {e}", self.path.display());
                return BTreeMap::new();
            }
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!("session file {} is corrupt: {e}", self.path.display());
            BTreeMap::new()
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create session directory")?;
        }
        let payload = serde_json::to_string_pretty(entries).context("Failed to serialize session")?;
        fs::write(&self.path, payload)
            .with_context(|| format!("Failed to write session file {}", self.path.display()))
    }
}

/// `$XDG_CONFIG_HOME/pitchside/session.json`, falling back to `~/.config`.
pub fn default_session_path() -> PathBuf {
    if let Ok(config_dir) = std::env::var("XDG_CONFIG_HOME")
        && !config_dir.trim().is_empty()
    {
        return PathBuf::from(config_dir).join("pitchside").join("session.json");
    }
    if let Ok(home) = std::env::var("HOME")
        && !home.trim().is_empty()
    {
        return PathBuf::from(home)
            .join(".config")
            .join("pitchside")
            .join("session.json");
    }
    PathBuf::from("pitchside-session.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, SessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join("session.json"));
        (dir, store)
    }

    fn user(id: &str, name: &str) -> User {
        User { id: Some(id.into()), name: name.into(), ..User::default() }
    }

    #[test]
    fn saved_user_survives_a_new_store_instance() {
        let (_dir, store) = store();
        store.save_user(Some(&user("u1", "Ana"))).unwrap();

        let reopened = SessionStore::new(store.path().to_path_buf());
        assert_eq!(reopened.saved_user().map(|u| u.name), Some("Ana".to_string()));
    }

    #[test]
    fn saving_none_clears_the_snapshot() {
        let (_dir, store) = store();
        store.save_user(Some(&user("u1", "Ana"))).unwrap();
        store.save_user(None).unwrap();
        assert!(store.saved_user().is_none());
    }

    #[test]
    fn corrupt_snapshot_reads_as_absent() {
        let (_dir, store) = store();
        let mut entries = BTreeMap::new();
        entries.insert(USER_KEY.to_string(), "{not json".to_string());
        store.write_entries(&entries).unwrap();
        assert!(store.saved_user().is_none());
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let (_dir, store) = store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "garbage").unwrap();
        assert!(store.saved_user().is_none());
        assert!(store.theme().is_none());
    }

    #[test]
    fn clear_keeps_theme_preference() {
        let (_dir, store) = store();
        store.save_theme(Theme::Light).unwrap();
        store.save_user(Some(&user("u1", "Ana"))).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.saved_user().is_none());
        assert_eq!(store.theme(), Some(Theme::Light));
    }
}
