//! Typed settings with JSON persistence.
//!
//! Holds the switches that gate every cleanup trigger plus the persisted
//! pending-domain sets, one per storage category. Persistence is
//! JSON-on-disk; construct with [`Settings::in_memory`] when no durable
//! storage is wanted (tests, ephemeral sessions).

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use serde::{Deserialize, Serialize};

use crate::base::{CleanupError, StorageKind};

/// Per-category cleanup switches.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CategorySettings {
    /// Honor rules during a startup pass (instead of erasing everything).
    pub startup_apply_rules: bool,
    /// Honor rules during a manual clean-all pass.
    pub clean_all_apply_rules: bool,
    /// Clean this category when a domain is left.
    pub domain_leave: bool,
}

impl Default for CategorySettings {
    fn default() -> Self {
        Self {
            startup_apply_rules: true,
            clean_all_apply_rules: true,
            domain_leave: false,
        }
    }
}

/// The full serializable settings state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsData {
    /// Master switch for all domain-leave cleanup.
    pub domain_leave_enabled: bool,
    /// Protect open domains during clean-all passes. Startup passes
    /// protect them unconditionally.
    pub clean_all_protect_open_domains: bool,
    /// Master switch for instant cleanup on visit.
    pub instantly_enabled: bool,
    /// Instantly delete history entries on visit.
    pub instantly_history: bool,
    /// Consult rules before instant history deletion.
    pub instantly_history_apply_rules: bool,

    pub local_storage: CategorySettings,
    pub indexed_db: CategorySettings,
    pub service_workers: CategorySettings,
    pub history: CategorySettings,

    /// Pending-domain sets: hostname -> marker, per storage category.
    /// Presence means the hostname is queued for eventual cleanup.
    pub domains_to_clean: HashMap<StorageKind, HashMap<String, bool>>,
}

impl Default for SettingsData {
    fn default() -> Self {
        Self {
            domain_leave_enabled: false,
            clean_all_protect_open_domains: true,
            instantly_enabled: false,
            instantly_history: false,
            instantly_history_apply_rules: true,
            local_storage: CategorySettings::default(),
            indexed_db: CategorySettings::default(),
            service_workers: CategorySettings::default(),
            history: CategorySettings::default(),
            domains_to_clean: HashMap::new(),
        }
    }
}

/// Thread-safe settings handle with optional file persistence.
pub struct Settings {
    data: Mutex<SettingsData>,
    path: Option<PathBuf>,
}

impl Settings {
    /// Settings with default values and no durable storage.
    pub fn in_memory() -> Self {
        Self::with_data(SettingsData::default())
    }

    /// Settings seeded with explicit values and no durable storage.
    pub fn with_data(data: SettingsData) -> Self {
        Self {
            data: Mutex::new(data),
            path: None,
        }
    }

    /// Open settings backed by a JSON file, loading it if it exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CleanupError> {
        let path = path.into();
        let data = if path.exists() {
            Self::load(&path)?
        } else {
            SettingsData::default()
        };
        Ok(Self {
            data: Mutex::new(data),
            path: Some(path),
        })
    }

    fn load(path: &Path) -> Result<SettingsData, CleanupError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Persist the current state to the backing file, if any. Serializes
    /// a snapshot so the lock is not held across file I/O.
    pub fn save(&self) -> Result<(), CleanupError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&self.snapshot())?;
        fs::write(path, json)?;
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SettingsData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clone of the full settings state.
    pub fn snapshot(&self) -> SettingsData {
        self.lock().clone()
    }

    /// Mutate the settings state in place. Callers persist with [`save`].
    ///
    /// [`save`]: Settings::save
    pub fn update(&self, f: impl FnOnce(&mut SettingsData)) {
        f(&mut self.lock());
    }

    pub fn domain_leave_enabled(&self) -> bool {
        self.lock().domain_leave_enabled
    }

    pub fn clean_all_protect_open_domains(&self) -> bool {
        self.lock().clean_all_protect_open_domains
    }

    pub fn instantly_enabled(&self) -> bool {
        self.lock().instantly_enabled
    }

    pub fn instantly_history(&self) -> bool {
        self.lock().instantly_history
    }

    pub fn instantly_history_apply_rules(&self) -> bool {
        self.lock().instantly_history_apply_rules
    }

    /// Switches for a hostname-addressable storage category.
    pub fn category(&self, kind: StorageKind) -> CategorySettings {
        let data = self.lock();
        match kind {
            StorageKind::LocalStorage => data.local_storage,
            StorageKind::IndexedDb => data.indexed_db,
            StorageKind::ServiceWorkers => data.service_workers,
        }
    }

    /// Switches for the history category.
    pub fn history_category(&self) -> CategorySettings {
        self.lock().history
    }

    /// Queue a hostname for eventual cleanup in the given category.
    pub fn mark_pending(&self, kind: StorageKind, hostname: &str) {
        self.lock()
            .domains_to_clean
            .entry(kind)
            .or_default()
            .insert(hostname.to_string(), true);
    }

    /// Drop a hostname from the pending set. Absent entries are a no-op.
    pub fn unmark_pending(&self, kind: StorageKind, hostname: &str) {
        if let Some(set) = self.lock().domains_to_clean.get_mut(&kind) {
            set.remove(hostname);
        }
    }

    pub fn is_pending(&self, kind: StorageKind, hostname: &str) -> bool {
        self.lock()
            .domains_to_clean
            .get(&kind)
            .is_some_and(|set| set.contains_key(hostname))
    }

    /// All hostnames currently queued in the given category.
    pub fn pending_domains(&self, kind: StorageKind) -> Vec<String> {
        self.lock()
            .domains_to_clean
            .get(&kind)
            .map(|set| set.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Empty the pending set for the given category.
    pub fn clear_pending(&self, kind: StorageKind) {
        self.lock().domains_to_clean.remove(&kind);
    }
}
