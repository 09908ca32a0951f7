//! Consumed browser primitives.
//!
//! Everything the engine needs from the hosting platform is expressed as
//! a trait here: browsing-data removal, history search/deletion, cookie
//! store enumeration, and frame enumeration. Implementations bridge to
//! the actual extension APIs; tests substitute fakes.
//!
//! # Design Notes
//!
//! - All trait methods take `&self` so a single bridge instance can serve
//!   concurrent removal passes.
//! - Async methods return boxed futures for trait object compatibility.

use std::{future::Future, pin::Pin};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::base::{CleanupError, CookieStoreId, FrameId, StorageKind, TabId};

/// Alias for the `Future` type returned by removal and deletion calls.
pub type Removing = Pin<Box<dyn Future<Output = Result<(), CleanupError>> + Send>>;

/// Alias for the `Future` type returned by a history search.
pub type Searching = Pin<Box<dyn Future<Output = Result<Vec<HistoryItem>, CleanupError>> + Send>>;

/// Alias for the `Future` type returned by cookie store enumeration.
pub type EnumeratingStores =
    Pin<Box<dyn Future<Output = Result<Vec<CookieStoreId>, CleanupError>> + Send>>;

/// Alias for the `Future` type returned by frame enumeration.
pub type EnumeratingFrames =
    Pin<Box<dyn Future<Output = Result<Vec<FrameId>, CleanupError>> + Send>>;

/// The browsing-data categories a removal request may cover.
///
/// Mirrors the platform's browsing-data type set: every flag set to true
/// is requested for erasure. Cleaners clear their own flag once they have
/// handled the category so the caller-side bulk pass skips it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTypeSet {
    pub cache: bool,
    pub cookies: bool,
    pub downloads: bool,
    pub form_data: bool,
    pub history: bool,
    pub indexed_db: bool,
    pub local_storage: bool,
    pub service_workers: bool,
}

impl DataTypeSet {
    /// True if any category is still requested.
    pub fn any(&self) -> bool {
        self.cache
            || self.cookies
            || self.downloads
            || self.form_data
            || self.history
            || self.indexed_db
            || self.local_storage
            || self.service_workers
    }

    /// Whether the given storage category is requested.
    pub fn contains_kind(&self, kind: StorageKind) -> bool {
        match kind {
            StorageKind::LocalStorage => self.local_storage,
            StorageKind::IndexedDb => self.indexed_db,
            StorageKind::ServiceWorkers => self.service_workers,
        }
    }

    /// Clear the request flag for the given storage category.
    pub fn clear_kind(&mut self, kind: StorageKind) {
        match kind {
            StorageKind::LocalStorage => self.local_storage = false,
            StorageKind::IndexedDb => self.indexed_db = false,
            StorageKind::ServiceWorkers => self.service_workers = false,
        }
    }

    /// A set requesting only the given storage category.
    pub fn only_kind(kind: StorageKind) -> Self {
        let mut set = Self::default();
        match kind {
            StorageKind::LocalStorage => set.local_storage = true,
            StorageKind::IndexedDb => set.indexed_db = true,
            StorageKind::ServiceWorkers => set.service_workers = true,
        }
        set
    }
}

/// Which origin classes a removal applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OriginTypes {
    pub unprotected_web: bool,
    pub protected_web: bool,
    pub extension: bool,
}

impl OriginTypes {
    /// Ordinary web content only, the scope every cleanup pass uses.
    pub fn unprotected_web() -> Self {
        Self {
            unprotected_web: true,
            protected_web: false,
            extension: false,
        }
    }
}

impl Default for OriginTypes {
    fn default() -> Self {
        Self::unprotected_web()
    }
}

/// Scope of a browsing-data removal call.
///
/// `hostnames: None` requests an unfiltered bulk removal; `Some(list)`
/// restricts the removal to exactly those hostnames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalScope {
    pub origin_types: OriginTypes,
    pub hostnames: Option<Vec<String>>,
}

impl RemovalScope {
    /// Hostname-filtered removal over unprotected web origins.
    pub fn hostnames(hostnames: Vec<String>) -> Self {
        Self {
            origin_types: OriginTypes::unprotected_web(),
            hostnames: Some(hostnames),
        }
    }

    /// Unfiltered removal over unprotected web origins.
    pub fn everything() -> Self {
        Self {
            origin_types: OriginTypes::unprotected_web(),
            hostnames: None,
        }
    }
}

/// A recorded history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryItem {
    pub url: String,
    pub visit_time: Option<OffsetDateTime>,
}

impl HistoryItem {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            visit_time: None,
        }
    }
}

/// Snapshot of an open tab, as delivered by tab platform events.
#[derive(Debug, Clone)]
pub struct TabDescriptor {
    pub id: TabId,
    pub url: Option<String>,
    pub cookie_store_id: Option<CookieStoreId>,
    pub incognito: bool,
}

/// The browser-level storage removal primitive.
///
/// `store_id` names the isolated browsing context the removal should be
/// scoped to. Current platforms cannot honor the scoping for
/// hostname-filtered removals (the filter applies across every store);
/// implementations accept the id so the call sites are ready once support
/// lands.
pub trait BrowsingDataRemover: Send + Sync {
    fn remove(&self, store_id: &CookieStoreId, scope: RemovalScope, types: DataTypeSet)
        -> Removing;
}

/// The browsing-history primitive.
///
/// History search is itself a query mechanism over recorded entries, so
/// the history cleaner needs no persisted pending set of its own.
pub trait HistoryStore: Send + Sync {
    /// Search recorded entries; an empty `text` matches everything.
    fn search(&self, text: &str) -> Searching;

    /// Delete every visit of the given URL.
    fn delete_url(&self, url: &str) -> Removing;
}

/// Enumerates the isolated browsing contexts known to the browser.
pub trait CookieStores: Send + Sync {
    /// The context tabs belong to when they carry no explicit store id.
    fn default_cookie_store_id(&self) -> CookieStoreId;

    fn all_cookie_store_ids(&self) -> EnumeratingStores;
}

/// Enumerates the frames currently alive in a tab.
///
/// Used by the dead-frames check: sub-frames can be removed without an
/// explicit navigation event, and their hostnames must still be treated
/// as left.
pub trait FrameEnumerator: Send + Sync {
    fn frame_ids(&self, tab_id: TabId) -> EnumeratingFrames;
}
