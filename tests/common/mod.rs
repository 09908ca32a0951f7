//! Shared fakes for the integration suites.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use tabscrub::base::{CleanupError, CleanupType, CookieStoreId, FrameId, TabId};
use tabscrub::platform::{
    BrowsingDataRemover, CookieStores, DataTypeSet, EnumeratingFrames, EnumeratingStores,
    FrameEnumerator, HistoryItem, HistoryStore, RemovalScope, Removing, Searching, TabDescriptor,
};
use tabscrub::rules::RuleManager;
use tabscrub::tabs::{IncognitoWatcher, TabWatcherListener};

pub const DEFAULT_STORE: &str = "firefox-default";

pub fn store(id: &str) -> CookieStoreId {
    CookieStoreId::new(id)
}

pub fn tab(id: TabId, url: &str, store_id: &str) -> TabDescriptor {
    TabDescriptor {
        id,
        url: Some(url.to_string()),
        cookie_store_id: Some(store(store_id)),
        incognito: false,
    }
}

pub fn incognito_tab(id: TabId, url: &str, store_id: &str) -> TabDescriptor {
    TabDescriptor {
        incognito: true,
        ..tab(id, url, store_id)
    }
}

/// Frame enumerator backed by a per-tab map; unknown tabs report only
/// the root frame.
#[derive(Default)]
pub struct FakeFrames {
    pub frames: Mutex<HashMap<TabId, Vec<FrameId>>>,
}

impl FakeFrames {
    pub fn set(&self, tab_id: TabId, frames: Vec<FrameId>) {
        self.frames.lock().unwrap().insert(tab_id, frames);
    }
}

impl FrameEnumerator for FakeFrames {
    fn frame_ids(&self, tab_id: TabId) -> EnumeratingFrames {
        let live = self
            .frames
            .lock()
            .unwrap()
            .get(&tab_id)
            .cloned()
            .unwrap_or_else(|| vec![0]);
        Box::pin(async move { Ok(live) })
    }
}

/// Records enter/leave notifications as (store, hostname) pairs.
#[derive(Default)]
pub struct RecordingListener {
    pub enters: Mutex<Vec<(String, String)>>,
    pub leaves: Mutex<Vec<(String, String)>>,
}

impl RecordingListener {
    pub fn enters(&self) -> Vec<(String, String)> {
        self.enters.lock().unwrap().clone()
    }

    pub fn leaves(&self) -> Vec<(String, String)> {
        self.leaves.lock().unwrap().clone()
    }
}

impl TabWatcherListener for RecordingListener {
    fn on_domain_enter(&self, cookie_store_id: &CookieStoreId, hostname: &str) {
        self.enters
            .lock()
            .unwrap()
            .push((cookie_store_id.to_string(), hostname.to_string()));
    }

    fn on_domain_leave(&self, cookie_store_id: &CookieStoreId, hostname: &str) {
        self.leaves
            .lock()
            .unwrap()
            .push((cookie_store_id.to_string(), hostname.to_string()));
    }
}

/// Rule evaluator driven by a per-domain classification map. Unlisted
/// domains classify as `Leave`.
#[derive(Default)]
pub struct FakeRules {
    pub classifications: Mutex<HashMap<String, CleanupType>>,
    pub protect_open_on_clean_all: Mutex<bool>,
}

impl FakeRules {
    pub fn classify_as(&self, domain: &str, cleanup_type: CleanupType) {
        self.classifications
            .lock()
            .unwrap()
            .insert(domain.to_string(), cleanup_type);
    }
}

impl RuleManager for FakeRules {
    fn classify(
        &self,
        domain: &str,
        _ignore_startup: bool,
        _protect_open_domains: bool,
    ) -> CleanupType {
        self.classifications
            .lock()
            .unwrap()
            .get(domain)
            .copied()
            .unwrap_or(CleanupType::Leave)
    }

    fn is_domain_protected(&self, domain: &str, ignore_startup: bool) -> bool {
        match self.classify(domain, ignore_startup, false) {
            CleanupType::Never => true,
            CleanupType::Startup => !ignore_startup,
            _ => false,
        }
    }

    fn is_domain_instantly(&self, domain: &str, ignore_startup: bool) -> bool {
        self.classify(domain, ignore_startup, false) == CleanupType::Instantly
    }

    fn protect_open_domains(&self, startup: bool) -> bool {
        startup || *self.protect_open_on_clean_all.lock().unwrap()
    }
}

#[derive(Debug, Clone)]
pub struct RemovalCall {
    pub store_id: CookieStoreId,
    pub scope: RemovalScope,
    pub types: DataTypeSet,
}

/// Removal primitive that records every call; can be switched to reject.
#[derive(Default)]
pub struct FakeRemover {
    pub calls: Mutex<Vec<RemovalCall>>,
    pub fail: Mutex<bool>,
}

impl FakeRemover {
    pub fn calls(&self) -> Vec<RemovalCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }
}

impl BrowsingDataRemover for FakeRemover {
    fn remove(
        &self,
        store_id: &CookieStoreId,
        scope: RemovalScope,
        types: DataTypeSet,
    ) -> Removing {
        self.calls.lock().unwrap().push(RemovalCall {
            store_id: store_id.clone(),
            scope,
            types,
        });
        let fail = *self.fail.lock().unwrap();
        Box::pin(async move {
            if fail {
                Err(CleanupError::RemovalFailed("simulated rejection".into()))
            } else {
                Ok(())
            }
        })
    }
}

/// Fixed list of cookie stores.
pub struct FakeStores {
    pub ids: Vec<CookieStoreId>,
}

impl FakeStores {
    pub fn new(ids: &[&str]) -> Self {
        Self {
            ids: ids.iter().map(|id| store(id)).collect(),
        }
    }
}

impl Default for FakeStores {
    fn default() -> Self {
        Self::new(&[DEFAULT_STORE])
    }
}

impl CookieStores for FakeStores {
    fn default_cookie_store_id(&self) -> CookieStoreId {
        store(DEFAULT_STORE)
    }

    fn all_cookie_store_ids(&self) -> EnumeratingStores {
        let ids = self.ids.clone();
        Box::pin(async move { Ok(ids) })
    }
}

/// In-memory history store recording deletions.
#[derive(Default)]
pub struct FakeHistory {
    pub items: Arc<Mutex<Vec<HistoryItem>>>,
    pub deleted: Arc<Mutex<Vec<String>>>,
}

impl FakeHistory {
    pub fn with_urls(urls: &[&str]) -> Self {
        let history = Self::default();
        let mut items = history.items.lock().unwrap();
        for url in urls {
            items.push(HistoryItem::new(*url));
        }
        drop(items);
        history
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> Vec<String> {
        self.items
            .lock()
            .unwrap()
            .iter()
            .map(|item| item.url.clone())
            .collect()
    }
}

impl HistoryStore for FakeHistory {
    fn search(&self, text: &str) -> Searching {
        let items = self.items.clone();
        let text = text.to_string();
        Box::pin(async move {
            Ok(items
                .lock()
                .unwrap()
                .iter()
                .filter(|item| text.is_empty() || item.url.contains(&text))
                .cloned()
                .collect())
        })
    }

    fn delete_url(&self, url: &str) -> Removing {
        let items = self.items.clone();
        let deleted = self.deleted.clone();
        let url = url.to_string();
        Box::pin(async move {
            items.lock().unwrap().retain(|item| item.url != url);
            deleted.lock().unwrap().push(url);
            Ok(())
        })
    }
}

/// Incognito watcher with a fixed set of private store ids.
#[derive(Default)]
pub struct FakeIncognito {
    pub stores: HashSet<String>,
}

impl FakeIncognito {
    pub fn with_stores(ids: &[&str]) -> Self {
        Self {
            stores: ids.iter().map(|id| id.to_string()).collect(),
        }
    }
}

impl IncognitoWatcher for FakeIncognito {
    fn has_cookie_store(&self, cookie_store_id: &CookieStoreId) -> bool {
        self.stores.contains(cookie_store_id.as_str())
    }

    fn has_tab(&self, _tab_id: TabId) -> bool {
        false
    }
}
