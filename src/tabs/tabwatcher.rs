//! Tab aggregation and domain enter/leave derivation.

use std::sync::{Arc, PoisonError, RwLock, Weak};

use dashmap::DashMap;

use crate::base::{CookieStoreId, FrameId, TabId, ROOT_FRAME_ID};
use crate::domain;
use crate::platform::{FrameEnumerator, TabDescriptor};
use crate::tabs::{TabInfo, TabWatcherListener};

/// Single source of truth for "is domain X currently open, and in which
/// isolated browsing context".
///
/// All tab and navigation events are delivered serially by the hosting
/// platform; the maps use `DashMap` only so handlers can run on `&self`.
pub struct TabWatcher {
    tab_infos: DashMap<TabId, TabInfo>,
    tabs_by_store: DashMap<CookieStoreId, Vec<TabId>>,
    default_cookie_store_id: CookieStoreId,
    frames: Arc<dyn FrameEnumerator>,
    listeners: RwLock<Vec<Weak<dyn TabWatcherListener>>>,
}

impl TabWatcher {
    pub fn new(default_cookie_store_id: CookieStoreId, frames: Arc<dyn FrameEnumerator>) -> Self {
        Self {
            tab_infos: DashMap::new(),
            tabs_by_store: DashMap::new(),
            default_cookie_store_id,
            frames,
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Register an observer. The subscription lives as long as the
    /// observer itself; dead entries are pruned on the next registration.
    pub fn add_listener(&self, listener: Weak<dyn TabWatcherListener>) {
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        listeners.retain(|weak| weak.strong_count() > 0);
        listeners.push(listener);
    }

    /// Seed tracking state for tabs that were already open at startup.
    ///
    /// Enter notifications fire for the seeded hostnames; there is nothing
    /// to leave from, so no leave events are emitted.
    pub fn initialize_existing_tabs(&self, tabs: &[TabDescriptor]) {
        for tab in tabs {
            self.on_tab_created(tab);
        }
    }

    /// Track a newly created tab. Private tabs are ignored entirely.
    pub fn on_tab_created(&self, tab: &TabDescriptor) {
        if tab.incognito {
            return;
        }
        let store = tab
            .cookie_store_id
            .clone()
            .unwrap_or_else(|| self.default_cookie_store_id.clone());
        let hostname = tab
            .url
            .as_deref()
            .map(domain::get_valid_hostname)
            .unwrap_or_default();

        // A re-created id replaces the old entry; drop its stale index
        // entry so the old store never reads the new tab's hostnames.
        let old_store = self
            .tab_infos
            .get(&tab.id)
            .map(|info| info.cookie_store_id().clone());
        if let Some(old_store) = old_store {
            if old_store != store {
                if let Some(mut list) = self.tabs_by_store.get_mut(&old_store) {
                    list.retain(|id| *id != tab.id);
                }
            }
        }

        // The enter check runs before the TabInfo is registered so the
        // new tab cannot suppress its own enter event.
        self.check_domain_enter(&store, &hostname);

        let info = TabInfo::new(tab.id, &hostname, store.clone());
        self.tab_infos.insert(tab.id, info);
        let mut list = self.tabs_by_store.entry(store).or_default();
        if !list.contains(&tab.id) {
            list.push(tab.id);
        }
    }

    /// Stop tracking a tab and emit leaves for the hostnames it alone
    /// held. Removing an untracked tab is a no-op.
    pub fn on_tab_removed(&self, tab_id: TabId) {
        let Some((_, mut info)) = self.tab_infos.remove(&tab_id) else {
            return;
        };
        let store = info.cookie_store_id().clone();
        if let Some(mut list) = self.tabs_by_store.get_mut(&store) {
            list.retain(|id| *id != tab_id);
        }
        let lost = info.commit_navigation(ROOT_FRAME_ID, "");
        for hostname in lost {
            self.check_domain_leave(&store, &hostname);
        }
    }

    /// A frame is about to navigate. The previous hostname becomes a
    /// leave candidate but stays contained until commit.
    pub fn prepare_navigation(&self, tab_id: TabId, frame_id: FrameId, hostname: &str) {
        let prepared = self.tab_infos.get_mut(&tab_id).map(|mut info| {
            let store = info.cookie_store_id().clone();
            (store, info.prepare_navigation(frame_id, hostname))
        });
        if let Some((store, prev)) = prepared {
            self.check_domain_leave(&store, &prev);
        }
    }

    /// A frame committed a navigation. Checks domain-enter first, then
    /// emits domain-leave for every hostname the commit removed.
    pub fn commit_navigation(&self, tab_id: TabId, frame_id: FrameId, hostname: &str) {
        let Some(store) = self
            .tab_infos
            .get(&tab_id)
            .map(|info| info.cookie_store_id().clone())
        else {
            return;
        };
        self.check_domain_enter(&store, hostname);
        let Some(lost) = self
            .tab_infos
            .get_mut(&tab_id)
            .map(|mut info| info.commit_navigation(frame_id, hostname))
        else {
            return;
        };
        for hostname in lost {
            self.check_domain_leave(&store, &hostname);
        }
    }

    /// Navigation settled: detect sub-frames removed without an explicit
    /// event and treat their hostnames as left. Overlapping calls for the
    /// same tab coalesce into one check.
    pub async fn complete_navigation(&self, tab_id: TabId) {
        let store = {
            let Some(mut info) = self.tab_infos.get_mut(&tab_id) else {
                return;
            };
            if !info.begin_dead_frames_check() {
                return;
            }
            info.cookie_store_id().clone()
        };

        let live = match self.frames.frame_ids(tab_id).await {
            Ok(live) => live,
            Err(e) => {
                tracing::debug!(tab = tab_id, error = %e, "frame enumeration failed");
                if let Some(mut info) = self.tab_infos.get_mut(&tab_id) {
                    info.cancel_dead_frames_check();
                }
                return;
            }
        };

        let lost = {
            let Some(mut info) = self.tab_infos.get_mut(&tab_id) else {
                return;
            };
            info.finish_dead_frames_check(&live)
        };
        for hostname in lost {
            self.check_domain_leave(&store, &hostname);
        }
    }

    fn check_domain_enter(&self, store: &CookieStoreId, hostname: &str) {
        if !hostname.is_empty() && !self.cookie_store_contains_domain(store, hostname, false) {
            tracing::debug!(store = %store, domain = %hostname, "domain enter");
            self.emit(|listener| listener.on_domain_enter(store, hostname));
        }
    }

    // Lookahead stays on for leaves: a frame mid-navigation back to the
    // hostname still counts as containing it, so same-domain navigation
    // never produces a leave/enter pair.
    fn check_domain_leave(&self, store: &CookieStoreId, hostname: &str) {
        if !hostname.is_empty() && !self.cookie_store_contains_domain(store, hostname, true) {
            tracing::debug!(store = %store, domain = %hostname, "domain leave");
            self.emit(|listener| listener.on_domain_leave(store, hostname));
        }
    }

    fn emit(&self, notify: impl Fn(&dyn TabWatcherListener)) {
        let listeners = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        for weak in listeners.iter() {
            if let Some(listener) = weak.upgrade() {
                notify(&*listener);
            }
        }
    }

    /// Whether any tab in the given cookie store holds the hostname.
    pub fn cookie_store_contains_domain(
        &self,
        store: &CookieStoreId,
        hostname: &str,
        check_next: bool,
    ) -> bool {
        let Some(ids) = self.tabs_by_store.get(store) else {
            return false;
        };
        ids.iter().any(|id| {
            self.tab_infos
                .get(id)
                .is_some_and(|info| info.contains(hostname, check_next))
        })
    }

    /// First-party-domain variant of the store-scoped check. `deep`
    /// inspects every frame; otherwise only root frames are matched.
    pub fn cookie_store_contains_domain_fp(
        &self,
        store: &CookieStoreId,
        domain_fp: &str,
        deep: bool,
    ) -> bool {
        let Some(ids) = self.tabs_by_store.get(store) else {
            return false;
        };
        ids.iter().any(|id| {
            self.tab_infos.get(id).is_some_and(|info| {
                if deep {
                    info.contains_hostname_fp(domain_fp)
                } else {
                    info.match_hostname_fp(domain_fp)
                }
            })
        })
    }

    /// Whether any tracked tab, in any cookie store, holds the hostname.
    ///
    /// Used for the global "protect open domains" check. Store isolation
    /// is deliberately ignored here: shared host machinery makes
    /// per-store storage isolation unreliable for this guarantee, so an
    /// open tab anywhere prevents cleanup anywhere.
    pub fn contains_domain(&self, hostname: &str) -> bool {
        self.tab_infos
            .iter()
            .any(|entry| entry.contains(hostname, true))
    }

    /// Whether a cookie set for `cookie_domain` is third-party relative
    /// to the document in the tab's root frame.
    pub fn is_third_party_cookie_on_tab(&self, tab_id: TabId, cookie_domain: &str) -> bool {
        let Some(info) = self.tab_infos.get(&tab_id) else {
            return false;
        };
        !info.match_hostname_fp(&domain::first_party_cookie_domain(cookie_domain))
    }
}
