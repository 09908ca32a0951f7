//! Shared orchestration for hostname-addressable storage categories.
//!
//! Local storage, indexed storage, and service workers all follow the
//! same lifecycle: a domain is queued the moment it is *seen* in a
//! non-private tab, and dropped from the queue only once a cleanup pass
//! has actually removed its data. Queuing an open domain is harmless
//! because deletion never runs while it is still open.

use std::sync::{Arc, Weak};

use futures::future::{join_all, BoxFuture};

use crate::base::{CleanupError, CleanupType, CookieStoreId, StorageKind};
use crate::cleaners::Cleaner;
use crate::domain;
use crate::platform::{
    BrowsingDataRemover, CookieStores, DataTypeSet, RemovalScope, TabDescriptor,
};
use crate::rules::RuleManager;
use crate::settings::Settings;
use crate::tabs::{IncognitoWatcher, TabWatcher, TabWatcherListener};

/// Cleaner for one hostname-addressable storage category.
pub struct StorageCleaner {
    kind: StorageKind,
    settings: Arc<Settings>,
    rules: Arc<dyn RuleManager>,
    stores: Arc<dyn CookieStores>,
    tab_watcher: Arc<TabWatcher>,
    incognito: Arc<dyn IncognitoWatcher>,
    remover: Arc<dyn BrowsingDataRemover>,
    /// Whether the platform can remove this category per hostname at
    /// all. When false, bulk removal short-circuits but bookkeeping
    /// still runs safely.
    supports_cleanup_by_hostname: bool,
}

impl StorageCleaner {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: StorageKind,
        settings: Arc<Settings>,
        rules: Arc<dyn RuleManager>,
        stores: Arc<dyn CookieStores>,
        tab_watcher: Arc<TabWatcher>,
        incognito: Arc<dyn IncognitoWatcher>,
        remover: Arc<dyn BrowsingDataRemover>,
        supports_cleanup_by_hostname: bool,
    ) -> Arc<Self> {
        Arc::new(Self {
            kind,
            settings,
            rules,
            stores,
            tab_watcher,
            incognito,
            remover,
            supports_cleanup_by_hostname,
        })
    }

    /// Seed the pending set from already-open tabs and subscribe to
    /// domain-enter notifications. Does nothing when the platform cannot
    /// remove this category by hostname.
    pub fn init(self: &Arc<Self>, tabs: &[TabDescriptor]) {
        if !self.supports_cleanup_by_hostname {
            return;
        }
        let default_store = self.stores.default_cookie_store_id();
        for tab in tabs {
            if tab.incognito {
                continue;
            }
            let Some(url) = &tab.url else {
                continue;
            };
            let hostname = domain::get_valid_hostname(url);
            if hostname.is_empty() {
                continue;
            }
            let store = tab.cookie_store_id.clone().unwrap_or_else(|| default_store.clone());
            self.on_domain_enter(&store, &hostname);
        }
        let weak: Weak<dyn TabWatcherListener> = Arc::downgrade(self) as Weak<dyn TabWatcherListener>;
        self.tab_watcher.add_listener(weak);
    }

    async fn do_clean(&self, types: &mut DataTypeSet, startup: bool) -> Result<(), CleanupError> {
        if !types.contains_kind(self.kind) || !self.supports_cleanup_by_hostname {
            return Ok(());
        }
        // Startup passes protect open domains unconditionally.
        let protect_open_domains = startup || self.settings.clean_all_protect_open_domains();
        let category = self.settings.category(self.kind);
        let apply_rules = if startup {
            category.startup_apply_rules
        } else {
            category.clean_all_apply_rules
        };

        if apply_rules {
            // Handled here; the caller's bulk pass must not also erase
            // this category, or protected domains would be lost.
            types.clear_kind(self.kind);
            let ids = self.stores.all_cookie_store_ids().await?;
            let hostnames = self.domains_to_clean(startup, protect_open_domains);
            if !hostnames.is_empty() {
                self.remove_from_domains_to_clean(&hostnames)?;
                let passes = ids.iter().map(|id| self.clean_hostnames(id, &hostnames));
                for result in join_all(passes).await {
                    result?;
                }
            }
            Ok(())
        } else {
            // No rule constraint for this trigger: the caller's
            // unfiltered removal erases everything, so the queue is moot.
            self.settings.clear_pending(self.kind);
            self.settings.save()
        }
    }

    async fn do_clean_domain_on_leave(
        &self,
        store_id: &CookieStoreId,
        domain: &str,
    ) -> Result<(), CleanupError> {
        if self.settings.domain_leave_enabled()
            && self.settings.category(self.kind).domain_leave
            && !self.is_storage_protected(domain)
        {
            self.do_clean_domain(store_id, domain).await?;
        }
        Ok(())
    }

    async fn do_clean_domain(
        &self,
        store_id: &CookieStoreId,
        domain: &str,
    ) -> Result<(), CleanupError> {
        let domains = vec![domain.to_string()];
        self.clean_hostnames(store_id, &domains).await?;
        self.remove_from_domains_to_clean(&domains)
    }

    /// Drop hostnames from the persisted pending set, keeping any that a
    /// tab still holds: the current attempt could not safely remove
    /// those, so they stay queued for a later pass.
    fn remove_from_domains_to_clean(&self, hostnames: &[String]) -> Result<(), CleanupError> {
        for hostname in hostnames {
            if !self.tab_watcher.contains_domain(hostname) {
                self.settings.unmark_pending(self.kind, hostname);
            }
        }
        self.settings.save()
    }

    async fn clean_hostnames(
        &self,
        store_id: &CookieStoreId,
        hostnames: &[String],
    ) -> Result<(), CleanupError> {
        // TODO: pass a real per-store filter once the platform supports
        // scoping hostname removal; today the filter applies across
        // every cookie store.
        if !self.supports_cleanup_by_hostname {
            return Ok(());
        }
        tracing::debug!(
            store = %store_id,
            category = %self.kind,
            count = hostnames.len(),
            "removing site data"
        );
        self.remover
            .remove(
                store_id,
                RemovalScope::hostnames(hostnames.to_vec()),
                DataTypeSet::only_kind(self.kind),
            )
            .await
    }

    fn is_domain_protected(
        &self,
        domain: &str,
        ignore_startup: bool,
        protect_open_domains: bool,
    ) -> bool {
        if protect_open_domains && self.tab_watcher.contains_domain(domain) {
            return true;
        }
        self.rules.is_domain_protected(domain, ignore_startup)
    }

    fn domains_to_clean(&self, ignore_startup: bool, protect_open_domains: bool) -> Vec<String> {
        self.settings
            .pending_domains(self.kind)
            .into_iter()
            .filter(|d| !self.is_domain_protected(d, ignore_startup, protect_open_domains))
            .collect()
    }

    /// Leave-triggered cleanup must not erase data the user expects to
    /// survive until startup or forever, and never data of a domain
    /// still open somewhere.
    fn is_storage_protected(&self, domain: &str) -> bool {
        if self.tab_watcher.contains_domain(domain) {
            return true;
        }
        matches!(
            self.rules.classify(domain, false, false),
            CleanupType::Never | CleanupType::Startup
        )
    }
}

impl TabWatcherListener for StorageCleaner {
    fn on_domain_enter(&self, cookie_store_id: &CookieStoreId, hostname: &str) {
        if self.incognito.has_cookie_store(cookie_store_id) {
            return;
        }
        self.settings.mark_pending(self.kind, hostname);
        if let Err(e) = self.settings.save() {
            tracing::warn!(category = %self.kind, error = %e, "failed to persist pending domains");
        }
    }
}

impl Cleaner for StorageCleaner {
    fn clean<'a>(
        &'a self,
        types: &'a mut DataTypeSet,
        startup: bool,
    ) -> BoxFuture<'a, Result<(), CleanupError>> {
        Box::pin(self.do_clean(types, startup))
    }

    fn clean_domain_on_leave<'a>(
        &'a self,
        store_id: &'a CookieStoreId,
        domain: &'a str,
    ) -> BoxFuture<'a, Result<(), CleanupError>> {
        Box::pin(self.do_clean_domain_on_leave(store_id, domain))
    }

    fn clean_domain<'a>(
        &'a self,
        store_id: &'a CookieStoreId,
        domain: &'a str,
    ) -> BoxFuture<'a, Result<(), CleanupError>> {
        Box::pin(self.do_clean_domain(store_id, domain))
    }
}
