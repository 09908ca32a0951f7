//! Browsing-history cleanup.
//!
//! History has no persisted pending set: the history store is itself a
//! query mechanism over recorded entries, so every pass searches and
//! deletes by URL. Entries cannot be scoped per cookie store, which
//! makes the leave-triggered path stricter than the storage cleaners'.

use std::sync::Arc;

use futures::future::{join_all, BoxFuture};

use crate::base::{CleanupError, CookieStoreId};
use crate::cleaners::Cleaner;
use crate::domain;
use crate::platform::{DataTypeSet, HistoryItem, HistoryStore};
use crate::rules::RuleManager;
use crate::settings::Settings;
use crate::tabs::TabWatcher;

pub struct HistoryCleaner {
    settings: Arc<Settings>,
    rules: Arc<dyn RuleManager>,
    tab_watcher: Arc<TabWatcher>,
    history: Arc<dyn HistoryStore>,
}

impl HistoryCleaner {
    pub fn new(
        settings: Arc<Settings>,
        rules: Arc<dyn RuleManager>,
        tab_watcher: Arc<TabWatcher>,
        history: Arc<dyn HistoryStore>,
    ) -> Arc<Self> {
        Arc::new(Self {
            settings,
            rules,
            tab_watcher,
            history,
        })
    }

    /// Handle a visit notification. Wire this to the platform's
    /// `onVisited` events; when instant history cleanup is enabled and
    /// the domain is not excluded by rules, the entry is deleted
    /// immediately.
    pub async fn on_visited(&self, url: &str) -> Result<(), CleanupError> {
        if !self.settings.instantly_enabled() || !self.settings.instantly_history() {
            return Ok(());
        }
        let hostname = domain::get_valid_hostname(url);
        if hostname.is_empty() {
            return Ok(());
        }
        if !self.settings.instantly_history_apply_rules()
            || self.rules.is_domain_instantly(&hostname, false)
        {
            tracing::debug!(domain = %hostname, "instant history deletion");
            self.history.delete_url(url).await?;
        }
        Ok(())
    }

    async fn do_clean(&self, types: &mut DataTypeSet, startup: bool) -> Result<(), CleanupError> {
        if !types.history {
            return Ok(());
        }
        let category = self.settings.history_category();
        let apply_rules = if startup {
            category.startup_apply_rules
        } else {
            category.clean_all_apply_rules
        };
        if !apply_rules {
            return Ok(());
        }

        types.history = false;
        let items = self.history.search("").await?;
        if items.is_empty() {
            return Ok(());
        }

        let protect_open_domains = self.rules.protect_open_domains(startup);
        let urls = self.urls_to_clean(&items, startup, protect_open_domains);
        tracing::debug!(count = urls.len(), startup, "deleting history entries");
        for result in join_all(urls.iter().map(|url| self.history.delete_url(url))).await {
            result?;
        }
        Ok(())
    }

    async fn do_clean_domain_on_leave(&self, domain: &str) -> Result<(), CleanupError> {
        if !self.settings.domain_leave_enabled() || !self.settings.history_category().domain_leave
        {
            return Ok(());
        }
        // Other cookie stores might still show the domain and history
        // cannot be cleaned per store, so any open tab blocks the pass.
        if self.tab_watcher.contains_domain(domain) {
            return Ok(());
        }

        let domain_fp = domain::first_party_domain(domain);
        let items = self.history.search(&domain_fp).await?;
        let filtered: Vec<HistoryItem> = items
            .into_iter()
            .filter(|item| {
                let hostname = domain::get_valid_hostname(&item.url);
                hostname == domain
                    || domain::registrable_domain(&hostname).as_deref() == Some(&domain_fp)
            })
            .collect();

        let urls = self.urls_to_clean(&filtered, false, true);
        for result in join_all(urls.iter().map(|url| self.history.delete_url(url))).await {
            result?;
        }
        Ok(())
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

    /// URLs whose hostname is resolvable and unprotected for this pass.
    fn urls_to_clean(
        &self,
        items: &[HistoryItem],
        ignore_startup: bool,
        protect_open_domains: bool,
    ) -> Vec<String> {
        items
            .iter()
            .filter(|item| {
                let hostname = domain::get_valid_hostname(&item.url);
                !hostname.is_empty()
                    && !self.is_domain_protected(&hostname, ignore_startup, protect_open_domains)
            })
            .map(|item| item.url.clone())
            .collect()
    }
}

impl Cleaner for HistoryCleaner {
    fn clean<'a>(
        &'a self,
        types: &'a mut DataTypeSet,
        startup: bool,
    ) -> BoxFuture<'a, Result<(), CleanupError>> {
        Box::pin(self.do_clean(types, startup))
    }

    fn clean_domain_on_leave<'a>(
        &'a self,
        _store_id: &'a CookieStoreId,
        domain: &'a str,
    ) -> BoxFuture<'a, Result<(), CleanupError>> {
        Box::pin(self.do_clean_domain_on_leave(domain))
    }
}
