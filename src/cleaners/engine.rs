//! Trigger fan-out across the cleaner list.

use std::sync::Arc;

use crate::base::CookieStoreId;
use crate::cleaners::Cleaner;
use crate::platform::{BrowsingDataRemover, DataTypeSet, RemovalScope};
use crate::tabs::TabWatcherListener;

/// Runs cleanup triggers across every registered cleaner.
///
/// Each cleaner gets the shared requested-types set and clears the flags
/// it handles; whatever remains requested afterwards is erased by one
/// unfiltered bulk removal. Per-cleaner failures are logged and never
/// block the other categories.
///
/// Register the engine on the tab watcher (as a `Weak` listener) to get
/// domain-leave cleanup; leave handling spawns onto the ambient tokio
/// runtime, and leave events delivered outside one are logged and
/// dropped.
pub struct CleanupEngine {
    cleaners: Vec<Arc<dyn Cleaner>>,
    remover: Arc<dyn BrowsingDataRemover>,
    default_cookie_store_id: CookieStoreId,
}

impl CleanupEngine {
    pub fn new(
        cleaners: Vec<Arc<dyn Cleaner>>,
        remover: Arc<dyn BrowsingDataRemover>,
        default_cookie_store_id: CookieStoreId,
    ) -> Arc<Self> {
        Arc::new(Self {
            cleaners,
            remover,
            default_cookie_store_id,
        })
    }

    /// Run a cleanup pass for an explicit trigger (startup or clean-all).
    pub async fn clean(&self, mut types: DataTypeSet, startup: bool) {
        for cleaner in &self.cleaners {
            if let Err(e) = cleaner.clean(&mut types, startup).await {
                tracing::warn!(error = %e, startup, "cleanup pass failed for one category");
            }
        }
        if types.any() {
            if let Err(e) = self
                .remover
                .remove(
                    &self.default_cookie_store_id,
                    RemovalScope::everything(),
                    types,
                )
                .await
            {
                tracing::warn!(error = %e, "bulk removal failed");
            }
        }
    }

    /// Explicit per-domain cleanup across every category.
    pub async fn clean_domain(&self, store_id: &CookieStoreId, domain: &str) {
        for cleaner in &self.cleaners {
            if let Err(e) = cleaner.clean_domain(store_id, domain).await {
                tracing::warn!(domain = %domain, error = %e, "domain cleanup failed");
            }
        }
    }

    /// Leave-triggered cleanup across every category, honoring each
    /// cleaner's own gating.
    pub async fn clean_domain_on_leave(&self, store_id: &CookieStoreId, domain: &str) {
        for cleaner in &self.cleaners {
            if let Err(e) = cleaner.clean_domain_on_leave(store_id, domain).await {
                tracing::warn!(domain = %domain, error = %e, "domain-leave cleanup failed");
            }
        }
    }
}

impl TabWatcherListener for CleanupEngine {
    fn on_domain_leave(&self, cookie_store_id: &CookieStoreId, hostname: &str) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(
                domain = %hostname,
                "domain-leave event outside a tokio runtime, dropped"
            );
            return;
        };
        for cleaner in &self.cleaners {
            let cleaner = Arc::clone(cleaner);
            let store = cookie_store_id.clone();
            let hostname = hostname.to_string();
            handle.spawn(async move {
                if let Err(e) = cleaner.clean_domain_on_leave(&store, &hostname).await {
                    tracing::warn!(domain = %hostname, error = %e, "domain-leave cleanup failed");
                }
            });
        }
    }
}
