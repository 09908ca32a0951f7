//! Domain-lifecycle tracking.
//!
//! [`TabWatcher`] aggregates one [`TabInfo`] per open, non-private tab,
//! indexed by tab id and by isolated browsing context, and raises
//! domain-enter/domain-leave notifications to registered observers.
//!
//! Observers register as `Weak` references: a subscription lives exactly
//! as long as its owner, so a dropped cleaner stops receiving events
//! without any explicit teardown.

pub mod incognito;
pub mod tabinfo;
pub mod tabwatcher;

pub use incognito::IncognitoWatcher;
pub use tabinfo::TabInfo;
pub use tabwatcher::TabWatcher;

use crate::base::CookieStoreId;

/// Observer of domain lifecycle events, scoped to an isolated browsing
/// context. Methods default to no-ops so observers override only the
/// events they consume.
pub trait TabWatcherListener: Send + Sync {
    /// The first tab in this cookie store committed the hostname.
    fn on_domain_enter(&self, cookie_store_id: &CookieStoreId, hostname: &str) {
        let _ = (cookie_store_id, hostname);
    }

    /// The last tab in this cookie store stopped holding the hostname.
    fn on_domain_leave(&self, cookie_store_id: &CookieStoreId, hostname: &str) {
        let _ = (cookie_store_id, hostname);
    }
}
