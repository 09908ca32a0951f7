//! Rule-driven cleanup orchestration.
//!
//! Every storage-category cleaner implements [`Cleaner`]: react to
//! domain-leave, perform a bulk `clean` pass, and handle explicit
//! per-domain cleanup. [`StorageCleaner`] covers the hostname-addressable
//! categories (local storage, indexed storage, service workers);
//! [`HistoryCleaner`] is the structurally similar but independently
//! evolved cleaner for browsing history. [`CleanupEngine`] fans triggers
//! out across the cleaner list.

pub mod engine;
pub mod history;
pub mod storage;

pub use engine::CleanupEngine;
pub use history::HistoryCleaner;
pub use storage::StorageCleaner;

use futures::future::BoxFuture;

use crate::base::{CleanupError, CookieStoreId};
use crate::platform::DataTypeSet;

/// The common contract of every storage-category cleaner.
///
/// Methods default to no-ops so each cleaner implements only the
/// triggers that apply to its category. Errors surface to the caller,
/// which logs and continues; a failing category never blocks the others.
pub trait Cleaner: Send + Sync {
    /// Bulk pass over the requested data types. A cleaner that fully
    /// handles its category clears the corresponding request flag so the
    /// caller-side unfiltered removal skips it.
    fn clean<'a>(
        &'a self,
        types: &'a mut DataTypeSet,
        startup: bool,
    ) -> BoxFuture<'a, Result<(), CleanupError>> {
        let _ = (types, startup);
        Box::pin(async { Ok(()) })
    }

    /// A domain was left in the given cookie store.
    fn clean_domain_on_leave<'a>(
        &'a self,
        store_id: &'a CookieStoreId,
        domain: &'a str,
    ) -> BoxFuture<'a, Result<(), CleanupError>> {
        let _ = (store_id, domain);
        Box::pin(async { Ok(()) })
    }

    /// Unconditional cleanup of a single domain, used by manual paths.
    fn clean_domain<'a>(
        &'a self,
        store_id: &'a CookieStoreId,
        domain: &'a str,
    ) -> BoxFuture<'a, Result<(), CleanupError>> {
        let _ = (store_id, domain);
        Box::pin(async { Ok(()) })
    }
}
