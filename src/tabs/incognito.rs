use crate::base::{CookieStoreId, TabId};

/// Answers whether a tab or cookie store belongs to a private browsing
/// session. Private contexts never reach the persisted pending sets;
/// their data dies with the session.
pub trait IncognitoWatcher: Send + Sync {
    fn has_cookie_store(&self, cookie_store_id: &CookieStoreId) -> bool;

    fn has_tab(&self, tab_id: TabId) -> bool;
}
