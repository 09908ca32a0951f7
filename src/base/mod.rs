//! Base types and error handling.
//!
//! Foundational identifiers and enums shared by the tracker and the
//! cleaners:
//! - [`CookieStoreId`]: an isolated browsing context (default, container,
//!   private partition)
//! - [`CleanupType`]: the protection classification produced by the rule
//!   evaluator
//! - [`StorageKind`]: the hostname-addressable storage categories
//! - [`CleanupError`]: the crate-wide error type

pub mod error;

pub use error::CleanupError;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of an open tab, assigned by the browser.
pub type TabId = i64;

/// Frame identifier within a tab. The root frame is [`ROOT_FRAME_ID`].
pub type FrameId = i64;

/// The distinguished frame id of a tab's top-level frame.
pub const ROOT_FRAME_ID: FrameId = 0;

/// An isolated browsing context (cookie store).
///
/// Partitions browser state: the default context, containers, and
/// private-browsing partitions all carry distinct ids. The tracker only
/// records the id; it never interprets it.
#[derive(Clone, Hash, Eq, PartialEq)]
pub struct CookieStoreId {
    id: Box<str>,
}

impl CookieStoreId {
    /// Creates a new [`CookieStoreId`] from any string-like type.
    #[inline]
    pub fn new(id: impl Into<Box<str>>) -> Self {
        Self { id: id.into() }
    }

    /// View the identifier as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.id
    }
}

impl From<&str> for CookieStoreId {
    fn from(value: &str) -> Self {
        CookieStoreId::new(value)
    }
}

impl From<String> for CookieStoreId {
    fn from(value: String) -> Self {
        CookieStoreId::new(value)
    }
}

impl fmt::Debug for CookieStoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.id, f)
    }
}

impl fmt::Display for CookieStoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.id, f)
    }
}

/// Protection classification for a domain, produced by the rule evaluator.
///
/// Governs every cleaner's eligibility decision; cleaners interpret the
/// disposition, they never re-implement rule matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CleanupType {
    /// Never erase this domain's data.
    Never,
    /// Erase only during a startup pass.
    Startup,
    /// Erase once the domain has been left.
    Leave,
    /// Erase immediately, even while the domain is open.
    Instantly,
}

/// The storage categories that support hostname-addressable cleanup.
///
/// Each category owns its own persisted pending-domain set and its own
/// apply-rules switches in [`Settings`](crate::settings::Settings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageKind {
    LocalStorage,
    IndexedDb,
    ServiceWorkers,
}

impl StorageKind {
    /// Human-readable category label, used in log output.
    pub fn label(&self) -> &'static str {
        match self {
            StorageKind::LocalStorage => "localStorage",
            StorageKind::IndexedDb => "indexedDB",
            StorageKind::ServiceWorkers => "serviceWorkers",
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
