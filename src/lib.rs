//! # tabscrub
//!
//! A browser-extension-inspired privacy-cleanup engine for Rust.
//!
//! `tabscrub` tracks which internet domains are "open" (visited in a
//! live tab) and applies a rule-based policy to decide, continuously,
//! which domains' site data (local storage, indexed storage, service
//! workers, history) may be erased and when.
//!
//! ## Architecture
//!
//! - **Domain-lifecycle tracker** ([`tabs`]): per-tab, per-frame
//!   navigation state, deriving domain enter/leave events scoped to an
//!   isolated browsing context (a cookie store: default, container, or
//!   private partition).
//! - **Cleanup orchestration** ([`cleaners`]): consumes those events plus
//!   explicit triggers (startup, clean-all, domain-leave) and decides,
//!   per storage category, which domains are eligible for erasure under
//!   a layered protection policy.
//!
//! The rule evaluator, the browser removal primitives, and incognito
//! tracking are consumed as traits ([`rules`], [`platform`],
//! [`tabs::IncognitoWatcher`]); embedders bridge them to the actual
//! extension APIs.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tabscrub::base::{CookieStoreId, StorageKind};
//! use tabscrub::cleaners::{CleanupEngine, StorageCleaner};
//! use tabscrub::settings::Settings;
//! use tabscrub::tabs::TabWatcher;
//!
//! let settings = Arc::new(Settings::open("settings.json")?);
//! let watcher = Arc::new(TabWatcher::new(CookieStoreId::new("firefox-default"), frames));
//! let local_storage = StorageCleaner::new(
//!     StorageKind::LocalStorage,
//!     settings.clone(), rules, stores, watcher.clone(), incognito, remover, true,
//! );
//! local_storage.init(&open_tabs);
//! let engine = CleanupEngine::new(vec![local_storage], remover, default_store);
//! watcher.add_listener(Arc::downgrade(&engine) as _);
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Identifiers, classifications, and error definitions
//! - [`domain`] - Hostname and first-party (registrable) domain helpers
//! - [`tabs`] - TabInfo/TabWatcher domain-lifecycle tracking
//! - [`rules`] - The rule evaluator interface
//! - [`settings`] - Typed settings with JSON persistence
//! - [`platform`] - Consumed browser primitives
//! - [`cleaners`] - Storage and history cleaners plus the engine

pub mod base;
pub mod cleaners;
pub mod domain;
pub mod platform;
pub mod rules;
pub mod settings;
pub mod tabs;
