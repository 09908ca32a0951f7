//! The rule evaluator interface.
//!
//! Rule authoring and wildcard matching live outside this crate; cleaners
//! consume the evaluator as a black box and only interpret the resulting
//! disposition.

use crate::base::CleanupType;

/// Maps a domain to a protection classification.
///
/// Implementations must be thread-safe; evaluation is expected to be
/// cheap enough to run once per pending domain in a cleanup pass.
pub trait RuleManager: Send + Sync {
    /// Classify a domain for a cleanup trigger.
    ///
    /// `ignore_startup` treats startup-only protection as expired (set for
    /// startup passes); `protect_open_domains` tells the evaluator whether
    /// the caller intends to protect currently-open domains.
    fn classify(&self, domain: &str, ignore_startup: bool, protect_open_domains: bool)
        -> CleanupType;

    /// Whether rules protect the domain from the given trigger.
    fn is_domain_protected(&self, domain: &str, ignore_startup: bool) -> bool;

    /// Whether the domain is eligible for instant cleanup on visit.
    fn is_domain_instantly(&self, domain: &str, ignore_startup: bool) -> bool;

    /// Whether open domains should be protected for this trigger type.
    fn protect_open_domains(&self, startup: bool) -> bool;
}
