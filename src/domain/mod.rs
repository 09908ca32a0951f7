//! Hostname extraction and first-party (registrable) domain lookup.
//!
//! First-party domains come from Mozilla's Public Suffix List via the
//! `psl` crate, so `sub.example.com` and `example.com` resolve to the
//! same organizational domain while `example.co.uk` keeps its full
//! registrable suffix.

use url::Url;

/// Extract the hostname from a URL, restricted to http/https.
///
/// Returns an empty string for unparsable URLs and for schemes that
/// carry no site data (`about:`, `moz-extension:`, `data:`, ...).
pub fn get_valid_hostname(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {
            parsed.host_str().unwrap_or("").to_lowercase()
        }
        _ => String::new(),
    }
}

/// Get the registrable domain (eTLD+1) for a hostname.
/// For "sub.example.com", returns "example.com".
/// For "com" (public suffix) or an IP literal, returns None.
pub fn registrable_domain(hostname: &str) -> Option<String> {
    let lower = hostname.to_lowercase();
    psl::domain(lower.as_bytes())
        .and_then(|d| std::str::from_utf8(d.as_bytes()).ok())
        .map(|s| s.to_string())
}

/// First-party domain of a hostname, falling back to the hostname itself
/// when no registrable domain exists (IP literals, intranet names).
pub fn first_party_domain(hostname: &str) -> String {
    registrable_domain(hostname).unwrap_or_else(|| hostname.to_lowercase())
}

/// First-party domain for a cookie domain, which may carry a leading dot.
pub fn first_party_cookie_domain(domain: &str) -> String {
    let raw = domain.strip_prefix('.').unwrap_or(domain);
    first_party_domain(raw)
}
