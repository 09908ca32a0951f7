//! Per-tab frame state machine.
//!
//! Tracks which hostname each frame of a tab currently holds, plus the
//! hostname a frame is mid-navigation towards. The tracker derives
//! domain-leave candidates from the deltas this state machine reports.

use std::collections::{HashMap, HashSet};

use crate::base::{CookieStoreId, FrameId, TabId, ROOT_FRAME_ID};
use crate::domain;

#[derive(Debug, Clone, Default)]
struct FrameInfo {
    /// The committed hostname. Empty when nothing has committed yet.
    hostname: String,
    /// First-party (registrable) domain of the committed hostname.
    hostname_fp: String,
    /// In-flight navigation target. Empty when the frame is settled.
    next_hostname: String,
}

impl FrameInfo {
    fn committed(hostname: &str) -> Self {
        Self {
            hostname: hostname.to_string(),
            hostname_fp: fp_of(hostname),
            next_hostname: String::new(),
        }
    }
}

fn fp_of(hostname: &str) -> String {
    if hostname.is_empty() {
        String::new()
    } else {
        domain::first_party_domain(hostname)
    }
}

/// State of one open, non-private tab.
///
/// The cookie store id is immutable for the tab's lifetime; frame entries
/// mutate on prepare/commit and on the dead-frames check.
pub struct TabInfo {
    tab_id: TabId,
    cookie_store_id: CookieStoreId,
    frames: HashMap<FrameId, FrameInfo>,
    dead_frames_check_pending: bool,
}

impl TabInfo {
    /// Create tab state with the root frame committed to `hostname`
    /// (empty when the tab has no http(s) document yet).
    pub fn new(tab_id: TabId, hostname: &str, cookie_store_id: CookieStoreId) -> Self {
        let mut frames = HashMap::new();
        frames.insert(ROOT_FRAME_ID, FrameInfo::committed(hostname));
        Self {
            tab_id,
            cookie_store_id,
            frames,
            dead_frames_check_pending: false,
        }
    }

    pub fn tab_id(&self) -> TabId {
        self.tab_id
    }

    pub fn cookie_store_id(&self) -> &CookieStoreId {
        &self.cookie_store_id
    }

    /// Record that a frame is about to navigate.
    ///
    /// Returns the frame's previous committed hostname, the leave
    /// candidate. The old hostname stays contained until commit, because
    /// navigation can fail and commit may never arrive.
    pub fn prepare_navigation(&mut self, frame_id: FrameId, hostname: &str) -> String {
        let frame = self.frames.entry(frame_id).or_default();
        frame.next_hostname = hostname.to_string();
        frame.hostname.clone()
    }

    /// Commit a frame's hostname.
    ///
    /// Returns the hostnames no longer present in this tab after the
    /// commit. `commit_navigation(ROOT_FRAME_ID, "")` models tab removal
    /// and returns every hostname the tab held; repeating it yields the
    /// empty set.
    pub fn commit_navigation(&mut self, frame_id: FrameId, hostname: &str) -> HashSet<String> {
        if frame_id == ROOT_FRAME_ID && hostname.is_empty() {
            let lost = self
                .frames
                .values()
                .filter(|f| !f.hostname.is_empty())
                .map(|f| f.hostname.clone())
                .collect();
            self.frames.clear();
            return lost;
        }

        let prev = match self.frames.get_mut(&frame_id) {
            Some(frame) => {
                let prev = std::mem::replace(&mut frame.hostname, hostname.to_string());
                frame.hostname_fp = fp_of(hostname);
                frame.next_hostname.clear();
                prev
            }
            None => {
                self.frames.insert(frame_id, FrameInfo::committed(hostname));
                String::new()
            }
        };

        let mut lost = HashSet::new();
        if !prev.is_empty() && !self.contains(&prev, false) {
            lost.insert(prev);
        }
        lost
    }

    /// Whether any frame currently holds `hostname`. With `check_next`,
    /// frames mid-navigation towards it count too, which keeps a rule
    /// from firing in the gap between leave and re-enter during
    /// same-domain navigation.
    pub fn contains(&self, hostname: &str, check_next: bool) -> bool {
        if hostname.is_empty() {
            return false;
        }
        self.frames.values().any(|f| {
            f.hostname == hostname || (check_next && f.next_hostname == hostname)
        })
    }

    /// Whether the root frame's first-party domain equals `hostname_fp`.
    pub fn match_hostname_fp(&self, hostname_fp: &str) -> bool {
        if hostname_fp.is_empty() {
            return false;
        }
        self.frames
            .get(&ROOT_FRAME_ID)
            .is_some_and(|f| f.hostname_fp == hostname_fp)
    }

    /// Whether any frame's first-party domain equals `hostname_fp`.
    pub fn contains_hostname_fp(&self, hostname_fp: &str) -> bool {
        if hostname_fp.is_empty() {
            return false;
        }
        self.frames.values().any(|f| f.hostname_fp == hostname_fp)
    }

    /// Mark a dead-frames check as in flight. Returns false when one is
    /// already pending, coalescing repeated scheduling.
    pub(crate) fn begin_dead_frames_check(&mut self) -> bool {
        if self.dead_frames_check_pending {
            return false;
        }
        self.dead_frames_check_pending = true;
        true
    }

    /// Abandon an in-flight check without inspecting frames, so a later
    /// attempt can run.
    pub(crate) fn cancel_dead_frames_check(&mut self) {
        self.dead_frames_check_pending = false;
    }

    /// Drop frames absent from `live` and report their hostnames as lost,
    /// unless a surviving frame still holds them. A removed frame is gone
    /// from the map, so a repeated check never reports a hostname twice.
    pub(crate) fn finish_dead_frames_check(&mut self, live: &[FrameId]) -> HashSet<String> {
        self.dead_frames_check_pending = false;
        let dead: Vec<FrameId> = self
            .frames
            .keys()
            .filter(|id| !live.contains(id))
            .copied()
            .collect();
        let mut lost = HashSet::new();
        for id in dead {
            if let Some(frame) = self.frames.remove(&id) {
                if !frame.hostname.is_empty() {
                    lost.insert(frame.hostname);
                }
            }
        }
        lost.retain(|hostname| !self.contains(hostname, false));
        lost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tab() -> TabInfo {
        TabInfo::new(1, "www.example.com", CookieStoreId::new("firefox-default"))
    }

    #[test]
    fn test_contains_committed_hostname() {
        let info = tab();
        assert!(info.contains("www.example.com", false));
        assert!(!info.contains("other.com", false));
        assert!(!info.contains("", false));
    }

    #[test]
    fn test_prepare_keeps_old_hostname_contained() {
        let mut info = tab();
        let prev = info.prepare_navigation(ROOT_FRAME_ID, "other.com");
        assert_eq!(prev, "www.example.com");
        assert!(info.contains("www.example.com", false));
        assert!(!info.contains("other.com", false));
        assert!(info.contains("other.com", true));
    }

    #[test]
    fn test_commit_reports_left_hostname() {
        let mut info = tab();
        info.prepare_navigation(ROOT_FRAME_ID, "other.com");
        let lost = info.commit_navigation(ROOT_FRAME_ID, "other.com");
        assert_eq!(lost, HashSet::from(["www.example.com".to_string()]));
        assert!(info.contains("other.com", false));
        assert!(!info.contains("www.example.com", true));
    }

    #[test]
    fn test_commit_same_hostname_reports_nothing() {
        let mut info = tab();
        let lost = info.commit_navigation(ROOT_FRAME_ID, "www.example.com");
        assert!(lost.is_empty());
    }

    #[test]
    fn test_hostname_shared_across_frames_not_lost() {
        let mut info = tab();
        info.commit_navigation(1, "www.example.com");
        let lost = info.commit_navigation(ROOT_FRAME_ID, "other.com");
        assert!(lost.is_empty(), "sub-frame still holds the hostname");
    }

    #[test]
    fn test_tab_removal_returns_all_hostnames_once() {
        let mut info = tab();
        info.commit_navigation(1, "frame.example.org");
        info.commit_navigation(2, "www.example.com");

        let lost = info.commit_navigation(ROOT_FRAME_ID, "");
        assert_eq!(
            lost,
            HashSet::from([
                "www.example.com".to_string(),
                "frame.example.org".to_string()
            ])
        );

        // second removal is idempotent
        assert!(info.commit_navigation(ROOT_FRAME_ID, "").is_empty());
    }

    #[test]
    fn test_dead_frames_check() {
        let mut info = tab();
        info.commit_navigation(1, "frame.example.org");
        info.commit_navigation(2, "www.example.com");

        assert!(info.begin_dead_frames_check());
        assert!(!info.begin_dead_frames_check(), "check already pending");

        let lost = info.finish_dead_frames_check(&[ROOT_FRAME_ID]);
        assert_eq!(lost, HashSet::from(["frame.example.org".to_string()]));
        assert!(info.contains("www.example.com", false), "root frame survives");

        // repeated check reports nothing new
        assert!(info.begin_dead_frames_check());
        assert!(info.finish_dead_frames_check(&[ROOT_FRAME_ID]).is_empty());
    }

    #[test]
    fn test_first_party_matching() {
        let mut info = tab();
        info.commit_navigation(1, "cdn.assets.net");

        assert!(info.match_hostname_fp("example.com"));
        assert!(!info.match_hostname_fp("assets.net"), "root frame only");
        assert!(info.contains_hostname_fp("assets.net"));
        assert!(info.contains_hostname_fp("example.com"));
        assert!(!info.contains_hostname_fp("unrelated.org"));
    }
}
