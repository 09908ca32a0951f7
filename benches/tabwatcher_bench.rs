use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tabscrub::base::{CookieStoreId, TabId};
use tabscrub::platform::{EnumeratingFrames, FrameEnumerator, TabDescriptor};
use tabscrub::tabs::TabWatcher;

struct RootFrameOnly;

impl FrameEnumerator for RootFrameOnly {
    fn frame_ids(&self, _tab_id: TabId) -> EnumeratingFrames {
        Box::pin(async { Ok(vec![0]) })
    }
}

fn watcher_with_tabs(count: i64) -> TabWatcher {
    let watcher = TabWatcher::new(CookieStoreId::new("firefox-default"), Arc::new(RootFrameOnly));
    for id in 0..count {
        watcher.on_tab_created(&TabDescriptor {
            id,
            url: Some(format!("https://site{id}.example.com/")),
            cookie_store_id: Some(CookieStoreId::new("firefox-default")),
            incognito: false,
        });
    }
    watcher
}

fn benchmark_navigation_commit(c: &mut Criterion) {
    let watcher = watcher_with_tabs(1);

    c.bench_function("navigation_commit", |b| {
        b.iter(|| {
            watcher.commit_navigation(black_box(0), 0, black_box("a.example.com"));
            watcher.commit_navigation(black_box(0), 0, black_box("b.example.com"));
        })
    });
}

fn benchmark_contains_domain(c: &mut Criterion) {
    let watcher = watcher_with_tabs(100);

    c.bench_function("contains_domain_100_tabs", |b| {
        b.iter(|| black_box(watcher.contains_domain(black_box("site50.example.com"))))
    });
}

fn benchmark_hostname_extraction(c: &mut Criterion) {
    c.bench_function("get_valid_hostname", |b| {
        b.iter(|| {
            black_box(tabscrub::domain::get_valid_hostname(black_box(
                "https://WWW.Example.COM/path?q=1",
            )))
        })
    });
}

criterion_group!(
    benches,
    benchmark_navigation_commit,
    benchmark_contains_domain,
    benchmark_hostname_extraction
);
criterion_main!(benches);
