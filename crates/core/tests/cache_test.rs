//! Tests for the windowed page resource cache.

use std::sync::atomic::{AtomicUsize, Ordering};

use bookfold_core::cache::{CacheWindow, PageResourceCache, ResourceFactory};
use bookfold_core::error::{LayoutError, Result};

/// A resource tagged with the page it was built for and a build serial, so
/// tests can tell a reused entry from a rebuilt one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Tagged {
    page: usize,
    build: usize,
}

#[derive(Default)]
struct CountingFactory {
    builds: AtomicUsize,
    failing: Option<usize>,
}

impl CountingFactory {
    fn failing_on(page: usize) -> Self {
        Self {
            builds: AtomicUsize::new(0),
            failing: Some(page),
        }
    }

    fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

impl ResourceFactory for CountingFactory {
    type Resource = Tagged;

    fn create(&self, index: usize) -> Result<Tagged> {
        if self.failing == Some(index) {
            return Err(LayoutError::Render {
                page: index,
                msg: "corrupt content stream".to_string(),
            });
        }
        let build = self.builds.fetch_add(1, Ordering::SeqCst);
        Ok(Tagged { page: index, build })
    }

    fn blank(&self) -> Tagged {
        Tagged { page: 0, build: usize::MAX }
    }
}

fn new_cache(radius_visible: usize, radius_create: usize) -> PageResourceCache<CountingFactory> {
    PageResourceCache::new(CountingFactory::default(), radius_visible, radius_create)
}

#[test]
fn test_first_window_builds_creation_radius() {
    let mut cache = new_cache(4, 3);
    let update = cache.window(10, 20);
    assert_eq!(update.created, vec![10, 9, 11, 8, 12, 7, 13]);
    assert!(update.evicted.is_empty());
    assert_eq!(cache.indices(), (7..=13).collect::<Vec<_>>());
    assert_eq!(update.window, CacheWindow::new(10, 4));
}

#[test]
fn test_window_clamps_at_document_edges() {
    let mut cache = new_cache(4, 3);
    cache.window(1, 20);
    assert_eq!(cache.indices(), vec![1, 2, 3, 4]);

    let mut cache = new_cache(4, 3);
    cache.window(20, 20);
    assert_eq!(cache.indices(), vec![17, 18, 19, 20]);

    let mut tiny = new_cache(4, 3);
    tiny.window(1, 2);
    assert_eq!(tiny.indices(), vec![1, 2]);
}

#[test]
fn test_sequential_moves_keep_retention_window() {
    let mut cache = new_cache(4, 3);
    cache.window(10, 20);

    let update = cache.window(11, 20);
    assert!(update.evicted.is_empty());
    assert_eq!(update.created, vec![14]);

    let update = cache.window(12, 20);
    assert_eq!(update.evicted, vec![7]);
    assert_eq!(update.created, vec![15]);

    let update = cache.window(13, 20);
    assert_eq!(update.evicted, vec![8]);
    assert_eq!(update.created, vec![16]);
    assert_eq!(cache.indices(), (9..=16).collect::<Vec<_>>());
}

#[test]
fn test_residency_never_exceeds_visible_window() {
    let mut cache = new_cache(4, 3);
    let total = 40;
    let path = (1..=total).chain((1..=total).rev()).chain([20, 5, 35, 34, 36]);
    for focus in path {
        cache.window(focus, total);
        assert!(cache.len() <= 2 * 4 + 1, "focus {focus}: {} resident", cache.len());
        for index in cache.indices() {
            assert!(index.abs_diff(focus) <= 4, "page {index} kept at focus {focus}");
        }
        for index in focus.saturating_sub(3).max(1)..=(focus + 3).min(total) {
            assert!(cache.contains(index), "page {index} missing at focus {focus}");
        }
    }
}

#[test]
fn test_far_jump_replaces_everything() {
    let mut cache = new_cache(4, 3);
    cache.window(10, 100);
    let update = cache.window(50, 100);
    assert_eq!(update.evicted, (7..=13).collect::<Vec<_>>());
    assert_eq!(cache.indices(), (47..=53).collect::<Vec<_>>());
}

#[test]
fn test_repeated_window_is_idempotent() {
    let mut cache = new_cache(4, 3);
    cache.window(10, 20);
    let builds = cache.factory().builds();
    let before: Vec<Tagged> = cache.resources().into_iter().map(|(_, r)| *r).collect();

    let update = cache.window(10, 20);
    assert!(update.created.is_empty());
    assert!(update.evicted.is_empty());
    assert_eq!(cache.factory().builds(), builds);
    let after: Vec<Tagged> = cache.resources().into_iter().map(|(_, r)| *r).collect();
    assert_eq!(before, after);
}

#[test]
fn test_invalidate_all_rebuilds_on_next_window() {
    let mut cache = new_cache(4, 3);
    cache.window(10, 20);
    let old = *cache.get(10).unwrap();

    cache.invalidate_all();
    assert!(cache.is_empty());
    assert_eq!(cache.current_window(), None);

    let update = cache.window(10, 20);
    assert_eq!(update.created.len(), 7);
    let new = *cache.get(10).unwrap();
    assert_eq!(new.page, old.page);
    assert_ne!(new.build, old.build);
}

#[test]
fn test_failed_page_is_retried_on_next_window() {
    let mut cache = PageResourceCache::new(CountingFactory::failing_on(11), 4, 3);
    let update = cache.window(10, 20);
    assert_eq!(update.failed, vec![11]);
    assert!(!cache.contains(11));
    assert!(cache.contains(12));

    let update = cache.window(10, 20);
    assert_eq!(update.failed, vec![11]);
    assert!(update.created.is_empty());
}

#[test]
fn test_empty_resource_is_not_cached() {
    let mut cache = new_cache(2, 1);
    cache.window(5, 10);
    let len = cache.len();
    let blank = cache.empty_resource();
    assert_eq!(blank.page, 0);
    assert_eq!(cache.len(), len);
    assert_eq!(cache.get(0), None);
}

#[test]
#[should_panic(expected = "exceeds radius_visible")]
fn test_create_radius_must_fit_visible_radius() {
    new_cache(2, 3);
}
