//! Tests for the book view controller.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bookfold_core::cache::{RenderPool, ResourceFactory};
use bookfold_core::document::{DocumentProvider, StaticDocument, StaticPage};
use bookfold_core::geometry::{Rect, Size};
use bookfold_core::layout::{Alignment, Orientation, SpreadSlot, ViewerParams};
use bookfold_core::{BookView, LayoutError, Result};

/// Resource is `(page, build serial)`.
#[derive(Default)]
struct Bitmaps {
    builds: AtomicUsize,
}

impl ResourceFactory for Bitmaps {
    type Resource = (usize, usize);

    fn create(&self, index: usize) -> Result<(usize, usize)> {
        Ok((index, self.builds.fetch_add(1, Ordering::SeqCst)))
    }

    fn blank(&self) -> (usize, usize) {
        (0, 0)
    }
}

/// Document whose page `missing` cannot be loaded.
struct Flaky {
    inner: StaticDocument,
    missing: usize,
}

impl DocumentProvider for Flaky {
    type Page = StaticPage;

    fn page_count(&self) -> usize {
        self.inner.page_count()
    }

    fn page(&self, index: usize) -> Option<StaticPage> {
        if index == self.missing {
            return None;
        }
        self.inner.page(index)
    }
}

fn book(pages: usize, cover: bool) -> BookView<StaticDocument, Bitmaps> {
    let params = ViewerParams::default().with_cover_page(cover);
    BookView::new(
        StaticDocument::uniform(pages, 100.0, 200.0),
        Bitmaps::default(),
        params,
    )
    .unwrap()
}

fn pages(view: &BookView<StaticDocument, Bitmaps>) -> Vec<Option<usize>> {
    view.spread().slots().iter().map(SpreadSlot::page_index).collect()
}

#[test]
fn test_empty_document_is_rejected() {
    let result = BookView::new(
        StaticDocument::default(),
        Bitmaps::default(),
        ViewerParams::default(),
    );
    assert_eq!(result.err(), Some(LayoutError::EmptyDocument));
}

#[test]
fn test_invalid_params_are_rejected() {
    let result = BookView::new(
        StaticDocument::uniform(3, 100.0, 100.0),
        Bitmaps::default(),
        ViewerParams::default().with_radii(2, 3),
    );
    assert!(matches!(result.err(), Some(LayoutError::InvalidParams(_))));
}

#[test]
fn test_opens_on_first_page() {
    let view = book(10, false);
    assert_eq!(view.focus(), 1);
    assert_eq!(view.orientation(), Orientation::Portrait);
    assert_eq!(pages(&view), vec![Some(1)]);
    assert_eq!(view.cache().indices(), vec![1, 2, 3, 4]);
    assert_eq!(view.resource(1).map(|r| r.0), Some(1));
    assert_eq!(view.blank_resource(), (0, 0));
}

#[test]
fn test_landscape_walk_with_cover() {
    let mut view = book(10, true);
    view.set_orientation(Orientation::Landscape);
    assert_eq!(pages(&view), vec![None, Some(1)]);
    assert!(view.previous().is_none());

    let mut seen = vec![pages(&view)];
    while view.next().is_some() {
        seen.push(pages(&view));
    }
    assert_eq!(
        seen,
        vec![
            vec![None, Some(1)],
            vec![Some(2), Some(3)],
            vec![Some(4), Some(5)],
            vec![Some(6), Some(7)],
            vec![Some(8), Some(9)],
            vec![Some(10), None],
        ]
    );

    assert!(view.previous().is_some());
    assert_eq!(pages(&view), vec![Some(8), Some(9)]);
}

#[test]
fn test_zoom_blocks_page_turns() {
    let mut view = book(10, false);
    view.zoom_mut().zoom_in();
    assert!(view.next().is_none());
    assert_eq!(view.focus(), 1);

    view.zoom_mut().zoom_out();
    assert!(view.next().is_some());
    assert_eq!(view.focus(), 2);
}

#[test]
fn test_orientation_change_refocuses_and_invalidates() {
    let mut view = book(10, false);
    view.show(4);
    let old = *view.resource(4).unwrap();

    view.set_orientation(Orientation::Landscape);
    assert_eq!(pages(&view), vec![Some(3), Some(4)]);
    assert_eq!(view.focus(), 4);
    let rebuilt = *view.resource(4).unwrap();
    assert_eq!(rebuilt.0, 4);
    assert_ne!(rebuilt.1, old.1);

    view.set_orientation(Orientation::Portrait);
    assert_eq!(view.focus(), 3);
    assert_eq!(pages(&view), vec![Some(3)]);
}

#[test]
fn test_same_orientation_keeps_cache() {
    let mut view = book(10, false);
    let before = *view.resource(1).unwrap();
    view.zoom_mut().zoom_in();
    view.set_orientation(Orientation::Portrait);
    assert_eq!(*view.resource(1).unwrap(), before);
    assert!(!view.zoom().allows_page_turn());
}

#[test]
fn test_memory_pressure_empties_cache() {
    let mut view = book(10, false);
    view.show(5);
    view.handle_memory_pressure();
    assert!(view.cache().is_empty());
    assert!(view.resource(5).is_none());

    view.show(5);
    assert_eq!(view.cache().indices(), (2..=8).collect::<Vec<_>>());
}

#[test]
fn test_layout_places_pages_toward_spine() {
    let doc = StaticDocument::new(vec![
        StaticPage::sized(100.0, 200.0),
        StaticPage::sized(50.0, 200.0),
        StaticPage::sized(50.0, 200.0),
        StaticPage::sized(100.0, 200.0),
    ]);
    let params = ViewerParams::default().with_cover_page(true);
    let mut view = BookView::new(doc, Bitmaps::default(), params).unwrap();
    view.set_orientation(Orientation::Landscape);
    let view_size = Size::new(400.0, 200.0);

    let cover = view.layout(view_size);
    assert_eq!(cover.len(), 2);
    assert_eq!(cover[0].slot, SpreadSlot::Blank);
    assert_eq!(cover[0].rect, Rect::new(100.0, 0.0, 100.0, 200.0));
    assert!(cover[0].transform.is_none());
    let page_one = cover[1].transform.as_ref().unwrap();
    assert_eq!(page_one.frame(), Rect::new(200.0, 0.0, 100.0, 200.0));

    view.next();
    let inner = view.layout(view_size);
    assert_eq!(inner[0].slot, SpreadSlot::page(2, Alignment::Right));
    assert_eq!(inner[1].slot, SpreadSlot::page(3, Alignment::Left));
    let left = inner[0].transform.as_ref().unwrap();
    let right = inner[1].transform.as_ref().unwrap();
    assert_eq!(left.frame(), Rect::new(150.0, 0.0, 50.0, 200.0));
    assert_eq!(right.frame(), Rect::new(200.0, 0.0, 50.0, 200.0));
}

#[test]
fn test_unavailable_page_has_no_transform() {
    let doc = Flaky {
        inner: StaticDocument::uniform(4, 100.0, 200.0),
        missing: 2,
    };
    let mut view = BookView::new(doc, Bitmaps::default(), ViewerParams::default()).unwrap();
    view.set_orientation(Orientation::Landscape);

    let slots = view.layout(Size::new(400.0, 200.0));
    assert_eq!(slots[1].slot, SpreadSlot::page(2, Alignment::Left));
    assert!(slots[0].transform.is_some());
    assert!(slots[1].transform.is_none());
}

#[test]
fn test_deferred_show_fills_cache_through_pool() {
    let mut view = book(20, false);
    let mut pool = RenderPool::with_threads(2).unwrap();

    let update = view.show_deferred(10, &mut pool);
    assert_eq!(update.evicted, vec![1, 2, 3, 4]);
    assert!(view.cache().is_pending(10));

    let report = pool.drain_blocking(view.cache_mut(), Duration::from_secs(10));
    assert_eq!(report.inserted, 7);
    assert_eq!(view.cache().indices(), (7..=13).collect::<Vec<_>>());
    assert_eq!(view.resource(10).map(|r| r.0), Some(10));
}

#[test]
#[should_panic(expected = "outside 1..=3")]
fn test_show_out_of_range_panics() {
    let mut view = book(3, false);
    view.show(4);
}

#[test]
fn test_deferred_orientation_change_replans_through_pool() {
    let mut view = book(20, false);
    let mut pool = RenderPool::with_threads(2).unwrap();
    view.show(4);

    assert!(view.set_orientation_deferred(Orientation::Portrait, &mut pool).is_none());

    let update = view
        .set_orientation_deferred(Orientation::Landscape, &mut pool)
        .unwrap();
    assert_eq!(pages(&view), vec![Some(3), Some(4)]);
    assert!(update.evicted.is_empty());
    assert!(update.created.is_empty());
    assert!(view.cache().is_pending(4));
    assert!(view.resource(4).is_none());

    let report = pool.drain_blocking(view.cache_mut(), Duration::from_secs(10));
    assert_eq!(report.inserted, 7);
    assert_eq!(view.cache().indices(), (1..=7).collect::<Vec<_>>());
    assert_eq!(view.resource(4).map(|r| r.0), Some(4));
}
