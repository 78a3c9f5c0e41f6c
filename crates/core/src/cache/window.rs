//! Windowed page resource cache.
//!
//! Keeps per-page render resources for a bounded neighborhood of the focus
//! page. Two radii split retention from eager creation: entries within
//! `radius_visible` of the focus survive a window update, and every page
//! within `radius_create` is built if missing, nearest first. Peak residency
//! is `2 * radius_visible + 1` whatever the navigation direction.
//!
//! Creation is either synchronous ([`PageResourceCache::window`]) or deferred
//! to a worker pool ([`PageResourceCache::plan_window`] +
//! [`PageResourceCache::publish`]). Deferred results are re-validated on
//! publish: a completion whose ticket no longer matches a pending entry was
//! evicted or invalidated in the meantime and is dropped.

use std::ops::RangeInclusive;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::Result;

/// Builds render resources for pages.
///
/// `create` runs on the owner thread for synchronous windows and on pool
/// threads for deferred ones. It only reads the document.
pub trait ResourceFactory: Send + Sync {
    type Resource: Send;

    /// Builds the resource for 1-based page `index`.
    fn create(&self, index: usize) -> Result<Self::Resource>;

    /// Placeholder for a slot with no page (blank cover slots, failed pages).
    fn blank(&self) -> Self::Resource;
}

impl<F: ResourceFactory + ?Sized> ResourceFactory for Arc<F> {
    type Resource = F::Resource;

    fn create(&self, index: usize) -> Result<Self::Resource> {
        (**self).create(index)
    }

    fn blank(&self) -> Self::Resource {
        (**self).blank()
    }
}

/// A focus page and the radius around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheWindow {
    pub focus: usize,
    pub radius: usize,
}

impl CacheWindow {
    pub const fn new(focus: usize, radius: usize) -> Self {
        Self { focus, radius }
    }

    /// Page indices of the window clamped to `1..=total_pages`.
    pub fn range(&self, total_pages: usize) -> RangeInclusive<usize> {
        let min = self.focus.saturating_sub(self.radius).max(1);
        let max = (self.focus + self.radius).min(total_pages);
        min..=max
    }

    pub fn contains(&self, index: usize) -> bool {
        index.abs_diff(self.focus) <= self.radius
    }
}

/// Claim on a deferred creation. Publishing succeeds only while the entry it
/// was issued for is still pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    index: usize,
    serial: u64,
}

impl Ticket {
    pub fn index(&self) -> usize {
        self.index
    }
}

/// What a window update changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowUpdate {
    /// Retention window after the update.
    pub window: CacheWindow,
    /// Indices dropped, ascending.
    pub evicted: Vec<usize>,
    /// Indices built synchronously, in creation order.
    pub created: Vec<usize>,
    /// Indices whose creation failed, in creation order.
    pub failed: Vec<usize>,
}

/// Outcome of publishing a deferred completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Publish {
    Inserted,
    /// Creation failed; the page stays absent.
    Failed,
    /// The entry was evicted or invalidated before the completion arrived.
    Stale,
}

enum Slot<R> {
    Ready(R),
    Pending(u64),
}

/// Cache of per-page resources around a moving focus.
pub struct PageResourceCache<F: ResourceFactory> {
    factory: Arc<F>,
    radius_visible: usize,
    radius_create: usize,
    window: Option<CacheWindow>,
    entries: FxHashMap<usize, Slot<F::Resource>>,
    next_serial: u64,
}

impl<F: ResourceFactory> PageResourceCache<F> {
    /// # Panics
    /// Panics unless `1 <= radius_create <= radius_visible`.
    pub fn new(factory: F, radius_visible: usize, radius_create: usize) -> Self {
        Self::with_shared(Arc::new(factory), radius_visible, radius_create)
    }

    /// Like [`PageResourceCache::new`] for a factory already shared with
    /// worker threads.
    pub fn with_shared(factory: Arc<F>, radius_visible: usize, radius_create: usize) -> Self {
        assert!(radius_create >= 1, "radius_create must be at least 1");
        assert!(
            radius_create <= radius_visible,
            "radius_create ({radius_create}) exceeds radius_visible ({radius_visible})"
        );
        Self {
            factory,
            radius_visible,
            radius_create,
            window: None,
            entries: FxHashMap::default(),
            next_serial: 0,
        }
    }

    pub fn factory(&self) -> &Arc<F> {
        &self.factory
    }

    pub fn radius_visible(&self) -> usize {
        self.radius_visible
    }

    pub fn radius_create(&self) -> usize {
        self.radius_create
    }

    /// Retention window of the last update, `None` before the first one or
    /// after an invalidation.
    pub fn current_window(&self) -> Option<CacheWindow> {
        self.window
    }

    /// Moves the window to `focus` and builds missing pages synchronously.
    ///
    /// Entries already pending from a deferred plan are left to their
    /// workers. Creation failures are logged and leave the page absent.
    ///
    /// # Panics
    /// Panics if `focus` is outside `1..=total_pages`.
    pub fn window(&mut self, focus: usize, total_pages: usize) -> WindowUpdate {
        let (mut next, window, evicted) = self.retain(focus, total_pages);

        let mut created = Vec::new();
        let mut failed = Vec::new();
        for index in self.creation_order(focus, total_pages) {
            if next.contains_key(&index) {
                continue;
            }
            match self.factory.create(index) {
                Ok(resource) => {
                    next.insert(index, Slot::Ready(resource));
                    created.push(index);
                }
                Err(err) => {
                    tracing::warn!(page = index, error = %err, "page resource creation failed");
                    failed.push(index);
                }
            }
        }

        self.entries = next;
        self.window = Some(window);
        tracing::debug!(
            focus,
            evicted = evicted.len(),
            created = created.len(),
            resident = self.entries.len(),
            "cache window updated"
        );

        WindowUpdate {
            window,
            evicted,
            created,
            failed,
        }
    }

    /// Moves the window to `focus` and reserves missing pages for deferred
    /// creation.
    ///
    /// Returns one ticket per reserved page, nearest to the focus first.
    /// Submit them to a worker pool and hand each completion to
    /// [`PageResourceCache::publish`].
    ///
    /// # Panics
    /// Panics if `focus` is outside `1..=total_pages`.
    pub fn plan_window(
        &mut self,
        focus: usize,
        total_pages: usize,
    ) -> (WindowUpdate, Vec<Ticket>) {
        let (mut next, window, evicted) = self.retain(focus, total_pages);

        let mut tickets = Vec::new();
        for index in self.creation_order(focus, total_pages) {
            if next.contains_key(&index) {
                continue;
            }
            let serial = self.next_serial;
            self.next_serial += 1;
            next.insert(index, Slot::Pending(serial));
            tickets.push(Ticket { index, serial });
        }

        self.entries = next;
        self.window = Some(window);
        tracing::debug!(
            focus,
            evicted = evicted.len(),
            reserved = tickets.len(),
            resident = self.entries.len(),
            "cache window planned"
        );

        let update = WindowUpdate {
            window,
            evicted,
            created: Vec::new(),
            failed: Vec::new(),
        };
        (update, tickets)
    }

    /// Publishes a deferred completion.
    ///
    /// The result is inserted only if `ticket` still matches a pending entry.
    /// Completions for pages evicted or invalidated since the plan are
    /// discarded.
    pub fn publish(&mut self, ticket: Ticket, result: Result<F::Resource>) -> Publish {
        match self.entries.get(&ticket.index) {
            Some(Slot::Pending(serial)) if *serial == ticket.serial => {}
            _ => {
                tracing::debug!(page = ticket.index, "discarding stale page resource");
                return Publish::Stale;
            }
        }

        match result {
            Ok(resource) => {
                self.entries.insert(ticket.index, Slot::Ready(resource));
                Publish::Inserted
            }
            Err(err) => {
                tracing::warn!(page = ticket.index, error = %err, "page resource creation failed");
                self.entries.remove(&ticket.index);
                Publish::Failed
            }
        }
    }

    /// Drops every entry, ready or pending.
    ///
    /// Outstanding tickets become stale. The next window update rebuilds
    /// from empty.
    pub fn invalidate_all(&mut self) {
        let dropped = self.entries.len();
        self.entries.clear();
        self.window = None;
        tracing::info!(dropped, "page resource cache invalidated");
    }

    /// A fresh placeholder resource. Never cached.
    pub fn empty_resource(&self) -> F::Resource {
        self.factory.blank()
    }

    /// Ready resource for `index`.
    pub fn get(&self, index: usize) -> Option<&F::Resource> {
        match self.entries.get(&index) {
            Some(Slot::Ready(resource)) => Some(resource),
            _ => None,
        }
    }

    /// True when a ready resource exists for `index`.
    pub fn contains(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// True when `index` is reserved for a deferred creation.
    pub fn is_pending(&self, index: usize) -> bool {
        matches!(self.entries.get(&index), Some(Slot::Pending(_)))
    }

    /// Resident entries, ready or pending.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resident indices, ascending.
    pub fn indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.entries.keys().copied().collect();
        indices.sort_unstable();
        indices
    }

    /// Ready resources, ascending by index.
    pub fn resources(&self) -> Vec<(usize, &F::Resource)> {
        let mut ready: Vec<(usize, &F::Resource)> = self
            .entries
            .iter()
            .filter_map(|(index, slot)| match slot {
                Slot::Ready(resource) => Some((*index, resource)),
                Slot::Pending(_) => None,
            })
            .collect();
        ready.sort_unstable_by_key(|(index, _)| *index);
        ready
    }

    /// Splits current entries into those kept by the window around `focus`
    /// and the evicted indices.
    fn retain(
        &mut self,
        focus: usize,
        total_pages: usize,
    ) -> (FxHashMap<usize, Slot<F::Resource>>, CacheWindow, Vec<usize>) {
        assert!(
            (1..=total_pages).contains(&focus),
            "focus page {focus} outside 1..={total_pages}"
        );

        let window = CacheWindow::new(focus, self.radius_visible);

        let mut next = FxHashMap::default();
        let mut evicted = Vec::new();
        for (index, slot) in self.entries.drain() {
            if window.contains(index) && index <= total_pages {
                next.insert(index, slot);
            } else {
                evicted.push(index);
            }
        }
        evicted.sort_unstable();
        (next, window, evicted)
    }

    /// Indices of the creation window, nearest to `focus` first.
    fn creation_order(&self, focus: usize, total_pages: usize) -> Vec<usize> {
        let mut order: Vec<usize> = CacheWindow::new(focus, self.radius_create)
            .range(total_pages)
            .collect();
        order.sort_by_key(|&index| (index.abs_diff(focus), index));
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;

    struct Numbered;

    impl ResourceFactory for Numbered {
        type Resource = usize;

        fn create(&self, index: usize) -> Result<usize> {
            if index == 13 {
                return Err(LayoutError::PageUnavailable(index));
            }
            Ok(index)
        }

        fn blank(&self) -> usize {
            0
        }
    }

    #[test]
    fn test_window_range_clamps() {
        assert_eq!(CacheWindow::new(2, 4).range(10), 1..=6);
        assert_eq!(CacheWindow::new(9, 4).range(10), 5..=10);
        assert_eq!(CacheWindow::new(1, 1).range(1), 1..=1);
    }

    #[test]
    fn test_window_contains_ignores_document_bounds() {
        let window = CacheWindow::new(2, 3);
        assert!(window.contains(1));
        assert!(window.contains(5));
        assert!(!window.contains(6));
    }

    #[test]
    fn test_retain_evicts_outside_visible_radius() {
        let mut cache = PageResourceCache::new(Numbered, 2, 1);
        cache.window(5, 20);
        let update = cache.window(8, 20);
        assert_eq!(update.evicted, vec![4, 5]);
        assert_eq!(cache.indices(), vec![6, 7, 8, 9]);
    }

    #[test]
    fn test_creation_order_nearest_first() {
        let cache = PageResourceCache::new(Numbered, 4, 3);
        assert_eq!(cache.creation_order(5, 10), vec![5, 4, 6, 3, 7, 2, 8]);
        assert_eq!(cache.creation_order(1, 10), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_failed_creation_leaves_page_absent() {
        let mut cache = PageResourceCache::new(Numbered, 2, 1);
        let update = cache.window(13, 20);
        assert_eq!(update.failed, vec![13]);
        assert_eq!(update.created, vec![12, 14]);
        assert!(!cache.contains(13));
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_out_of_range_focus_panics() {
        let mut cache = PageResourceCache::new(Numbered, 4, 3);
        cache.window(0, 10);
    }
}
