//! Book view controller.
//!
//! Ties the components together the way a host drives them: the navigation
//! driver picks a focus page and orientation, [`BookView`] asks the
//! [`SpreadAssembler`] what to show, moves the resource cache window around
//! the focus, and computes a [`PageTransform`] for each slot of the spread
//! frame.
//!
//! # Example
//!
//! ```ignore
//! use bookfold_core::api::BookView;
//! use bookfold_core::layout::{Orientation, ViewerParams};
//!
//! let mut view = BookView::new(document, factory, ViewerParams::default())?;
//! view.set_orientation(Orientation::Landscape);
//! view.show(4);
//! for slot in view.layout(Size::new(1024.0, 768.0)) {
//!     // hand slot.transform to the renderer
//! }
//! ```

use crate::cache::{PageResourceCache, RenderPool, ResourceFactory, WindowUpdate};
use crate::document::{DocumentProvider, PageGeometry};
use crate::error::{LayoutError, Result};
use crate::geometry::{Rect, Size};
use crate::layout::{
    Orientation, PageTransform, Spread, SpreadAssembler, SpreadSlot, ViewerParams, ZoomState,
    max_page_size, slot_rects, spread_frame,
};

/// Placement of one spread slot inside the view.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotLayout {
    pub slot: SpreadSlot,
    /// Slot rectangle in view coordinates.
    pub rect: Rect,
    /// How to draw the page into `rect`. `None` for blank slots and pages the
    /// document cannot produce or measure.
    pub transform: Option<PageTransform>,
}

/// Paginated book view over a document.
pub struct BookView<D: DocumentProvider, F: ResourceFactory> {
    document: D,
    params: ViewerParams,
    assembler: SpreadAssembler,
    orientation: Orientation,
    focus: usize,
    spread: Spread,
    max_page: Size,
    cache: PageResourceCache<F>,
    zoom: ZoomState,
}

impl<D: DocumentProvider, F: ResourceFactory> BookView<D, F> {
    /// Opens a view on page 1 in portrait orientation.
    pub fn new(document: D, factory: F, params: ViewerParams) -> Result<Self> {
        params.validate()?;
        let total = document.page_count();
        if total == 0 {
            return Err(LayoutError::EmptyDocument);
        }

        let assembler = SpreadAssembler::new(params.has_cover_page);
        let orientation = Orientation::Portrait;
        let spread = assembler.compute(1, total, orientation);
        let max_page = max_page_size(&document, params.box_kind);
        let cache = PageResourceCache::new(factory, params.radius_visible, params.radius_create);

        let mut view = Self {
            document,
            params,
            assembler,
            orientation,
            focus: 1,
            spread,
            max_page,
            cache,
            zoom: ZoomState::default(),
        };
        tracing::debug!(
            pages = total,
            page_box = view.params.box_kind.key(),
            cover = view.params.has_cover_page,
            "book view opened"
        );
        view.cache.window(1, total);
        Ok(view)
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn params(&self) -> &ViewerParams {
        &self.params
    }

    pub fn page_count(&self) -> usize {
        self.document.page_count()
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn spread(&self) -> &Spread {
        &self.spread
    }

    pub fn cache(&self) -> &PageResourceCache<F> {
        &self.cache
    }

    pub fn zoom(&self) -> &ZoomState {
        &self.zoom
    }

    pub fn zoom_mut(&mut self) -> &mut ZoomState {
        &mut self.zoom
    }

    /// Ready resource for a page in the cache window.
    pub fn resource(&self, index: usize) -> Option<&F::Resource> {
        self.cache.get(index)
    }

    /// Placeholder resource for blank or failed slots.
    pub fn blank_resource(&self) -> F::Resource {
        self.cache.empty_resource()
    }

    /// Shows the spread containing `focus`, building resources synchronously.
    ///
    /// # Panics
    /// Panics if `focus` is outside `1..=page_count()`.
    pub fn show(&mut self, focus: usize) -> WindowUpdate {
        let total = self.page_count();
        self.spread = self.assembler.compute(focus, total, self.orientation);
        self.focus = focus;
        tracing::debug!(focus, spread = ?self.spread.slots(), "showing spread");
        self.cache.window(focus, total)
    }

    /// Shows the spread containing `focus` and queues missing resources on
    /// `pool`. Call [`RenderPool::drain`] with [`BookView::cache_mut`] on
    /// this thread to publish them.
    ///
    /// # Panics
    /// Panics if `focus` is outside `1..=page_count()`.
    pub fn show_deferred(
        &mut self,
        focus: usize,
        pool: &mut RenderPool<F::Resource>,
    ) -> WindowUpdate
    where
        F: 'static,
        F::Resource: 'static,
    {
        let total = self.page_count();
        self.spread = self.assembler.compute(focus, total, self.orientation);
        self.focus = focus;
        let (update, tickets) = self.cache.plan_window(focus, total);
        pool.submit(self.cache.factory(), &tickets);
        tracing::debug!(focus, queued = tickets.len(), "showing spread with deferred resources");
        update
    }

    pub fn cache_mut(&mut self) -> &mut PageResourceCache<F> {
        &mut self.cache
    }

    /// Turns to the next spread. `None` at the end of the document or while
    /// zoomed in.
    pub fn next(&mut self) -> Option<&Spread> {
        if !self.zoom.allows_page_turn() {
            return None;
        }
        let focus = self
            .assembler
            .next_focus(&self.spread, self.page_count())?;
        self.show(focus);
        Some(&self.spread)
    }

    /// Turns to the previous spread. `None` at the start of the document or
    /// while zoomed in.
    pub fn previous(&mut self) -> Option<&Spread> {
        if !self.zoom.allows_page_turn() {
            return None;
        }
        let focus = self.assembler.previous_focus(&self.spread)?;
        self.show(focus);
        Some(&self.spread)
    }

    /// Applies an orientation change.
    ///
    /// The new focus is the first page of the spread currently shown. Cached
    /// slots are sized per orientation, so the whole cache is invalidated and
    /// rebuilt synchronously. Hosts creating resources on a pool use
    /// [`BookView::set_orientation_deferred`].
    pub fn set_orientation(&mut self, orientation: Orientation) {
        if let Some(focus) = self.reorient(orientation) {
            self.show(focus);
        }
    }

    /// Like [`BookView::set_orientation`], but queues the rebuilt window on
    /// `pool`. Returns `None` when the orientation is unchanged.
    pub fn set_orientation_deferred(
        &mut self,
        orientation: Orientation,
        pool: &mut RenderPool<F::Resource>,
    ) -> Option<WindowUpdate>
    where
        F: 'static,
        F::Resource: 'static,
    {
        let focus = self.reorient(orientation)?;
        Some(self.show_deferred(focus, pool))
    }

    /// Switches orientation and drops everything sized for the old one.
    /// Returns the focus to show next, or `None` if nothing changed.
    fn reorient(&mut self, orientation: Orientation) -> Option<usize> {
        if orientation == self.orientation {
            return None;
        }
        let focus = self.spread.first_page().unwrap_or(1);
        tracing::info!(?orientation, focus, "orientation changed");
        self.orientation = orientation;
        self.cache.invalidate_all();
        self.zoom.reset();
        Some(focus)
    }

    /// Host memory-pressure hook: drops every cached resource. The next
    /// [`BookView::show`] rebuilds the window.
    pub fn handle_memory_pressure(&mut self) {
        self.cache.invalidate_all();
    }

    /// Lays out the current spread inside a view of `view` size.
    pub fn layout(&self, view: Size) -> Vec<SlotLayout> {
        let mode = self.spread.mode();
        let frame = spread_frame(
            view,
            self.params.margin,
            self.max_page,
            mode,
            self.params.rounding,
        );

        self.spread
            .slots()
            .iter()
            .zip(slot_rects(frame, mode))
            .map(|(slot, rect)| SlotLayout {
                slot: *slot,
                rect,
                transform: self.slot_transform(slot, rect),
            })
            .collect()
    }

    fn slot_transform(&self, slot: &SpreadSlot, rect: Rect) -> Option<PageTransform> {
        let SpreadSlot::Page { index, alignment } = *slot else {
            return None;
        };
        let page = self.document.page(index)?;
        let geometry = PageGeometry::from_page(&page, self.params.box_kind)?;
        let transform = PageTransform::compute(&geometry, rect, alignment);
        (!transform.is_empty()).then_some(transform)
    }
}
