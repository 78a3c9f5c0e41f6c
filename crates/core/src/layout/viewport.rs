//! Viewport sizing for spreads.
//!
//! The spread frame is sized from the largest page in the document so that
//! page turns never resize the frame: the max page size (doubled in width for
//! two-page spreads) is aspect-fitted into the view minus its margins, then
//! centered in the full view.

use smallvec::{SmallVec, smallvec};

use crate::document::{BoxKind, DocumentProvider, PageGeometry};
use crate::geometry::{Rect, Size};

use super::fit::{RoundingPolicy, aspect_fit};
use super::spread::SpreadMode;

/// Space kept free around the spread frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutMargin {
    pub horizontal: f64,
    pub vertical: f64,
}

impl LayoutMargin {
    pub const ZERO: LayoutMargin = LayoutMargin {
        horizontal: 0.0,
        vertical: 0.0,
    };

    pub const fn new(horizontal: f64, vertical: f64) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Same margin on every side.
    pub const fn uniform(margin: f64) -> Self {
        Self::new(margin, margin)
    }
}

/// Component-wise maximum of every page's displayed size.
///
/// Pages the provider cannot produce are skipped.
pub fn max_page_size<D: DocumentProvider + ?Sized>(doc: &D, kind: BoxKind) -> Size {
    (1..=doc.page_count())
        .filter_map(|index| doc.page(index))
        .filter_map(|page| PageGeometry::from_page(&page, kind))
        .fold(Size::ZERO, |acc, geom| acc.max(geom.size()))
}

/// Frame the spread occupies inside a view of `view` size.
pub fn spread_frame(
    view: Size,
    margin: LayoutMargin,
    max_page: Size,
    mode: SpreadMode,
    rounding: RoundingPolicy,
) -> Rect {
    let content = match mode {
        SpreadMode::Single => max_page,
        SpreadMode::Double => Size::new(max_page.width * 2.0, max_page.height),
    };
    let available = Rect::from_size(view)
        .inset(margin.horizontal, margin.vertical)
        .size;
    let fitted = aspect_fit(content, available, rounding);

    let x = ((view.width - fitted.width) / 2.0).max(0.0);
    let y = ((view.height - fitted.height) / 2.0).max(0.0);
    Rect::new(x, y, fitted.width, fitted.height)
}

/// Slot rectangles of a spread frame, left to right.
pub fn slot_rects(frame: Rect, mode: SpreadMode) -> SmallVec<[Rect; 2]> {
    match mode {
        SpreadMode::Single => smallvec![frame],
        SpreadMode::Double => {
            let half = frame.width() / 2.0;
            smallvec![
                Rect::new(frame.min_x(), frame.min_y(), half, frame.height()),
                Rect::new(frame.min_x() + half, frame.min_y(), half, frame.height()),
            ]
        }
    }
}

/// Default zoom limits and step.
pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 8.0;
pub const ZOOM_FACTOR: f64 = 2.0;

/// Discrete zoom stepping clamped to `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomState {
    scale: f64,
    min: f64,
    max: f64,
    factor: f64,
}

impl Default for ZoomState {
    fn default() -> Self {
        Self::new(MIN_ZOOM, MAX_ZOOM, ZOOM_FACTOR)
    }
}

impl ZoomState {
    /// # Panics
    /// Panics unless `0 < min <= max` and `factor > 1`.
    pub fn new(min: f64, max: f64, factor: f64) -> Self {
        assert!(
            min > 0.0 && min <= max,
            "zoom limits must satisfy 0 < min <= max"
        );
        assert!(factor > 1.0, "zoom factor must be greater than 1");
        Self {
            scale: min,
            min,
            max,
            factor,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.scale = (self.scale * self.factor).min(self.max);
        self.scale
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.scale = (self.scale / self.factor).max(self.min);
        self.scale
    }

    /// Back to the minimum scale, as after a relayout.
    pub fn reset(&mut self) {
        self.scale = self.min;
    }

    /// Page turns are only allowed when not zoomed in.
    pub fn allows_page_turn(&self) -> bool {
        self.scale <= self.min
    }
}
