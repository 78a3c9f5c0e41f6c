//! Page capabilities and resolved page geometry.
//!
//! The engine never owns a document. Hosts adapt whatever page object their
//! backend exposes to [`PageSource`] and hand the engine a
//! [`DocumentProvider`]; everything downstream works from a [`PageGeometry`]
//! snapshot taken per call.

use std::sync::Arc;

use crate::geometry::{Rect, Size};

/// Named page boxes, following the PDF box model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoxKind {
    /// Physical page size.
    Media,
    /// Visible region. Falls back to the media box.
    #[default]
    Crop,
    /// Printing bleed area. Falls back to the crop box.
    Bleed,
    /// Finished page size after trimming. Falls back to the crop box.
    Trim,
    /// Meaningful content area. Falls back to the crop box.
    Art,
}

impl BoxKind {
    /// PDF dictionary key for the box.
    pub const fn key(self) -> &'static str {
        match self {
            BoxKind::Media => "MediaBox",
            BoxKind::Crop => "CropBox",
            BoxKind::Bleed => "BleedBox",
            BoxKind::Trim => "TrimBox",
            BoxKind::Art => "ArtBox",
        }
    }

    /// Parses a case-insensitive box name (`"crop"`, `"CropBox"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        let stem = lower.strip_suffix("box").unwrap_or(&lower);
        match stem {
            "media" => Some(BoxKind::Media),
            "crop" => Some(BoxKind::Crop),
            "bleed" => Some(BoxKind::Bleed),
            "trim" => Some(BoxKind::Trim),
            "art" => Some(BoxKind::Art),
            _ => None,
        }
    }
}

/// Quarter-turn page rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Normalizes an arbitrary `/Rotate` value into `[0, 360)`.
    ///
    /// Negative values wrap (`-90` is `270`). Values that are not a multiple
    /// of 90 are treated as unrotated.
    pub fn from_degrees(degrees: i32) -> Self {
        match degrees.rem_euclid(360) {
            90 => Rotation::Deg90,
            180 => Rotation::Deg180,
            270 => Rotation::Deg270,
            _ => Rotation::Deg0,
        }
    }

    pub const fn degrees(self) -> i32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// True for 90 and 270, where the displayed width and height swap.
    pub const fn is_quarter_turn(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

/// A single page as exposed by the host's document backend.
pub trait PageSource {
    /// Rectangle of the named box, if the page defines it.
    ///
    /// Implementations return only what the page itself carries; fallbacks
    /// between boxes are applied by [`resolve_box`].
    fn box_rect(&self, kind: BoxKind) -> Option<Rect>;

    /// Raw rotation in degrees. Need not be normalized.
    fn rotation_degrees(&self) -> i32;
}

/// An already-opened document.
///
/// Page indices are 1-based. `page` returns `None` for an invalid index or
/// when the backing resource is temporarily unavailable.
pub trait DocumentProvider {
    type Page: PageSource;

    fn page_count(&self) -> usize;

    fn page(&self, index: usize) -> Option<Self::Page>;
}

impl<D: DocumentProvider + ?Sized> DocumentProvider for Arc<D> {
    type Page = D::Page;

    fn page_count(&self) -> usize {
        (**self).page_count()
    }

    fn page(&self, index: usize) -> Option<Self::Page> {
        (**self).page(index)
    }
}

impl<D: DocumentProvider + ?Sized> DocumentProvider for &D {
    type Page = D::Page;

    fn page_count(&self) -> usize {
        (**self).page_count()
    }

    fn page(&self, index: usize) -> Option<Self::Page> {
        (**self).page(index)
    }
}

/// Resolves a box with PDF inheritance rules.
///
/// Crop falls back to media; bleed, trim and art fall back to the resolved
/// crop box.
pub fn resolve_box<P: PageSource + ?Sized>(page: &P, kind: BoxKind) -> Option<Rect> {
    match kind {
        BoxKind::Media => page.box_rect(BoxKind::Media),
        BoxKind::Crop => page
            .box_rect(BoxKind::Crop)
            .or_else(|| page.box_rect(BoxKind::Media)),
        BoxKind::Bleed | BoxKind::Trim | BoxKind::Art => page
            .box_rect(kind)
            .or_else(|| resolve_box(page, BoxKind::Crop)),
    }
}

/// Resolved geometry of one page for one configured box kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub media_box: Rect,
    pub display_box: Rect,
    pub rotation: Rotation,
}

impl PageGeometry {
    pub fn new(media_box: Rect, display_box: Rect, rotation_degrees: i32) -> Self {
        Self {
            media_box,
            display_box,
            rotation: Rotation::from_degrees(rotation_degrees),
        }
    }

    /// Snapshot of `page` for the configured box. `None` when the page has no
    /// media box at all.
    pub fn from_page<P: PageSource + ?Sized>(page: &P, kind: BoxKind) -> Option<Self> {
        let media_box = page.box_rect(BoxKind::Media)?;
        let display_box = resolve_box(page, kind).unwrap_or(media_box);
        Some(Self::new(media_box, display_box, page.rotation_degrees()))
    }

    /// Region actually drawn: the display box clipped to the media box.
    pub fn box_rect(&self) -> Option<Rect> {
        self.media_box.intersection(&self.display_box)
    }

    /// Displayed size of the page, with width and height swapped for quarter
    /// turns. Zero when the boxes do not overlap.
    pub fn size(&self) -> Size {
        let Some(rect) = self.box_rect() else {
            return Size::ZERO;
        };
        if self.rotation.is_quarter_turn() {
            rect.size.transposed()
        } else {
            rect.size
        }
    }
}
