//! In-memory document adapter.
//!
//! Useful for hosts that already extracted page boxes (or cached them from a
//! previous session) and for driving the engine in tests and the CLI.

use crate::geometry::{Rect, Size};

use super::page::{BoxKind, DocumentProvider, PageSource};

/// Page boxes and rotation held by value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StaticPage {
    pub media_box: Rect,
    pub crop_box: Option<Rect>,
    pub bleed_box: Option<Rect>,
    pub trim_box: Option<Rect>,
    pub art_box: Option<Rect>,
    pub rotation: i32,
}

impl StaticPage {
    pub fn new(media_box: Rect) -> Self {
        Self {
            media_box,
            ..Self::default()
        }
    }

    /// Page whose media box is `size` anchored at the origin.
    pub fn sized(width: f64, height: f64) -> Self {
        Self::new(Rect::from_size(Size::new(width, height)))
    }

    pub fn with_crop_box(mut self, rect: Rect) -> Self {
        self.crop_box = Some(rect);
        self
    }

    pub fn with_box(mut self, kind: BoxKind, rect: Rect) -> Self {
        match kind {
            BoxKind::Media => self.media_box = rect,
            BoxKind::Crop => self.crop_box = Some(rect),
            BoxKind::Bleed => self.bleed_box = Some(rect),
            BoxKind::Trim => self.trim_box = Some(rect),
            BoxKind::Art => self.art_box = Some(rect),
        }
        self
    }

    pub fn with_rotation(mut self, degrees: i32) -> Self {
        self.rotation = degrees;
        self
    }
}

impl PageSource for StaticPage {
    fn box_rect(&self, kind: BoxKind) -> Option<Rect> {
        match kind {
            BoxKind::Media => Some(self.media_box),
            BoxKind::Crop => self.crop_box,
            BoxKind::Bleed => self.bleed_box,
            BoxKind::Trim => self.trim_box,
            BoxKind::Art => self.art_box,
        }
    }

    fn rotation_degrees(&self) -> i32 {
        self.rotation
    }
}

/// A document backed by a vector of [`StaticPage`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticDocument {
    pages: Vec<StaticPage>,
}

impl StaticDocument {
    pub fn new(pages: Vec<StaticPage>) -> Self {
        Self { pages }
    }

    /// `count` identical unrotated pages of the given size.
    pub fn uniform(count: usize, width: f64, height: f64) -> Self {
        Self::new(vec![StaticPage::sized(width, height); count])
    }

    pub fn push(&mut self, page: StaticPage) {
        self.pages.push(page);
    }

    pub fn pages(&self) -> &[StaticPage] {
        &self.pages
    }
}

impl DocumentProvider for StaticDocument {
    type Page = StaticPage;

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Option<StaticPage> {
        index
            .checked_sub(1)
            .and_then(|i| self.pages.get(i))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::page::resolve_box;

    #[test]
    fn test_page_indices_are_one_based() {
        let doc = StaticDocument::uniform(3, 100.0, 200.0);
        assert!(doc.page(0).is_none());
        assert!(doc.page(1).is_some());
        assert!(doc.page(3).is_some());
        assert!(doc.page(4).is_none());
    }

    #[test]
    fn test_trim_falls_back_to_crop() {
        let crop = Rect::new(10.0, 10.0, 80.0, 180.0);
        let page = StaticPage::sized(100.0, 200.0).with_crop_box(crop);
        assert_eq!(resolve_box(&page, BoxKind::Trim), Some(crop));
        assert_eq!(
            resolve_box(&StaticPage::sized(100.0, 200.0), BoxKind::Art),
            Some(Rect::new(0.0, 0.0, 100.0, 200.0))
        );
    }
}
