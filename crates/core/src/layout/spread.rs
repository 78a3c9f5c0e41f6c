//! Spread assembly - which pages share the viewport.
//!
//! Portrait shows one centered page. Landscape pairs pages into two-page
//! spreads whose pages hug the spine: the left page is right-aligned in its
//! slot and the right page left-aligned. With a cover page, page 1 stands
//! alone on the right-hand side and pairing starts at 2|3; without one,
//! pairing starts at 1|2. A missing partner is rendered as a blank slot.

use smallvec::{SmallVec, smallvec};

use super::transform::Alignment;

/// Device orientation as reported by the navigation driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Whether one or two slots are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpreadMode {
    Single,
    Double,
}

/// One slot of a spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpreadSlot {
    Page { index: usize, alignment: Alignment },
    /// Placeholder with no page behind it.
    Blank,
}

impl SpreadSlot {
    pub fn page(index: usize, alignment: Alignment) -> Self {
        SpreadSlot::Page { index, alignment }
    }

    pub fn page_index(&self) -> Option<usize> {
        match self {
            SpreadSlot::Page { index, .. } => Some(*index),
            SpreadSlot::Blank => None,
        }
    }

    pub fn alignment(&self) -> Option<Alignment> {
        match self {
            SpreadSlot::Page { alignment, .. } => Some(*alignment),
            SpreadSlot::Blank => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, SpreadSlot::Blank)
    }
}

/// The pages shown together, left to right.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Spread {
    slots: SmallVec<[SpreadSlot; 2]>,
    mode: SpreadMode,
}

impl Spread {
    pub fn single(index: usize) -> Self {
        Self {
            slots: smallvec![SpreadSlot::page(index, Alignment::Center)],
            mode: SpreadMode::Single,
        }
    }

    pub fn double(left: SpreadSlot, right: SpreadSlot) -> Self {
        Self {
            slots: smallvec![left, right],
            mode: SpreadMode::Double,
        }
    }

    pub fn slots(&self) -> &[SpreadSlot] {
        &self.slots
    }

    pub fn mode(&self) -> SpreadMode {
        self.mode
    }

    /// Page indices shown, left to right, skipping blanks.
    pub fn pages(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots.iter().filter_map(SpreadSlot::page_index)
    }

    pub fn first_page(&self) -> Option<usize> {
        self.pages().next()
    }

    pub fn last_page(&self) -> Option<usize> {
        self.pages().last()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.pages().any(|p| p == index)
    }
}

/// Computes spreads for a fixed cover-page setting.
///
/// Stateless between calls: every result is a pure function of the focus,
/// the page count, the cover flag and the orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpreadAssembler {
    has_cover_page: bool,
}

impl SpreadAssembler {
    pub fn new(has_cover_page: bool) -> Self {
        Self { has_cover_page }
    }

    pub fn has_cover_page(&self) -> bool {
        self.has_cover_page
    }

    /// True when `page` sits on the right-hand side of its spread and pairs
    /// with its predecessor.
    pub fn pairs_with_previous(&self, page: usize) -> bool {
        let odd = page % 2 == 1;
        if self.has_cover_page { odd } else { !odd }
    }

    /// Spread showing `focus` out of `total_pages`.
    ///
    /// # Panics
    /// Panics if `focus` is outside `1..=total_pages`; the navigation driver
    /// owns bounds checking.
    pub fn compute(&self, focus: usize, total_pages: usize, orientation: Orientation) -> Spread {
        assert!(
            (1..=total_pages).contains(&focus),
            "focus page {focus} outside 1..={total_pages}"
        );

        if total_pages == 1 || orientation == Orientation::Portrait {
            return Spread::single(focus);
        }

        if self.pairs_with_previous(focus) {
            let current = SpreadSlot::page(focus, Alignment::Left);
            if focus > 1 {
                Spread::double(SpreadSlot::page(focus - 1, Alignment::Right), current)
            } else if self.has_cover_page {
                Spread::double(SpreadSlot::Blank, current)
            } else {
                Spread::single(focus)
            }
        } else {
            let current = SpreadSlot::page(focus, Alignment::Right);
            if focus < total_pages {
                Spread::double(current, SpreadSlot::page(focus + 1, Alignment::Left))
            } else {
                Spread::double(current, SpreadSlot::Blank)
            }
        }
    }

    /// Focus page of the spread after `spread`, if any.
    pub fn next_focus(&self, spread: &Spread, total_pages: usize) -> Option<usize> {
        let last = spread.last_page()?;
        if spread.slots().last().is_some_and(SpreadSlot::is_blank) {
            return None;
        }
        (last < total_pages).then_some(last + 1)
    }

    /// Focus page of the spread before `spread`, if any.
    pub fn previous_focus(&self, spread: &Spread) -> Option<usize> {
        let first = spread.first_page()?;
        if spread.slots().first().is_some_and(SpreadSlot::is_blank) {
            return None;
        }
        (first > 1).then(|| first - 1)
    }

    /// Alignment a neighbouring page receives when turned to from a page
    /// currently shown in `mode`.
    ///
    /// In single mode every page is centered. In double mode the neighbour's
    /// alignment follows the parity of the page being turned from: a page
    /// on the left of the spine hands its neighbours the left alignment.
    pub fn neighbor_alignment(&self, from_page: usize, mode: SpreadMode) -> Alignment {
        match mode {
            SpreadMode::Single => Alignment::Center,
            SpreadMode::Double => {
                if self.pairs_with_previous(from_page) {
                    Alignment::Right
                } else {
                    Alignment::Left
                }
            }
        }
    }
}
