//! Viewer parameters.
//!
//! Contains ViewerParams, the construction-time configuration of a book view.

use crate::document::BoxKind;
use crate::error::{LayoutError, Result};

use super::fit::RoundingPolicy;
use super::viewport::LayoutMargin;

/// Default retention radius of the page cache.
pub const DEFAULT_RADIUS_VISIBLE: usize = 4;

/// Default eager-creation radius of the page cache.
pub const DEFAULT_RADIUS_CREATE: usize = DEFAULT_RADIUS_VISIBLE - 1;

/// Parameters for a book view.
///
/// Controls page pairing, which page box is displayed, how far around the
/// focus page resources are kept and built, and how slot sizes are rounded.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerParams {
    /// Show page 1 alone so that even pages sit on the left of the spine.
    pub has_cover_page: bool,

    /// Page box that defines the visible region of each page.
    pub box_kind: BoxKind,

    /// Pages further than this from the focus are evicted from the cache.
    pub radius_visible: usize,

    /// Pages within this distance of the focus are always built. Must not
    /// exceed `radius_visible`.
    pub radius_create: usize,

    /// Rounding applied to spread frame sizing.
    pub rounding: RoundingPolicy,

    /// Space kept free around the spread frame.
    pub margin: LayoutMargin,
}

impl Default for ViewerParams {
    fn default() -> Self {
        Self {
            has_cover_page: false,
            box_kind: BoxKind::Crop,
            radius_visible: DEFAULT_RADIUS_VISIBLE,
            radius_create: DEFAULT_RADIUS_CREATE,
            rounding: RoundingPolicy::None,
            margin: LayoutMargin::ZERO,
        }
    }
}

impl ViewerParams {
    pub fn with_cover_page(mut self, has_cover_page: bool) -> Self {
        self.has_cover_page = has_cover_page;
        self
    }

    pub fn with_box_kind(mut self, box_kind: BoxKind) -> Self {
        self.box_kind = box_kind;
        self
    }

    pub fn with_radii(mut self, radius_visible: usize, radius_create: usize) -> Self {
        self.radius_visible = radius_visible;
        self.radius_create = radius_create;
        self
    }

    pub fn with_rounding(mut self, rounding: RoundingPolicy) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn with_margin(mut self, margin: LayoutMargin) -> Self {
        self.margin = margin;
        self
    }

    /// Checks the radii and margin.
    pub fn validate(&self) -> Result<()> {
        if self.radius_visible == 0 {
            return Err(LayoutError::InvalidParams(
                "radius_visible must be at least 1".to_string(),
            ));
        }
        if self.radius_create == 0 {
            return Err(LayoutError::InvalidParams(
                "radius_create must be at least 1".to_string(),
            ));
        }
        if self.radius_create > self.radius_visible {
            return Err(LayoutError::InvalidParams(format!(
                "radius_create ({}) exceeds radius_visible ({})",
                self.radius_create, self.radius_visible
            )));
        }
        if !(self.margin.horizontal >= 0.0 && self.margin.vertical >= 0.0) {
            return Err(LayoutError::InvalidParams(format!(
                "margins must be non-negative, got {:?}",
                self.margin
            )));
        }
        Ok(())
    }
}
