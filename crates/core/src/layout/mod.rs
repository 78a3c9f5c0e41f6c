//! Layout module for page composition.
//!
//! This module contains:
//! - Aspect-fit sizing and rounding policies (`fit`)
//! - Page draw transforms (`transform`)
//! - Spread assembly and page-turn navigation (`spread`)
//! - Spread frame sizing, margins and zoom (`viewport`)
//! - Viewer parameters (`params`)

pub mod fit;
pub mod params;
pub mod spread;
pub mod transform;
pub mod viewport;

pub use fit::{RoundingPolicy, aspect_fit, fit_ratio};
pub use params::{DEFAULT_RADIUS_CREATE, DEFAULT_RADIUS_VISIBLE, ViewerParams};
pub use spread::{Orientation, Spread, SpreadAssembler, SpreadMode, SpreadSlot};
pub use transform::{Alignment, DrawOp, PageTransform, Thumbnail};
pub use viewport::{LayoutMargin, ZoomState, max_page_size, slot_rects, spread_frame};
