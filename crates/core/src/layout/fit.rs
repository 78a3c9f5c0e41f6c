//! Aspect-fit sizing.
//!
//! Every size the engine derives for a page (slot sizing, draw scale,
//! thumbnail images) goes through [`aspect_fit`]. The rounding policy is an
//! explicit argument: measurement and slot construction for one page must use
//! the same policy, otherwise the fitted image and the slot built around it
//! disagree by up to a unit.

use crate::geometry::Size;

/// Quantization applied to a fitted size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoundingPolicy {
    /// Keep exact fractional values.
    #[default]
    None,
    /// Floor both dimensions.
    Down,
    /// Ceil both dimensions.
    Up,
    /// Round both dimensions to the nearest integer, halves away from zero.
    Nearest,
}

impl RoundingPolicy {
    /// Applies the policy to a single value.
    #[inline]
    pub fn apply(self, value: f64) -> f64 {
        match self {
            RoundingPolicy::None => value,
            RoundingPolicy::Down => value.floor(),
            RoundingPolicy::Up => value.ceil(),
            RoundingPolicy::Nearest => value.round(),
        }
    }

    /// Applies the policy to both dimensions of a size.
    pub fn apply_size(self, size: Size) -> Size {
        Size::new(self.apply(size.width), self.apply(size.height))
    }
}

/// Fits `source` into `into` preserving its aspect ratio.
///
/// A source with a zero dimension yields `Size::ZERO` for every destination
/// and policy.
pub fn aspect_fit(source: Size, into: Size, rounding: RoundingPolicy) -> Size {
    match fit_ratio(source, into) {
        Some(ratio) => rounding.apply_size(source.scaled(ratio)),
        None => Size::ZERO,
    }
}

/// Ratio `aspect_fit` would scale `source` by, or `None` for a degenerate
/// source.
pub fn fit_ratio(source: Size, into: Size) -> Option<f64> {
    if source.width == 0.0 || source.height == 0.0 {
        return None;
    }
    Some((into.width / source.width).min(into.height / source.height))
}
