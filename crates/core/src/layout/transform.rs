//! Page draw transforms.
//!
//! [`PageTransform::compute`] maps a page's displayed box, with its rotation,
//! onto an arbitrary destination rectangle. The result is both the ordered list
//! of graphics-state operations a renderer replays and the composed matrix
//! those operations produce.
//!
//! Operation order is significant: translate(offset), scale, the rotation
//! stage, clip, translate(-box origin). Reordering scale and rotation changes
//! the clip geometry.
//!
//! Destination rectangles are in device space with a top-left origin; page
//! boxes are in PDF space with a bottom-left origin. The rotation stage
//! performs the vertical flip between the two.

use smallvec::SmallVec;

use crate::document::{PageGeometry, Rotation};
use crate::geometry::{
    MATRIX_IDENTITY, Matrix, Point, Rect, Size, apply_matrix_pt, apply_matrix_rect, concat_matrix,
};

use super::fit::{RoundingPolicy, aspect_fit};

/// Horizontal placement of a fitted page inside its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Alignment {
    #[default]
    Center,
    /// Flush against the slot's left edge.
    Left,
    /// Flush against the slot's right edge.
    Right,
}

impl Alignment {
    /// Horizontal offset of content `content_width` wide inside `slot_width`.
    pub fn offset(self, slot_width: f64, content_width: f64) -> f64 {
        match self {
            Alignment::Center => (slot_width - content_width) / 2.0,
            Alignment::Left => 0.0,
            Alignment::Right => slot_width - content_width,
        }
    }
}

/// One graphics-state operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawOp {
    Translate { x: f64, y: f64 },
    Scale { x: f64, y: f64 },
    /// Quarter-turn rotation, counter-clockwise positive in a y-up space.
    Rotate { degrees: i32 },
    /// Intersect the clip path with a rectangle in the current space.
    Clip(Rect),
}

impl DrawOp {
    /// Matrix the operation prepends to the CTM. `None` for clips.
    pub fn matrix(&self) -> Option<Matrix> {
        match *self {
            DrawOp::Translate { x, y } => Some((1.0, 0.0, 0.0, 1.0, x, y)),
            DrawOp::Scale { x, y } => Some((x, 0.0, 0.0, y, 0.0, 0.0)),
            DrawOp::Rotate { degrees } => Some(quarter_turn_matrix(degrees)),
            DrawOp::Clip(_) => None,
        }
    }
}

/// Exact rotation matrix for multiples of 90 degrees.
///
/// `cos`/`sin` of a quarter turn leave residue around 1e-17; exact entries
/// keep transforms for equal inputs bit-identical.
fn quarter_turn_matrix(degrees: i32) -> Matrix {
    match degrees.rem_euclid(360) {
        90 => (0.0, 1.0, -1.0, 0.0, 0.0, 0.0),
        180 => (-1.0, 0.0, 0.0, -1.0, 0.0, 0.0),
        270 => (0.0, -1.0, 1.0, 0.0, 0.0, 0.0),
        _ => MATRIX_IDENTITY,
    }
}

/// Records operations while tracking the composed matrix.
struct OpRecorder {
    ops: SmallVec<[DrawOp; 8]>,
    ctm: Matrix,
    clip: Rect,
    device_clip: Rect,
}

impl OpRecorder {
    fn new() -> Self {
        Self {
            ops: SmallVec::new(),
            ctm: MATRIX_IDENTITY,
            clip: Rect::ZERO,
            device_clip: Rect::ZERO,
        }
    }

    fn push(&mut self, op: DrawOp) {
        if let DrawOp::Clip(rect) = op {
            self.clip = rect;
            self.device_clip = apply_matrix_rect(self.ctm, rect);
        } else if let Some(m) = op.matrix() {
            self.ctm = concat_matrix(self.ctm, m);
        }
        self.ops.push(op);
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.push(DrawOp::Translate { x, y });
    }

    fn scale(&mut self, x: f64, y: f64) {
        self.push(DrawOp::Scale { x, y });
    }

    fn rotate(&mut self, degrees: i32) {
        self.push(DrawOp::Rotate { degrees });
    }
}

/// How to draw one page into one destination rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct PageTransform {
    ops: SmallVec<[DrawOp; 8]>,
    ctm: Matrix,
    clip: Rect,
    device_clip: Rect,
    frame: Rect,
    scale: f64,
}

impl PageTransform {
    /// The no-draw transform: no operations, identity matrix, zero clip.
    pub fn empty() -> Self {
        Self {
            ops: SmallVec::new(),
            ctm: MATRIX_IDENTITY,
            clip: Rect::ZERO,
            device_clip: Rect::ZERO,
            frame: Rect::ZERO,
            scale: 1.0,
        }
    }

    /// Computes the transform drawing `page` into `dest` with `alignment`.
    ///
    /// The page is aspect-fitted without rounding, placed horizontally per
    /// `alignment` and always centered vertically. A page whose box is empty,
    /// or a destination with no area, yields [`PageTransform::empty`].
    pub fn compute(page: &PageGeometry, dest: Rect, alignment: Alignment) -> Self {
        let Some(box_rect) = page.box_rect() else {
            return Self::empty();
        };
        let page_size = page.size();
        let fitted = aspect_fit(page_size, dest.size, RoundingPolicy::None);
        if fitted.is_empty() {
            return Self::empty();
        }

        let offset_x = dest.min_x() + alignment.offset(dest.width(), fitted.width);
        let offset_y = dest.min_y() + (dest.height() - fitted.height) / 2.0;
        let scale = if page_size.width != 0.0 {
            fitted.width / page_size.width
        } else {
            1.0
        };

        let mut rec = OpRecorder::new();
        rec.translate(offset_x, offset_y);
        rec.scale(scale, scale);

        match page.rotation {
            Rotation::Deg0 => {
                rec.translate(0.0, box_rect.height());
                rec.scale(1.0, -1.0);
            }
            Rotation::Deg90 => {
                rec.scale(1.0, -1.0);
                rec.rotate(-90);
            }
            Rotation::Deg180 => {
                rec.scale(1.0, -1.0);
                rec.translate(box_rect.width(), 0.0);
                rec.rotate(180);
            }
            Rotation::Deg270 => {
                rec.translate(box_rect.height(), box_rect.width());
                rec.rotate(90);
                rec.scale(-1.0, 1.0);
            }
        }

        rec.push(DrawOp::Clip(Rect::from_size(box_rect.size)));
        rec.translate(-box_rect.min_x(), -box_rect.min_y());

        Self {
            ops: rec.ops,
            ctm: rec.ctm,
            clip: rec.clip,
            device_clip: rec.device_clip,
            frame: Rect::new(offset_x, offset_y, fitted.width, fitted.height),
            scale,
        }
    }

    /// Plans an off-screen thumbnail of `page` no larger than `target`.
    ///
    /// Returns `None` when nothing would be drawn.
    pub fn thumbnail(
        page: &PageGeometry,
        target: Size,
        rounding: RoundingPolicy,
    ) -> Option<Thumbnail> {
        if target.is_empty() {
            return None;
        }
        let size = aspect_fit(page.size(), target, rounding);
        if size.is_empty() {
            return None;
        }
        let transform = Self::compute(page, Rect::from_size(size), Alignment::Left);
        if transform.is_empty() {
            return None;
        }
        Some(Thumbnail { size, transform })
    }

    /// True for the no-draw transform.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Operations in the order a renderer must apply them.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Composed matrix mapping page space to device space.
    pub fn matrix(&self) -> Matrix {
        self.ctm
    }

    /// Clip rectangle in the space current when the clip is applied.
    pub fn clip(&self) -> Rect {
        self.clip
    }

    /// Clip rectangle mapped to device space.
    pub fn device_clip(&self) -> Rect {
        self.device_clip
    }

    /// Where the fitted page lands inside the destination.
    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Maps a point in page space (PDF coordinates) to device space.
    pub fn map_point(&self, p: Point) -> Point {
        apply_matrix_pt(self.ctm, p)
    }
}

/// Off-screen rendering plan for a page image.
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    /// Pixel size of the image to allocate.
    pub size: Size,
    pub transform: PageTransform,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarter_turn_matrices_are_exact() {
        assert_eq!(quarter_turn_matrix(-90), (0.0, -1.0, 1.0, 0.0, 0.0, 0.0));
        assert_eq!(quarter_turn_matrix(270), quarter_turn_matrix(-90));
        assert_eq!(quarter_turn_matrix(360), MATRIX_IDENTITY);
    }

    #[test]
    fn test_alignment_offsets() {
        assert_eq!(Alignment::Center.offset(100.0, 60.0), 20.0);
        assert_eq!(Alignment::Left.offset(100.0, 60.0), 0.0);
        assert_eq!(Alignment::Right.offset(100.0, 60.0), 40.0);
    }
}
