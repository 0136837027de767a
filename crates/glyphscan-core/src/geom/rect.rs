//! Axis-aligned rectangles

use super::Point;
use crate::error::{Error, Result};

/// A rectangle region
///
/// Right and bottom edges are exclusive. A rectangle with zero width or
/// height is empty and never contributes to a union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left x coordinate
    pub x: i32,
    /// Top y coordinate
    pub y: i32,
    /// Width
    pub w: i32,
    /// Height
    pub h: i32,
}

impl Rect {
    /// Create a new rectangle
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is negative.
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Result<Self> {
        if w < 0 || h < 0 {
            return Err(Error::InvalidParameter(format!(
                "rect dimensions must be non-negative: w={}, h={}",
                w, h
            )));
        }
        Ok(Self { x, y, w, h })
    }

    /// Create a rectangle without validation
    pub const fn new_unchecked(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Create a rectangle from its left, top, right and bottom edges
    ///
    /// Right and bottom are exclusive. Inverted edges give an empty rectangle.
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            x: left,
            y: top,
            w: (right - left).max(0),
            h: (bottom - top).max(0),
        }
    }

    /// Get the right x coordinate (exclusive)
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Get the bottom y coordinate (exclusive)
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Top-left corner
    #[inline]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Get the area
    #[inline]
    pub fn area(&self) -> i64 {
        self.w as i64 * self.h as i64
    }

    /// Check if the rectangle is empty (zero area)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Check if a point is inside the rectangle
    #[inline]
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Check if this rectangle contains another
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Check if this rectangle overlaps with another
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Compute the intersection of two rectangles
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::from_edges(x, y, right, bottom))
        } else {
            None
        }
    }

    /// Compute the bounding rectangle of two rectangles
    ///
    /// Empty rectangles are ignored, so the union of an empty rectangle
    /// with `other` is `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }
        Rect::from_edges(
            self.x.min(other.x),
            self.y.min(other.y),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Length of the overlap between the x-projections of two rectangles
    ///
    /// Returns 0 when the projections are disjoint or only touch.
    pub fn horizontal_overlap(&self, other: &Rect) -> i32 {
        (self.right().min(other.right()) - self.x.max(other.x)).max(0)
    }

    /// Length of the overlap between the y-projections of two rectangles
    pub fn vertical_overlap(&self, other: &Rect) -> i32 {
        (self.bottom().min(other.bottom()) - self.y.max(other.y)).max(0)
    }

    /// Horizontal gap from the right edge of `self` to the left edge of
    /// `other`; negative when they overlap
    pub fn horizontal_gap(&self, other: &Rect) -> i32 {
        other.x - self.right()
    }

    /// Translate the rectangle by (dx, dy)
    pub fn translate(&self, dx: i32, dy: i32) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            w: self.w,
            h: self.h,
        }
    }

    /// Grow the rectangle by `amount` on every side
    pub fn expand(&self, amount: i32) -> Rect {
        Rect::from_edges(
            self.x - amount,
            self.y - amount,
            self.right() + amount,
            self.bottom() + amount,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_new_rejects_negative() {
        assert!(Rect::new(0, 0, -1, 5).is_err());
        assert!(Rect::new(0, 0, 0, 0).is_ok());
    }

    #[test]
    fn test_rect_edges() {
        let r = Rect::new_unchecked(10, 20, 30, 40);
        assert_eq!(r.right(), 40);
        assert_eq!(r.bottom(), 60);
        assert_eq!(r.area(), 1200);
        assert!(r.contains_point(Point::new(10, 20)));
        assert!(!r.contains_point(Point::new(40, 20)));
        assert!(r.contains_rect(&Rect::new_unchecked(10, 20, 30, 40)));
        assert!(!r.contains_rect(&Rect::new_unchecked(11, 20, 30, 40)));
    }

    #[test]
    fn test_rect_union_ignores_empty() {
        let a = Rect::new_unchecked(5, 5, 10, 10);
        let empty = Rect::new_unchecked(100, 100, 0, 0);
        assert_eq!(a.union(&empty), a);
        assert_eq!(empty.union(&a), a);

        let b = Rect::new_unchecked(0, 12, 4, 8);
        assert_eq!(a.union(&b), Rect::new_unchecked(0, 5, 15, 15));
    }

    #[test]
    fn test_rect_intersect() {
        let a = Rect::new_unchecked(0, 0, 10, 10);
        let b = Rect::new_unchecked(5, 5, 10, 10);
        assert_eq!(a.intersect(&b), Some(Rect::new_unchecked(5, 5, 5, 5)));
        let c = Rect::new_unchecked(10, 0, 5, 5);
        assert_eq!(a.intersect(&c), None);
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_rect_projection_overlaps() {
        let a = Rect::new_unchecked(0, 0, 10, 10);
        let b = Rect::new_unchecked(6, 8, 10, 10);
        assert_eq!(a.horizontal_overlap(&b), 4);
        assert_eq!(a.vertical_overlap(&b), 2);
        assert_eq!(a.horizontal_gap(&b), -4);

        let c = Rect::new_unchecked(13, 0, 2, 2);
        assert_eq!(a.horizontal_overlap(&c), 0);
        assert_eq!(a.horizontal_gap(&c), 3);
    }

    #[test]
    fn test_rect_expand_translate() {
        let r = Rect::new_unchecked(2, 3, 4, 5);
        assert_eq!(r.expand(1), Rect::new_unchecked(1, 2, 6, 7));
        assert_eq!(r.translate(-2, 1), Rect::new_unchecked(0, 4, 4, 5));
    }
}
