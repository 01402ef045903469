//! Axis-aligned geometry shared by every spatial check in the simulation.

use serde::{Deserialize, Serialize};

/// Point expressed in logical units.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate, growing to the right.
    pub x: f64,
    /// Vertical coordinate, growing downwards.
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle anchored at its upper-left corner.
///
/// Extents are never negative. [`Rect::contains`] excludes the boundary while
/// [`Rect::intersects`] includes it, so two rectangles that merely touch
/// intersect even though neither contains the shared edge.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl Rect {
    /// Creates a rectangle, clamping negative extents to zero.
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Left edge.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Top edge.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Horizontal extent.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Vertical extent.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Upper-left corner.
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Returns the rectangle moved by the provided offsets.
    #[must_use]
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Reports whether the point lies strictly inside the rectangle.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x > self.x && point.x < self.right() && point.y > self.y && point.y < self.bottom()
    }

    /// Reports whether the rectangles overlap or touch.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.right() < other.x || self.x > other.right() {
            return false;
        }

        if self.bottom() < other.y || self.y > other.bottom() {
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::{Point, Rect};

    #[test]
    fn negative_extents_are_clamped() {
        let rect = Rect::new(4.0, 2.0, -3.0, -1.0);
        assert_eq!(rect.width(), 0.0);
        assert_eq!(rect.height(), 0.0);
    }

    #[test]
    fn contains_accepts_interior_points() {
        let rect = Rect::new(0.0, 0.0, 50.0, 50.0);
        assert!(rect.contains(Point::new(25.0, 25.0)));
        assert!(rect.contains(Point::new(0.001, 49.999)));
    }

    #[test]
    fn contains_rejects_boundary_points() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        for point in [
            Point::new(10.0, 30.0),
            Point::new(40.0, 30.0),
            Point::new(20.0, 20.0),
            Point::new(20.0, 60.0),
            Point::new(10.0, 20.0),
        ] {
            assert!(!rect.contains(point), "{point:?} lies on the boundary");
        }
    }

    #[test]
    fn touching_edges_intersect() {
        let left = Rect::new(0.0, 0.0, 50.0, 50.0);
        let right = Rect::new(50.0, 0.0, 50.0, 50.0);
        let below = Rect::new(0.0, 50.0, 50.0, 50.0);
        assert!(left.intersects(&right));
        assert!(left.intersects(&below));
    }

    #[test]
    fn separated_rectangles_do_not_intersect() {
        let first = Rect::new(0.0, 0.0, 10.0, 10.0);
        let second = Rect::new(10.5, 0.0, 10.0, 10.0);
        let third = Rect::new(0.0, -20.0, 10.0, 19.0);
        assert!(!first.intersects(&second));
        assert!(!first.intersects(&third));
    }

    #[test]
    fn intersection_is_symmetric() {
        let samples = [
            Rect::new(0.0, 0.0, 50.0, 50.0),
            Rect::new(25.0, 25.0, 10.0, 10.0),
            Rect::new(50.0, 50.0, 5.0, 5.0),
            Rect::new(-30.0, 10.0, 20.0, 100.0),
            Rect::new(100.0, 0.0, 0.0, 0.0),
            Rect::new(-10.0, -10.0, 200.0, 5.0),
        ];

        for a in &samples {
            for b in &samples {
                assert_eq!(a.intersects(b), b.intersects(a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn translated_preserves_extent() {
        let rect = Rect::new(1.0, 2.0, 3.0, 4.0).translated(-5.0, 0.5);
        assert_eq!(rect, Rect::new(-4.0, 2.5, 3.0, 4.0));
    }
}
