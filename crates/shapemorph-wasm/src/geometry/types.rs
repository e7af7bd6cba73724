//! Core geometry types: points, rings and bounding boxes.

use serde::{Deserialize, Serialize};

/// Areas below this magnitude are treated as zero.
pub const AREA_EPSILON: f64 = 1e-12;

/// Converts a length to `u32`, clamping at `u32::MAX`.
pub fn saturate_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// 2D point in shape coordinate space.
///
/// Crosses the JS boundary as a two-element array `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a point from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Point halfway between `self` and `other`.
    pub fn midpoint(self, other: Self) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Cross product of `(b - self)` and `(c - self)`.
    ///
    /// Positive when `self, b, c` turn counter-clockwise in a y-up frame.
    pub fn cross(self, b: Self, c: Self) -> f64 {
        (b.x - self.x).mul_add(c.y - self.y, -((b.y - self.y) * (c.x - self.x)))
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    /// Minimum X coordinate.
    pub min_x: f64,
    /// Minimum Y coordinate.
    pub min_y: f64,
    /// Maximum X coordinate.
    pub max_x: f64,
    /// Maximum Y coordinate.
    pub max_y: f64,
}

impl BoundingBox {
    /// Creates an empty bounding box that will expand with the first `update` call.
    pub const fn new() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Expands the bounding box to include the given point.
    pub fn update(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// Returns `true` until the first point has been added.
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Horizontal extent, zero for an empty box.
    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_x - self.min_x
        }
    }

    /// Vertical extent, zero for an empty box.
    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_y - self.min_y
        }
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new()
    }
}

/// Closed polygon boundary.
///
/// The last point connects back to the first; the closing point is not
/// repeated. Winding order is whatever the producer emitted and must not be
/// assumed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ring(Vec<Point>);

impl Ring {
    /// Wraps a point sequence without validating it.
    pub const fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// The ring's vertices in boundary order.
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Consumes the ring and returns its vertices.
    pub fn into_points(self) -> Vec<Point> {
        self.0
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the ring has no vertices.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the ring's edges as `(start, end)` pairs, including the
    /// closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.0
            .iter()
            .copied()
            .zip(self.0.iter().copied().cycle().skip(1))
    }

    /// Shoelace area; the sign follows the winding.
    pub fn signed_area(&self) -> f64 {
        self.edges()
            .map(|(a, b)| a.x.mul_add(b.y, -(b.x * a.y)))
            .sum::<f64>()
            / 2.0
    }

    /// Unsigned polygon area.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Area-weighted centroid.
    ///
    /// Falls back to the vertex mean when the ring encloses no area.
    /// Returns `None` for an empty ring.
    #[allow(clippy::cast_precision_loss)]
    pub fn centroid(&self) -> Option<Point> {
        if self.0.is_empty() {
            return None;
        }

        let mut twice_area = 0.0;
        let mut cx = 0.0;
        let mut cy = 0.0;
        for (a, b) in self.edges() {
            let c = a.x.mul_add(b.y, -(b.x * a.y));
            twice_area += c;
            cx += (a.x + b.x) * c;
            cy += (a.y + b.y) * c;
        }

        if twice_area.abs() <= AREA_EPSILON {
            let n = self.0.len() as f64;
            let (sx, sy) = self
                .0
                .iter()
                .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
            return Some(Point::new(sx / n, sy / n));
        }

        let k = twice_area * 3.0;
        Some(Point::new(cx / k, cy / k))
    }

    /// Bounding box of all vertices.
    pub fn bounds(&self) -> BoundingBox {
        let mut bounds = BoundingBox::new();
        for p in &self.0 {
            bounds.update(*p);
        }
        bounds
    }

    /// Same boundary walked in the opposite direction, starting at the same vertex.
    pub fn reversed(&self) -> Self {
        let mut points = Vec::with_capacity(self.0.len());
        if let Some((first, rest)) = self.0.split_first() {
            points.push(*first);
            points.extend(rest.iter().rev().copied());
        }
        Self(points)
    }

    /// Same boundary starting at vertex `offset`.
    pub fn rotated(&self, offset: usize) -> Self {
        if self.0.is_empty() {
            return self.clone();
        }
        let offset = offset % self.0.len();
        Self(
            self.0
                .iter()
                .cycle()
                .skip(offset)
                .take(self.0.len())
                .copied()
                .collect(),
        )
    }
}

impl From<Vec<Point>> for Ring {
    fn from(points: Vec<Point>) -> Self {
        Self(points)
    }
}

impl FromIterator<Point> for Ring {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn square(side: f64) -> Ring {
        Ring::new(vec![
            Point::new(0.0, 0.0),
            Point::new(side, 0.0),
            Point::new(side, side),
            Point::new(0.0, side),
        ])
    }

    #[test]
    fn square_signed_area_is_positive_counter_clockwise() {
        let ring = square(4.0);
        assert!((ring.signed_area() - 16.0).abs() < f64::EPSILON);
        assert!((ring.reversed().signed_area() + 16.0).abs() < f64::EPSILON);
        assert!((ring.reversed().area() - 16.0).abs() < f64::EPSILON);
    }

    #[test]
    fn edges_include_closing_edge() {
        let ring = square(1.0);
        let edges: Vec<_> = ring.edges().collect();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[3], (Point::new(0.0, 1.0), Point::new(0.0, 0.0)));
    }

    #[test]
    fn centroid_of_square_is_center() {
        let c = square(4.0).centroid();
        assert_eq!(c, Some(Point::new(2.0, 2.0)));
    }

    #[test]
    fn centroid_is_area_weighted_not_vertex_mean() {
        // Extra vertices bunched on one edge must not pull the centroid.
        let ring = Ring::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
        ]);
        let c = ring.centroid().unwrap_or(Point::new(f64::NAN, f64::NAN));
        assert!((c.x - 2.0).abs() < 1e-9);
        assert!((c.y - 2.0).abs() < 1e-9);
    }

    #[test]
    fn centroid_of_flat_ring_falls_back_to_vertex_mean() {
        let ring = Ring::new(vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(4.0, 0.0),
        ]);
        assert_eq!(ring.centroid(), Some(Point::new(2.0, 0.0)));
    }

    #[test]
    fn centroid_of_empty_ring_is_none() {
        assert_eq!(Ring::default().centroid(), None);
    }

    #[test]
    fn bounds_cover_all_points() {
        let ring = Ring::new(vec![
            Point::new(1.0, 2.0),
            Point::new(-3.0, 4.0),
            Point::new(0.0, -1.0),
        ]);
        let b = ring.bounds();
        assert!((b.min_x - (-3.0)).abs() < f64::EPSILON);
        assert!((b.min_y - (-1.0)).abs() < f64::EPSILON);
        assert!((b.max_x - 1.0).abs() < f64::EPSILON);
        assert!((b.max_y - 4.0).abs() < f64::EPSILON);
        assert!((b.width() - 4.0).abs() < f64::EPSILON);
        assert!((b.height() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_bounds_have_zero_size() {
        let b = BoundingBox::new();
        assert!(b.is_empty());
        assert!(b.width().abs() < f64::EPSILON);
        assert!(b.height().abs() < f64::EPSILON);
    }

    #[test]
    fn rotated_starts_at_offset_and_wraps() {
        let ring = square(1.0).rotated(5);
        assert_eq!(ring.points()[0], Point::new(1.0, 0.0));
        assert_eq!(ring.len(), 4);
    }

    #[test]
    fn reversed_keeps_start_vertex() {
        let ring = square(1.0).reversed();
        assert_eq!(ring.points()[0], Point::new(0.0, 0.0));
        assert_eq!(ring.points()[1], Point::new(0.0, 1.0));
    }

    #[test]
    fn cross_sign_follows_turn_direction() {
        let o = Point::new(0.0, 0.0);
        assert!(o.cross(Point::new(1.0, 0.0), Point::new(0.0, 1.0)) > 0.0);
        assert!(o.cross(Point::new(0.0, 1.0), Point::new(1.0, 0.0)) < 0.0);
    }
}
