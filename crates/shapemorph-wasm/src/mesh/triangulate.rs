//! Ring preparation and ear-cutting triangulation.
//!
//! Converts a closed polygon ring into triangles using the `earcutr`
//! ear-clipping algorithm. Input rings are validated first: degenerate or
//! self-intersecting rings are rejected instead of being cut into
//! meaningless triangles.

use crate::error::MorphError;
use crate::geometry::{Point, Ring, AREA_EPSILON};

use super::types::Triangle;

const POINT_EQUALITY_EPSILON: f64 = 1e-9;
const AREA_RELATIVE_TOLERANCE: f64 = 1e-6;

/// A ring cleaned up for triangulation, plus what was changed.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRing {
    /// Ring without a repeated closing point or consecutive duplicates.
    pub ring: Ring,
    /// Human-readable notes about fixes applied to the input.
    pub warnings: Vec<String>,
}

/// Drops an explicit closing point and consecutive duplicate points.
///
/// Path parsers often emit the start point again before closing; the mesh
/// needs every vertex exactly once.
pub fn prepare_ring(ring: &Ring) -> PreparedRing {
    let mut warnings = Vec::new();
    let mut points: Vec<Point> = Vec::with_capacity(ring.len());
    let mut duplicates = 0usize;

    for p in ring.points() {
        if points.last().is_some_and(|last| points_approx_equal(*last, *p)) {
            duplicates += 1;
            continue;
        }
        points.push(*p);
    }

    if points.len() > 1 {
        if let (Some(first), Some(last)) = (points.first().copied(), points.last().copied()) {
            if points_approx_equal(first, last) {
                points.pop();
                warnings.push(
                    "ring repeats its first point at the end; dropping closing point".to_string(),
                );
            }
        }
    }

    if duplicates > 0 {
        warnings.push(format!(
            "ring has {duplicates} consecutive duplicate point(s); dropping them"
        ));
    }

    PreparedRing {
        ring: Ring::new(points),
        warnings,
    }
}

/// Triangulates a simple ring.
///
/// Triangle vertex indices refer to positions in `ring`. Any valid ear
/// decomposition may be returned; vertices lying on a straight run between
/// their neighbours may be skipped by the ear cutter.
///
/// # Errors
///
/// Returns [`MorphError::Geometry`] if the ring has fewer than 3 points,
/// has a NaN or infinite coordinate, encloses no area or too much to
/// represent, crosses itself, or cannot be covered by triangles.
pub fn triangulate(ring: &Ring) -> Result<Vec<Triangle>, MorphError> {
    if ring.len() < 3 {
        return Err(MorphError::Geometry(format!(
            "ring has {} point(s); need at least 3",
            ring.len()
        )));
    }

    if let Some(i) = ring
        .points()
        .iter()
        .position(|p| !p.x.is_finite() || !p.y.is_finite())
    {
        return Err(MorphError::Geometry(format!(
            "ring point {i} has a non-finite coordinate"
        )));
    }

    check_simple(ring)?;

    let ring_area = ring.area();
    if !ring_area.is_finite() {
        return Err(MorphError::Geometry(
            "ring area overflows; coordinates are too large".to_string(),
        ));
    }
    if ring_area <= AREA_EPSILON {
        return Err(MorphError::Geometry("ring encloses no area".to_string()));
    }

    let mut flat = Vec::with_capacity(ring.len() * 2);
    for p in ring.points() {
        flat.push(p.x);
        flat.push(p.y);
    }

    let indices = earcutr::earcut(&flat, &[], 2)
        .map_err(|err| MorphError::Geometry(format!("ear cutting failed: {err:?}")))?;
    if indices.is_empty() {
        return Err(MorphError::Geometry(
            "ear cutting produced no triangles".to_string(),
        ));
    }

    let mut triangles = Vec::with_capacity(indices.len() / 3);
    let mut covered = 0.0;
    for tri in indices.chunks_exact(3) {
        if let [a, b, c] = *tri {
            covered += triangle_area(ring.points(), a, b, c)?;
            triangles.push(Triangle::new(a, b, c));
        }
    }

    if (covered - ring_area).abs() > AREA_RELATIVE_TOLERANCE * ring_area.max(1.0) {
        return Err(MorphError::Geometry(format!(
            "triangles cover {covered} of ring area {ring_area}"
        )));
    }

    Ok(triangles)
}

/// Rejects rings whose edges cross, touch, or fold back on themselves.
///
/// # Errors
///
/// Returns [`MorphError::Geometry`] naming the first offending edge pair.
pub fn check_simple(ring: &Ring) -> Result<(), MorphError> {
    let edges: Vec<(Point, Point)> = ring.edges().collect();
    let n = edges.len();

    for (i, (a, b)) in edges.iter().enumerate() {
        for (j, (c, d)) in edges.iter().enumerate().skip(i + 2) {
            if i == 0 && j == n - 1 {
                continue;
            }
            if segments_intersect(*a, *b, *c, *d) {
                return Err(MorphError::Geometry(format!(
                    "ring is self-intersecting: edge {i} meets edge {j}"
                )));
            }
        }
    }

    for (i, ((a, b), (_, c))) in edges
        .iter()
        .zip(edges.iter().cycle().skip(1))
        .enumerate()
    {
        let folds_back = a.cross(*b, *c).abs() <= AREA_EPSILON
            && (b.x - a.x).mul_add(c.x - b.x, (b.y - a.y) * (c.y - b.y)) < 0.0;
        if folds_back {
            return Err(MorphError::Geometry(format!(
                "ring is self-intersecting: edge {i} folds back on the next edge"
            )));
        }
    }

    Ok(())
}

fn orientation(a: Point, b: Point, c: Point) -> i8 {
    let v = a.cross(b, c);
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

fn on_segment(a: Point, b: Point, p: Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

fn segments_intersect(a: Point, b: Point, c: Point, d: Point) -> bool {
    let o1 = orientation(a, b, c);
    let o2 = orientation(a, b, d);
    let o3 = orientation(c, d, a);
    let o4 = orientation(c, d, b);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    (o1 == 0 && on_segment(a, b, c))
        || (o2 == 0 && on_segment(a, b, d))
        || (o3 == 0 && on_segment(c, d, a))
        || (o4 == 0 && on_segment(c, d, b))
}

fn triangle_area(points: &[Point], a: usize, b: usize, c: usize) -> Result<f64, MorphError> {
    let (Some(pa), Some(pb), Some(pc)) = (points.get(a), points.get(b), points.get(c)) else {
        return Err(MorphError::Geometry(format!(
            "triangle ({a}, {b}, {c}) references a vertex outside the ring"
        )));
    };
    Ok(pa.cross(*pb, *pc).abs() / 2.0)
}

fn points_approx_equal(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() <= POINT_EQUALITY_EPSILON && (a.y - b.y).abs() <= POINT_EQUALITY_EPSILON
}
