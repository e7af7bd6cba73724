//! Start-vertex alignment and vertex-count equalization for ring pairs.
//!
//! Interpolating vertex `i` of one ring towards vertex `i` of another only
//! looks right when both rings start at roughly the same place and have the
//! same number of vertices.

use crate::error::MorphError;
use crate::geometry::{Point, Ring};

/// Ring alignment settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignOptions {
    /// Also try walking the ring in the opposite direction.
    pub allow_reverse: bool,
}

/// Rotates `ring` (and optionally reverses it) so that it lines up with
/// `reference` vertex by vertex.
///
/// Every start offset is tried and the one with the smallest total
/// vertex-to-vertex distance wins; the first offset wins ties. A reversed
/// walk is only taken if it is strictly better.
///
/// # Errors
///
/// Returns [`MorphError::InvalidArgument`] if the rings differ in vertex
/// count.
pub fn align(reference: &Ring, ring: &Ring, options: AlignOptions) -> Result<Ring, MorphError> {
    if reference.len() != ring.len() {
        return Err(MorphError::InvalidArgument(format!(
            "cannot align rings of {} and {} vertices",
            reference.len(),
            ring.len()
        )));
    }
    if ring.is_empty() {
        return Ok(ring.clone());
    }

    let (offset, cost) = best_rotation(reference.points(), ring.points());
    if options.allow_reverse {
        let reversed = ring.reversed();
        let (rev_offset, rev_cost) = best_rotation(reference.points(), reversed.points());
        if rev_cost < cost {
            return Ok(reversed.rotated(rev_offset));
        }
    }

    Ok(ring.rotated(offset))
}

/// Start offset into `ring` minimizing the summed distance to `reference`,
/// and that distance.
pub fn best_rotation(reference: &[Point], ring: &[Point]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for offset in 0..ring.len() {
        let cost: f64 = ring
            .iter()
            .cycle()
            .skip(offset)
            .zip(reference)
            .map(|(p, q)| p.distance(*q))
            .sum();
        if cost < best.1 {
            best = (offset, cost);
        }
    }
    best
}

/// Adds vertices to `ring` until it has `count` of them.
///
/// Each new vertex bisects the current longest edge, so the outline is
/// unchanged. Rings that already have `count` or more vertices, or have no
/// vertices, are returned as they are.
pub fn densify(ring: &Ring, count: usize) -> Ring {
    if ring.is_empty() || ring.len() >= count {
        return ring.clone();
    }

    let mut points = ring.points().to_vec();
    while points.len() < count {
        let longest = points
            .iter()
            .zip(points.iter().cycle().skip(1))
            .enumerate()
            .fold((0, f64::NEG_INFINITY, None), |best, (i, (a, b))| {
                let len = a.distance(*b);
                if len > best.1 {
                    (i, len, Some(a.midpoint(*b)))
                } else {
                    best
                }
            });
        let (i, _, midpoint) = longest;
        let Some(midpoint) = midpoint else {
            break;
        };
        points.insert(i + 1, midpoint);
    }
    Ring::new(points)
}

/// Densifies whichever ring is shorter so both have the same vertex count.
pub fn equalize(a: &Ring, b: &Ring) -> (Ring, Ring) {
    let count = a.len().max(b.len());
    (densify(a, count), densify(b, count))
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn ring(coords: &[(f64, f64)]) -> Ring {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn square() -> Ring {
        ring(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)])
    }

    #[test]
    fn rotated_copy_aligns_back_to_reference() {
        let reference = square();
        let shifted = reference.rotated(2);
        let aligned = align(&reference, &shifted, AlignOptions::default());
        assert_eq!(aligned, Ok(reference));
    }

    #[test]
    fn identical_rings_keep_offset_zero() {
        let reference = square();
        let (offset, cost) = best_rotation(reference.points(), reference.points());
        assert_eq!(offset, 0);
        assert!(cost.abs() < f64::EPSILON);
    }

    #[test]
    fn reversal_only_when_allowed() {
        let reference = square();
        let backwards = reference.reversed().rotated(1);

        let forward_only = align(&reference, &backwards, AlignOptions::default());
        assert!(forward_only.is_ok());
        assert_ne!(forward_only.ok(), Some(reference.clone()));

        let with_reverse = align(
            &reference,
            &backwards,
            AlignOptions {
                allow_reverse: true,
            },
        );
        assert_eq!(with_reverse, Ok(reference));
    }

    #[test]
    fn mismatched_vertex_counts_are_invalid_argument() {
        let tri = ring(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        assert!(matches!(
            align(&square(), &tri, AlignOptions::default()),
            Err(MorphError::InvalidArgument(_))
        ));
    }

    #[test]
    fn densify_bisects_longest_edges() {
        let long = ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 1.0), (0.0, 1.0)]);
        let dense = densify(&long, 6);
        assert_eq!(dense.len(), 6);
        assert_eq!(dense.points()[1], Point::new(5.0, 0.0));
        assert_eq!(dense.points()[4], Point::new(5.0, 1.0));
        assert!((dense.area() - long.area()).abs() < 1e-9);
    }

    #[test]
    fn densify_splits_closing_edge_at_the_end() {
        let tall = ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 9.0)]);
        let dense = densify(&tall, 5);
        assert_eq!(dense.points()[4], Point::new(0.0, 4.5));
    }

    #[test]
    fn densify_stops_when_no_edge_has_a_length() {
        let broken = ring(&[(f64::NAN, 0.0), (1.0, f64::NAN), (0.0, 1.0)]);
        let dense = densify(&broken, 6);
        assert_eq!(dense.len(), 3);
    }

    #[test]
    fn equalize_grows_the_shorter_ring() {
        let tri = ring(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        let (a, b) = equalize(&tri, &square());
        assert_eq!(a.len(), 4);
        assert_eq!(b, square());
        let (c, d) = equalize(&square(), &tri);
        assert_eq!(c, square());
        assert_eq!(d.len(), 4);
    }
}
