//! Greedy nearest-centroid correspondence.

use crate::error::MorphError;
use crate::geometry::{Point, Ring};

/// For each point of `a` in order, picks the closest point of `b` that has
/// not been picked yet.
///
/// Returns `perm` with `perm[i]` the index into `b` paired with `a[i]`.
/// Ties go to the lower index in `b`.
///
/// # Errors
///
/// Returns [`MorphError::InvalidArgument`] if `a` and `b` differ in length.
pub fn closest_centroids(a: &[Point], b: &[Point]) -> Result<Vec<usize>, MorphError> {
    if a.len() != b.len() {
        return Err(MorphError::InvalidArgument(format!(
            "cannot pair {} centroids with {}",
            a.len(),
            b.len()
        )));
    }

    let mut remaining: Vec<Option<Point>> = b.iter().copied().map(Some).collect();
    let mut perm = Vec::with_capacity(a.len());

    for (i, from) in a.iter().enumerate() {
        let nearest = remaining
            .iter()
            .enumerate()
            .filter_map(|(j, p)| p.map(|p| (j, from.distance(p))))
            .fold(None, |best: Option<(usize, f64)>, (j, d)| match best {
                Some((_, best_d)) if best_d <= d => best,
                _ => Some((j, d)),
            });

        let Some((j, _)) = nearest else {
            return Err(MorphError::InvariantViolation(format!(
                "no unused centroid left for element {i}"
            )));
        };
        if let Some(slot) = remaining.get_mut(j) {
            *slot = None;
        }
        perm.push(j);
    }

    Ok(perm)
}

/// Ring variant of [`closest_centroids`] using area-weighted centroids.
///
/// # Errors
///
/// Returns [`MorphError::InvalidArgument`] if the lists differ in length or
/// a ring is empty.
pub fn closest_ring_centroids(a: &[Ring], b: &[Ring]) -> Result<Vec<usize>, MorphError> {
    closest_centroids(&centroids(a)?, &centroids(b)?)
}

/// Area-weighted centroid of every ring.
///
/// # Errors
///
/// Returns [`MorphError::InvalidArgument`] naming the first empty ring.
pub fn centroids(rings: &[Ring]) -> Result<Vec<Point>, MorphError> {
    rings
        .iter()
        .enumerate()
        .map(|(i, r)| {
            r.centroid()
                .ok_or_else(|| MorphError::InvalidArgument(format!("ring {i} has no points")))
        })
        .collect()
}
